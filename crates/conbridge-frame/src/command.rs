/// Exact-match keyword: terminate the bridge.
pub const KEYWORD_CLOSE: &str = "close";
/// Exact-match keyword: clear the display.
pub const KEYWORD_CLEAR: &str = "clear";
/// Prefix keyword: append text in the default color.
pub const KEYWORD_PRINT: &str = "print";
/// Prefix keyword: append text in the error color.
pub const KEYWORD_ERROR: &str = "error";
/// Prefix keyword: append text in the warning color.
pub const KEYWORD_WARN: &str = "warng";

/// Keywords are five bytes; the argument starts one separator byte later.
const ARG_OFFSET: usize = 6;

/// The decoded intent of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Terminate the bridge. No further frames in the batch are processed.
    Close,
    /// Clear the display.
    Clear,
    /// Append text in the default color.
    Print(String),
    /// Append text in the error color.
    Error(String),
    /// Append text in the warning color.
    Warn(String),
    /// Payload matched no keyword, or was too short to carry its argument.
    /// Surfaced to the operator, never fatal.
    Unknown(String),
}

impl Command {
    /// Match a frame payload against the fixed keyword grammar.
    ///
    /// `close` and `clear` match exactly. The three text keywords match on
    /// their first five bytes; the byte after the keyword is a separator
    /// (any character) and the argument is everything from byte offset 6.
    /// A payload of exactly `"print "` carries an empty argument. A payload
    /// too short for the offset, or whose offset lands inside a multi-byte
    /// character, is malformed and folds into [`Command::Unknown`].
    pub fn parse(payload: &str) -> Self {
        match payload {
            KEYWORD_CLOSE => return Self::Close,
            KEYWORD_CLEAR => return Self::Clear,
            _ => {}
        }

        let arg = |payload: &str| payload.get(ARG_OFFSET..).map(str::to_owned);
        match payload.get(..KEYWORD_PRINT.len()) {
            Some(KEYWORD_PRINT) => {
                if let Some(text) = arg(payload) {
                    return Self::Print(text);
                }
            }
            Some(KEYWORD_ERROR) => {
                if let Some(text) = arg(payload) {
                    return Self::Error(text);
                }
            }
            Some(KEYWORD_WARN) => {
                if let Some(text) = arg(payload) {
                    return Self::Warn(text);
                }
            }
            _ => {}
        }

        Self::Unknown(payload.to_owned())
    }
}
