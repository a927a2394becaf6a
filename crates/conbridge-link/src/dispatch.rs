use conbridge_frame::{Command, Frame};
use tracing::warn;

use crate::screen::{ColorRole, Screen};

/// What the receive loop should do after a frame has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep consuming the batch.
    Continue,
    /// The host asked the bridge to terminate. Remaining frames in the
    /// batch are not processed.
    Close,
}

/// React to one decoded frame.
///
/// Protocol violations from the host are non-fatal: an unrecognized or
/// malformed payload becomes a flagged diagnostic line in the transcript
/// and the loop carries on.
pub fn dispatch<S: Screen>(frame: &Frame, screen: &mut S) -> Outcome {
    match Command::parse(&frame.text) {
        Command::Close => Outcome::Close,
        Command::Clear => {
            screen.clear();
            Outcome::Continue
        }
        Command::Print(text) => {
            screen.append(&text, ColorRole::Default);
            Outcome::Continue
        }
        Command::Error(text) => {
            screen.append(&text, ColorRole::Error);
            Outcome::Continue
        }
        Command::Warn(text) => {
            screen.append(&text, ColorRole::Warning);
            Outcome::Continue
        }
        Command::Unknown(raw) => {
            warn!(payload = %raw, "unknown message from host");
            screen.append(
                &format!("\nunknown message received {raw:?}\n"),
                ColorRole::Error,
            );
            Outcome::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Append(String, ColorRole),
        Clear,
    }

    #[derive(Default)]
    struct RecordingScreen {
        events: Vec<Event>,
    }

    impl Screen for RecordingScreen {
        fn append(&mut self, text: &str, role: ColorRole) {
            self.events.push(Event::Append(text.to_owned(), role));
        }

        fn clear(&mut self) {
            self.events.push(Event::Clear);
        }
    }

    fn frame(text: &str) -> Frame {
        Frame::new(text)
    }

    #[test]
    fn print_appends_in_default_color() {
        let mut screen = RecordingScreen::default();
        let outcome = dispatch(&frame("print hello"), &mut screen);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            screen.events,
            vec![Event::Append("hello".into(), ColorRole::Default)]
        );
    }

    #[test]
    fn error_and_warning_use_their_roles() {
        let mut screen = RecordingScreen::default();
        dispatch(&frame("error boom"), &mut screen);
        dispatch(&frame("warng careful"), &mut screen);

        assert_eq!(
            screen.events,
            vec![
                Event::Append("boom".into(), ColorRole::Error),
                Event::Append("careful".into(), ColorRole::Warning),
            ]
        );
    }

    #[test]
    fn clear_requests_a_wipe() {
        let mut screen = RecordingScreen::default();
        let outcome = dispatch(&frame("clear"), &mut screen);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(screen.events, vec![Event::Clear]);
    }

    #[test]
    fn clear_on_empty_display_is_harmless() {
        let mut screen = RecordingScreen::default();
        dispatch(&frame("clear"), &mut screen);
        dispatch(&frame("clear"), &mut screen);
        assert_eq!(screen.events, vec![Event::Clear, Event::Clear]);
    }

    #[test]
    fn close_stops_without_touching_the_screen() {
        let mut screen = RecordingScreen::default();
        let outcome = dispatch(&frame("close"), &mut screen);

        assert_eq!(outcome, Outcome::Close);
        assert!(screen.events.is_empty());
    }

    #[test]
    fn unknown_payload_is_flagged_in_error_color() {
        let mut screen = RecordingScreen::default();
        let outcome = dispatch(&frame("bogus"), &mut screen);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(screen.events.len(), 1);
        match &screen.events[0] {
            Event::Append(text, role) => {
                assert!(text.contains("unknown message received"));
                assert!(text.contains("bogus"));
                assert_eq!(*role, ColorRole::Error);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn empty_print_argument_appends_empty_string() {
        let mut screen = RecordingScreen::default();
        dispatch(&frame("print "), &mut screen);
        assert_eq!(
            screen.events,
            vec![Event::Append(String::new(), ColorRole::Default)]
        );
    }
}
