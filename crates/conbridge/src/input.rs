use std::io::BufRead;
use std::sync::{Arc, Mutex};

use conbridge_link::{ColorRole, Screen, SendEndpoint};
use tracing::debug;

use crate::exit;
use crate::screen::SharedScreen;

/// Whether a submitted line should be forwarded to the host.
///
/// Empty and whitespace-only input produces no outbound write and no echo.
pub fn should_forward(line: &str) -> bool {
    !line.trim().is_empty()
}

/// The transcript echo for a forwarded line.
pub fn echo_line(line: &str) -> String {
    format!("> {line}\n")
}

/// Read operator input line by line and forward it on the outbound channel.
///
/// Runs until stdin reaches EOF; a closed stdin only ends the input path,
/// the bridge keeps rendering host output. A failed forward is a
/// connection-lost condition and fatal to the whole bridge.
pub fn spawn(
    tx: Arc<Mutex<SendEndpoint>>,
    mut screen: SharedScreen,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("conbridge-input".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if !should_forward(&line) {
                    continue;
                }

                screen.append(&echo_line(&line), ColorRole::Default);

                let Ok(mut tx) = tx.lock() else { break };
                if let Err(err) = tx.send(&line) {
                    eprintln!("error: connection to host lost: {err}");
                    std::process::exit(exit::FAILURE);
                }
            }
            debug!("input closed");
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_discarded() {
        assert!(!should_forward(""));
        assert!(!should_forward("   "));
        assert!(!should_forward("\t \t"));
    }

    #[test]
    fn real_input_is_forwarded() {
        assert!(should_forward("status"));
        assert!(should_forward("  spawn cube  "));
    }

    #[test]
    fn echo_is_prompt_prefixed() {
        assert_eq!(echo_line("status"), "> status\n");
    }
}
