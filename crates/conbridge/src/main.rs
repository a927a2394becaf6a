mod bridge;
mod exit;
mod input;
mod logging;
mod screen;

use std::path::PathBuf;

use clap::Parser;

use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::screen::ColorMode;

#[derive(Parser, Debug)]
#[command(
    name = "conbridge",
    version,
    about = "Detached console bridge for a controlling host process"
)]
pub struct Cli {
    /// Outbound channel socket (bridge binds, host connects).
    #[arg(
        long,
        value_name = "PATH",
        env = "CONBRIDGE_SEND_TO",
        default_value = "/tmp/conbridge-send.sock"
    )]
    pub send_to: PathBuf,

    /// Inbound channel socket (host binds, bridge connects).
    #[arg(
        long,
        value_name = "PATH",
        env = "CONBRIDGE_RECV_FROM",
        default_value = "/tmp/conbridge-recv.sock"
    )]
    pub recv_from: PathBuf,

    /// How long to wait for the host's channel (e.g. 2s, 500ms).
    #[arg(long, value_name = "DURATION", default_value = "2s")]
    pub connect_timeout: String,

    /// Transcript color handling.
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match bridge::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
