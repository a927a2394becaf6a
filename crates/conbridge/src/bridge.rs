use std::sync::{Arc, Mutex};
use std::time::Duration;

use conbridge_link::{
    establish, send_exit_notice, Exit, LinkConfig, ReceiveLoop, SendEndpoint, SpawnedReader,
};
use tracing::info;

use crate::exit::{io_error, link_error, CliError, CliResult, SUCCESS, USAGE};
use crate::input;
use crate::screen::{SharedScreen, TerminalScreen};
use crate::Cli;

pub fn run(cli: Cli) -> CliResult<i32> {
    let connect_timeout = parse_duration(&cli.connect_timeout)?;
    let config = LinkConfig {
        outbound_path: cli.send_to,
        inbound_path: cli.recv_from,
        connect_timeout,
    };

    let link = establish(&config).map_err(|err| link_error("failed to reach host", err))?;
    let (tx, rx) = link.into_parts();
    let tx = Arc::new(Mutex::new(tx));
    let screen = SharedScreen::new(TerminalScreen::stdout(cli.color));

    install_ctrlc_handler(Arc::clone(&tx))?;
    let _input = input::spawn(Arc::clone(&tx), screen.clone())
        .map_err(|err| io_error("input thread setup failed", err))?;

    let reader = SpawnedReader::spawn(rx).map_err(|err| link_error("reader setup failed", err))?;
    let mut rx_loop = ReceiveLoop::new(reader, screen);
    let exit = rx_loop.run();

    // Teardown runs on every exit path: tell the host we are going away
    // before the outbound endpoint is released.
    if let Ok(mut tx) = tx.lock() {
        send_exit_notice(&mut tx);
    }

    match exit {
        Exit::HostClosed => {
            info!("host closed the session");
            Ok(SUCCESS)
        }
        Exit::Disconnected => {
            info!("host went away");
            Ok(SUCCESS)
        }
        Exit::ReadFailed(err) => Err(link_error("inbound channel failed", err)),
    }
}

fn install_ctrlc_handler(tx: Arc<Mutex<SendEndpoint>>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        // Operator closed the bridge; mirror the normal teardown path.
        if let Ok(mut tx) = tx.lock() {
            send_exit_notice(&mut tx);
        }
        std::process::exit(SUCCESS);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
