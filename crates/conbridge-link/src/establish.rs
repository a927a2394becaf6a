use std::path::PathBuf;
use std::time::Duration;

use conbridge_transport::ChannelSocket;
use tracing::{debug, info};

use crate::endpoint::{EndpointState, RecvEndpoint, SendEndpoint};
use crate::error::Result;

/// Reserved outbound message: the bridge is going away.
pub const EXIT_NOTICE: &str = "/exit";

/// How long the bridge waits for the host to create the inbound channel.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Socket paths and bounds for channel establishment.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Path of the outbound channel (bridge binds, host connects).
    pub outbound_path: PathBuf,
    /// Path of the inbound channel (host binds, bridge connects).
    pub inbound_path: PathBuf,
    /// Bound on the inbound connect. Expiry is fatal: the bridge cannot
    /// operate without both directions.
    pub connect_timeout: Duration,
}

/// An established channel pair.
#[derive(Debug)]
pub struct Link {
    pub tx: SendEndpoint,
    pub rx: RecvEndpoint,
}

impl Link {
    /// Split into the send and receive halves.
    pub fn into_parts(self) -> (SendEndpoint, RecvEndpoint) {
        (self.tx, self.rx)
    }
}

/// Establish both channels.
///
/// The outbound socket goes up first so the host can dial it while the
/// bridge dials the host's. The inbound connect is bounded by
/// `config.connect_timeout`; the subsequent wait for the host to attach to
/// the outbound socket is unbounded, mirroring the peer's own unbounded
/// wait for us.
pub fn establish(config: &LinkConfig) -> Result<Link> {
    let outbound = ChannelSocket::bind(&config.outbound_path)?;

    debug!(
        path = ?config.inbound_path,
        state = ?EndpointState::Connecting,
        timeout = ?config.connect_timeout,
        "dialing inbound channel"
    );
    let inbound_stream = ChannelSocket::connect_timeout(&config.inbound_path, config.connect_timeout)?;
    let rx = RecvEndpoint::connected(config.inbound_path.clone(), inbound_stream);

    debug!(
        path = ?config.outbound_path,
        state = ?EndpointState::Connecting,
        "waiting for host on outbound channel"
    );
    let outbound_stream = outbound.accept()?;
    let tx = SendEndpoint::connected(config.outbound_path.clone(), outbound_stream);

    info!(
        outbound = ?config.outbound_path,
        inbound = ?config.inbound_path,
        "link established"
    );
    Ok(Link { tx, rx })
}

/// Tell the host the bridge is going away, if it can still hear us.
///
/// Runs on every teardown path. A write failure here is logged and
/// swallowed — the bridge is exiting either way.
pub fn send_exit_notice(tx: &mut SendEndpoint) {
    if !tx.is_connected() {
        return;
    }
    if let Err(err) = tx.send(EXIT_NOTICE) {
        debug!(%err, "exit notice not delivered");
    }
}
