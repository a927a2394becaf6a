use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use crate::endpoint::RecvEndpoint;
use crate::error::LinkError;
use crate::receive::InboundDriver;

/// The production inbound driver: a worker thread owns the receive
/// endpoint and performs one blocking read per request.
///
/// The read buffer moves by ownership through the request and completion
/// channels, so a completing read and a newly issued one can never alias.
/// Both channels are rendezvous-sized: exactly one read is outstanding at
/// a time, and the completion is marshaled back to whichever single owner
/// drives the receive loop.
pub struct SpawnedReader {
    requests: Sender<Vec<u8>>,
    completions: Receiver<(Vec<u8>, std::io::Result<usize>)>,
    connected: Arc<AtomicBool>,
}

impl SpawnedReader {
    /// Move `endpoint` onto a reader thread.
    pub fn spawn(mut endpoint: RecvEndpoint) -> Result<Self, LinkError> {
        let (requests, request_rx) = crossbeam_channel::bounded::<Vec<u8>>(1);
        let (completion_tx, completions) = crossbeam_channel::bounded(1);
        let connected = Arc::new(AtomicBool::new(endpoint.is_connected()));
        let connected_flag = Arc::clone(&connected);

        // Detached on purpose: the thread ends when the request side of
        // the channel hangs up.
        let _ = std::thread::Builder::new()
            .name("conbridge-reader".into())
            .spawn(move || {
                for mut buf in request_rx {
                    let result = endpoint.read(&mut buf);
                    if !endpoint.is_connected() {
                        connected_flag.store(false, Ordering::SeqCst);
                    }
                    if completion_tx.send((buf, result)).is_err() {
                        break;
                    }
                }
                debug!("reader thread done");
            })
            .map_err(LinkError::ReadFailed)?;

        Ok(Self {
            requests,
            completions,
            connected,
        })
    }
}

impl InboundDriver for SpawnedReader {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn begin_read(&mut self, buf: Vec<u8>) -> Result<(), LinkError> {
        self.requests
            .send(buf)
            .map_err(|_| LinkError::ReadFailed(std::io::Error::other("reader thread gone")))
    }

    fn finish_read(&mut self) -> (Vec<u8>, Result<usize, LinkError>) {
        match self.completions.recv() {
            Ok((buf, result)) => (buf, result.map_err(LinkError::ReadFailed)),
            Err(_) => (
                Vec::new(),
                Err(LinkError::ReadFailed(std::io::Error::other(
                    "reader thread gone",
                ))),
            ),
        }
    }
}
