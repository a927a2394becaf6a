use conbridge_frame::FrameDecoder;
use tracing::{debug, trace};

use crate::dispatch::{dispatch, Outcome};
use crate::error::LinkError;
use crate::screen::Screen;

/// Size of one asynchronous read against the inbound channel.
pub const READ_BUFFER_SIZE: usize = 16 * 1024;

/// Receive-loop states.
///
/// `Idle → Reading` issues an asynchronous read; `Reading → Dispatching`
/// consumes its completion; `Dispatching → Idle` re-arms explicitly.
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Reading,
    Dispatching,
    Closed,
}

/// Why the receive loop stopped.
#[derive(Debug)]
pub enum Exit {
    /// The host sent `close`.
    HostClosed,
    /// The channel was already disconnected at loop entry. Normal, quiet
    /// termination.
    Disconnected,
    /// A read errored out; the channel is broken. Reported, not retried.
    ReadFailed(LinkError),
}

/// The inbound side of the receive loop.
///
/// Exactly one read is outstanding at a time: `begin_read` hands buffer
/// ownership over, `finish_read` hands it back with the completion. The
/// production implementation is [`SpawnedReader`](crate::reader::SpawnedReader);
/// tests script canned byte batches.
pub trait InboundDriver {
    /// Whether the inbound channel is still attached.
    fn is_connected(&self) -> bool;

    /// Issue the next asynchronous read into `buf`.
    fn begin_read(&mut self, buf: Vec<u8>) -> Result<(), LinkError>;

    /// Await the outstanding read. Returns the buffer and the number of
    /// bytes read into its front.
    fn finish_read(&mut self) -> (Vec<u8>, Result<usize, LinkError>);
}

/// The bridge's inbound engine: an explicit state machine around one
/// pending asynchronous read.
///
/// Frames decoded from one read are dispatched strictly in buffer order;
/// across reads, ordering follows arrival order on the stream. Decoder
/// state persists across reads, so a frame split over two physical reads
/// is dispatched exactly once, whole.
pub struct ReceiveLoop<D, S> {
    driver: D,
    screen: S,
    decoder: FrameDecoder,
    state: LoopState,
    filled: usize,
}

impl<D: InboundDriver, S: Screen> ReceiveLoop<D, S> {
    pub fn new(driver: D, screen: S) -> Self {
        Self {
            driver,
            screen,
            decoder: FrameDecoder::new(),
            state: LoopState::Idle,
            filled: 0,
        }
    }

    /// Drive the loop until it closes and return the reason.
    ///
    /// A `bytesRead == 0` completion is an ordinary empty batch: the loop
    /// re-arms, and the disconnect (if that is what it was) is noticed at
    /// the next `Idle` entry.
    pub fn run(&mut self) -> Exit {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        let exit = loop {
            match self.state {
                LoopState::Idle => {
                    if !self.driver.is_connected() {
                        break Exit::Disconnected;
                    }
                    match self.driver.begin_read(std::mem::take(&mut buf)) {
                        Ok(()) => self.state = LoopState::Reading,
                        Err(err) => break Exit::ReadFailed(err),
                    }
                }
                LoopState::Reading => {
                    let (returned, result) = self.driver.finish_read();
                    buf = returned;
                    match result {
                        Ok(n) => {
                            trace!(bytes = n, "read completed");
                            self.filled = n;
                            self.state = LoopState::Dispatching;
                        }
                        Err(err) => break Exit::ReadFailed(err),
                    }
                }
                LoopState::Dispatching => {
                    self.decoder.extend(&buf[..self.filled]);
                    let mut closing = false;
                    while let Some(frame) = self.decoder.next_frame() {
                        // Empty frames are decoded but dispatch nothing.
                        if frame.is_empty() {
                            continue;
                        }
                        if dispatch(&frame, &mut self.screen) == Outcome::Close {
                            debug!("host requested close");
                            closing = true;
                            break;
                        }
                    }
                    if closing {
                        break Exit::HostClosed;
                    }
                    // Explicit re-arm.
                    self.state = LoopState::Idle;
                }
                LoopState::Closed => break Exit::Disconnected,
            }
        };

        self.state = LoopState::Closed;
        exit
    }

    /// Current loop state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Borrow the inbound driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
