use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::ChannelStream;

/// How often a bounded connect re-dials a channel that is not there yet.
const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// A bound channel socket, waiting for the peer to connect.
///
/// The creating side binds a filesystem-path Unix domain socket and accepts
/// exactly one peer connection. The socket file is removed again when the
/// `ChannelSocket` is dropped, provided nothing replaced it in the meantime.
pub struct ChannelSocket {
    listener: UnixListener,
    path: PathBuf,
    created_inode: Option<(u64, u64)>,
}

impl ChannelSocket {
    /// Permission mode for created socket paths. The bridge and its host
    /// run as the same user; nobody else gets to join the conversation.
    pub const SOCKET_MODE: u32 = 0o600;
    /// Maximum socket path length.
    /// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(not(target_os = "linux"))]
    const MAX_PATH_LEN: usize = 104;

    /// Bind a channel socket at `path`.
    ///
    /// A stale socket file left behind by an earlier bridge run is removed
    /// first; any other kind of file at the path is refused.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        if path.exists() {
            let metadata = std::fs::symlink_metadata(&path).map_err(|e| TransportError::Bind {
                path: path.clone(),
                source: e,
            })?;
            if metadata.file_type().is_socket() {
                debug!(?path, "removing stale channel socket");
                std::fs::remove_file(&path).map_err(|e| TransportError::Bind {
                    path: path.clone(),
                    source: e,
                })?;
            } else {
                return Err(TransportError::Bind {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "existing path is not a unix socket",
                    ),
                });
            }
        }

        let listener = UnixListener::bind(&path).map_err(|e| TransportError::Bind {
            path: path.clone(),
            source: e,
        })?;

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(Self::SOCKET_MODE))
            .map_err(|e| TransportError::Bind {
                path: path.clone(),
                source: e,
            })?;
        let created_metadata =
            std::fs::symlink_metadata(&path).map_err(|e| TransportError::Bind {
                path: path.clone(),
                source: e,
            })?;
        let created_inode = Some((created_metadata.dev(), created_metadata.ino()));

        info!(?path, "channel socket bound");

        Ok(Self {
            listener,
            path,
            created_inode,
        })
    }

    /// Wait for the peer to connect (blocking, unbounded).
    pub fn accept(&self) -> Result<ChannelStream> {
        let (stream, _addr) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(path = ?self.path, "peer connected");
        Ok(ChannelStream::from_unix(stream))
    }

    /// Connect to a channel socket the peer has bound (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<ChannelStream> {
        let path = path.as_ref();
        let stream =
            std::os::unix::net::UnixStream::connect(path).map_err(|e| TransportError::Connect {
                path: path.to_path_buf(),
                source: e,
            })?;
        debug!(?path, "connected to channel socket");
        Ok(ChannelStream::from_unix(stream))
    }

    /// Connect to a channel socket, waiting up to `timeout` for the peer
    /// to bind it.
    ///
    /// The peer may not have created its socket yet when the bridge starts,
    /// so a missing or refusing path is re-dialed until the deadline. Errors
    /// other than "not there yet" fail immediately.
    pub fn connect_timeout(path: impl AsRef<Path>, timeout: Duration) -> Result<ChannelStream> {
        let path = path.as_ref();
        let deadline = Instant::now() + timeout;

        loop {
            match std::os::unix::net::UnixStream::connect(path) {
                Ok(stream) => {
                    debug!(?path, "connected to channel socket");
                    return Ok(ChannelStream::from_unix(stream));
                }
                Err(err)
                    if matches!(
                        err.kind(),
                        std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused
                    ) =>
                {
                    if Instant::now() >= deadline {
                        return Err(TransportError::ConnectTimeout {
                            path: path.to_path_buf(),
                            timeout,
                        });
                    }
                    std::thread::sleep(CONNECT_RETRY_INTERVAL);
                }
                Err(err) => {
                    return Err(TransportError::Connect {
                        path: path.to_path_buf(),
                        source: err,
                    });
                }
            }
        }
    }

    /// The path this channel socket is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ChannelSocket {
    fn drop(&mut self) {
        if let Some((expected_dev, expected_ino)) = self.created_inode {
            if let Ok(metadata) = std::fs::symlink_metadata(&self.path) {
                if metadata.file_type().is_socket()
                    && metadata.dev() == expected_dev
                    && metadata.ino() == expected_ino
                {
                    debug!(path = ?self.path, "cleaning up channel socket file");
                    let _ = std::fs::remove_file(&self.path);
                } else {
                    debug!(
                        path = ?self.path,
                        "socket path identity changed; skipping cleanup"
                    );
                }
            }
        }
    }
}
