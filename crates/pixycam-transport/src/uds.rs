use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::debug;

use crate::config::LinkConfig;
use crate::error::{Result, TransportError};
use crate::stream::StreamLink;
use crate::traits::DeviceStream;

/// Unix domain socket connector for a Pixy bridge.
///
/// The bridge owns the USB device and listens on a filesystem-path socket;
/// the host side only ever connects.
pub struct UnixDomainSocket;

/// Longest socket path `sockaddr_un` accepts, including the trailing NUL.
#[cfg(target_os = "linux")]
const SUN_PATH_CAPACITY: usize = 108;
#[cfg(not(target_os = "linux"))]
const SUN_PATH_CAPACITY: usize = 104;

fn check_socket_path(path: &Path) -> Result<()> {
    let len = path.as_os_str().len();
    if len < SUN_PATH_CAPACITY {
        return Ok(());
    }
    Err(TransportError::PathTooLong {
        path: path.into(),
        len,
        max: SUN_PATH_CAPACITY,
    })
}

impl UnixDomainSocket {
    /// Connect to a listening bridge socket (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<DeviceStream> {
        let path = path.as_ref();
        check_socket_path(path)?;

        let stream = UnixStream::connect(path).map_err(|source| TransportError::Connect {
            path: path.into(),
            source,
        })?;
        debug!(?path, "connected to bridge socket");
        Ok(DeviceStream::from_unix(stream))
    }

    /// Connect and wrap the stream in a [`StreamLink`] with timeouts applied.
    ///
    /// The returned link is not yet open; the caller drives the handshake.
    pub fn connect_link(
        path: impl AsRef<Path>,
        config: LinkConfig,
    ) -> Result<StreamLink<DeviceStream>> {
        let stream = Self::connect(path)?;
        StreamLink::with_config_device(stream, config)
    }
}
