use std::path::Path;

use pixycam_transport::{DeviceStream, LinkConfig, StreamLink, UnixDomainSocket};

use crate::error::Result;
use crate::session::{Session, SessionConfig};

/// A session talking to a bridge over a Unix domain socket.
pub type BridgeSession = Session<StreamLink<DeviceStream>>;

/// Connect to a bridge socket and open a session with default configuration.
pub fn connect(path: impl AsRef<Path>) -> Result<BridgeSession> {
    connect_with_config(path, LinkConfig::default(), SessionConfig::default())
}

/// Connect with explicit configuration. The returned session is open.
pub fn connect_with_config(
    path: impl AsRef<Path>,
    link_config: LinkConfig,
    session_config: SessionConfig,
) -> Result<BridgeSession> {
    let link = UnixDomainSocket::connect_link(path, link_config)?;
    let mut session = Session::with_config(link, session_config);
    session.open()?;
    Ok(session)
}
