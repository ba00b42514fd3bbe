use std::io;
use std::net::SocketAddr;

use crate::net::PacketError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to open socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("transport failure: {0}")]
    Transport(#[from] io::Error),
    #[error("codec failure: {0}")]
    Codec(#[from] PacketError),
}

/// Errors a non-blocking UDP socket reports for conditions that clear up on
/// their own: nothing to read yet, or an ICMP unreachable from a peer that
/// has not started.
pub fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock
            | io::ErrorKind::Interrupted
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
    )
}
