use std::{io, time::Duration};

use tarpc::client::RpcError;
use thiserror::Error;

/// Failures surfaced by the calculator server and client.
///
/// Every variant is a transport-level failure; the arithmetic itself never
/// fails.
#[derive(Error, Debug)]
pub enum Error {
    /// The listener could not be bound.
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The server address could not be resolved or refused the connection.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Connecting took longer than the configured bound.
    #[error("timed out after {timeout:?} connecting to {addr}")]
    ConnectTimeout { addr: String, timeout: Duration },

    /// The call did not complete before its deadline.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Any other failure reported by the RPC layer.
    #[error("rpc failed: {0}")]
    Rpc(#[source] RpcError),
}

impl From<RpcError> for Error {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::DeadlineExceeded => Self::DeadlineExceeded,
            other => Self::Rpc(other),
        }
    }
}

/// Result type alias for calculator operations.
pub type Result<T> = std::result::Result<T, Error>;
