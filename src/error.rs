use std::time::Duration;
use thiserror::Error;

/// Uniform error definition for every query operation.
#[derive(Debug, Error)]
pub enum QueryErr {
    /// Address resolution or socket setup failed. Fatal for the session.
    #[error("can not connect to {addr}: {source}")]
    ConnectErr {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// No response arrived before the deadline. The transport is still usable.
    #[error("no response within {0:?}")]
    TimeoutErr(Duration),
    /// The server answered with something that is not a valid query packet.
    #[error("protocol error: {0}")]
    ProtocolErr(String),
    /// Writing a request to the socket failed.
    #[error("can not send request: {0}")]
    EncodingErr(#[source] std::io::Error),
    /// The transport was closed while a receive was pending.
    #[error("transport closed")]
    ClosedErr,
    /// A stat request was made without a challenge token issued in this session.
    #[error("no challenge token, handshake first")]
    NoChallenge,
    /// Invalid caller supplied data, such as an address string.
    #[error("{0}")]
    DataErr(String),
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    ConfErr(String),
    /// Receiving from the socket failed.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),
}

impl QueryErr {
    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        QueryErr::ProtocolErr(msg.into())
    }
}
