use ainode_protocol::{Endpoint, ProtocolError, Status};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to connect to {endpoint}: {reason}")]
    ConnectFailure { endpoint: Endpoint, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Response too large: {0} bytes (max: {1})")]
    ResponseTooLarge(usize, usize),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Query failed: {0}")]
    QueryFailure(Status),

    #[error("{operation} failed: {status}")]
    OperationFailure {
        operation: &'static str,
        status: Status,
    },

    #[error("No data fetched with query: {query}")]
    EmptyResult { query: String },

    #[error("Failed to fetch more data with query id {query_id}: {source}")]
    FetchFailure {
        query_id: i64,
        #[source]
        source: Box<Error>,
    },

    #[error("{0}")]
    ClusterUnreachable(String),

    #[error("Invalid response")]
    InvalidResponse,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Transport-level failures: the connection is unusable and the call may
    /// be retried against another endpoint
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::ConnectFailure { .. }
                | Error::Transport(_)
                | Error::IoError(_)
                | Error::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
