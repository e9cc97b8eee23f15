use std::time::Duration;

use thiserror::Error;

/// Errors produced by tracking clients.
///
/// The dispatch engine treats every variant raised by a report call the same
/// way: the attempt failed and the unit is retried next round.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("not connected to the tracking service")]
    NotConnected,

    #[error("request cancelled")]
    Cancelled,

    #[error("could not reach {address} within {timeout:?}")]
    ConnectTimeout { address: String, timeout: Duration },

    #[error("invalid tracking service address: {0}")]
    InvalidAddress(String),

    #[error("tracking service rejected {operation} with status {status}")]
    Rejected { operation: &'static str, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("injected failure: {0}")]
    Injected(String),
}

pub type TransportResult<T> = Result<T, TransportError>;
