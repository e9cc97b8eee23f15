//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `FleetError` as one
//! variant where they need it.

use thiserror::Error;

/// Configuration errors raised by `fleet-core`.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fleet-core`.
pub type FleetResult<T> = Result<T, FleetError>;
