//! `fleet-transport` — reporting unit movement and arrivals to the tracking
//! service.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`client`] | `TrackingClient` trait, `ArrivalReport`, `cancellable` helper   |
//! | [`http`]   | `HttpTrackingClient` — JSON over HTTP via `reqwest`             |
//! | [`memory`] | `MemoryTracker` — in-process recorder with fault injection      |
//! | [`types`]  | Wire request bodies                                             |
//! | [`error`]  | `TransportError`, `TransportResult<T>`                          |
//!
//! Every report call takes the run's `CancellationToken`.  Once it is
//! cancelled, in-flight and future calls return
//! [`TransportError::Cancelled`] instead of waiting on the network.

pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{cancellable, ArrivalReport, TrackingClient};
pub use error::{TransportError, TransportResult};
pub use http::HttpTrackingClient;
pub use memory::{MemoryTracker, ReportCall};
