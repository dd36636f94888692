//! Politics and War data access.
//!
//! Everything the command handlers know about the game goes through the
//! [`Gateway`] trait.
//!
//! # Modules
//!
//! - `requester` - The [`Gateway`] trait and its HTTP implementation
//! - `response_structs` - Internal data structures for API responses
//! - `structs` - Domain records handed to the renderers
//! - `counters` - Counter selection against an aggressor
//! - `warchest` - Recommended warchest table
//!
//! [`PnwRequester`] is built once at startup from the `pnw` section of the
//! configuration and shared behind an `Arc<dyn Gateway>`.

mod counters;
mod requester;
mod response_structs;
mod structs;
mod warchest;

#[cfg(test)]
pub use crate::pnw::requester::MockGateway;
pub use crate::pnw::requester::{Gateway, PnwRequester};
pub use crate::pnw::structs::{Nation, Warchest};
pub use crate::pnw::warchest::{MAX_CITIES, MIN_CITIES};

use thiserror::Error;

/// Errors raised while looking data up.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The nation does not exist upstream.
    #[error("nation {0} not found")]
    NotFound(u64),

    /// The API could not be reached or answered with an HTTP error.
    #[error("the Politics and War API is unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The API answered but refused the request.
    #[error("the Politics and War API rejected the request: {0}")]
    Rejected(String),

    /// The API answered with a body that can't be read.
    #[error("unexpected response from the Politics and War API: {0}")]
    Malformed(#[from] serde_json::Error),
}
