//! Error taxonomy for lead submission and the relay.
//!
//! Every failure mode a submission can hit maps onto one of these
//! variants so callers (and the UI layer above them) can present a
//! precise message instead of a generic "something went wrong".

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Required contact fields are missing or empty. Carries the field
    /// names so the caller can highlight them. No network traffic has
    /// happened when this is returned.
    #[error("missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    /// The relay rejected the request origin (HTTP 403).
    #[error("request origin is not allowed")]
    OriginForbidden,

    /// Unknown path or method on the relay (HTTP 404).
    #[error("no such endpoint")]
    NotFound,

    /// The relay could not parse the request body (HTTP 400).
    #[error("malformed lead payload")]
    MalformedRequest,

    /// The relay is up but its downstream credentials are absent or
    /// rejected (HTTP 500).
    #[error("relay is misconfigured")]
    ServerMisconfigured,

    /// The relay answered with a status outside the documented contract.
    #[error("unexpected relay status {0}")]
    UnexpectedStatus(u16),

    /// DNS, connect, TLS or read failure before any status was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// A submission is already running; the caller must wait for it to
    /// reach a terminal outcome before starting another.
    #[error("a submission is already in flight")]
    AlreadyInFlight,
}

impl DeliveryError {
    /// Map a relay HTTP status onto the taxonomy.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => DeliveryError::MalformedRequest,
            403 => DeliveryError::OriginForbidden,
            404 => DeliveryError::NotFound,
            500 => DeliveryError::ServerMisconfigured,
            other => DeliveryError::UnexpectedStatus(other),
        }
    }
}
