//! Lead delivery for CourtViz: the client-side submission pipeline and
//! the relay that gates and forwards leads to the sales channel.

pub mod error;
pub mod lead;
pub mod pipeline;
pub mod relay;
pub mod relay_client;

pub use error::DeliveryError;
pub use lead::{validate_contact, ConfigSnapshot, Contact, LeadPayload, Selection};
pub use pipeline::{DegradeReason, LeadPipeline, SubmissionOutcome};
pub use relay_client::{HttpRelay, RelayAck, RelayTransport};

/// Images above this size are never attached or forwarded; the lead
/// goes out as text only. Enforced on both sides of the relay.
pub const IMAGE_BYTE_CEILING: usize = 8 * 1024 * 1024;
