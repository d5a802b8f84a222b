//! The relay side of lead delivery: origin gating, request handling and
//! forwarding to the sales channel.

pub mod handler;
pub mod message;
pub mod origin;
pub mod telegram;

pub use handler::{Relay, RelayRequest, RelayResponse, LEAD_PATH};
pub use message::{format_lead_text, truncate_caption, CAPTION_LIMIT};
pub use origin::OriginPolicy;
pub use telegram::{Messenger, TelegramBot};
