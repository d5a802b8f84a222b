//! Relay request handler.
//!
//! The relay is a single-endpoint gate between the public configurator
//! and the private sales channel. It is written as a pure
//! request-to-response function so the routing, access control and
//! forwarding rules are testable without a listener in front.

use crate::lead::LeadPayload;
use crate::relay::message::{format_lead_text, truncate_caption};
use crate::relay::origin::OriginPolicy;
use crate::relay::telegram::{decode_data_uri, Messenger};
use crate::IMAGE_BYTE_CEILING;

pub const LEAD_PATH: &str = "/api/lead";

/// The parts of an incoming HTTP request the relay looks at.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: String,
    pub path: String,
    pub origin: Option<String>,
    pub body: Vec<u8>,
}

impl RelayRequest {
    pub fn new(method: &str, path: &str) -> Self {
        RelayRequest {
            method: method.to_string(),
            path: path.to_string(),
            origin: None,
            body: Vec::new(),
        }
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RelayResponse {
    fn new(status: u16, body: impl Into<String>) -> Self {
        RelayResponse { status, headers: Vec::new(), body: body.into() }
    }

    fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The relay itself: origin policy plus an optional downstream
/// messenger. `messenger: None` models missing credentials and makes
/// every lead submission answer 500.
pub struct Relay<M> {
    policy: OriginPolicy,
    messenger: Option<M>,
}

impl<M: Messenger> Relay<M> {
    pub fn new(policy: OriginPolicy, messenger: Option<M>) -> Self {
        Relay { policy, messenger }
    }

    pub fn handle(&self, req: &RelayRequest) -> RelayResponse {
        let cors = req
            .origin
            .as_deref()
            .and_then(|origin| self.policy.cors_headers(origin));

        // Preflight is answered for allowed origins regardless of path.
        if req.method.eq_ignore_ascii_case("OPTIONS") {
            return RelayResponse::new(204, "").with_headers(cors.unwrap_or_default());
        }

        if req.path != LEAD_PATH {
            return RelayResponse::new(404, "Not found");
        }

        // Health probe for uptime checks.
        if req.method.eq_ignore_ascii_case("GET") {
            return RelayResponse::new(200, "OK").with_headers(cors.unwrap_or_default());
        }

        if !req.method.eq_ignore_ascii_case("POST") {
            return RelayResponse::new(404, "Not found");
        }

        let Some(cors) = cors else {
            log::warn!(
                "rejected lead from origin {:?}",
                req.origin.as_deref().unwrap_or("<none>")
            );
            return RelayResponse::new(403, "Forbidden");
        };

        let payload: LeadPayload = match serde_json::from_slice(&req.body) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("malformed lead body: {err}");
                return RelayResponse::new(400, "Bad request").with_headers(cors);
            }
        };

        let Some(messenger) = &self.messenger else {
            log::error!("lead received but no messenger credentials are configured");
            return RelayResponse::new(500, r#"{"ok":false}"#).with_headers(cors);
        };

        let text = format_lead_text(&payload);
        if let Err(err) = messenger.send_text(&text) {
            log::error!("text delivery failed: {err}");
            return RelayResponse::new(500, r#"{"ok":false}"#).with_headers(cors);
        }

        let image_delivered = payload
            .snapshot
            .as_deref()
            .map(|uri| self.forward_image(messenger, uri, &text));

        let body = match image_delivered {
            Some(sent) => format!(r#"{{"ok":true,"imageDelivered":{sent}}}"#),
            None => r#"{"ok":true}"#.to_string(),
        };
        RelayResponse::new(200, body).with_headers(cors)
    }

    /// Best effort image leg; a failure here never fails the lead.
    fn forward_image(&self, messenger: &M, uri: &str, text: &str) -> bool {
        let jpeg = match decode_data_uri(uri) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("snapshot decode failed: {err}");
                return false;
            }
        };
        if jpeg.len() > IMAGE_BYTE_CEILING {
            log::warn!("snapshot of {} bytes is over the ceiling, skipped", jpeg.len());
            return false;
        }
        match messenger.send_photo(&jpeg, &truncate_caption(text)) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("photo delivery failed: {err}");
                false
            }
        }
    }
}
