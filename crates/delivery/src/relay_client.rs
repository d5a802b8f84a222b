//! Client-side transport: how the configurator talks to the relay.

use serde::Deserialize;

use crate::error::DeliveryError;
use crate::lead::LeadPayload;

/// What the relay reports back on a 200.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelayAck {
    pub ok: bool,
    /// Present only when the payload carried a snapshot.
    #[serde(default)]
    pub image_delivered: Option<bool>,
}

/// Seam between the submission pipeline and the wire. The pipeline's
/// tests substitute a recording implementation here.
pub trait RelayTransport {
    fn submit(&self, payload: &LeadPayload) -> Result<RelayAck, DeliveryError>;
}

/// Production transport over HTTP.
pub struct HttpRelay {
    endpoint: String,
    origin: Option<String>,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpRelay { endpoint: endpoint.into(), origin: None }
    }

    /// Origin header to present to the relay's access gate. Browsers
    /// attach this automatically; outside one it has to be explicit.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl RelayTransport for HttpRelay {
    fn submit(&self, payload: &LeadPayload) -> Result<RelayAck, DeliveryError> {
        let body = serde_json::to_string(payload)
            .map_err(|err| DeliveryError::Transport(format!("payload encoding failed: {err}")))?;

        let mut req = ureq::post(&self.endpoint).set("Content-Type", "application/json");
        if let Some(origin) = &self.origin {
            req = req.set("Origin", origin);
        }

        log::debug!("submitting lead to {} ({} bytes)", self.endpoint, body.len());
        match req.send_string(&body) {
            Ok(resp) => resp
                .into_json::<RelayAck>()
                .map_err(|err| DeliveryError::Transport(format!("unreadable relay reply: {err}"))),
            Err(ureq::Error::Status(code, _)) => Err(DeliveryError::from_status(code)),
            Err(err) => Err(DeliveryError::Transport(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_parses_with_and_without_image_flag() {
        let ack: RelayAck = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert_eq!(ack, RelayAck { ok: true, image_delivered: None });

        let ack: RelayAck =
            serde_json::from_str(r#"{"ok":true,"imageDelivered":false}"#).unwrap();
        assert_eq!(ack, RelayAck { ok: true, image_delivered: Some(false) });
    }
}
