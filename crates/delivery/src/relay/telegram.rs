//! Telegram Bot API client used as the relay's downstream messenger.

use base64::Engine;
use serde_json::json;

use crate::error::DeliveryError;

/// Downstream channel the relay forwards leads to. Split out as a trait
/// so the request handler can be exercised without network access.
pub trait Messenger {
    fn send_text(&self, text: &str) -> Result<(), DeliveryError>;
    fn send_photo(&self, jpeg: &[u8], caption: &str) -> Result<(), DeliveryError>;
}

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramBot {
    token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramBot {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        TelegramBot {
            token: token.into(),
            chat_id: chat_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point at a different API host, for tests against a local stub.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }
}

impl Messenger for TelegramBot {
    fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        let resp = ureq::post(&self.method_url("sendMessage"))
            .send_json(json!({ "chat_id": self.chat_id, "text": text }));
        map_response(resp)
    }

    fn send_photo(&self, jpeg: &[u8], caption: &str) -> Result<(), DeliveryError> {
        let boundary = "----padel-lead-boundary-7a31f0";
        let body = multipart_photo(boundary, &self.chat_id, caption, jpeg);
        let resp = ureq::post(&self.method_url("sendPhoto"))
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body);
        map_response(resp)
    }
}

fn map_response(resp: Result<ureq::Response, ureq::Error>) -> Result<(), DeliveryError> {
    match resp {
        Ok(_) => Ok(()),
        Err(ureq::Error::Status(code, _)) => Err(DeliveryError::UnexpectedStatus(code)),
        Err(err) => Err(DeliveryError::Transport(err.to_string())),
    }
}

/// Hand-built multipart body: three fields, the photo last.
fn multipart_photo(boundary: &str, chat_id: &str, caption: &str, jpeg: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(jpeg.len() + 512);
    let mut text_field = |name: &str, value: &str, body: &mut Vec<u8>| {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    };
    text_field("chat_id", chat_id, &mut body);
    if !caption.is_empty() {
        text_field("caption", caption, &mut body);
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"photo\"; \
             filename=\"snapshot.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(jpeg);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// Decode the base64 payload of a `data:image/jpeg;base64,…` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, DeliveryError> {
    let encoded = uri
        .split_once(',')
        .map(|(_, rest)| rest)
        .ok_or_else(|| DeliveryError::Transport("data URI has no payload".into()))?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|err| DeliveryError::Transport(format!("invalid base64 in data URI: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_is_well_formed() {
        let body = multipart_photo("BBB", "42", "caption text", &[0xFF, 0xD8, 0xFF]);
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("--BBB\r\n"));
        assert!(text.contains("name=\"chat_id\"\r\n\r\n42\r\n"));
        assert!(text.contains("name=\"caption\"\r\n\r\ncaption text\r\n"));
        assert!(text.contains("filename=\"snapshot.jpg\""));
        assert!(text.ends_with("\r\n--BBB--\r\n"));
    }

    #[test]
    fn data_uri_round_trip() {
        let uri = format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3, 4])
        );
        assert_eq!(decode_data_uri(&uri).unwrap(), vec![1, 2, 3, 4]);
        assert!(decode_data_uri("not a data uri").is_err());
    }
}
