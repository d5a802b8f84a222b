//! Lead payload: the wire contract between the configurator and the
//! relay. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Who to call back. `full_name` and `phone` are mandatory; `email`
/// is optional and omitted from the wire when absent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub full_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One catalog choice, carried as both the stable id and the label the
/// customer saw, so the sales side never has to reverse-map ids.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub id: String,
    pub label: String,
}

impl Selection {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Selection { id: id.into(), label: label.into() }
    }
}

/// Everything the customer configured at the moment of submission.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub court: Selection,
    pub lighting: Selection,
    pub scene_lighting: Selection,
    /// Hex color applied to the court structure, `None` when the
    /// factory finish was kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_color: Option<String>,
    #[serde(default)]
    pub extras: Vec<Selection>,
}

/// The full submission body.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub contact: Contact,
    pub config: ConfigSnapshot,
    /// Page the form was submitted from; the relay checks it only for
    /// presence, the Origin header is what gates access.
    pub page_url: String,
    /// JPEG preview as a `data:image/jpeg;base64,` URI, absent when
    /// capture failed or the image was over the size ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

/// Check the mandatory contact fields. Returns every missing field at
/// once rather than the first one found.
pub fn validate_contact(contact: &Contact) -> Result<(), DeliveryError> {
    let mut missing = Vec::new();
    if contact.full_name.trim().is_empty() {
        missing.push("fullName");
    }
    if contact.phone.trim().is_empty() {
        missing.push("phone");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DeliveryError::Validation { missing })
    }
}
