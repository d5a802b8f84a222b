//! Lead submission pipeline.
//!
//! One submission moves through Capturing → Sending and ends in a
//! terminal outcome. The capture leg is best effort; the text message is
//! the lead of record. There is never an automatic retry: a failed
//! submission returns to idle and the customer decides whether to try
//! again.

use renderer::{capture, RenderSurface, Snapshot};

use crate::error::DeliveryError;
use crate::lead::{validate_contact, ConfigSnapshot, Contact, LeadPayload};
use crate::relay_client::RelayTransport;
use crate::IMAGE_BYTE_CEILING;

/// Where a Degraded outcome came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    /// The render surface failed to produce a frame.
    CaptureFailed,
    /// The encoded snapshot was over [`IMAGE_BYTE_CEILING`] and was not
    /// attached.
    ImageTooLarge,
    /// The relay accepted the lead but could not deliver the image.
    ImageDeliveryFailed,
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Text delivered, and the image too when one was attached.
    Delivered,
    /// Text delivered; the supplementary image was not.
    Degraded(DegradeReason),
    /// Nothing reached the sales channel.
    Failed(DeliveryError),
}

impl SubmissionOutcome {
    pub fn lead_reached_sales(&self) -> bool {
        !matches!(self, SubmissionOutcome::Failed(_))
    }
}

pub struct LeadPipeline<T> {
    relay: T,
    page_url: String,
    /// Held for the whole of `submit`. A driver that parks the
    /// pipeline between frames (UI shell, async runtime) reads it
    /// through [`is_in_flight`](Self::is_in_flight) and hits the
    /// guard in `submit` if it starts a second submission anyway.
    in_flight: bool,
}

impl<T: RelayTransport> LeadPipeline<T> {
    pub fn new(relay: T, page_url: impl Into<String>) -> Self {
        LeadPipeline { relay, page_url: page_url.into(), in_flight: false }
    }

    /// True while a submission is between start and terminal outcome;
    /// the form above this disables its submit control on it.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Run one full submission: capture (if a surface is given), then
    /// validate and send. Synchronous; returns only at a terminal
    /// outcome.
    pub fn submit(
        &mut self,
        contact: &Contact,
        config: &ConfigSnapshot,
        surface: Option<&mut dyn RenderSurface>,
    ) -> SubmissionOutcome {
        if self.in_flight {
            return SubmissionOutcome::Failed(DeliveryError::AlreadyInFlight);
        }
        self.in_flight = true;

        let snapshot = match surface {
            Some(surface) => match capture(surface) {
                Ok(snapshot) => Ok(Some(snapshot)),
                Err(err) => {
                    log::warn!("snapshot capture failed, submitting without image: {err}");
                    Err(())
                }
            },
            None => Ok(None),
        };

        let outcome = match snapshot {
            Ok(snapshot) => self.deliver(contact, config, snapshot),
            // Capture was wanted but failed: still send the text.
            Err(()) => match self.deliver(contact, config, None) {
                SubmissionOutcome::Delivered => {
                    SubmissionOutcome::Degraded(DegradeReason::CaptureFailed)
                }
                other => other,
            },
        };

        self.in_flight = false;
        outcome
    }

    /// The Sending stage, split out so tests can feed a fabricated
    /// snapshot instead of rendering one.
    pub fn deliver(
        &self,
        contact: &Contact,
        config: &ConfigSnapshot,
        snapshot: Option<Snapshot>,
    ) -> SubmissionOutcome {
        // Validation gates all network traffic.
        if let Err(err) = validate_contact(contact) {
            return SubmissionOutcome::Failed(err);
        }

        let mut oversized = false;
        let attached = snapshot.as_ref().and_then(|snap| {
            if snap.byte_len() > IMAGE_BYTE_CEILING {
                log::info!(
                    "snapshot of {} bytes exceeds the {} byte ceiling, sending text only",
                    snap.byte_len(),
                    IMAGE_BYTE_CEILING
                );
                oversized = true;
                None
            } else {
                Some(snap.to_data_uri())
            }
        });
        let had_image = attached.is_some();

        let payload = LeadPayload {
            contact: contact.clone(),
            config: config.clone(),
            page_url: self.page_url.clone(),
            snapshot: attached,
        };

        match self.relay.submit(&payload) {
            Ok(ack) if ack.ok => {
                if had_image && ack.image_delivered == Some(false) {
                    SubmissionOutcome::Degraded(DegradeReason::ImageDeliveryFailed)
                } else if oversized {
                    SubmissionOutcome::Degraded(DegradeReason::ImageTooLarge)
                } else {
                    SubmissionOutcome::Delivered
                }
            }
            Ok(_) => SubmissionOutcome::Failed(DeliveryError::UnexpectedStatus(200)),
            Err(err) => SubmissionOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay_client::RelayAck;
    use std::cell::RefCell;

    struct RecordingRelay {
        calls: RefCell<Vec<LeadPayload>>,
        reply: Result<RelayAck, DeliveryError>,
    }

    impl RecordingRelay {
        fn ok() -> Self {
            RecordingRelay {
                calls: RefCell::new(Vec::new()),
                reply: Ok(RelayAck { ok: true, image_delivered: None }),
            }
        }

        fn replying(reply: Result<RelayAck, DeliveryError>) -> Self {
            RecordingRelay { calls: RefCell::new(Vec::new()), reply }
        }
    }

    impl RelayTransport for &RecordingRelay {
        fn submit(&self, payload: &LeadPayload) -> Result<RelayAck, DeliveryError> {
            self.calls.borrow_mut().push(payload.clone());
            self.reply.clone()
        }
    }

    fn contact() -> Contact {
        Contact {
            full_name: "Ana Petrova".into(),
            phone: "+34 600 000 000".into(),
            email: None,
        }
    }

    fn config() -> ConfigSnapshot {
        ConfigSnapshot::default()
    }

    fn snapshot_of(len: usize) -> Snapshot {
        Snapshot { bytes: vec![0u8; len], width: 1024, height: 576 }
    }

    #[test]
    fn missing_phone_fails_before_any_network_call() {
        let relay = RecordingRelay::ok();
        let pipeline = LeadPipeline::new(&relay, "https://courts.example.io/");
        let bad = Contact { full_name: "Ana".into(), phone: String::new(), email: None };

        let outcome = pipeline.deliver(&bad, &config(), None);
        assert_eq!(
            outcome,
            SubmissionOutcome::Failed(DeliveryError::Validation { missing: vec!["phone"] })
        );
        assert!(relay.calls.borrow().is_empty());
    }

    #[test]
    fn text_only_submission_is_delivered() {
        let relay = RecordingRelay::ok();
        let pipeline = LeadPipeline::new(&relay, "https://courts.example.io/");

        let outcome = pipeline.deliver(&contact(), &config(), None);
        assert_eq!(outcome, SubmissionOutcome::Delivered);
        let calls = relay.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].snapshot.is_none());
        assert_eq!(calls[0].page_url, "https://courts.example.io/");
    }

    #[test]
    fn oversized_snapshot_degrades_instead_of_failing() {
        let relay = RecordingRelay::ok();
        let pipeline = LeadPipeline::new(&relay, "https://courts.example.io/");

        let outcome = pipeline.deliver(&contact(), &config(), Some(snapshot_of(9 * 1024 * 1024)));
        assert_eq!(outcome, SubmissionOutcome::Degraded(DegradeReason::ImageTooLarge));
        // The text still went out, without the image.
        let calls = relay.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].snapshot.is_none());
    }

    #[test]
    fn snapshot_under_the_ceiling_is_attached() {
        let relay = RecordingRelay::replying(Ok(RelayAck {
            ok: true,
            image_delivered: Some(true),
        }));
        let pipeline = LeadPipeline::new(&relay, "https://courts.example.io/");

        let outcome = pipeline.deliver(&contact(), &config(), Some(snapshot_of(64 * 1024)));
        assert_eq!(outcome, SubmissionOutcome::Delivered);
        let calls = relay.calls.borrow();
        let uri = calls[0].snapshot.as_deref().unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn relay_reporting_image_failure_degrades() {
        let relay = RecordingRelay::replying(Ok(RelayAck {
            ok: true,
            image_delivered: Some(false),
        }));
        let pipeline = LeadPipeline::new(&relay, "https://courts.example.io/");

        let outcome = pipeline.deliver(&contact(), &config(), Some(snapshot_of(1024)));
        assert_eq!(outcome, SubmissionOutcome::Degraded(DegradeReason::ImageDeliveryFailed));
    }

    #[test]
    fn relay_errors_surface_as_failed() {
        let relay = RecordingRelay::replying(Err(DeliveryError::OriginForbidden));
        let pipeline = LeadPipeline::new(&relay, "https://courts.example.io/");

        let outcome = pipeline.deliver(&contact(), &config(), None);
        assert_eq!(outcome, SubmissionOutcome::Failed(DeliveryError::OriginForbidden));
    }

    #[test]
    fn submit_is_rejected_while_one_is_in_flight() {
        let relay = RecordingRelay::ok();
        let mut pipeline = LeadPipeline::new(&relay, "https://courts.example.io/");
        pipeline.in_flight = true;

        let outcome = pipeline.submit(&contact(), &config(), None);
        assert_eq!(outcome, SubmissionOutcome::Failed(DeliveryError::AlreadyInFlight));
        assert!(relay.calls.borrow().is_empty());
        // The rejected call must not clear the running submission's flag.
        assert!(pipeline.is_in_flight());
    }

    #[test]
    fn capture_failure_still_sends_the_text() {
        let relay = RecordingRelay::ok();
        let mut pipeline = LeadPipeline::new(&relay, "https://courts.example.io/");
        let mut broken = || -> anyhow::Result<image::RgbaImage> { Err(anyhow::anyhow!("surface lost")) };

        let outcome = pipeline.submit(&contact(), &config(), Some(&mut broken));
        assert_eq!(outcome, SubmissionOutcome::Degraded(DegradeReason::CaptureFailed));
        assert_eq!(relay.calls.borrow().len(), 1);
        assert!(!pipeline.is_in_flight());
    }
}
