//! Renders a lead payload into the human-readable text the sales
//! channel receives.

use crate::lead::LeadPayload;

/// Photo captions are capped well under the messaging platform's 1024
/// character limit so a long extras list never makes the image leg fail.
pub const CAPTION_LIMIT: usize = 1000;

/// Full-detail message text. This is the primary record of the lead;
/// the image is supplementary.
pub fn format_lead_text(payload: &LeadPayload) -> String {
    let mut out = String::from("New padel court lead\n\n");

    out.push_str(&format!("Name: {}\n", payload.contact.full_name));
    out.push_str(&format!("Phone: {}\n", payload.contact.phone));
    if let Some(email) = &payload.contact.email {
        out.push_str(&format!("Email: {email}\n"));
    }

    let cfg = &payload.config;
    out.push('\n');
    out.push_str(&format!("Court: {} ({})\n", cfg.court.label, cfg.court.id));
    out.push_str(&format!("Lighting: {}\n", cfg.lighting.label));
    out.push_str(&format!("Scene lighting: {}\n", cfg.scene_lighting.label));
    out.push_str(&format!(
        "Structure color: {}\n",
        cfg.structure_color.as_deref().unwrap_or("factory finish")
    ));
    if cfg.extras.is_empty() {
        out.push_str("Extras: none\n");
    } else {
        out.push_str("Extras:\n");
        for extra in &cfg.extras {
            out.push_str(&format!("  - {}\n", extra.label));
        }
    }

    out.push_str(&format!("\nPage: {}", payload.page_url));
    out
}

/// Truncate on a character boundary, never mid-codepoint.
pub fn truncate_caption(text: &str) -> String {
    if text.chars().count() <= CAPTION_LIMIT {
        return text.to_string();
    }
    text.chars().take(CAPTION_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::{ConfigSnapshot, Contact, Selection};

    fn sample() -> LeadPayload {
        LeadPayload {
            contact: Contact {
                full_name: "Ana Petrova".into(),
                phone: "+34 600 000 000".into(),
                email: Some("ana@example.com".into()),
            },
            config: ConfigSnapshot {
                court: Selection::new("base-panoramic", "Base panoramic"),
                lighting: Selection::new("lights-top", "Top lights"),
                scene_lighting: Selection::new("sunny", "Sunny"),
                structure_color: Some("#1e66ff".into()),
                extras: vec![Selection::new("scoreboard", "Scoreboard")],
            },
            page_url: "https://courts.example.io/configurator".into(),
            snapshot: None,
        }
    }

    #[test]
    fn message_carries_every_detail() {
        let text = format_lead_text(&sample());
        assert!(text.contains("Name: Ana Petrova"));
        assert!(text.contains("Phone: +34 600 000 000"));
        assert!(text.contains("Email: ana@example.com"));
        assert!(text.contains("Court: Base panoramic (base-panoramic)"));
        assert!(text.contains("Structure color: #1e66ff"));
        assert!(text.contains("  - Scoreboard"));
        assert!(text.contains("Page: https://courts.example.io/configurator"));
    }

    #[test]
    fn omitted_fields_render_as_defaults() {
        let mut payload = sample();
        payload.contact.email = None;
        payload.config.structure_color = None;
        payload.config.extras.clear();
        let text = format_lead_text(&payload);
        assert!(!text.contains("Email:"));
        assert!(text.contains("Structure color: factory finish"));
        assert!(text.contains("Extras: none"));
    }

    #[test]
    fn caption_is_capped_at_the_limit() {
        let long = "x".repeat(CAPTION_LIMIT + 200);
        assert_eq!(truncate_caption(&long).chars().count(), CAPTION_LIMIT);
        assert_eq!(truncate_caption("short"), "short");
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let long: String = "é".repeat(CAPTION_LIMIT + 10);
        let capped = truncate_caption(&long);
        assert_eq!(capped.chars().count(), CAPTION_LIMIT);
        assert!(capped.chars().all(|c| c == 'é'));
    }
}
