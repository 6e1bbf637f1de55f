//! Text produced when copying a selection
//!
//! Each selected LoRA becomes a prompt token `<lora:NAME:STRENGTH>`. The
//! strength comes from the item's usage tips and defaults to 1.

use super::types::ItemKey;
use regex::Regex;
use std::sync::LazyLock;

/// Strength used when the usage hint does not provide one
pub const DEFAULT_STRENGTH: f64 = 1.0;

/// Separator between tokens in the copied text
pub const TOKEN_SEPARATOR: &str = ", ";

static TEXT_STRENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)strength["']?\s*[:=]\s*["']?(-?\d*\.?\d+)"#)
        .expect("strength pattern is valid")
});

/// Extract the strength from a usage hint
///
/// Accepts the JSON form (`{"strength": 0.8}`, also with the number quoted)
/// and a loose textual form (`strength: 0.8`). Anything else yields
/// [`DEFAULT_STRENGTH`].
#[must_use]
pub fn parse_strength(usage_hint: Option<&str>) -> f64 {
    let Some(hint) = usage_hint.map(str::trim).filter(|h| !h.is_empty()) else {
        return DEFAULT_STRENGTH;
    };

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(hint) {
        let strength = value.get("strength").and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        });
        if let Some(strength) = strength.filter(|s| s.is_finite()) {
            return strength;
        }
    }

    TEXT_STRENGTH
        .captures(hint)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|s| s.is_finite())
        .unwrap_or(DEFAULT_STRENGTH)
}

/// Format one prompt token
#[must_use]
pub fn format_lora_token(display_name: &str, strength: f64) -> String {
    format!("<lora:{display_name}:{strength}>")
}

/// How a copy attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text was written to the clipboard
    Copied,
    /// The selection was empty
    NothingSelected,
    /// No selected item had cached metadata
    NothingValid,
    /// The clipboard write failed
    ClipboardFailed(String),
}

/// Result of `SelectionManager::copy_selected_as_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub outcome: CopyOutcome,
    /// Tokens built, in selection order
    pub tokens: Vec<String>,
    /// Selected keys without cached metadata
    pub missing: Vec<ItemKey>,
}

impl CopyReport {
    /// The text that was (or would have been) written
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens.join(TOKEN_SEPARATOR)
    }
}
