//! # Transport Envelope
//!
//! The versioned payload that carries a shareable token out of band:
//! today rendered into a scannable code, tomorrow maybe a deep link. The
//! core neither produces nor reads pixels; it serializes an envelope to a
//! string and parses a string somebody else captured.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "type": "bank_transfer",
//!   "shareableId": "3QJmnh…",
//!   "cardName": "Checking",
//!   "userName": "Ada Lovelace",
//!   "userEmail": "ada@example.com",
//!   "timestamp": 1767225600000,
//!   "version": "1.0"
//! }
//! ```
//!
//! ## Parsing rules
//!
//! Checks run in a fixed order and each failure has its own tag, so a
//! caller never has to guess why a payload was refused:
//!
//! 1. Not a JSON object → [`ParseFailure::MalformedPayload`]
//! 2. `type` differs from [`ENVELOPE_KIND`] → [`ParseFailure::UnsupportedKind`]
//! 3. `shareableId` absent or empty → [`ParseFailure::MissingField`]
//! 4. `version` differs from [`ENVELOPE_SCHEMA_VERSION`] →
//!    [`ParseFailure::UnsupportedVersion`]
//!
//! A payload that fails any check is rejected whole; there is no partially
//! trusted envelope. Display metadata is defaulted when absent; only the
//! token itself is load-bearing. Envelopes are ephemeral and never
//! persisted, and each payload is self-contained, so no ordering or replay
//! state exists to manage.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ENVELOPE_KIND, ENVELOPE_SCHEMA_VERSION};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a transport payload was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// The string is not a JSON object at all.
    #[error("payload is not a structured record: {detail}")]
    MalformedPayload {
        /// Deserializer detail, for diagnostics only.
        detail: String,
    },

    /// The discriminator names a payload kind this core does not handle.
    #[error("unsupported payload kind {got:?}, expected {ENVELOPE_KIND:?}")]
    UnsupportedKind {
        /// The discriminator that was found (empty if absent).
        got: String,
    },

    /// A required field is absent or empty.
    #[error("payload is missing required field {field:?}")]
    MissingField {
        /// Name of the missing field on the wire.
        field: &'static str,
    },

    /// The schema version is not the exact version this build accepts.
    #[error("unsupported schema version {got:?}, expected {ENVELOPE_SCHEMA_VERSION:?}")]
    UnsupportedVersion {
        /// The version that was found (empty if absent).
        got: String,
    },
}

// ---------------------------------------------------------------------------
// TransportEnvelope
// ---------------------------------------------------------------------------

/// A self-contained payload conveying a shareable token plus the display
/// metadata a receiving form wants to show before any money moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportEnvelope {
    /// Fixed discriminator, always [`ENVELOPE_KIND`].
    #[serde(rename = "type")]
    pub kind: String,
    /// The shareable token identifying the receiving account.
    #[serde(rename = "shareableId")]
    pub shareable_token: String,
    /// Display name of the receiving account ("Checking").
    #[serde(rename = "cardName", default)]
    pub display_name: String,
    /// Display name of the receiving user.
    #[serde(rename = "userName", default)]
    pub owner_name: String,
    /// Email of the receiving user, used to seed the transfer form.
    #[serde(rename = "userEmail", default)]
    pub owner_email: String,
    /// When the envelope was constructed, epoch milliseconds.
    #[serde(rename = "timestamp", default)]
    pub created_at_ms: i64,
    /// Schema version, always [`ENVELOPE_SCHEMA_VERSION`] on this build.
    #[serde(rename = "version")]
    pub schema_version: String,
}

impl TransportEnvelope {
    /// Build an envelope for the given token and display metadata,
    /// stamped with the current time and this build's kind and version.
    pub fn new(
        shareable_token: impl Into<String>,
        display_name: impl Into<String>,
        owner_name: impl Into<String>,
        owner_email: impl Into<String>,
    ) -> Self {
        Self {
            kind: ENVELOPE_KIND.to_string(),
            shareable_token: shareable_token.into(),
            display_name: display_name.into(),
            owner_name: owner_name.into(),
            owner_email: owner_email.into(),
            created_at_ms: Utc::now().timestamp_millis(),
            schema_version: ENVELOPE_SCHEMA_VERSION.to_string(),
        }
    }

    /// Serialize to the JSON transport string.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a captured transport string, applying the ordered rules from
    /// the module docs.
    pub fn parse(payload: &str) -> Result<Self, ParseFailure> {
        let value: serde_json::Value =
            serde_json::from_str(payload).map_err(|err| ParseFailure::MalformedPayload {
                detail: err.to_string(),
            })?;
        let object = value.as_object().ok_or_else(|| ParseFailure::MalformedPayload {
            detail: "not a JSON object".to_string(),
        })?;

        let kind = object
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if kind != ENVELOPE_KIND {
            return Err(ParseFailure::UnsupportedKind {
                got: kind.to_string(),
            });
        }

        let token = object
            .get("shareableId")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if token.is_empty() {
            return Err(ParseFailure::MissingField {
                field: "shareableId",
            });
        }

        let version = object
            .get("version")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if version != ENVELOPE_SCHEMA_VERSION {
            return Err(ParseFailure::UnsupportedVersion {
                got: version.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|err| ParseFailure::MalformedPayload {
            detail: err.to_string(),
        })
    }

    /// The values a transfer form is seeded with after a successful scan.
    pub fn transfer_prefill(&self) -> TransferPrefill {
        TransferPrefill {
            receiver_token: self.shareable_token.clone(),
            receiver_email: self.owner_email.clone(),
            note: format!("Transfer to {}", self.display_name),
        }
    }
}

/// Form-seeding values derived from a parsed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPrefill {
    /// Shareable token of the receiving account.
    pub receiver_token: String,
    /// Receiver's email address.
    pub receiver_email: String,
    /// Suggested transfer note.
    pub note: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransportEnvelope {
        TransportEnvelope::new("3QJmnh", "Checking", "Ada Lovelace", "ada@example.com")
    }

    #[test]
    fn serialize_parse_round_trip() {
        let envelope = sample();
        let payload = envelope.serialize().unwrap();
        assert_eq!(TransportEnvelope::parse(&payload).unwrap(), envelope);
    }

    #[test]
    fn wire_format_uses_the_transport_field_names() {
        let payload = sample().serialize().unwrap();
        for field in [
            "\"type\":\"bank_transfer\"",
            "\"shareableId\"",
            "\"cardName\"",
            "\"userName\"",
            "\"userEmail\"",
            "\"timestamp\"",
            "\"version\":\"1.0\"",
        ] {
            assert!(payload.contains(field), "missing {field} in {payload}");
        }
    }

    #[test]
    fn parse_rejects_non_json_payloads() {
        for junk in ["", "not json", "[1,2,3]", "\"a string\"", "42"] {
            assert!(
                matches!(
                    TransportEnvelope::parse(junk),
                    Err(ParseFailure::MalformedPayload { .. })
                ),
                "expected MalformedPayload for {junk:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_foreign_kind_even_with_valid_fields() {
        let mut envelope = sample();
        envelope.kind = "coupon_code".to_string();
        let payload = envelope.serialize().unwrap();
        assert_eq!(
            TransportEnvelope::parse(&payload),
            Err(ParseFailure::UnsupportedKind {
                got: "coupon_code".to_string()
            })
        );
    }

    #[test]
    fn parse_rejects_absent_kind_before_other_checks() {
        assert_eq!(
            TransportEnvelope::parse("{\"shareableId\":\"x\",\"version\":\"1.0\"}"),
            Err(ParseFailure::UnsupportedKind {
                got: String::new()
            })
        );
    }

    #[test]
    fn parse_rejects_missing_or_empty_token() {
        let mut envelope = sample();
        envelope.shareable_token = String::new();
        let payload = envelope.serialize().unwrap();
        assert_eq!(
            TransportEnvelope::parse(&payload),
            Err(ParseFailure::MissingField {
                field: "shareableId"
            })
        );

        assert_eq!(
            TransportEnvelope::parse("{\"type\":\"bank_transfer\",\"version\":\"1.0\"}"),
            Err(ParseFailure::MissingField {
                field: "shareableId"
            })
        );
    }

    #[test]
    fn parse_rejects_version_mismatch() {
        let mut envelope = sample();
        envelope.schema_version = "2.0".to_string();
        let payload = envelope.serialize().unwrap();
        assert_eq!(
            TransportEnvelope::parse(&payload),
            Err(ParseFailure::UnsupportedVersion {
                got: "2.0".to_string()
            })
        );
    }

    #[test]
    fn parse_defaults_absent_display_metadata() {
        let payload =
            "{\"type\":\"bank_transfer\",\"shareableId\":\"3QJmnh\",\"version\":\"1.0\"}";
        let envelope = TransportEnvelope::parse(payload).unwrap();
        assert_eq!(envelope.shareable_token, "3QJmnh");
        assert_eq!(envelope.display_name, "");
        assert_eq!(envelope.owner_name, "");
        assert_eq!(envelope.created_at_ms, 0);
    }

    #[test]
    fn prefill_maps_envelope_to_form_values() {
        let prefill = sample().transfer_prefill();
        assert_eq!(prefill.receiver_token, "3QJmnh");
        assert_eq!(prefill.receiver_email, "ada@example.com");
        assert_eq!(prefill.note, "Transfer to Checking");
    }
}
