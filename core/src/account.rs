//! # Linked Accounts & Ledger Records
//!
//! The data model shared by the workflows and the persistence collaborator.
//!
//! A [`LinkedAccount`] is written exactly once, at the end of a successful
//! link run, and is immutable afterwards. The store owns it; the link
//! workflow only holds the record transiently while creating it. The `New*`
//! variants carry everything except the fields the store itself assigns
//! (document id, creation timestamp).
//!
//! A [`TransactionRecord`] may only ever exist for a transfer the payment
//! rail has confirmed. There is no pending/optimistic state to roll back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::Amount;

// ---------------------------------------------------------------------------
// AccessToken
// ---------------------------------------------------------------------------

/// The durable aggregator credential obtained by exchanging a public token.
///
/// This is a bearer secret for the user's bank data. It is stored on the
/// [`LinkedAccount`] (the store is trusted) but must never appear in logs
/// or error messages, so `Debug` redacts it and anything that wants the raw
/// value has to say so with [`AccessToken::expose`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw access token received from the aggregator.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw secret, for handing back to the aggregator or the store.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// LinkedAccount
// ---------------------------------------------------------------------------

/// A bank account successfully linked through the full four-step workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedAccount {
    /// Store document id. This is the "own ref" a sender selects by.
    pub id: String,
    /// The user who linked the account.
    pub owner_user_id: String,
    /// The aggregator's account id. Never leaves the backend in the clear;
    /// externally it travels only as the shareable token.
    pub internal_account_id: String,
    /// The aggregator item this account belongs to.
    pub item_id: String,
    /// Durable aggregator credential for this item.
    pub access_token: AccessToken,
    /// Rail-side handle for this account, required by every transfer.
    pub funding_source_url: String,
    /// Obfuscated, externally distributable reference to
    /// `internal_account_id`. Minted once at link time, stable for the
    /// lifetime of the linkage.
    pub shareable_token: String,
    /// Idempotency key presented to the rail when the funding source was
    /// registered. Kept so a retried registration is auditable.
    pub funding_idempotency_key: String,
    /// When the linkage was persisted.
    pub created_at: DateTime<Utc>,
}

/// A [`LinkedAccount`] before the store has assigned id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLinkedAccount {
    /// The user who linked the account.
    pub owner_user_id: String,
    /// The aggregator's account id.
    pub internal_account_id: String,
    /// The aggregator item this account belongs to.
    pub item_id: String,
    /// Durable aggregator credential for this item.
    pub access_token: AccessToken,
    /// Rail-side handle for this account.
    pub funding_source_url: String,
    /// Obfuscated external reference to `internal_account_id`.
    pub shareable_token: String,
    /// Idempotency key used for funding-source registration.
    pub funding_idempotency_key: String,
}

// ---------------------------------------------------------------------------
// TransactionRecord
// ---------------------------------------------------------------------------

/// A ledger entry for a rail-confirmed transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Store document id.
    pub id: String,
    /// The paying user.
    pub sender_user_id: String,
    /// Store ref of the sender's [`LinkedAccount`].
    pub sender_account_ref: String,
    /// The receiving user.
    pub receiver_user_id: String,
    /// Store ref of the receiver's [`LinkedAccount`].
    pub receiver_account_ref: String,
    /// Exact transferred amount.
    pub amount: Amount,
    /// Free-form note attached by the sender.
    pub note: Option<String>,
    /// When the record was persisted.
    pub created_at: DateTime<Utc>,
}

/// A [`TransactionRecord`] before the store has assigned id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransactionRecord {
    /// The paying user.
    pub sender_user_id: String,
    /// Store ref of the sender's account.
    pub sender_account_ref: String,
    /// The receiving user.
    pub receiver_user_id: String,
    /// Store ref of the receiver's account.
    pub receiver_account_ref: String,
    /// Exact transferred amount.
    pub amount: Amount,
    /// Free-form note attached by the sender.
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("access-sandbox-deadbeef");
        let rendered = format!("{token:?}");
        assert_eq!(rendered, "AccessToken(<redacted>)");
        assert!(!rendered.contains("deadbeef"));
    }

    #[test]
    fn access_token_debug_is_redacted_inside_records() {
        let account = NewLinkedAccount {
            owner_user_id: "user-1".to_string(),
            internal_account_id: "acct-1".to_string(),
            item_id: "item-1".to_string(),
            access_token: AccessToken::new("access-sandbox-deadbeef"),
            funding_source_url: "https://rail/fs/1".to_string(),
            shareable_token: "token".to_string(),
            funding_idempotency_key: "key".to_string(),
        };
        assert!(!format!("{account:?}").contains("deadbeef"));
    }

    #[test]
    fn access_token_serializes_as_plain_string_for_the_store() {
        let token = AccessToken::new("access-sandbox-deadbeef");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"access-sandbox-deadbeef\"");
    }
}
