//! Contract for the bank-data aggregator.
//!
//! The aggregator runs the client-side handshake that ends in a
//! short-lived public token, exchanges that token for durable access, and
//! exposes account metadata and processor tokens under it. Only the four
//! calls the workflows actually make are in the contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::account::AccessToken;
use crate::error::CollaboratorError;

/// The durable result of exchanging a public token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangedCredential {
    /// Durable access token for the linked item.
    pub access_token: AccessToken,
    /// The aggregator's identifier for the linkage itself.
    pub item_id: String,
}

/// Metadata for one account under a linked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    /// The aggregator's account id, the value the shareable token
    /// obfuscates.
    pub account_id: String,
    /// Display name ("Checking").
    pub name: String,
    /// Masked account number ("••••4242"), when the aggregator has one.
    #[serde(default)]
    pub mask: Option<String>,
}

/// Client for the bank-data aggregator.
#[async_trait]
pub trait AggregatorClient: Send + Sync {
    /// Mint the short-lived token that starts the client-side handshake
    /// for `user_id`.
    async fn create_link_token(&self, user_id: &str) -> Result<String, CollaboratorError>;

    /// Exchange the handshake's public token for durable access. Public
    /// tokens are single-use and expire in minutes; a rejected exchange is
    /// terminal.
    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<ExchangedCredential, CollaboratorError>;

    /// List the accounts available under a durable access token.
    async fn list_accounts(
        &self,
        access_token: &AccessToken,
    ) -> Result<Vec<AccountMeta>, CollaboratorError>;

    /// Mint a processor token for `account_id`, addressed to the named
    /// payment processor. Repeated calls are allowed; each returns a fresh
    /// token for the same account.
    async fn create_processor_token(
        &self,
        access_token: &AccessToken,
        account_id: &str,
        processor: &str,
    ) -> Result<String, CollaboratorError>;
}
