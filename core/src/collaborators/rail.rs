//! Contract for the payment rail.
//!
//! The rail is the only collaborator with irreversible side effects:
//! registering a funding source creates a durable resource, and
//! [`create_transfer`](PaymentRailClient::create_transfer) moves real
//! money. Neither call may be retried automatically anywhere in the core.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::CollaboratorError;

/// Everything the rail needs to register a funding source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingSourceRequest {
    /// The rail's customer record for the linking user.
    pub customer_id: String,
    /// Processor token minted by the aggregator for the account.
    pub processor_token: String,
    /// Display name for the funding source ("Checking").
    pub display_name: String,
    /// Deterministic key for (customer, account); a rail that honors
    /// idempotency keys will return the existing funding source on a
    /// retried registration instead of minting a duplicate.
    pub idempotency_key: String,
}

/// The rail's acknowledgement of an executed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfirmation {
    /// Canonical URL of the transfer resource on the rail.
    pub transfer_url: String,
}

/// Client for the payment rail.
#[async_trait]
pub trait PaymentRailClient: Send + Sync {
    /// Register a funding source under a customer record. Returns the
    /// funding source URL every later transfer references.
    async fn register_funding_source(
        &self,
        request: FundingSourceRequest,
    ) -> Result<String, CollaboratorError>;

    /// Execute a transfer between two registered funding sources. A
    /// rejection (insufficient funds, invalid source, outage) arrives as a
    /// [`CollaboratorError`]; a returned confirmation means money moved.
    async fn create_transfer(
        &self,
        source_url: &str,
        destination_url: &str,
        amount: &Amount,
    ) -> Result<TransferConfirmation, CollaboratorError>;
}
