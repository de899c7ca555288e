//! # Bank-Linking Workflow
//!
//! Turns the short-lived credential from the aggregator's client-side
//! handshake into a fully linked, transfer-ready bank account:
//!
//! 1. **ExchangeCredential** — trade the public token for durable access
//!    and an item id.
//! 2. **DiscoverAccount** — fetch metadata for the account behind the
//!    credential.
//! 3. **MintFundingSource** — mint a processor token and register the
//!    funding source with the rail under the user's customer record.
//! 4. **Persist** — mint the shareable token and write the
//!    [`LinkedAccount`].
//!
//! Funding-source registration is treated as at-most-once per
//! (customer, account): a deterministic idempotency key derived from the
//! pair travels with the request and is persisted on the record, so a
//! retried registration presents the same key instead of silently minting
//! a duplicate.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::account::{LinkedAccount, NewLinkedAccount};
use crate::collaborators::{
    AggregatorClient, FundingSourceRequest, PaymentRailClient, StoreClient,
};
use crate::config::{FUNDING_IDEMPOTENCY_CONTEXT, PROCESSOR_NAME};
use crate::error::{CollaboratorError, ErrorClass};
use crate::token::{EncodeError, TokenCodec};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Step-tagged failures of the linking workflow. The variant names the
/// step that aborted the run; earlier steps completed, later steps never
/// ran.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Step 1 failed: the aggregator rejected the public token (expired,
    /// already consumed, or invalid).
    #[error("credential exchange failed: {0}")]
    CredentialExchange(#[source] CollaboratorError),

    /// Step 2 failed: the aggregator could not list accounts.
    #[error("account discovery failed: {0}")]
    AccountDiscovery(#[source] CollaboratorError),

    /// Step 2 failed: the credential exchanged, but no account is behind it.
    #[error("aggregator returned no accounts for the exchanged credential")]
    NoAccounts,

    /// Step 3 failed: processor-token minting or funding-source
    /// registration was rejected.
    #[error("funding source could not be established: {0}")]
    FundingSource(#[source] CollaboratorError),

    /// Step 4 failed before touching the store: the discovered account id
    /// is not encodable.
    #[error("shareable token could not be minted: {0}")]
    Token(#[from] EncodeError),

    /// Step 4 failed at the store. The aggregator credential is durable
    /// and the funding source is live; retry persistence rather than
    /// relinking from scratch.
    #[error(
        "linked account for item {item_id} was not persisted; funding source \
         {funding_source_url} is already registered: {source}"
    )]
    Persistence {
        /// Item id from the completed credential exchange.
        item_id: String,
        /// The funding source that was registered before the failure.
        funding_source_url: String,
        /// The store's failure.
        #[source]
        source: CollaboratorError,
    },
}

impl LinkError {
    /// Coarse classification for the caller's error policy.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Token(_) => ErrorClass::Validation,
            Self::CredentialExchange(_)
            | Self::AccountDiscovery(_)
            | Self::NoAccounts
            | Self::FundingSource(_) => ErrorClass::Collaborator,
            Self::Persistence { .. } => ErrorClass::PartialSuccess,
        }
    }
}

// ---------------------------------------------------------------------------
// LinkRequest
// ---------------------------------------------------------------------------

/// Caller input for one linking run.
#[derive(Debug, Clone)]
pub struct LinkRequest {
    /// The user linking the account.
    pub user_id: String,
    /// The user's customer record on the payment rail.
    pub rail_customer_id: String,
    /// Short-lived public token from the aggregator handshake. Single-use.
    pub public_token: String,
}

// ---------------------------------------------------------------------------
// LinkWorkflow
// ---------------------------------------------------------------------------

/// The bank-linking orchestrator.
///
/// Stateless: all collaborators are injected, all durable state lives
/// behind them. One instance can serve any number of concurrent requests.
pub struct LinkWorkflow {
    aggregator: Arc<dyn AggregatorClient>,
    rail: Arc<dyn PaymentRailClient>,
    store: Arc<dyn StoreClient>,
    codec: TokenCodec,
}

impl LinkWorkflow {
    /// Assemble a workflow from its collaborators.
    pub fn new(
        aggregator: Arc<dyn AggregatorClient>,
        rail: Arc<dyn PaymentRailClient>,
        store: Arc<dyn StoreClient>,
        codec: TokenCodec,
    ) -> Self {
        Self {
            aggregator,
            rail,
            store,
            codec,
        }
    }

    /// Mint the short-lived token that starts the client-side handshake.
    ///
    /// A thin passthrough: the handshake itself happens on the client, and
    /// its result comes back to [`LinkWorkflow::link_bank`] as the public
    /// token.
    pub async fn create_link_token(&self, user_id: &str) -> Result<String, CollaboratorError> {
        self.aggregator.create_link_token(user_id).await
    }

    /// Run the four-step linking workflow to completion.
    ///
    /// On success the returned [`LinkedAccount`] is already persisted and
    /// its shareable token decodes back to the aggregator account id. On
    /// failure, the [`LinkError`] variant names the step that aborted the
    /// run; see [`LinkError::class`] for the retry/reconcile policy.
    pub async fn link_bank(&self, request: LinkRequest) -> Result<LinkedAccount, LinkError> {
        info!(user_id = %request.user_id, "linking bank account");

        // Step 1: ExchangeCredential.
        let credential = self
            .aggregator
            .exchange_public_token(&request.public_token)
            .await
            .map_err(LinkError::CredentialExchange)?;
        debug!(item_id = %credential.item_id, "public token exchanged");

        // Step 2: DiscoverAccount. The handshake links one institution;
        // the first account is the one the user selected.
        let accounts = self
            .aggregator
            .list_accounts(&credential.access_token)
            .await
            .map_err(LinkError::AccountDiscovery)?;
        let account = accounts.into_iter().next().ok_or(LinkError::NoAccounts)?;
        debug!(account = %account.name, "account discovered");

        // Step 3: MintFundingSource.
        let processor_token = self
            .aggregator
            .create_processor_token(&credential.access_token, &account.account_id, PROCESSOR_NAME)
            .await
            .map_err(LinkError::FundingSource)?;
        let idempotency_key =
            funding_idempotency_key(&request.rail_customer_id, &account.account_id);
        let funding_source_url = self
            .rail
            .register_funding_source(FundingSourceRequest {
                customer_id: request.rail_customer_id.clone(),
                processor_token,
                display_name: account.name.clone(),
                idempotency_key: idempotency_key.clone(),
            })
            .await
            .map_err(LinkError::FundingSource)?;
        debug!(funding_source_url = %funding_source_url, "funding source registered");

        // Step 4: Persist.
        let shareable_token = self.codec.encode(&account.account_id)?;
        let record = NewLinkedAccount {
            owner_user_id: request.user_id.clone(),
            internal_account_id: account.account_id,
            item_id: credential.item_id.clone(),
            access_token: credential.access_token,
            funding_source_url: funding_source_url.clone(),
            shareable_token,
            funding_idempotency_key: idempotency_key,
        };
        let stored = match self.store.create_linked_account(record).await {
            Ok(stored) => stored,
            Err(source) => {
                warn!(
                    item_id = %credential.item_id,
                    funding_source_url = %funding_source_url,
                    "funding source registered but linked account not persisted"
                );
                return Err(LinkError::Persistence {
                    item_id: credential.item_id,
                    funding_source_url,
                    source,
                });
            }
        };

        info!(account_ref = %stored.id, "bank account linked");
        Ok(stored)
    }
}

/// Deterministic idempotency key for funding-source registration,
/// stable per (customer, account) pair.
fn funding_idempotency_key(customer_id: &str, account_id: &str) -> String {
    let material = format!("{customer_id}:{account_id}");
    let key = blake3::derive_key(FUNDING_IDEMPOTENCY_CONTEXT, material.as_bytes());
    blake3::Hash::from(key).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
