//! # Transfer-Execution Workflow
//!
//! Moves money between two linked accounts identified by opaque
//! references:
//!
//! 1. **ResolveReceiver** — decode the receiver's shareable token and look
//!    the account up by internal id. Exactly one match is acceptable;
//!    several matches mean the store's uniqueness invariant is broken and
//!    the run aborts rather than picking one.
//! 2. **ResolveSender** — look up the sender's own account by its store
//!    ref. No decoding; the sender picks from accounts they own.
//! 3. **ExecuteTransfer** — submit both funding sources and the amount to
//!    the rail. This is the terminal failure point: a rejection here ends
//!    the run with nothing downstream executed.
//! 4. **RecordTransaction** — persist the ledger entry, only ever after
//!    rail confirmation.
//!
//! A failure in step 4 is the dangerous one: the money has moved and the
//! ledger has not. It surfaces as [`TransferError::RecordPersistence`]
//! carrying the rail's confirmation URL, distinctly from every earlier
//! failure, because the only safe responses are reconciliation or a
//! store-only retry. Re-running the whole workflow would transfer twice.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::account::{LinkedAccount, NewTransactionRecord, TransactionRecord};
use crate::amount::Amount;
use crate::collaborators::{PaymentRailClient, StoreClient, TransferConfirmation};
use crate::error::{CollaboratorError, ErrorClass};
use crate::token::{DecodeError, TokenCodec};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Step-tagged failures of the transfer workflow.
///
/// Receiver-side failures never echo the decoded internal account id; the
/// whole point of the shareable token is that the id stays behind the
/// boundary.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Step 1 failed: the receiver token is not a valid shareable token.
    #[error("receiver token could not be decoded: {0}")]
    ReceiverToken(#[from] DecodeError),

    /// Step 1 failed: the token decoded, but no linked account matches.
    #[error("no linked account matches the receiver token")]
    UnknownReceiver,

    /// Step 1 failed: multiple linked accounts match the receiver token.
    /// The store's uniqueness invariant is broken; refusing to guess.
    #[error("{matches} linked accounts match the receiver token")]
    AmbiguousReceiver {
        /// How many records matched.
        matches: usize,
    },

    /// Step 2 failed: the sender's account ref resolves to nothing.
    #[error("sender account {account_ref:?} is not linked")]
    UnknownSender {
        /// The ref that did not resolve.
        account_ref: String,
    },

    /// Step 1 or 2 failed inside the store itself (as opposed to a clean
    /// miss).
    #[error("account resolution failed: {0}")]
    Lookup(#[source] CollaboratorError),

    /// Step 3 failed: the rail rejected the transfer. No money moved.
    #[error("transfer rejected by the payment rail: {0}")]
    Rejected(#[source] CollaboratorError),

    /// Step 4 failed: the rail confirmed the transfer and the ledger write
    /// did not happen. Reconcile against `transfer_url`; do not re-run the
    /// workflow.
    #[error(
        "transfer {transfer_url} confirmed by the rail but the ledger entry \
         was not written: {source}"
    )]
    RecordPersistence {
        /// The confirmed transfer resource on the rail.
        transfer_url: String,
        /// The store's failure.
        #[source]
        source: CollaboratorError,
    },
}

impl TransferError {
    /// Coarse classification for the caller's error policy.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ReceiverToken(_) | Self::UnknownReceiver | Self::UnknownSender { .. } => {
                ErrorClass::Validation
            }
            Self::AmbiguousReceiver { .. } => ErrorClass::Integrity,
            Self::Lookup(_) | Self::Rejected(_) => ErrorClass::Collaborator,
            Self::RecordPersistence { .. } => ErrorClass::PartialSuccess,
        }
    }
}

// ---------------------------------------------------------------------------
// TransferRequest / TransferOutcome
// ---------------------------------------------------------------------------

/// Caller input for one transfer attempt. Nothing here is persisted until
/// the rail confirms.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Store ref of the sender's linked account.
    pub sender_account_ref: String,
    /// The receiver's shareable token, pasted or scanned.
    pub receiver_token: String,
    /// Exact amount to move.
    pub amount: Amount,
    /// Optional note for the ledger entry.
    pub note: Option<String>,
}

/// A completed transfer: the rail's confirmation and the ledger entry
/// written for it.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The rail's acknowledgement.
    pub confirmation: TransferConfirmation,
    /// The persisted ledger entry.
    pub record: TransactionRecord,
}

// ---------------------------------------------------------------------------
// TransferWorkflow
// ---------------------------------------------------------------------------

/// The transfer orchestrator. Stateless; safe to share across concurrent
/// requests.
pub struct TransferWorkflow {
    rail: Arc<dyn PaymentRailClient>,
    store: Arc<dyn StoreClient>,
    codec: TokenCodec,
}

impl TransferWorkflow {
    /// Assemble a workflow from its collaborators.
    pub fn new(
        rail: Arc<dyn PaymentRailClient>,
        store: Arc<dyn StoreClient>,
        codec: TokenCodec,
    ) -> Self {
        Self { rail, store, codec }
    }

    /// The sender's linked accounts, for the account picker that precedes
    /// a transfer.
    pub async fn linked_accounts(
        &self,
        user_id: &str,
    ) -> Result<Vec<LinkedAccount>, CollaboratorError> {
        self.store.list_linked_accounts_for_user(user_id).await
    }

    /// Run the four-step transfer workflow to completion.
    pub async fn transfer_funds(
        &self,
        request: TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        info!(sender_ref = %request.sender_account_ref, amount = %request.amount, "starting transfer");

        // Step 1: ResolveReceiver.
        let internal_id = self.codec.decode(&request.receiver_token)?;
        let mut matches = self
            .store
            .find_linked_accounts_by_internal_id(&internal_id)
            .await
            .map_err(TransferError::Lookup)?;
        if matches.len() > 1 {
            return Err(TransferError::AmbiguousReceiver {
                matches: matches.len(),
            });
        }
        let receiver = match matches.pop() {
            Some(receiver) => receiver,
            None => return Err(TransferError::UnknownReceiver),
        };

        // Step 2: ResolveSender.
        let sender = self
            .store
            .find_linked_account_by_ref(&request.sender_account_ref)
            .await
            .map_err(TransferError::Lookup)?
            .ok_or_else(|| TransferError::UnknownSender {
                account_ref: request.sender_account_ref.clone(),
            })?;

        // Step 3: ExecuteTransfer.
        debug!(
            source = %sender.funding_source_url,
            destination = %receiver.funding_source_url,
            "submitting transfer to the rail"
        );
        let confirmation = self
            .rail
            .create_transfer(
                &sender.funding_source_url,
                &receiver.funding_source_url,
                &request.amount,
            )
            .await
            .map_err(TransferError::Rejected)?;

        // Step 4: RecordTransaction. Money has moved; from here on a
        // failure is a partial success, not a rollback.
        let record = NewTransactionRecord {
            sender_user_id: sender.owner_user_id,
            sender_account_ref: sender.id,
            receiver_user_id: receiver.owner_user_id,
            receiver_account_ref: receiver.id,
            amount: request.amount,
            note: request.note,
        };
        let stored = match self.store.create_transaction_record(record).await {
            Ok(stored) => stored,
            Err(source) => {
                warn!(
                    transfer_url = %confirmation.transfer_url,
                    "rail confirmed the transfer but the ledger write failed"
                );
                return Err(TransferError::RecordPersistence {
                    transfer_url: confirmation.transfer_url,
                    source,
                });
            }
        };

        info!(
            transfer_url = %confirmation.transfer_url,
            record_id = %stored.id,
            "transfer complete"
        );
        Ok(TransferOutcome {
            confirmation,
            record: stored,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
