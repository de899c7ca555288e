//! Contract for the persistence store.
//!
//! The store owns every durable record the core produces. Lookups by
//! internal account id return *all* matches: a shareable token must
//! resolve to exactly one account, and collapsing duplicates inside the
//! store would hide the integrity violation the transfer workflow exists
//! to catch.

use async_trait::async_trait;

use crate::account::{LinkedAccount, NewLinkedAccount, NewTransactionRecord, TransactionRecord};
use crate::error::CollaboratorError;

/// Client for the persistence store.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Persist a freshly linked account. Returns the stored record with
    /// the store-assigned id and timestamp.
    async fn create_linked_account(
        &self,
        record: NewLinkedAccount,
    ) -> Result<LinkedAccount, CollaboratorError>;

    /// Every linked account whose internal account id matches. More than
    /// one element is a data-integrity problem the caller must surface.
    async fn find_linked_accounts_by_internal_id(
        &self,
        internal_account_id: &str,
    ) -> Result<Vec<LinkedAccount>, CollaboratorError>;

    /// Look up a linked account by its own store ref.
    async fn find_linked_account_by_ref(
        &self,
        account_ref: &str,
    ) -> Result<Option<LinkedAccount>, CollaboratorError>;

    /// All accounts linked by one user, for the sender's account picker.
    async fn list_linked_accounts_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<LinkedAccount>, CollaboratorError>;

    /// Persist the ledger entry for a rail-confirmed transfer.
    async fn create_transaction_record(
        &self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, CollaboratorError>;
}
