//! # Collaborator Interfaces
//!
//! The three narrow contracts the workflows drive. Implementations live in
//! the embedding service, an HTTP client per external system, and are
//! injected into the workflows at construction time. The core never holds
//! a global client instance: lifecycle, connection pooling, and deadlines
//! all belong to the request-handling layer, and each remote call's
//! timeout is surfaced back through [`CollaboratorError`] with
//! [`FailureKind::Timeout`](crate::error::FailureKind::Timeout).
//!
//! All state lives behind these traits. The workflows themselves are
//! stateless, which is what makes concurrent invocations for different
//! users safe without any locking in the core. Serializing two concurrent
//! debits of the *same* funding source is the payment rail's job, a
//! property to verify against the rail, not to re-implement here.
//!
//! [`CollaboratorError`]: crate::error::CollaboratorError

mod aggregator;
mod rail;
mod store;

pub use aggregator::{AccountMeta, AggregatorClient, ExchangedCredential};
pub use rail::{FundingSourceRequest, PaymentRailClient, TransferConfirmation};
pub use store::StoreClient;
