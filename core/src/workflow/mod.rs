//! # Orchestration Workflows
//!
//! The two multi-party operations Meridian exists for, each a strictly
//! sequential chain of remote calls across the aggregator, the payment
//! rail, and the store:
//!
//! ```text
//!  LinkWorkflow                          TransferWorkflow
//!  ────────────                          ────────────────
//!  1. ExchangeCredential  (aggregator)   1. ResolveReceiver  (codec+store)
//!         │                                      │
//!  2. DiscoverAccount     (aggregator)   2. ResolveSender    (store)
//!         │                                      │
//!  3. MintFundingSource   (aggregator    3. ExecuteTransfer  (rail)
//!         │                + rail)               │   ← money moves here
//!  4. Persist             (codec+store)  4. RecordTransaction (store)
//! ```
//!
//! Step N's output is step N+1's input, so there is nothing to run in
//! parallel inside one invocation. Different invocations share no mutable
//! state and may run concurrently freely.
//!
//! ## Failure policy
//!
//! Every step failure aborts the workflow and surfaces a step-tagged error
//! variant; nothing is retried and nothing is compensated automatically.
//! The interesting failures are the ones *after* an irreversible effect:
//!
//! - Link step 4 failing leaves a durable aggregator credential and a live
//!   funding source with no stored record.
//! - Transfer step 4 failing leaves moved money with no ledger entry.
//!
//! Both surface with [`ErrorClass::PartialSuccess`] and carry what already
//! succeeded, so the caller can reconcile. Blindly re-running a transfer
//! after a step-4 failure would move the money twice, hence the loud
//! types instead of a retry loop.
//!
//! ## Cancellation
//!
//! Dropping a transfer future is only safe through step 2; once
//! `ExecuteTransfer` has been issued the outcome must be observed.
//! Callers imposing deadlines should put them on the individual remote
//! calls inside the collaborator implementations, not around the workflow
//! future.
//!
//! [`ErrorClass::PartialSuccess`]: crate::error::ErrorClass::PartialSuccess

mod link;
mod transfer;

pub use link::{LinkError, LinkRequest, LinkWorkflow};
pub use transfer::{TransferError, TransferOutcome, TransferRequest, TransferWorkflow};
