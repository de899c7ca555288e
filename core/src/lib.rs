// Copyright (c) 2026 Meridian Labs. MIT License.
// See LICENSE for details.

//! # Meridian Core
//!
//! The engine behind Meridian's two promises: link a bank account once,
//! and move money to anyone who can show you an id. Everything here is
//! orchestration: the bank-data aggregator, the payment rail, and the
//! document store each do their one thing, and this crate makes the three
//! of them behave like a single logical operation with honest failure
//! modes.
//!
//! ## Architecture
//!
//! - **config** — Wire-format constants and key-derivation contexts.
//! - **error** — The shared failure taxonomy. Partial success is a first-
//!   class outcome here, not an afterthought.
//! - **amount** — Exact decimal money. No floats near a ledger, ever.
//! - **account** — Linked accounts and ledger records, plus the redacted
//!   aggregator credential.
//! - **token** — The shareable-token codec: keyed, deterministic,
//!   tamper-evident obfuscation of internal account ids.
//! - **envelope** — The versioned transport payload for out-of-band id
//!   exchange (scanned codes and friends).
//! - **collaborators** — The three trait seams the workflows drive.
//!   Implementations are injected by the embedding service.
//! - **workflow** — The linking and transfer state machines themselves.
//!
//! ## Design stance
//!
//! 1. Every remote step can fail; every failure says which step and which
//!    service.
//! 2. Irreversible effects are never retried automatically and never
//!    hidden behind a generic error.
//! 3. The store, the rail, and the aggregator hold all state. The
//!    workflows hold none, so concurrency needs no locks here.
//! 4. Every property a reviewer would ask about (round-trips, short
//!    circuits, ambiguity, partial success) is pinned by a test.
//!
//! This is a library: no listener, no CLI, no UI. Request handlers
//! construct the workflows with their collaborator implementations and
//! call them.

pub mod account;
pub mod amount;
pub mod collaborators;
pub mod config;
pub mod envelope;
pub mod error;
pub mod token;
pub mod workflow;
