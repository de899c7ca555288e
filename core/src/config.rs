//! # Core Configuration & Constants
//!
//! Every magic number and wire-format constant in Meridian Core lives here.
//! The token format parameters and key-derivation contexts are consensus
//! between every token ever minted and every token ever decoded, and changing
//! them invalidates all outstanding shareable ids, so treat this module as
//! append-only once anything has shipped.

// ---------------------------------------------------------------------------
// Transport Envelope
// ---------------------------------------------------------------------------

/// Discriminator tag carried in every transport envelope. A payload whose
/// `type` field differs from this constant is rejected before any other
/// field is trusted.
pub const ENVELOPE_KIND: &str = "bank_transfer";

/// Envelope schema version. Only an exact match is accepted; a mismatch is
/// surfaced as its own parse failure so callers can distinguish "peer is
/// newer/older" from "peer sent garbage".
pub const ENVELOPE_SCHEMA_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Shareable Token Format
// ---------------------------------------------------------------------------

/// Version byte prefixed to the raw token payload before Base58 encoding.
/// Bump when the tag length, keystream construction, or layout changes.
pub const TOKEN_FORMAT_VERSION: u8 = 1;

/// Length in bytes of the truncated keyed-BLAKE3 integrity tag embedded in
/// each token. The tag doubles as the keystream seed, so two distinct ids
/// never share a keystream.
pub const TOKEN_TAG_LENGTH: usize = 16;

/// Upper bound on the internal account id accepted by the codec.
/// Aggregator account ids are ~37 characters; anything past this length is
/// not an account id.
pub const MAX_INTERNAL_ID_LENGTH: usize = 128;

/// BLAKE3 `derive_key` context for the token keystream subkey.
pub const TOKEN_STREAM_CONTEXT: &str = "meridian-core 2026-05-11 shareable-token stream key";

/// BLAKE3 `derive_key` context for the token integrity-tag subkey.
pub const TOKEN_TAG_CONTEXT: &str = "meridian-core 2026-05-11 shareable-token tag key";

// ---------------------------------------------------------------------------
// Payment Rail
// ---------------------------------------------------------------------------

/// Processor name passed to the aggregator when minting a processor token.
/// Must match the rail the funding source is registered with.
pub const PROCESSOR_NAME: &str = "dwolla";

/// BLAKE3 `derive_key` context for funding-source idempotency keys. The key
/// is derived from `customer_id || ":" || account_id`, so a retried
/// registration for the same pair presents the same key to the rail.
pub const FUNDING_IDEMPOTENCY_CONTEXT: &str =
    "meridian-core 2026-05-11 funding-source idempotency key";

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// Maximum number of fractional digits in a transfer amount. The rail moves
/// USD, and USD has cents.
pub const AMOUNT_SCALE: u32 = 2;
