//! # Shareable Token Codec
//!
//! A linked account is referenced externally by a *shareable token*, an
//! opaque string a user can paste into a form or carry inside a scanned
//! payload. The token is derived deterministically and reversibly from the
//! aggregator's internal account id:
//!
//! ```text
//! internal_id (ASCII, 1..=128 bytes)
//!     tag       = keyed_blake3(tag_key, internal_id)[..16]
//!     keystream = keyed_blake3_xof(stream_key, tag)
//!     body      = internal_id XOR keystream
//!     token     = base58(0x01 || tag || body)
//! ```
//!
//! Both subkeys are derived from a single server-held secret with
//! `blake3::derive_key`, so encoding and decoding are pure functions of
//! (secret, input): no network, no clock, no randomness. The same id
//! always mints the same token, which is what gives a linked account a
//! stable external identity.
//!
//! The truncated keyed tag serves two roles: it seeds the keystream (two
//! distinct ids never share one) and it is the integrity check on decode.
//! Without the secret, a holder of one token cannot recover the account id
//! inside it or fabricate a second token that decodes at all; a flipped
//! character, a truncation, or an invented string fails the tag
//! comparison. Base58 keeps the result free of lookalike characters for
//! the manual-entry path.
//!
//! Decoding is total on this module's own output and rejects everything
//! else with a [`DecodeError`].

use thiserror::Error;

use crate::config::{
    MAX_INTERNAL_ID_LENGTH, TOKEN_FORMAT_VERSION, TOKEN_STREAM_CONTEXT, TOKEN_TAG_CONTEXT,
    TOKEN_TAG_LENGTH,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced when minting a shareable token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// An empty internal id cannot be encoded.
    #[error("internal account id is empty")]
    EmptyId,

    /// The id is longer than any real aggregator account id.
    #[error("internal account id is {length} bytes, limit is {MAX_INTERNAL_ID_LENGTH}")]
    IdTooLong {
        /// Length of the rejected id.
        length: usize,
    },

    /// The id contains whitespace, control characters, or non-ASCII.
    #[error("internal account id contains non-canonical characters")]
    NonCanonicalId,
}

/// Errors produced when decoding a shareable token.
///
/// The variants distinguish *how* a token is malformed, but deliberately
/// not *what* the recovered bytes looked like; failure detail about the
/// obfuscation layer stays out of caller-visible messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The token is not valid Base58.
    #[error("token is not valid base58")]
    InvalidEncoding,

    /// The decoded payload is too short to hold a version byte, tag, and
    /// at least one id byte.
    #[error("token payload is truncated ({length} bytes)")]
    TruncatedToken {
        /// Decoded payload length.
        length: usize,
    },

    /// The version byte names a format this build does not understand.
    #[error("unsupported token format {got:#04x}")]
    UnsupportedFormat {
        /// Version byte found in the payload.
        got: u8,
    },

    /// The embedded tag does not match the recovered id: the token was
    /// tampered with, corrupted, or minted under a different secret.
    #[error("token failed its integrity check")]
    IntegrityMismatch,
}

// ---------------------------------------------------------------------------
// TokenCodec
// ---------------------------------------------------------------------------

/// Keyed codec between internal account ids and shareable tokens.
///
/// Construct one per deployment from the server-held secret and inject it
/// into the workflows; the two derived subkeys are the only state.
///
/// # Examples
///
/// ```
/// use meridian_core::token::TokenCodec;
///
/// let codec = TokenCodec::new(b"server-held secret from config");
/// let token = codec.encode("acct-99").unwrap();
/// assert_eq!(codec.decode(&token).unwrap(), "acct-99");
/// ```
#[derive(Clone)]
pub struct TokenCodec {
    stream_key: [u8; 32],
    tag_key: [u8; 32],
}

impl TokenCodec {
    /// Derive the codec's subkeys from the server-held secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            stream_key: blake3::derive_key(TOKEN_STREAM_CONTEXT, secret),
            tag_key: blake3::derive_key(TOKEN_TAG_CONTEXT, secret),
        }
    }

    /// Mint the shareable token for an internal account id.
    ///
    /// Deterministic: the same id under the same secret always yields the
    /// same token. Fails only on malformed input.
    pub fn encode(&self, internal_id: &str) -> Result<String, EncodeError> {
        if internal_id.is_empty() {
            return Err(EncodeError::EmptyId);
        }
        if internal_id.len() > MAX_INTERNAL_ID_LENGTH {
            return Err(EncodeError::IdTooLong {
                length: internal_id.len(),
            });
        }
        if !internal_id.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(EncodeError::NonCanonicalId);
        }

        let tag = self.tag(internal_id.as_bytes());
        let mut body = internal_id.as_bytes().to_vec();
        self.apply_keystream(&tag, &mut body);

        let mut payload = Vec::with_capacity(1 + TOKEN_TAG_LENGTH + body.len());
        payload.push(TOKEN_FORMAT_VERSION);
        payload.extend_from_slice(&tag);
        payload.extend_from_slice(&body);
        Ok(bs58::encode(payload).into_string())
    }

    /// Recover the internal account id from a shareable token.
    ///
    /// Accepts exactly the strings produced by [`TokenCodec::encode`] under
    /// the same secret; anything else fails with a [`DecodeError`].
    pub fn decode(&self, token: &str) -> Result<String, DecodeError> {
        let payload = bs58::decode(token)
            .into_vec()
            .map_err(|_| DecodeError::InvalidEncoding)?;
        if payload.len() < 1 + TOKEN_TAG_LENGTH + 1 {
            return Err(DecodeError::TruncatedToken {
                length: payload.len(),
            });
        }
        if payload[0] != TOKEN_FORMAT_VERSION {
            return Err(DecodeError::UnsupportedFormat { got: payload[0] });
        }

        let (tag_bytes, body) = payload[1..].split_at(TOKEN_TAG_LENGTH);
        let mut tag = [0u8; TOKEN_TAG_LENGTH];
        tag.copy_from_slice(tag_bytes);

        let mut recovered = body.to_vec();
        self.apply_keystream(&tag, &mut recovered);

        let expected = self.tag(&recovered);
        if !constant_time_eq(&expected, &tag) {
            return Err(DecodeError::IntegrityMismatch);
        }

        // Tag matched, so `recovered` is byte-identical to an encoded id,
        // and encoded ids are ASCII. The fallback is unreachable in
        // practice but keeps the function total.
        String::from_utf8(recovered).map_err(|_| DecodeError::IntegrityMismatch)
    }

    /// Truncated keyed tag over the id bytes.
    fn tag(&self, id: &[u8]) -> [u8; TOKEN_TAG_LENGTH] {
        let digest = blake3::keyed_hash(&self.tag_key, id);
        let mut tag = [0u8; TOKEN_TAG_LENGTH];
        tag.copy_from_slice(&digest.as_bytes()[..TOKEN_TAG_LENGTH]);
        tag
    }

    /// XOR `buf` with the keystream seeded by `tag`. Self-inverse.
    fn apply_keystream(&self, tag: &[u8; TOKEN_TAG_LENGTH], buf: &mut [u8]) {
        let mut reader = blake3::Hasher::new_keyed(&self.stream_key)
            .update(tag)
            .finalize_xof();
        let mut keystream = vec![0u8; buf.len()];
        reader.fill(&mut keystream);
        for (byte, key) in buf.iter_mut().zip(keystream) {
            *byte ^= key;
        }
    }
}

fn constant_time_eq(a: &[u8; TOKEN_TAG_LENGTH], b: &[u8; TOKEN_TAG_LENGTH]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
