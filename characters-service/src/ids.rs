//! Identifiers
//!
//! # Character IDs
//!
//! [`CharacterId`] is the document store key: 24 lowercase hexadecimal
//! characters encoding 12 bytes (4-byte big-endian Unix seconds, 5 bytes
//! chosen once per process, 3-byte counter). The time prefix makes keys
//! sort in creation order.
//!
//! ```rust
//! use characters_service::ids::CharacterId;
//!
//! let id: CharacterId = "6175AE9112E7CDE1912E5B40".parse().unwrap();
//! assert_eq!(id.as_str(), "6175ae9112e7cde1912e5b40");
//! assert!("123".parse::<CharacterId>().is_err());
//! ```
//!
//! # Request IDs
//!
//! Request IDs use the TypeID format with a `req` prefix and UUIDv7, so they
//! are time-sortable and easy to spot in logs:
//!
//! ```rust
//! use characters_service::ids::RequestId;
//!
//! let request_id = RequestId::new();
//! assert!(request_id.as_str().starts_with("req_"));
//! ```

use mti::prelude::*;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};
use http::Request;

/// Per-process random component of generated character ids
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);

/// Counter component, seeded randomly and wrapped at 24 bits
static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::random::<u32>() & 0x00ff_ffff));

/// Store identifier of a character
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterId(String);

impl CharacterId {
    /// Number of hexadecimal characters in an id
    pub const LEN: usize = 24;

    /// Generate a fresh, time-ordered id
    #[must_use]
    pub fn generate() -> Self {
        let seconds = chrono::Utc::now().timestamp().clamp(0, i64::from(u32::MAX)) as u32;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);

        let mut hex = String::with_capacity(Self::LEN);
        for byte in bytes {
            let _ = write!(hex, "{:02x}", byte);
        }
        Self(hex)
    }

    /// Parse and normalize an id (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns [`CharacterIdError`] unless the input is exactly 24 hex digits.
    pub fn parse(raw: &str) -> Result<Self, CharacterIdError> {
        if raw.len() != Self::LEN {
            return Err(CharacterIdError::InvalidLength(raw.len()));
        }
        if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CharacterIdError::InvalidCharacter);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CharacterId {
    type Err = CharacterIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CharacterId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<CharacterId> for String {
    fn from(id: CharacterId) -> Self {
        id.0
    }
}

impl Serialize for CharacterId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CharacterId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Error type for character id parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharacterIdError {
    /// Wrong number of characters.
    #[error("expected {len} hexadecimal characters, got {0}", len = CharacterId::LEN)]
    InvalidLength(usize),

    /// A character outside `[0-9a-fA-F]`.
    #[error("id contains a non-hexadecimal character")]
    InvalidCharacter,
}

/// A type-safe request identifier for distributed tracing.
///
/// Format: `req_<base32-encoded-uuidv7>`, e.g. `req_01h455vb4pex5vsknk084sn02q`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new request ID with a UUIDv7 (time-sortable).
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `MakeRequestId` for tower-http's `SetRequestIdLayer`
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}
