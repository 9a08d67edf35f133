//! Public share identifiers for designs.
//!
//! A [`ShareId`] is the 8-character public handle for a saved design,
//! distinct from its internal database ID. The identifier space is
//! 36^8 (~2.8 trillion), drawn from lowercase alphanumerics only, so a
//! share link never needs URL encoding and is safe to read over the phone.
//!
//! Every externally supplied identifier is validated against the exact
//! `^[0-9a-z]{8}$` shape before any storage lookup is attempted.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exact length of a share identifier.
pub const SHARE_ID_LEN: usize = 8;

/// Alphabet a share identifier is drawn from.
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Error produced when a string does not have the share-identifier shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareIdError {
    #[error("share id must be exactly {SHARE_ID_LEN} characters (got {0})")]
    InvalidLength(usize),
    #[error("share id must contain only lowercase letters and digits")]
    InvalidCharacter,
}

/// A validated 8-character public design identifier.
///
/// Construction goes through [`ShareId::parse`] (or serde/sqlx, which
/// delegate to it), so a `ShareId` in hand always satisfies the format
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct ShareId(String);

impl ShareId {
    /// Parse and validate an externally supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns `ShareIdError` if the input is not exactly 8 lowercase
    /// alphanumeric characters.
    pub fn parse(s: &str) -> Result<Self, ShareIdError> {
        if s.len() != SHARE_ID_LEN {
            return Err(ShareIdError::InvalidLength(s.len()));
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(ShareIdError::InvalidCharacter);
        }
        Ok(Self(s.to_owned()))
    }

    /// Generate a fresh random identifier using the thread-local RNG.
    ///
    /// Uniform over the 36-symbol alphabet. Cheap enough to call in a
    /// collision-retry loop; uniqueness is the caller's concern.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Generate a fresh random identifier from the given RNG.
    ///
    /// Split out from [`ShareId::generate`] so tests can use a seeded RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..SHARE_ID_LEN)
            .map(|_| {
                let idx = rng.random_range(0..ALPHABET.len());
                #[allow(clippy::indexing_slicing)] // idx is in 0..ALPHABET.len()
                char::from(ALPHABET[idx])
            })
            .collect();
        Self(id)
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShareId {
    type Err = ShareIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShareId {
    type Error = ShareIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ShareId> for String {
    fn from(id: ShareId) -> Self {
        id.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ShareId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShareId {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&raw)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ShareId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0.as_str(), buf)
    }
}
