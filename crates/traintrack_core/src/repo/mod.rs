//! Domain repositories over the generic record store.
//!
//! # Responsibility
//! - Provide typed, invariant-enforcing operations (ids, uniqueness,
//!   referential existence checks) the store itself never guarantees.
//! - Keep record encoding/decoding at this boundary so callers only see
//!   domain types.
//!
//! # Invariants
//! - Repositories never branch on which store backend is active and assume
//!   neither transactions nor joins.
//! - Backend failure surfaces as a typed error, never as an empty result.
//! - Read paths reject invalid persisted state (`InvalidData`) instead of
//!   masking it.

use crate::model::ValidationError;
use crate::store::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod identity_repo;
pub mod training_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error taxonomy of the domain layer.
#[derive(Debug)]
pub enum RepoError {
    /// Authentication failed. Deliberately carries no detail about whether
    /// the account exists, is pending setup, or the password was wrong.
    Denied,
    /// A referenced entity does not exist.
    NotFound { what: &'static str, key: String },
    /// An invite targeted an email that already has an account.
    DuplicateEmail(String),
    /// Field-level validation failed before any write happened.
    Validation(ValidationError),
    /// The record store failed or is unreachable.
    Store(StoreError),
    /// Persisted state failed to decode into a domain record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denied => write!(f, "invalid credentials"),
            Self::NotFound { what, key } => write!(f, "{what} not found: {key}"),
            Self::DuplicateEmail(email) => {
                write!(f, "an account already exists for `{email}`")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(detail) => write!(f, "invalid persisted data: {detail}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Encodes a domain record into the flat document shape the store expects.
pub(crate) fn encode<T: Serialize>(record: &T) -> RepoResult<Value> {
    serde_json::to_value(record)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode record: {err}")))
}

/// Decodes a stored document back into a domain record.
pub(crate) fn decode<T: DeserializeOwned>(what: &'static str, value: Value) -> RepoResult<T> {
    serde_json::from_value(value)
        .map_err(|err| RepoError::InvalidData(format!("bad {what} row: {err}")))
}

/// Decodes a whole scan result, failing on the first bad row.
pub(crate) fn decode_all<T: DeserializeOwned>(
    what: &'static str,
    values: Vec<Value>,
) -> RepoResult<Vec<T>> {
    values
        .into_iter()
        .map(|value| decode(what, value))
        .collect()
}
