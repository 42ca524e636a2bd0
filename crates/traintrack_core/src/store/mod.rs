//! Record store abstraction: collection-partitioned, key-addressed
//! persistence with filtered scans.
//!
//! # Responsibility
//! - Define the one persistence contract both backends implement, so the
//!   repository layer never branches on storage technology.
//!
//! # Invariants
//! - `put` is an idempotent upsert; overwriting an existing id is silent.
//! - A successful `put` is durable and observed by any subsequent
//!   `get`/`scan`.
//! - Records are flat JSON objects of scalars; the stored document always
//!   carries the collection's key field.
//! - `scan` returns records in insertion order (order of the first `put`
//!   for each id).
//! - Backend failure is always a distinct error, never an empty result.

use crate::db::DbError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// The five logical collections of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Users,
    Batches,
    Trainees,
    Attendance,
    Results,
}

impl Collection {
    /// Backend table/partition name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Batches => "Batches",
            Self::Trainees => "Trainees",
            Self::Attendance => "Attendance",
            Self::Results => "Results",
        }
    }

    /// The record field that holds the collection key.
    pub fn key_field(self) -> &'static str {
        match self {
            Self::Batches => "code",
            _ => "id",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operator for scan filters.
///
/// Current repository callers only use `Eq`; `Gt`/`Lt` exist so the
/// contract can grow range queries without changing shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Lt,
}

/// One conjunctive predicate of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    /// Equality predicate, the only operator the domain layer needs.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }
}

/// Generic persistence error shared by both backends.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// The backend cannot be reached (distinct from "no data").
    Unavailable(String),
    /// The record is not a flat object of scalars.
    InvalidRecord(String),
    /// A filter or record field name is not a legal identifier.
    InvalidField(String),
    /// The connection has not been migrated to the expected schema.
    UninitializedSchema {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(detail) => write!(f, "record store unavailable: {detail}"),
            Self::InvalidRecord(detail) => write!(f, "invalid record: {detail}"),
            Self::InvalidField(field) => write!(f, "invalid field name `{field}`"),
            Self::UninitializedSchema {
                expected_version,
                actual_version,
            } => write!(
                f,
                "schema version {actual_version} does not match expected {expected_version}; \
                 run migrations first"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Backend-agnostic persistence contract.
///
/// Implementations must be safe to call from concurrent requests; internal
/// locking is the backend's concern, not the caller's.
pub trait RecordStore {
    /// Idempotent upsert of one record under `id`. Overwrite is silent.
    fn put(&self, collection: Collection, id: &str, record: &Value) -> StoreResult<()>;

    /// Point lookup by collection key.
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>>;

    /// Conjunctive filtered scan over one collection, in insertion order.
    fn scan(&self, collection: Collection, filters: &[Filter]) -> StoreResult<Vec<Value>>;
}

/// Checks that `record` is a flat object of scalar values.
///
/// Both backends share this gate so the repository sees identical behavior
/// regardless of which one is active.
pub(crate) fn require_flat_record(record: &Value) -> StoreResult<&serde_json::Map<String, Value>> {
    let map = record
        .as_object()
        .ok_or_else(|| StoreError::InvalidRecord("record must be a JSON object".to_string()))?;

    for (field, value) in map {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
            Value::Array(_) | Value::Object(_) => {
                return Err(StoreError::InvalidRecord(format!(
                    "field `{field}` holds a nested value; records must be flat"
                )));
            }
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::{require_flat_record, Collection, StoreError};
    use serde_json::json;

    #[test]
    fn batches_are_keyed_by_code() {
        assert_eq!(Collection::Batches.key_field(), "code");
        assert_eq!(Collection::Users.key_field(), "id");
    }

    #[test]
    fn nested_records_are_rejected() {
        let nested = json!({"id": "x", "extra": {"a": 1}});
        assert!(matches!(
            require_flat_record(&nested),
            Err(StoreError::InvalidRecord(_))
        ));

        let flat = json!({"id": "x", "count": 3, "label": null});
        assert!(require_flat_record(&flat).is_ok());
    }
}
