//! In-process document store backend.
//!
//! # Responsibility
//! - Implement the record-store contract with document semantics: no
//!   schema, native field matching, per-collection partitions.
//!
//! # Invariants
//! - Scans observe records in insertion order; an overwrite keeps the
//!   record's original slot.
//! - A poisoned partition lock is reported as `Unavailable`, never as an
//!   empty result.
//!
//! Plays the role the cloud document engine has in production deployments
//! and doubles as the test double for repository tests.

use super::{require_flat_record, Collection, Filter, FilterOp, RecordStore, StoreError, StoreResult};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type Partition = Vec<(String, Value)>;

/// Document-style record store held entirely in process memory.
#[derive(Default)]
pub struct MemoryRecordStore {
    collections: Mutex<BTreeMap<&'static str, Partition>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn partitions(&self) -> StoreResult<MutexGuard<'_, BTreeMap<&'static str, Partition>>> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("partition lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryRecordStore {
    fn put(&self, collection: Collection, id: &str, record: &Value) -> StoreResult<()> {
        let mut fields = require_flat_record(record)?.clone();
        fields.insert(
            collection.key_field().to_string(),
            Value::String(id.to_string()),
        );
        let stored = Value::Object(fields);

        let mut partitions = self.partitions()?;
        let partition = partitions.entry(collection.name()).or_default();
        match partition.iter_mut().find(|(key, _)| key.as_str() == id) {
            Some((_, slot)) => *slot = stored,
            None => partition.push((id.to_string(), stored)),
        }
        Ok(())
    }

    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        let partitions = self.partitions()?;
        Ok(partitions
            .get(collection.name())
            .and_then(|partition| partition.iter().find(|(key, _)| key.as_str() == id))
            .map(|(_, record)| record.clone()))
    }

    fn scan(&self, collection: Collection, filters: &[Filter]) -> StoreResult<Vec<Value>> {
        let partitions = self.partitions()?;
        let Some(partition) = partitions.get(collection.name()) else {
            return Ok(Vec::new());
        };

        Ok(partition
            .iter()
            .filter(|(_, record)| matches_all(record, filters))
            .map(|(_, record)| record.clone())
            .collect())
    }
}

fn matches_all(record: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| {
        let field_value = record.get(&filter.field).unwrap_or(&Value::Null);
        match filter.op {
            FilterOp::Eq => field_value == &filter.value,
            FilterOp::Gt => compare(field_value, &filter.value) == Some(Ordering::Greater),
            FilterOp::Lt => compare(field_value, &filter.value) == Some(Ordering::Less),
        }
    })
}

/// Orders two scalar document values; `None` for incomparable kinds.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
