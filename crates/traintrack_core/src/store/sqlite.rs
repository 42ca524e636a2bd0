//! Relational record store backend over SQLite.
//!
//! # Responsibility
//! - Map the generic put/get/scan contract onto one table per collection.
//! - Keep SQL text and row decoding inside this file.
//!
//! # Invariants
//! - Field names are validated against a strict identifier shape before
//!   they reach SQL text; values are always bound, never interpolated.
//! - Construction fails on a connection whose schema was not migrated.

use super::{
    require_flat_record, Collection, Filter, FilterOp, RecordStore, StoreError, StoreResult,
};
use crate::db::{self, migrations};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, Row};
use serde_json::{Map, Number, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// SQLite-backed record store. One table per collection, primary key =
/// the collection's key field.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Wraps an already-migrated connection.
    ///
    /// # Errors
    /// - `UninitializedSchema` when the connection's `user_version` does
    ///   not match the latest migration known to this binary.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let expected = migrations::latest_version();
        let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual != expected {
            return Err(StoreError::UninitializedSchema {
                expected_version: expected,
                actual_version: actual,
            });
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a database file, migrates it, and wraps it as a store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(db::open_db(path)?)
    }

    /// Opens a throwaway in-memory database, migrated and ready.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(db::open_db_in_memory()?)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl RecordStore for SqliteRecordStore {
    fn put(&self, collection: Collection, id: &str, record: &Value) -> StoreResult<()> {
        let fields = require_flat_record(record)?;
        let key_field = collection.key_field();

        let mut columns = vec![key_field];
        let mut values = vec![SqlValue::Text(id.to_string())];
        for (field, value) in fields {
            if field.as_str() == key_field {
                continue;
            }
            columns.push(checked_ident(field)?);
            values.push(json_to_sql(field, value)?);
        }

        let placeholders = (1..=columns.len())
            .map(|n| format!("?{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        // Upsert via ON CONFLICT so an overwrite updates the row in place
        // and keeps its rowid; scans must observe first-put order even
        // after an overwrite, matching the document backend.
        let assignments = columns[1..]
            .iter()
            .map(|column| format!("{column} = excluded.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let conflict_clause = if assignments.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {assignments}")
        };
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {};",
            collection.name(),
            columns.join(", "),
            placeholders,
            key_field,
            conflict_clause
        );

        self.conn()?.execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1;",
            collection.name(),
            collection.key_field()
        );
        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_json(row, &names)?)),
            None => Ok(None),
        }
    }

    fn scan(&self, collection: Collection, filters: &[Filter]) -> StoreResult<Vec<Value>> {
        let conn = self.conn()?;

        // Bare table scans come back in rowid order, which for these
        // insert-only tables is insertion order.
        let mut sql = format!("SELECT * FROM {}", collection.name());
        let mut bind_values = Vec::with_capacity(filters.len());
        for (index, filter) in filters.iter().enumerate() {
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            sql.push_str(checked_ident(&filter.field)?);
            sql.push(' ');
            sql.push_str(sql_op(filter.op));
            sql.push_str(&format!(" ?{}", index + 1));
            bind_values.push(json_to_sql(&filter.field, &filter.value)?);
        }
        sql.push(';');

        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(row_to_json(row, &names)?);
        }
        Ok(records)
    }
}

fn checked_ident(field: &str) -> StoreResult<&str> {
    if IDENT_RE.is_match(field) {
        Ok(field)
    } else {
        Err(StoreError::InvalidField(field.to_string()))
    }
}

fn sql_op(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => "=",
        FilterOp::Gt => ">",
        FilterOp::Lt => "<",
    }
}

fn json_to_sql(field: &str, value: &Value) -> StoreResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(flag) => Ok(SqlValue::Integer(i64::from(*flag))),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(SqlValue::Integer(int))
            } else if let Some(real) = number.as_f64() {
                Ok(SqlValue::Real(real))
            } else {
                Err(StoreError::InvalidRecord(format!(
                    "field `{field}` holds a number outside the supported range"
                )))
            }
        }
        Value::String(text) => Ok(SqlValue::Text(text.clone())),
        Value::Array(_) | Value::Object(_) => Err(StoreError::InvalidRecord(format!(
            "field `{field}` holds a nested value; records must be flat"
        ))),
    }
}

fn row_to_json(row: &Row<'_>, names: &[String]) -> StoreResult<Value> {
    let mut record = Map::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let value = match row.get_ref(index)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(int) => Value::Number(int.into()),
            ValueRef::Real(real) => Number::from_f64(real).map(Value::Number).ok_or_else(|| {
                StoreError::InvalidRecord(format!("column `{name}` holds a non-finite number"))
            })?,
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|_| {
                    StoreError::InvalidRecord(format!("column `{name}` holds non-UTF-8 text"))
                })?;
                Value::String(text.to_string())
            }
            ValueRef::Blob(_) => {
                return Err(StoreError::InvalidRecord(format!(
                    "column `{name}` holds a blob; records must be flat scalars"
                )));
            }
        };
        record.insert(name.clone(), value);
    }
    Ok(Value::Object(record))
}
