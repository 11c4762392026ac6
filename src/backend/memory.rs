//! In-memory stand-in for the hosted backend used by service tests.
//!
//! Rows are kept as JSON objects per table, the same shape the REST surface
//! returns. Like the real database it assigns ids and timestamps and fills
//! `vendor_quotes.total_cost`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::backend::errors::{BackendError, BackendResult};
use crate::backend::{ListQuery, RecordReader, RecordWriter};
use crate::domain::entity::Entity;

#[derive(Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<Mutex<HashMap<&'static str, Vec<Value>>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores existing records as they are.
    pub fn seed<E: Entity>(&self, rows: &[E]) {
        let mut tables = self.tables();
        let table = tables.entry(E::KIND.table()).or_default();
        for row in rows {
            if let Ok(value) = serde_json::to_value(row) {
                table.push(value);
            }
        }
    }

    /// Makes every following call fail with the given backend message.
    pub fn fail_with(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    /// Operations received so far, e.g. `insert:clients`.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn rows<E: Entity>(&self) -> Vec<E> {
        self.tables()
            .get(E::KIND.table())
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| serde_json::from_value(row.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<&'static str, Vec<Value>>> {
        lock(&self.tables)
    }

    fn record_call(&self, operation: &str, table: &str) -> BackendResult<()> {
        lock(&self.calls).push(format!("{operation}:{table}"));
        match lock(&self.failure).as_ref() {
            Some(message) => Err(BackendError::Http {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn matches_id(row: &Value, id: &str) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id)
}

fn apply_generated_columns(table: &str, row: &mut Map<String, Value>) {
    if table == "vendor_quotes" {
        let base = row.get("base_cost").and_then(Value::as_f64).unwrap_or(0.0);
        let additional = row
            .get("additional_costs")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        row.insert("total_cost".into(), Value::from(base + additional));
    }
}

fn draft_object<T: serde::Serialize>(draft: &T) -> BackendResult<Map<String, Value>> {
    match serde_json::to_value(draft)? {
        Value::Object(map) => Ok(map),
        other => Err(BackendError::DecodeError(format!(
            "draft serialized to {other}, expected an object"
        ))),
    }
}

#[async_trait]
impl RecordReader for MemoryBackend {
    async fn list_records<E: Entity>(&self, query: ListQuery) -> BackendResult<(usize, Vec<E>)> {
        self.record_call("list", E::KIND.table())?;

        let mut rows: Vec<Value> = self
            .tables()
            .get(E::KIND.table())
            .cloned()
            .unwrap_or_default();

        if let Some(term) = &query.search {
            let needle = term.as_str().to_lowercase();
            rows.retain(|row| {
                E::SEARCH_COLUMNS.iter().any(|column| {
                    row.get(*column)
                        .and_then(Value::as_str)
                        .is_some_and(|value| value.to_lowercase().contains(&needle))
                })
            });
        }

        rows.sort_by(|a, b| {
            let key = |row: &Value| {
                row.get("created_at")
                    .and_then(Value::as_str)
                    .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            };
            key(b).cmp(&key(a))
        });

        let total = rows.len();
        let page: Vec<Value> = match query.pagination {
            Some(pagination) => rows
                .into_iter()
                .skip(pagination.offset())
                .take(pagination.per_page)
                .collect(),
            None => rows,
        };

        let items = page
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<E>, _>>()?;

        Ok((total, items))
    }

    async fn get_record<E: Entity>(&self, id: E::Id) -> BackendResult<Option<E>> {
        self.record_call("get", E::KIND.table())?;

        let id = id.to_string();
        let row = self
            .tables()
            .get(E::KIND.table())
            .and_then(|rows| rows.iter().find(|row| matches_id(row, &id)).cloned());

        Ok(row.map(serde_json::from_value).transpose()?)
    }
}

#[async_trait]
impl RecordWriter for MemoryBackend {
    async fn insert_record<E: Entity>(&self, draft: &E::Draft) -> BackendResult<E> {
        let table = E::KIND.table();
        self.record_call("insert", table)?;

        let now = Value::from(Utc::now().to_rfc3339());
        let mut row = draft_object(draft)?;
        row.insert("id".into(), Value::from(Uuid::new_v4().to_string()));
        row.insert("created_at".into(), now.clone());
        row.insert("updated_at".into(), now);
        apply_generated_columns(table, &mut row);

        let row = Value::Object(row);
        let record: E = serde_json::from_value(row.clone())?;
        self.tables().entry(table).or_default().push(row);

        Ok(record)
    }

    async fn update_record<E: Entity>(&self, id: E::Id, draft: &E::Draft) -> BackendResult<E> {
        let table = E::KIND.table();
        self.record_call("update", table)?;

        let id = id.to_string();
        let changes = draft_object(draft)?;
        let mut tables = self.tables();
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| matches_id(row, &id)))
            .and_then(Value::as_object_mut)
            .ok_or(BackendError::NotFound)?;

        row.extend(changes);
        row.insert("updated_at".into(), Value::from(Utc::now().to_rfc3339()));
        apply_generated_columns(table, row);

        Ok(serde_json::from_value(Value::Object(row.clone()))?)
    }

    async fn delete_record<E: Entity>(&self, id: E::Id) -> BackendResult<()> {
        let table = E::KIND.table();
        self.record_call("delete", table)?;

        let id = id.to_string();
        let mut tables = self.tables();
        let rows = tables.get_mut(table).ok_or(BackendError::NotFound)?;
        let before = rows.len();
        rows.retain(|row| !matches_id(row, &id));
        if rows.len() == before {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }
}
