//! File-backed store for offline use and tests.
//!
//! All collections live in one JSON file, rewritten atomically after every
//! mutation. Filtering and sorting mimic what the hosted store does
//! server-side.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{Collection, DeleteOutcome, Fields, Filter, ListQuery, Record, RecordStore};
use crate::error::{RoosterError, RoosterResult};

type Tables = BTreeMap<Collection, Vec<Record>>;

pub struct LocalStore {
    path: Option<PathBuf>,
    tables: Mutex<Tables>,
}

impl LocalStore {
    /// Open (or start) the store file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> RoosterResult<Self> {
        let path = path.as_ref().to_path_buf();

        let tables = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            if content.trim().is_empty() {
                Tables::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            Tables::new()
        };

        Ok(LocalStore {
            path: Some(path),
            tables: Mutex::new(tables),
        })
    }

    /// A store that lives only as long as the value.
    pub fn in_memory() -> Self {
        LocalStore {
            path: None,
            tables: Mutex::new(Tables::new()),
        }
    }

    /// Insert records with fixed ids, replacing any with the same id.
    pub async fn seed(&self, collection: Collection, records: Vec<Record>) -> RoosterResult<()> {
        let mut tables = self.tables.lock().await;
        let table = tables.entry(collection).or_default();
        for record in records {
            table.retain(|r| r.id != record.id);
            table.push(record);
        }
        self.persist(&tables).await
    }

    async fn persist(&self, tables: &Tables) -> RoosterResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(tables)?;
        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn list(&self, collection: Collection, query: &ListQuery) -> RoosterResult<Vec<Record>> {
        let tables = self.tables.lock().await;
        let mut records: Vec<Record> = tables
            .get(&collection)
            .map(|t| t.iter().filter(|r| matches(r, query.filter.as_ref())).cloned().collect())
            .unwrap_or_default();

        for sort in query.sort.iter().rev() {
            records.sort_by(|a, b| {
                let ord = compare_field(a, b, &sort.field);
                if sort.descending { ord.reverse() } else { ord }
            });
        }

        if let Some(max) = query.max_records {
            records.truncate(max);
        }

        debug!(%collection, count = records.len(), "local list");
        Ok(records)
    }

    async fn get(&self, collection: Collection, id: &str) -> RoosterResult<Option<Record>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .get(&collection)
            .and_then(|t| t.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn create(&self, collection: Collection, fields: Fields) -> RoosterResult<Record> {
        let mut tables = self.tables.lock().await;
        let record = Record {
            id: format!("rec{}", Uuid::new_v4().simple()),
            fields,
        };
        tables.entry(collection).or_default().push(record.clone());
        self.persist(&tables).await?;
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> RoosterResult<Record> {
        let mut tables = self.tables.lock().await;
        let record = tables
            .get_mut(&collection)
            .and_then(|t| t.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| RoosterError::NotFound {
                collection,
                id: id.to_string(),
            })?;

        for (key, value) in fields {
            record.fields.insert(key, value);
        }
        let updated = record.clone();

        self.persist(&tables).await?;
        Ok(updated)
    }

    async fn delete(&self, collection: Collection, ids: &[String]) -> RoosterResult<DeleteOutcome> {
        let mut tables = self.tables.lock().await;
        let table = tables.entry(collection).or_default();

        let mut outcome = DeleteOutcome::default();
        for id in ids {
            let before = table.len();
            table.retain(|r| &r.id != id);
            if table.len() < before {
                outcome.deleted.push(id.clone());
            } else {
                outcome.failed.push((id.clone(), "record not found".to_string()));
            }
        }

        self.persist(&tables).await?;
        Ok(outcome)
    }

    async fn field_names(&self, _collection: Collection) -> RoosterResult<Option<Vec<String>>> {
        // Schemaless: any field name is accepted.
        Ok(None)
    }
}

fn matches(record: &Record, filter: Option<&Filter>) -> bool {
    match filter {
        None => true,
        Some(Filter::IdIn(ids)) => ids.iter().any(|id| *id == record.id),
        Some(Filter::FieldEquals {
            field,
            value,
            ignore_case,
        }) => match record.fields.get(field).and_then(Value::as_str) {
            Some(actual) if *ignore_case => actual.to_lowercase() == value.to_lowercase(),
            Some(actual) => actual == value,
            None => false,
        },
    }
}

/// Missing values sort first, like empty cells in the hosted store.
fn compare_field(a: &Record, b: &Record, field: &str) -> Ordering {
    let key = |r: &Record| r.fields.get(field).map(sort_key);
    key(a).cmp(&key(b))
}

fn sort_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
