//! Record store boundary.
//!
//! Stores speak in loosely-typed records (`id` + a JSON field map), the way
//! hosted table services do. [`Schema`] says which store field holds which
//! typed attribute, and [`crate::repository::Repository`] turns records into
//! the typed model. Nothing past the repository sees raw field names.

mod local;
mod normalize;
mod schema;

pub use local::LocalStore;
pub use normalize::Normalizer;
pub use schema::{
    DepartmentFields, EventFields, RegistrationFields, RosterFields, Schema, VolunteerFields,
};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{RoosterError, RoosterResult};

pub type Fields = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Events,
    Volunteers,
    TeamRosters,
    Departments,
    /// Best-effort log of per-day registrations.
    Registrations,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Events,
        Collection::Volunteers,
        Collection::TeamRosters,
        Collection::Departments,
        Collection::Registrations,
    ];
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Collection::Events => "Events",
            Collection::Volunteers => "Volunteers",
            Collection::TeamRosters => "TeamRosters",
            Collection::Departments => "Departments",
            Collection::Registrations => "Registrations",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Text field equals `value`.
    FieldEquals {
        field: String,
        value: String,
        ignore_case: bool,
    },
    /// Record id is one of these.
    IdIn(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    pub fn asc(field: &str) -> Self {
        Sort {
            field: field.to_string(),
            descending: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub sort: Vec<Sort>,
    pub max_records: Option<usize>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort_by(mut self, field: &str) -> Self {
        self.sort.push(Sort::asc(field));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.max_records = Some(n);
        self
    }
}

/// Result of a batch delete. Stores may delete some ids and fail on others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteOutcome {
    pub deleted: Vec<String>,
    /// (id, reason)
    pub failed: Vec<(String, String)>,
}

impl DeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn any failure into a store error listing the failed ids.
    pub fn into_result(self) -> RoosterResult<Vec<String>> {
        if self.failed.is_empty() {
            return Ok(self.deleted);
        }
        let details: Vec<String> = self
            .failed
            .iter()
            .map(|(id, reason)| format!("{id}: {reason}"))
            .collect();
        Err(RoosterError::store(format!(
            "Deleted {} record(s), {} failed ({})",
            self.deleted.len(),
            self.failed.len(),
            details.join("; ")
        )))
    }
}

/// A hosted (or local) table store.
///
/// Every call is a single awaited request; implementations never retry.
/// `update` has patch semantics: fields not mentioned are left alone.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name for logs and messages ("airtable", "local").
    fn name(&self) -> &str;

    async fn list(&self, collection: Collection, query: &ListQuery) -> RoosterResult<Vec<Record>>;

    async fn get(&self, collection: Collection, id: &str) -> RoosterResult<Option<Record>>;

    async fn create(&self, collection: Collection, fields: Fields) -> RoosterResult<Record>;

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> RoosterResult<Record>;

    async fn delete(&self, collection: Collection, ids: &[String]) -> RoosterResult<DeleteOutcome>;

    /// Field names the store knows for `collection`, or `None` when the
    /// store can't introspect its schema.
    async fn field_names(&self, collection: Collection) -> RoosterResult<Option<Vec<String>>>;
}
