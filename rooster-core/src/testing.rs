//! Shared fixtures for store-driven tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{RoosterError, RoosterResult};
use crate::repository::Repository;
use crate::store::{
    Collection, DeleteOutcome, Fields, ListQuery, LocalStore, Normalizer, Record, RecordStore,
    Schema,
};

pub(crate) const EVENT_ID: &str = "recFair";

pub(crate) struct Fixture {
    pub store: LocalStore,
    pub normalizer: Normalizer,
}

impl Fixture {
    /// In-memory store with the "Summer Fair" event (2024-08-10 to 2024-08-12).
    pub async fn new() -> Self {
        let fixture = Fixture {
            store: LocalStore::in_memory(),
            normalizer: Normalizer::new(Schema::default(), chrono_tz::Europe::Amsterdam),
        };
        fixture
            .seed(
                Collection::Events,
                vec![record(
                    EVENT_ID,
                    json!({
                        "Evenement": "Summer Fair",
                        "Evenement Start datum": "2024-08-10",
                        "Evenement Eind datum": "2024-08-12",
                        "Locatie": "Stadspark",
                    }),
                )],
            )
            .await;
        fixture
    }

    pub fn repo(&self) -> Repository<'_> {
        Repository::new(&self.store, &self.normalizer)
    }

    pub async fn seed(&self, collection: Collection, records: Vec<Record>) {
        self.store.seed(collection, records).await.unwrap();
    }

    pub async fn seed_blocks(&self, blocks: Vec<Record>) {
        self.seed(Collection::TeamRosters, blocks).await;
    }

    pub async fn seed_volunteer(&self, id: &str, nickname: &str, email: &str, events: &[&str]) {
        self.seed(
            Collection::Volunteers,
            vec![record(
                id,
                json!({
                    "Roepnaam": nickname,
                    "Email Adres": email,
                    "Opgegeven Evenementen": events,
                }),
            )],
        )
        .await;
    }

    pub async fn seed_departments(&self, names: &[&str]) {
        let records = names
            .iter()
            .enumerate()
            .map(|(i, name)| record(&format!("recD{i}"), json!({ "Naam": name })))
            .collect();
        self.seed(Collection::Departments, records).await;
    }
}

pub(crate) fn record(id: &str, fields: Value) -> Record {
    Record {
        id: id.to_string(),
        fields: fields.as_object().cloned().unwrap_or_default(),
    }
}

/// Roster block on the fixture event. Times are stored UTC instants.
pub(crate) fn block_record(id: &str, volunteer: &str, department: &str, start: &str, end: &str) -> Record {
    record(
        id,
        json!({
            "Event Name": [EVENT_ID],
            "Volunteer Name": [volunteer],
            "Afdeling": [department],
            "Start tijd": start,
            "Eind tijd": end,
        }),
    )
}

/// Wraps a store and fails every roster listing while `failing` is set.
pub(crate) struct FlakyStore<'a> {
    pub inner: &'a LocalStore,
    pub failing: AtomicBool,
}

impl<'a> FlakyStore<'a> {
    pub fn new(inner: &'a LocalStore) -> Self {
        FlakyStore {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for FlakyStore<'_> {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn list(&self, collection: Collection, query: &ListQuery) -> RoosterResult<Vec<Record>> {
        if collection == Collection::TeamRosters && self.failing.load(Ordering::SeqCst) {
            return Err(RoosterError::store("connection reset"));
        }
        self.inner.list(collection, query).await
    }

    async fn get(&self, collection: Collection, id: &str) -> RoosterResult<Option<Record>> {
        self.inner.get(collection, id).await
    }

    async fn create(&self, collection: Collection, fields: Fields) -> RoosterResult<Record> {
        self.inner.create(collection, fields).await
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> RoosterResult<Record> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: Collection, ids: &[String]) -> RoosterResult<DeleteOutcome> {
        self.inner.delete(collection, ids).await
    }

    async fn field_names(&self, collection: Collection) -> RoosterResult<Option<Vec<String>>> {
        self.inner.field_names(collection).await
    }
}
