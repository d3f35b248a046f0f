//! Airtable-backed [`RecordStore`].
//!
//! Talks to the REST API (`/v0/{base}/{table}`) with a personal access token
//! and to the metadata API for schema validation. Requests are issued one at
//! a time and never retried; failures surface as [`RoosterError::Store`].

mod formula;
mod types;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use rooster_core::error::{RoosterError, RoosterResult};
use rooster_core::store::{
    Collection, DeleteOutcome, Fields, ListQuery, Record, RecordStore, Schema,
};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;

use crate::formula::filter_formula;
use crate::types::{
    CreateBody, CreateRecord, DeleteResponse, ListResponse, RecordsResponse, TablesResponse,
    UpdateBody, UpdateRecord, WireRecord, error_message,
};

const API_URL: &str = "https://api.airtable.com/v0/";
const PAGE_SIZE: usize = 100;
/// Airtable deletes at most this many records per request.
const DELETE_BATCH: usize = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Table name -> field names, or `None` when the token may not read schemas.
type TableFields = Option<HashMap<String, Vec<String>>>;

pub struct AirtableStore {
    http: reqwest::Client,
    api_url: Url,
    base_id: String,
    api_key: String,
    tables: HashMap<Collection, String>,
    meta: OnceCell<TableFields>,
}

impl AirtableStore {
    pub fn new(base_id: &str, api_key: &str, schema: &Schema) -> RoosterResult<Self> {
        if base_id.trim().is_empty() {
            return Err(RoosterError::Config("Airtable base_id is empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RoosterError::store(format!("Could not create HTTP client: {e}")))?;

        let api_url = Url::parse(API_URL).map_err(|e| RoosterError::Config(e.to_string()))?;

        Ok(AirtableStore {
            http,
            api_url,
            base_id: base_id.trim().to_string(),
            api_key: api_key.to_string(),
            tables: Collection::ALL
                .iter()
                .map(|c| (*c, schema.table(*c).to_string()))
                .collect(),
            meta: OnceCell::new(),
        })
    }

    /// Read the API key from the environment variable `api_key_env`.
    pub fn from_env(base_id: &str, api_key_env: &str, schema: &Schema) -> RoosterResult<Self> {
        let api_key = std::env::var(api_key_env).map_err(|_| {
            RoosterError::Config(format!(
                "Environment variable {api_key_env} is not set. It must hold an Airtable access token."
            ))
        })?;
        Self::new(base_id, &api_key, schema)
    }

    fn table(&self, collection: Collection) -> &str {
        self.tables
            .get(&collection)
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn url(&self, segments: &[&str]) -> RoosterResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| RoosterError::Config(format!("Invalid API URL: {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self, collection: Collection) -> RoosterResult<Url> {
        self.url(&[self.base_id.as_str(), self.table(collection)])
    }

    fn list_url(&self, collection: Collection, query: &ListQuery, offset: Option<&str>) -> RoosterResult<Url> {
        let mut url = self.table_url(collection)?;
        {
            let mut params = url.query_pairs_mut();
            let page_size = query.max_records.map_or(PAGE_SIZE, |m| m.clamp(1, PAGE_SIZE));
            params.append_pair("pageSize", &page_size.to_string());

            if let Some(max) = query.max_records {
                params.append_pair("maxRecords", &max.to_string());
            }
            if let Some(filter) = &query.filter {
                params.append_pair("filterByFormula", &filter_formula(filter));
            }
            for (i, sort) in query.sort.iter().enumerate() {
                params.append_pair(&format!("sort[{i}][field]"), &sort.field);
                let direction = if sort.descending { "desc" } else { "asc" };
                params.append_pair(&format!("sort[{i}][direction]"), direction);
            }
            if let Some(offset) = offset {
                params.append_pair("offset", offset);
            }
        }
        Ok(url)
    }

    fn delete_url(&self, collection: Collection, ids: &[String]) -> RoosterResult<Url> {
        let mut url = self.table_url(collection)?;
        {
            let mut params = url.query_pairs_mut();
            for id in ids {
                params.append_pair("records[]", id);
            }
        }
        Ok(url)
    }

    /// Send with auth; returns status and body without judging either.
    async fn execute(&self, request: reqwest::RequestBuilder, context: &str) -> RoosterResult<(StatusCode, String)> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| RoosterError::store(format!("{context}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RoosterError::store(format!("{context}: {e}")))?;

        debug!(%status, "{context}");
        Ok((status, body))
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder, context: &str) -> RoosterResult<T> {
        let (status, body) = self.execute(request, context).await?;
        parse_response(status, &body, context)
    }

    async fn table_fields(&self) -> RoosterResult<&TableFields> {
        self.meta.get_or_try_init(|| self.fetch_table_fields()).await
    }

    async fn fetch_table_fields(&self) -> RoosterResult<TableFields> {
        let context = "read base schema";
        let url = self.url(&["meta", "bases", self.base_id.as_str(), "tables"])?;
        let (status, body) = self.execute(self.http.get(url), context).await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("access token cannot read the base schema; skipping field validation");
            return Ok(None);
        }

        let response: TablesResponse = parse_response(status, &body, context)?;
        Ok(Some(
            response
                .tables
                .into_iter()
                .map(|t| (t.name, t.fields.into_iter().map(|f| f.name).collect()))
                .collect(),
        ))
    }
}

fn parse_response<T: DeserializeOwned>(status: StatusCode, body: &str, context: &str) -> RoosterResult<T> {
    if !status.is_success() {
        let msg = error_message(body).unwrap_or_else(|| status.to_string());
        return Err(RoosterError::store(format!(
            "{context}: {msg} (HTTP {})",
            status.as_u16()
        )));
    }
    serde_json::from_str(body)
        .map_err(|e| RoosterError::store(format!("{context}: unexpected response: {e}")))
}

fn first_record(response: RecordsResponse, context: &str) -> RoosterResult<Record> {
    response
        .records
        .into_iter()
        .next()
        .map(Record::from)
        .ok_or_else(|| RoosterError::store(format!("{context}: empty response")))
}

#[async_trait]
impl RecordStore for AirtableStore {
    fn name(&self) -> &str {
        "airtable"
    }

    async fn list(&self, collection: Collection, query: &ListQuery) -> RoosterResult<Vec<Record>> {
        let context = format!("list {}", self.table(collection));
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let url = self.list_url(collection, query, offset.as_deref())?;
            let page: ListResponse = self.send(self.http.get(url), &context).await?;
            records.extend(page.records.into_iter().map(Record::from));

            let reached_max = query.max_records.is_some_and(|max| records.len() >= max);
            match page.offset {
                Some(next) if !reached_max => offset = Some(next),
                _ => break,
            }
        }

        if let Some(max) = query.max_records {
            records.truncate(max);
        }
        Ok(records)
    }

    async fn get(&self, collection: Collection, id: &str) -> RoosterResult<Option<Record>> {
        let context = format!("get {} {id}", self.table(collection));
        let url = self.url(&[self.base_id.as_str(), self.table(collection), id])?;
        let (status, body) = self.execute(self.http.get(url), &context).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record: WireRecord = parse_response(status, &body, &context)?;
        Ok(Some(record.into()))
    }

    async fn create(&self, collection: Collection, fields: Fields) -> RoosterResult<Record> {
        let context = format!("create in {}", self.table(collection));
        let body = CreateBody {
            records: vec![CreateRecord { fields }],
        };
        let request = self.http.post(self.table_url(collection)?).json(&body);
        let response: RecordsResponse = self.send(request, &context).await?;
        first_record(response, &context)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> RoosterResult<Record> {
        let context = format!("update {} {id}", self.table(collection));
        let body = UpdateBody {
            records: vec![UpdateRecord {
                id: id.to_string(),
                fields,
            }],
        };
        let request = self.http.patch(self.table_url(collection)?).json(&body);
        let response: RecordsResponse = self.send(request, &context).await?;
        first_record(response, &context)
    }

    async fn delete(&self, collection: Collection, ids: &[String]) -> RoosterResult<DeleteOutcome> {
        let context = format!("delete from {}", self.table(collection));
        let mut outcome = DeleteOutcome::default();

        for batch in ids.chunks(DELETE_BATCH) {
            let url = self.delete_url(collection, batch)?;
            match self.send::<DeleteResponse>(self.http.delete(url), &context).await {
                Ok(response) => merge_deleted(&mut outcome, batch, &response),
                Err(e) => {
                    warn!("{e}");
                    outcome
                        .failed
                        .extend(batch.iter().map(|id| (id.clone(), e.to_string())));
                }
            }
        }

        Ok(outcome)
    }

    async fn field_names(&self, collection: Collection) -> RoosterResult<Option<Vec<String>>> {
        let Some(tables) = self.table_fields().await? else {
            return Ok(None);
        };
        // A missing table means every mapped field is missing.
        Ok(Some(
            tables
                .get(self.table(collection))
                .cloned()
                .unwrap_or_default(),
        ))
    }
}

fn merge_deleted(outcome: &mut DeleteOutcome, requested: &[String], response: &DeleteResponse) {
    for id in requested {
        let deleted = response.records.iter().any(|r| &r.id == id && r.deleted);
        if deleted {
            outcome.deleted.push(id.clone());
        } else {
            outcome.failed.push((id.clone(), "not deleted".to_string()));
        }
    }
}
