//! Airtable wire types.

use rooster_core::store::{Fields, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct WireRecord {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

impl From<WireRecord> for Record {
    fn from(r: WireRecord) -> Self {
        Record {
            id: r.id,
            fields: r.fields,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<WireRecord>,
    /// Present while more pages remain.
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<WireRecord>,
}

#[derive(Debug, Serialize)]
pub struct CreateBody {
    pub records: Vec<CreateRecord>,
}

#[derive(Debug, Serialize)]
pub struct CreateRecord {
    pub fields: Fields,
}

#[derive(Debug, Serialize)]
pub struct UpdateBody {
    pub records: Vec<UpdateRecord>,
}

#[derive(Debug, Serialize)]
pub struct UpdateRecord {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub records: Vec<DeletedRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DeletedRecord {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct TablesResponse {
    #[serde(default)]
    pub tables: Vec<TableMeta>,
}

#[derive(Debug, Deserialize)]
pub struct TableMeta {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
}

#[derive(Debug, Deserialize)]
pub struct FieldMeta {
    pub name: String,
}

/// Message from an error body. Airtable sends either
/// `{"error": {"type": ..., "message": ...}}` or `{"error": "NOT_FOUND"}`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("message")
            .or_else(|| obj.get("type"))
            .and_then(Value::as_str)
            .map(String::from),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn list_page_with_offset() {
        let body = r#"{
            "records": [
                {"id": "recA", "createdTime": "2024-08-01T10:00:00.000Z", "fields": {"Naam": "Bar"}},
                {"id": "recB", "createdTime": "2024-08-01T10:00:00.000Z", "fields": {}}
            ],
            "offset": "itrNext/recB"
        }"#;
        let page: ListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.offset.as_deref(), Some("itrNext/recB"));

        let record: Record = page.records.into_iter().next().unwrap().into();
        assert_eq!(record.fields["Naam"], Value::from("Bar"));
    }

    #[test]
    fn error_bodies() {
        assert_eq!(
            error_message(r#"{"error": {"type": "INVALID_PERMISSIONS", "message": "No access"}}"#),
            Some("No access".into())
        );
        assert_eq!(error_message(r#"{"error": "NOT_FOUND"}"#), Some("NOT_FOUND".into()));
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn create_body_shape() {
        let mut fields = Fields::new();
        fields.insert("Naam".into(), Value::from("Bar"));
        let body = CreateBody {
            records: vec![CreateRecord { fields }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "records": [{ "fields": { "Naam": "Bar" } }] })
        );
    }
}
