use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::models::Poem;

/// A poem row as delivered by the remote source, after field names have been
/// normalized. Values stay optional here; `into_poem` decides what is
/// acceptable for the local store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRecord {
    /// `None` when the remote row has no id or the id is not an integer.
    pub id: Option<i64>,
    /// Raw text of an id that could not be read as an integer.
    pub raw_id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record has no id")]
    MissingId,

    #[error("record id {0:?} is not an integer")]
    MalformedId(String),
}

impl RemoteRecord {
    pub fn new(id: i64, title: &str, body: &str, author: Option<&str>) -> Self {
        Self {
            id: Some(id),
            raw_id: None,
            title: Some(title.to_string()),
            body: Some(body.to_string()),
            author: author.map(str::to_string),
        }
    }

    /// Normalize one JSON row. Field names are matched case-insensitively so
    /// `Title` and `title` both land in `title`.
    pub fn from_json_row(row: &Map<String, Value>) -> Self {
        let (id, raw_id) = match field(row, "id") {
            None | Some(Value::Null) => (None, None),
            Some(value) => match parse_id(value) {
                Some(id) => (Some(id), None),
                None => (None, Some(value_to_text(value))),
            },
        };

        Self {
            id,
            raw_id,
            title: field(row, "title").and_then(text_value),
            body: field(row, "body").and_then(text_value),
            author: field(row, "author")
                .and_then(text_value)
                .filter(|author| !author.trim().is_empty()),
        }
    }

    /// Map to a local poem. The id is mandatory; a missing title or body is
    /// stored as empty text.
    pub fn into_poem(self) -> Result<Poem, RecordError> {
        let id = match (self.id, self.raw_id) {
            (Some(id), _) => id,
            (None, Some(raw)) => return Err(RecordError::MalformedId(raw)),
            (None, None) => return Err(RecordError::MissingId),
        };

        if self.title.is_none() || self.body.is_none() {
            warn!(
                id,
                missing_title = self.title.is_none(),
                missing_body = self.body.is_none(),
                "Remote poem missing fields, storing empty text"
            );
        }

        Ok(Poem {
            id,
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            author: self.author,
        })
    }
}

fn field<'a>(row: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    row.get(name).or_else(|| {
        row.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(value_to_text(other)),
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
