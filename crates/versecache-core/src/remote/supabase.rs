//! Supabase (PostgREST) implementation of `PoemSource`.
//!
//! The whole catalog is read with a single `GET /rest/v1/{table}?select=*`,
//! authenticated with the project's anon key sent both as `apikey` and as a
//! bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Config;

use super::{PoemSource, RemoteError, RemoteRecord};

/// TCP connect timeout in seconds. There is no whole-request timeout here;
/// the synchronizer bounds each fetch with its configured timeout.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for one Supabase poems table.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SupabaseSource {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    table: String,
}

impl SupabaseSource {
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        table: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.filter(|url| !url.trim().is_empty()),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            table: table.into(),
        })
    }

    /// Build from configuration. Missing endpoint or key is not an error here;
    /// it surfaces as `NotConfigured` when a fetch is attempted, so the local
    /// cache stays usable without a remote.
    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        Self::new(
            config.remote_url.clone(),
            config.api_key.clone(),
            config.table(),
        )
    }

    fn table_url(&self, base_url: &str) -> String {
        format!(
            "{}/rest/v1/{}?select=*",
            base_url.trim_end_matches('/'),
            self.table
        )
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(RemoteError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl PoemSource for SupabaseSource {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn fetch_all_poems(&self) -> Result<Vec<RemoteRecord>, RemoteError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| RemoteError::NotConfigured("missing remote URL".to_string()))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RemoteError::NotConfigured("missing API key".to_string()))?;

        let url = self.table_url(base_url);
        debug!(url = %url, "Fetching poem table");

        let response = self
            .client
            .get(&url)
            .header("apikey", api_key)
            .bearer_auth(api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        let records = parse_rows(&text)?;

        debug!(count = records.len(), "Poem table fetched");
        Ok(records)
    }
}

/// Parse a PostgREST response body: a JSON array of row objects.
pub(crate) fn parse_rows(body: &str) -> Result<Vec<RemoteRecord>, RemoteError> {
    let rows: Vec<Map<String, Value>> = serde_json::from_str(body)
        .map_err(|e| RemoteError::InvalidResponse(format!("Failed to parse poem rows: {}", e)))?;
    Ok(rows.iter().map(RemoteRecord::from_json_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let json = r#"[
            {"id": 1, "created_at": "2025-01-01T00:00:00Z", "Title": "Dawn", "Body": "...", "Author": "A"},
            {"id": 2, "created_at": "2025-01-02T00:00:00Z", "Title": "Dusk", "Body": "...", "Author": null}
        ]"#;

        let records = parse_rows(json).expect("Failed to parse poem rows test JSON");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], RemoteRecord::new(1, "Dawn", "...", Some("A")));
        assert_eq!(records[1], RemoteRecord::new(2, "Dusk", "...", None));
    }

    #[test]
    fn test_parse_rows_empty_table() {
        assert!(parse_rows("[]").expect("empty array").is_empty());
    }

    #[test]
    fn test_parse_rows_rejects_non_array() {
        let err = parse_rows(r#"{"message": "relation does not exist"}"#).unwrap_err();
        assert!(matches!(err, RemoteError::InvalidResponse(_)));
    }

    #[test]
    fn test_table_url() {
        let source = SupabaseSource::new(
            Some("https://example.supabase.co/".to_string()),
            Some("anon".to_string()),
            "Poems",
        )
        .expect("client");
        assert_eq!(
            source.table_url("https://example.supabase.co/"),
            "https://example.supabase.co/rest/v1/Poems?select=*"
        );
    }

    #[tokio::test]
    async fn test_fetch_without_configuration_fails_fast() {
        let source = SupabaseSource::new(None, Some("anon".to_string()), "Poems").expect("client");
        let err = source.fetch_all_poems().await.unwrap_err();
        assert!(matches!(err, RemoteError::NotConfigured(_)));
        assert!(!err.is_transient());

        let source = SupabaseSource::new(Some("https://x.supabase.co".to_string()), Some("  ".to_string()), "Poems")
            .expect("client");
        assert!(matches!(
            source.fetch_all_poems().await.unwrap_err(),
            RemoteError::NotConfigured(_)
        ));
    }
}
