//! HTTP client for the Elasticsearch REST API

use super::backend::{BackendError, SearchBackend};
use crate::config::ElasticsearchSettings;
use crate::results::RawDocument;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Counts reported by a bulk index request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub indexed: usize,
    pub failed: usize,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    index: BulkItemResult,
}

#[derive(Debug, Deserialize)]
struct BulkItemResult {
    status: u16,
}

/// reqwest wrapper bound to one cluster
#[derive(Clone)]
pub struct ElasticClient {
    client: Client,
    base_url: Url,
    credentials: Option<(String, Option<String>)>,
}

impl ElasticClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&ElasticsearchSettings::default())
    }

    /// Create a new client with custom settings
    pub fn with_settings(settings: &ElasticsearchSettings) -> Result<Self> {
        let mut base_url = Url::parse(&settings.url)
            .with_context(|| format!("invalid elasticsearch url '{}'", settings.url))?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .build()?;

        let credentials = settings
            .username
            .clone()
            .map(|user| (user, settings.password.clone()));

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let url = self.base_url.join(path)?;
        let mut builder = self.client.request(method, url);
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, password.as_ref());
        }
        Ok(builder)
    }

    fn document_path(index: &str, id: &str) -> String {
        format!("{}/_doc/{}", index, urlencoding::encode(id))
    }

    /// Read a successful response body as JSON
    async fn read_json(response: Response) -> Result<Value, BackendError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Index documents with a single NDJSON `_bulk` request
    pub async fn bulk_index(
        &self,
        index: &str,
        documents: &[(Option<String>, Value)],
    ) -> Result<BulkSummary, BackendError> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let mut body = String::new();
        for (id, source) in documents {
            let action = match id {
                Some(id) => json!({ "index": { "_index": index, "_id": id } }),
                None => json!({ "index": { "_index": index } }),
            };
            body.push_str(&action.to_string());
            body.push('\n');
            body.push_str(&serde_json::to_string(source)?);
            body.push('\n');
        }

        debug!("Bulk indexing {} documents into {}", documents.len(), index);
        let response = self
            .request(Method::POST, "_bulk")?
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        let parsed: BulkResponse = serde_json::from_value(Self::read_json(response).await?)?;

        let indexed = parsed
            .items
            .iter()
            .filter(|item| (200..300).contains(&item.index.status))
            .count();
        Ok(BulkSummary {
            indexed,
            failed: parsed.items.len() - indexed,
        })
    }

    /// Delete a document; `false` when it did not exist
    pub async fn delete_document(&self, index: &str, id: &str) -> Result<bool, BackendError> {
        let response = self
            .request(Method::DELETE, &Self::document_path(index, id))?
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::read_json(response).await?;
        Ok(true)
    }
}

#[async_trait]
impl SearchBackend for ElasticClient {
    async fn search(&self, index: &str, body: &Value) -> Result<Value, BackendError> {
        let response = self
            .request(Method::POST, &format!("{}/_search", index))?
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn get_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<RawDocument>, BackendError> {
        let response = self
            .request(Method::GET, &Self::document_path(index, id))?
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document: RawDocument = serde_json::from_value(Self::read_json(response).await?)?;
        Ok(document.found.then_some(document))
    }

    async fn ping(&self) -> Result<bool, BackendError> {
        let response = self.request(Method::GET, "")?.send().await?;
        Ok(response.status().is_success())
    }
}
