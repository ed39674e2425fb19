//! HTTP gateway client for a content store service.

use crate::errors::StoreError;
use crate::observer::PutObserver;
use crate::ContentStore;
use anchorfs_types::{ContentId, FileBlob};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Configuration for one [`HttpContentStore`] instance.
///
/// Each constructed store owns its configuration; two stores built from
/// different configs are fully isolated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Gateway base URL, e.g. `http://localhost:9080/api/`.
    pub base_url: String,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Content store backed by an HTTP gateway.
///
/// Wire format: JSON with base64 blob content. The gateway owns the unit
/// identifier format; this client passes identifiers through untouched.
#[derive(Clone)]
pub struct HttpContentStore {
    base_url: Url,
    http: Client,
    auth_token: Option<String>,
}

impl HttpContentStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|_| StoreError::InvalidBaseUrl(config.base_url.clone()))?;
        if !base_url.path().ends_with('/') {
            let mut path = base_url.path().trim_end_matches('/').to_owned();
            path.push('/');
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url,
            http,
            auth_token: config.auth_token,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn map_error(id: Option<&ContentId>, response: Response) -> StoreError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return StoreError::NotFound(id.clone());
            }
        }
        let message = response.text().await.unwrap_or_default();
        StoreError::Gateway {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn put(
        &self,
        blobs: &[FileBlob],
        observer: &dyn PutObserver,
    ) -> Result<ContentId, StoreError> {
        let url = self.base_url.join("blobs")?;
        let payload = PutRequest {
            files: blobs.iter().map(BlobView::from).collect(),
        };

        let response = self.authorize(self.http.post(url).json(&payload)).send().await?;
        if !response.status().is_success() {
            return Err(Self::map_error(None, response).await);
        }
        let body: PutResponse = response.json().await?;
        let id = ContentId::new(body.unit_id);

        observer.unit_id_ready(&id);
        for blob in blobs {
            observer.stored_chunk(blob.len() as u64);
        }
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> Result<Vec<FileBlob>, StoreError> {
        let url = self.base_url.join(&format!("blobs/{id}"))?;

        let response = self.authorize(self.http.get(url)).send().await?;
        if !response.status().is_success() {
            return Err(Self::map_error(Some(id), response).await);
        }
        let body: GetResponse = response.json().await?;

        body.files
            .into_iter()
            .map(|view| view.try_into_blob())
            .collect()
    }

    async fn delete(&self, id: &ContentId) -> Result<(), StoreError> {
        let url = self.base_url.join(&format!("blobs/{id}"))?;

        let response = self.authorize(self.http.delete(url)).send().await?;
        if !response.status().is_success() {
            return Err(Self::map_error(Some(id), response).await);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct PutRequest {
    files: Vec<BlobView>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlobView {
    name: String,
    content_b64: String,
}

impl From<&FileBlob> for BlobView {
    fn from(blob: &FileBlob) -> Self {
        Self {
            name: blob.name.clone(),
            content_b64: BASE64.encode(&blob.content),
        }
    }
}

impl BlobView {
    fn try_into_blob(self) -> Result<FileBlob, StoreError> {
        let content = BASE64
            .decode(&self.content_b64)
            .map_err(|err| StoreError::Wire(format!("invalid base64 content: {err}")))?;
        Ok(FileBlob::new(self.name, content))
    }
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    unit_id: String,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    files: Vec<BlobView>,
}
