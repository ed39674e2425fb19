//! HTTP gateway client for a pointer ledger service.

use crate::errors::LedgerError;
use crate::{Finality, PointerLedger, PointerTx};
use anchorfs_types::{ContentId, OwnerId};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for one [`HttpPointerLedger`] instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Gateway base URL, e.g. `http://localhost:9081/ledger/`.
    pub base_url: String,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay between finality polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Give up after this many finality polls.
    #[serde(default = "default_max_finality_polls")]
    pub max_finality_polls: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_max_finality_polls() -> u32 {
    120
}

/// Pointer ledger backed by an HTTP gateway.
///
/// `wait_finality` polls the transaction status endpoint until the
/// gateway reports `confirmed` or `reverted`, up to the configured poll
/// budget.
#[derive(Clone)]
pub struct HttpPointerLedger {
    base_url: Url,
    http: Client,
    auth_token: Option<String>,
    poll_interval: Duration,
    max_finality_polls: u32,
}

impl HttpPointerLedger {
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|_| LedgerError::InvalidBaseUrl(config.base_url.clone()))?;
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
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_finality_polls: config.max_finality_polls,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn map_error(response: Response) -> LedgerError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        LedgerError::Gateway { status, message }
    }
}

#[async_trait]
impl PointerLedger for HttpPointerLedger {
    async fn read(&self, owner: &OwnerId) -> Result<Option<ContentId>, LedgerError> {
        let url = self.base_url.join(&format!("root/{owner}"))?;

        let response = self.authorize(self.http.get(url)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::map_error(response).await);
        }

        let body: PointerResponse = response.json().await?;
        // An empty string is an unset slot, same as a missing one.
        Ok(body
            .pointer
            .filter(|value| !value.is_empty())
            .map(ContentId::new))
    }

    async fn submit_update(
        &self,
        owner: &OwnerId,
        value: &ContentId,
    ) -> Result<PointerTx, LedgerError> {
        let url = self.base_url.join(&format!("root/{owner}"))?;
        let payload = UpdateRequest {
            value: value.as_str(),
        };

        let response = self
            .authorize(self.http.post(url).json(&payload))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::map_error(response).await);
        }

        let body: UpdateResponse = response.json().await?;
        Ok(PointerTx::new(body.tx_id))
    }

    async fn wait_finality(&self, tx: &PointerTx) -> Result<Finality, LedgerError> {
        let url = self.base_url.join(&format!("tx/{}", tx.id))?;

        for poll in 0..self.max_finality_polls {
            let response = self.authorize(self.http.get(url.clone())).send().await?;
            if !response.status().is_success() {
                return Err(Self::map_error(response).await);
            }

            let body: TxStatusResponse = response.json().await?;
            match body.status {
                TxStatusView::Confirmed => return Ok(Finality::Confirmed),
                TxStatusView::Reverted => return Ok(Finality::Reverted),
                TxStatusView::Pending => {
                    debug!(tx_id = %tx.id, poll, "pointer transaction still pending");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(LedgerError::FinalityTimeout {
            tx_id: tx.id.clone(),
            polls: self.max_finality_polls,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PointerResponse {
    #[serde(default)]
    pointer: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    tx_id: String,
}

#[derive(Debug, Deserialize)]
struct TxStatusResponse {
    status: TxStatusView,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum TxStatusView {
    Pending,
    Confirmed,
    Reverted,
}
