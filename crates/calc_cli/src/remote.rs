//! HTTP implementation of the remote history store.
//!
//! # Responsibility
//! - Translate `HistoryRemote` calls into `/api/history` requests.
//! - Map wire records (`_id`, `equation`, `result`) into `RemoteCalculation`.
//!
//! # Invariants
//! - Every non-2xx answer becomes `RemoteError::Status` carrying the server's
//!   `message` when one is present.
//! - Connection failures are `Transport`; unreadable bodies are `Decode`.

use async_trait::async_trait;
use calc_core::{HistoryRemote, NewCalculation, RemoteCalculation, RemoteError};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wire shape of one stored calculation.
#[derive(Debug, Deserialize)]
struct CalculationBody {
    #[serde(rename = "_id")]
    id: String,
    equation: String,
    result: String,
}

impl From<CalculationBody> for RemoteCalculation {
    fn from(value: CalculationBody) -> Self {
        Self {
            id: value.id,
            equation: value.equation,
            result: value.result,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    equation: &'a str,
    result: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// `HistoryRemote` backed by the history store's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpHistoryRemote {
    client: Client,
    base_url: Url,
}

impl HttpHistoryRemote {
    /// Creates a remote for the collection at `base_url`
    /// (for example `http://localhost:5000/api/history`).
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn item_url(&self, id: &str) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RemoteError::Transport(format!("api url `{}` cannot take an id", self.base_url))
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        request: RequestBuilder,
    ) -> Result<Response, RemoteError> {
        let started = Instant::now();
        let response = request.send().await.map_err(|err| {
            debug!(
                "event=remote_request module=cli status=error method={method} url={url} error={err}"
            );
            RemoteError::Transport(err.to_string())
        })?;

        let status = response.status();
        debug!(
            "event=remote_request module=cli status=ok method={method} url={url} http_status={} duration_ms={}",
            status.as_u16(),
            started.elapsed().as_millis()
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageBody>(&body)
            .map(|parsed| parsed.message)
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                } else {
                    body
                }
            });
        Err(RemoteError::Status {
            code: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| RemoteError::Decode(err.to_string()))
    }
}

#[async_trait]
impl HistoryRemote for HttpHistoryRemote {
    async fn fetch_recent(&self) -> Result<Vec<RemoteCalculation>, RemoteError> {
        let url = self.base_url.clone();
        let request = self.client.get(url.clone());
        let response = self.send(Method::GET, url, request).await?;
        let records: Vec<CalculationBody> = Self::read_json(response).await?;
        Ok(records.into_iter().map(RemoteCalculation::from).collect())
    }

    async fn create(&self, calculation: &NewCalculation) -> Result<RemoteCalculation, RemoteError> {
        let url = self.base_url.clone();
        let request = self.client.post(url.clone()).json(&CreateBody {
            equation: &calculation.equation,
            result: &calculation.result,
        });
        let response = self.send(Method::POST, url, request).await?;
        let record: CalculationBody = Self::read_json(response).await?;
        Ok(record.into())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let url = self.item_url(id)?;
        let request = self.client.delete(url.clone());
        self.send(Method::DELETE, url, request).await.map(|_| ())
    }

    async fn clear(&self) -> Result<(), RemoteError> {
        let url = self.base_url.clone();
        let request = self.client.delete(url.clone());
        self.send(Method::DELETE, url, request).await.map(|_| ())
    }
}
