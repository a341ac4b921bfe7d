//! Implements the `Store` trait against the transactions REST API using `reqwest`.

use crate::api::Store;
use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, RecordId, TransactionRecord};
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

/// Talks to `GET {base}`, `POST {base}` and `DELETE {base}/{id}`.
pub(crate) struct HttpStore {
    client: Client,
    base: Url,
}

impl HttpStore {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Unable to build the HTTP client")
            .pub_result(ErrorType::Config)?;
        Ok(Self {
            client,
            base: config.api_url().clone(),
        })
    }
}

#[async_trait::async_trait]
impl Store for HttpStore {
    async fn list(&mut self) -> Result<Vec<TransactionRecord>> {
        trace!("GET {}", self.base);
        let response = self
            .client
            .get(self.base.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch transactions from {}", self.base))
            .pub_result(ErrorType::Network)?;
        let records: Vec<TransactionRecord> = parse_json(check_status(response).await?).await?;
        debug!("Fetched {} transactions", records.len());
        Ok(records)
    }

    async fn create(&mut self, transaction: &NewTransaction) -> Result<TransactionRecord> {
        trace!("POST {} {transaction:?}", self.base);
        let response = self
            .client
            .post(self.base.clone())
            .json(transaction)
            .send()
            .await
            .with_context(|| format!("Failed to send new transaction to {}", self.base))
            .pub_result(ErrorType::Network)?;
        let record: TransactionRecord = parse_json(check_status(response).await?).await?;
        if record.id().is_empty() {
            warn!("The API accepted the transaction but did not return an id for it");
        }
        Ok(record)
    }

    async fn delete(&mut self, id: &RecordId) -> Result<()> {
        let url = record_url(&self.base, id)?;
        trace!("DELETE {url}");
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send delete request to {url}"))
            .pub_result(ErrorType::Network)?;
        let _ = check_status(response).await?;
        Ok(())
    }
}

/// Builds `{base}/{id}`, percent-encoding the id as a single path segment.
pub(crate) fn record_url(base: &Url, id: &RecordId) -> Result<Url> {
    if id.is_empty() {
        return Err(anyhow!("Cannot address a transaction with an empty id"))
            .pub_result(ErrorType::Input);
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow!("The API URL '{base}' cannot have path segments appended"))
        .pub_result(ErrorType::Config)?
        .pop_if_empty()
        .push(id.as_str());
    Ok(url)
}

/// Turns a non-success status into an error that carries the status and the response body.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().clone();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    Err(anyhow!(
        "Request to {url} failed with status {status}: {body}"
    ))
    .pub_result(ErrorType::Network)
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let url = response.url().clone();
    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read the response body from {url}"))
        .pub_result(ErrorType::Network)?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse the JSON response from {url}"))
        .pub_result(ErrorType::Response)
}
