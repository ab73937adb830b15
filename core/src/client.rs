//! HTTP client for the ingestion service, used by the terminal views and
//! the device simulator.

use crate::{
    api::StoredResponse,
    error::{PalmError, PalmResult},
    observation::{Observation, ObservationInput},
};
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct PalmClient {
    client:   Client,
    base_url: String,
}

impl PalmClient {
    pub fn new(base_url: impl Into<String>) -> PalmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> PalmResult<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    pub async fn list_observations(&self) -> PalmResult<Vec<Observation>> {
        let observations = self
            .client
            .get(self.url("/observations"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(observations)
    }

    /// Post one reading and return the record as stored by the server.
    pub async fn post_observation(&self, input: &ObservationInput) -> PalmResult<Observation> {
        let resp = self
            .client
            .post(self.url("/observations"))
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            let stored: StoredResponse = resp.json().await?;
            return Ok(stored.data);
        }

        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(PalmError::Rejected { status: status.as_u16(), message })
    }
}
