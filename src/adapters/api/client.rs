use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::ports::{StoreError, StoreResult};

/// Thin reqwest wrapper for the task store API: request dispatch plus
/// the HTTP-status-to-error mapping. Error bodies are never interpreted;
/// only the status code matters.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("taskpad-cli/0.1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        self.handle_response(path, response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> StoreResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        self.handle_response(path, response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> StoreResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        self.handle_response(path, response).await
    }

    /// DELETE has no success payload (204).
    pub async fn delete(&self, path: &str) -> StoreResult<()> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::status_error(path, status))
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> StoreResult<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::status_error(path, status));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        tracing::debug!("API response for {path}: {response_text}");

        serde_json::from_str(&response_text).map_err(|e| {
            StoreError::Decode(format!(
                "Failed to parse response for {path}: {e}. Response was: {response_text}"
            ))
        })
    }

    fn status_error(path: &str, status: StatusCode) -> StoreError {
        match status.as_u16() {
            404 => StoreError::NotFound(path.to_string()),
            400 | 422 => StoreError::Validation(format!("HTTP {status} for {path}")),
            _ => StoreError::Network(format!("HTTP {status} for {path}")),
        }
    }
}
