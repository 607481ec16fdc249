//! HTTP client for the catalog API.

use reqwest::StatusCode;

use crate::types::{ErrorBody, ListingPage, ProductsRequest};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {error}")]
    Api {
        status: u16,
        error: String,
        message: Option<String>,
    },
    #[error("API reported failure")]
    Unsuccessful,
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    api_url: String,
}

impl StorefrontClient {
    /// `api_url` is the server root, e.g. `http://localhost:5001`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(http: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { http, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn check_connectivity(&self) -> bool {
        let url = format!("{}/health", self.api_url);
        matches!(self.http.get(&url).send().await, Ok(resp) if resp.status().is_success())
    }

    pub async fn fetch_products(&self, request: &ProductsRequest) -> Result<ListingPage, ClientError> {
        let url = format!("{}/api/products", self.api_url);
        let resp = self
            .http
            .get(&url)
            .query(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status, &bytes));
        }

        let page: ListingPage =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))?;
        if !page.success {
            return Err(ClientError::Unsuccessful);
        }
        tracing::debug!(count = page.count, total = page.total, page = page.page, "fetched products");
        Ok(page)
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(body) => ClientError::Api {
            status: status.as_u16(),
            error: body.error,
            message: body.message,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            error: String::from_utf8_lossy(body).into_owned(),
            message: None,
        },
    }
}
