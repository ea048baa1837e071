use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{Error, Result};

/// Response as the state machines see it: status plus raw body.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON. A 2xx response with an unparsable body is a
    /// protocol violation, not a transport failure.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::Protocol(format!("response body is not valid JSON: {}", e)))
    }
}

/// The one seam to the network. Implementations send exactly one request per
/// call and never retry.
#[async_trait]
pub trait CheckoutTransport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse>;
    async fn get(&self, url: &str) -> Result<TransportResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Use a caller-built client. The core enforces no timeout of its own;
    /// a deployment that wants one sets it on this client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CheckoutTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("could not read response body: {}", e)))?;

        Ok(TransportResponse { status, body })
    }

    async fn get(&self, url: &str) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("could not read response body: {}", e)))?;

        Ok(TransportResponse { status, body })
    }
}
