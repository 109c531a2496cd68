//! reqwest-backed search transport

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tessera::{Error, Result, SearchRequest, Transport};

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        tracing::debug!("{} {} ({} bytes)", SearchRequest::METHOD, request.url, request.body.len());

        let response = self
            .client
            .post(&request.url)
            .header(CONTENT_TYPE, SearchRequest::CONTENT_TYPE)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!("search failed ({}): {}", status, body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}
