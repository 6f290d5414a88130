//! HTTP client helpers for tests.

#![allow(dead_code)]

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn finish(resp: reqwest::Response) -> Result<(u16, Value), TestClientError> {
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok((status, body))
    }

    pub async fn get(&self, path: &str) -> Result<(u16, Value), TestClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::finish(resp).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<(u16, Value), TestClientError> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        Self::finish(resp).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Result<(u16, Value), TestClientError> {
        let resp = self.client.put(self.url(path)).json(body).send().await?;
        Self::finish(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(u16, Value), TestClientError> {
        let resp = self.client.delete(self.url(path)).send().await?;
        Self::finish(resp).await
    }

    /// Posts a multipart form of text fields plus an optional `file` part.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, Vec<u8>)>,
    ) -> Result<(u16, Value), TestClientError> {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name.to_string(), value.to_string());
        }
        if let Some((file_name, bytes)) = file {
            form = form.part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        }

        let resp = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::finish(resp).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
