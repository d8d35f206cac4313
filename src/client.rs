//! HTTP client for the summary backend.
//!
//! Uses reqwest for fetching. Each call is one fresh GET; nothing is retried or cached.

use crate::config::ApiConfig;
use crate::summary::{PayloadError, SummaryPayload};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("anew/", env!("CARGO_PKG_VERSION"));

const PING_ROUTE: &str = "/api/ping";
const SUMMARY_ROUTE: &str = "/api/data";

/// The backend call a [`ClientError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ping,
    Summary,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Ping => "server connection failed",
            Operation::Summary => "summary fetch failed",
        })
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{op}: {source}")]
    Transport {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{op}: server responded with {status}")]
    Status { op: Operation, status: StatusCode },
    #[error("{op}: {source}")]
    Payload {
        op: Operation,
        #[source]
        source: PayloadError,
    },
}

impl ClientError {
    pub fn operation(&self) -> Operation {
        match self {
            ClientError::Transport { op, .. }
            | ClientError::Status { op, .. }
            | ClientError::Payload { op, .. } => *op,
        }
    }
}

/// Client for the summary backend, built once from configuration and passed around.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the backend is reachable
    pub async fn ping(&self) -> Result<Value, ClientError> {
        self.get_json(Operation::Ping, PING_ROUTE).await
    }

    /// Fetch the current summary
    pub async fn get_summary(&self) -> Result<SummaryPayload, ClientError> {
        let body = self.get_summary_raw().await?;
        SummaryPayload::decode(body).map_err(|source| ClientError::Payload {
            op: Operation::Summary,
            source,
        })
    }

    /// Fetch the current summary without decoding its shape
    pub async fn get_summary_raw(&self) -> Result<Value, ClientError> {
        self.get_json(Operation::Summary, SUMMARY_ROUTE).await
    }

    async fn get_json(&self, op: Operation, route: &str) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, route);
        tracing::debug!(%url, "GET");

        let transport = |source| ClientError::Transport { op, source };
        let response = self.http.get(&url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "backend returned an error status");
            return Err(ClientError::Status { op, status });
        }

        response.json::<Value>().await.map_err(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_labels() {
        assert_eq!(Operation::Ping.to_string(), "server connection failed");
        assert_eq!(Operation::Summary.to_string(), "summary fetch failed");
    }

    #[test]
    fn status_error_embeds_label_and_cause() {
        let err = ClientError::Status {
            op: Operation::Summary,
            status: StatusCode::BAD_GATEWAY,
        };
        assert_eq!(
            err.to_string(),
            "summary fetch failed: server responded with 502 Bad Gateway"
        );
        assert_eq!(err.operation(), Operation::Summary);
    }

    #[test]
    fn client_keeps_configured_base_url() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
    }
}
