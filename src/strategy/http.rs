//! JSON-over-HTTP adapter for the advisory boundary

use async_trait::async_trait;
use reqwest::Client;

use super::{AdvisoryClient, AdvisoryRequest, AdvisoryResponse};
use crate::error::AdvisoryError;

pub struct HttpAdvisoryClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAdvisoryClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AdvisoryClient for HttpAdvisoryClient {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AdvisoryError::Rejected(format!("HTTP {}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| AdvisoryError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jit::pipeline::baseline_sets;
    use crate::strategy::testing::squat_input;
    use crate::strategy::{AdvisoryStrategy, GenerationStrategy, StrategyTag};
    use mockito::{Matcher, Server};

    fn request() -> AdvisoryRequest {
        let input = squat_input();
        let baseline = baseline_sets(&input).unwrap();
        AdvisoryRequest::from_input(&input, &baseline)
    }

    #[tokio::test]
    async fn test_advise_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/advise")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(serde_json::json!({"lift": "squat"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"intensity_multiplier": 0.95, "set_delta": -1, "rationale": ["tired"]}"#)
            .create_async()
            .await;

        let client = HttpAdvisoryClient::new(format!("{}/advise", server.url()), Some("secret".to_string()));
        let response = client.advise(&request()).await.unwrap();
        assert_eq!(response.intensity_multiplier, 0.95);
        assert_eq!(response.set_delta, -1);
        assert_eq!(response.rationale, vec!["tired".to_string()]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_is_rejection() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/advise")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = HttpAdvisoryClient::new(format!("{}/advise", server.url()), None);
        let err = client.advise(&request()).await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Rejected(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/advise")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpAdvisoryClient::new(format!("{}/advise", server.url()), None);
        let err = client.advise(&request()).await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_strategy_falls_back_on_http_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/advise")
            .with_status(500)
            .create_async()
            .await;

        let client = HttpAdvisoryClient::new(format!("{}/advise", server.url()), None);
        let out = AdvisoryStrategy::new(client)
            .generate(&squat_input())
            .await
            .unwrap();
        assert_eq!(out.strategy, StrategyTag::Fallback);
        assert_eq!(out.sets.len(), 2);
    }
}
