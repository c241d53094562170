use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::FlowConfig;

/// The external generation flow that turns a planner request into a plan.
/// The request is whatever JSON the form sent; its contract is the flow's.
#[async_trait]
pub trait DietPlanFlow: Send + Sync {
    async fn run(&self, request: &Value) -> anyhow::Result<Value>;
}

/// Calls a hosted flow over HTTP: the input goes out as `{"data": ...}` and
/// the output comes back under `result`.
pub struct HttpDietPlanFlow {
    url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl HttpDietPlanFlow {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            url,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(cfg: &FlowConfig) -> Self {
        Self::new(cfg.url.clone(), cfg.api_key.clone())
    }
}

#[async_trait]
impl DietPlanFlow for HttpDietPlanFlow {
    async fn run(&self, request: &Value) -> anyhow::Result<Value> {
        let mut req = self
            .http_client
            .post(&self.url)
            .json(&json!({ "data": request }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.context("diet flow request")?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("diet flow returned {}: {}", status, error_text);
        }

        let mut body: Value = response
            .json()
            .await
            .context("diet flow response is not JSON")?;
        debug!(url = %self.url, "diet flow responded");

        if body.get("result").is_some() {
            Ok(body["result"].take())
        } else {
            Ok(body)
        }
    }
}
