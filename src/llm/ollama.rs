use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::config::LlmConfig;
use crate::llm::{models::Generation, InferenceClient, LlmError};

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    system_prompt: Option<String>,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, system_prompt: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            system_prompt,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            config.system_prompt.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        let mut body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        if let Some(system) = &self.system_prompt {
            body["system"] = json!(system);
        }

        debug!(model = %self.model, "POST {}/api/generate", self.base_url);

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        serde_json::from_slice::<Generation>(&bytes).map_err(|e| LlmError::Decode(e.to_string()))
    }
}
