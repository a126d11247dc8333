use crate::core::state::ZoroConfig;
use crate::core::window::PromptMessage;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

pub const SYSTEM_PROMPT: &str = r#"
You are an educational chatbot guiding students toward suitable career-oriented courses. Your responses should:
1. Refer to previous conversation topics to ensure relevance.
2. Incorporate details from the conversation history to maintain coherence.
3. Avoid redundant responses, and address new queries directly based on existing context.
4. Provide information concisely, using clear language unless technical details are necessary.
Respond only with verified information available to you. If the answer is not known, reply with 'I am unable to provide information on that.' Do not fabricate details, guess, or assume beyond provided data.
"#;

/// Remote chat model. One blocking call per turn, no retries.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String>;
}

pub struct Cortex {
    pub api_key: Option<String>,
    pub client: reqwest::Client,
    pub model: String,
    pub api_base: String,
}

impl Cortex {
    pub fn new(config: &ZoroConfig) -> Self {
        let api_key = config.api_key();
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; model calls will be sent without credentials",
                config.api_key_env
            );
        }

        Self {
            api_key,
            client: reqwest::Client::new(),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn payload(&self, messages: &[PromptMessage]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role(), "content": m.content() }))
            .collect();

        json!({
            "model": self.model,
            "messages": messages,
        })
    }
}

#[async_trait]
impl ChatModel for Cortex {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);

        let mut req = self.client.post(&url).json(&self.payload(messages));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req
            .send()
            .await
            .with_context(|| format!("Model request to {} failed", url))?;

        let status = res.status();
        tracing::debug!(%status, model = %self.model, "model responded");
        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            return Err(anyhow!("Model call failed. Status: {}, Body: {}", status, err_text));
        }

        let body: Value = res.json().await?;
        extract_text(&body).context("Model response parsing failed")
    }
}

fn extract_text(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| s.to_string())
}
