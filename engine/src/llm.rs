//! External text model for weapon descriptions.
//!
//! Talks to an OpenAI-compatible chat completion server. Every failure path
//! degrades to the template writer so a batch never fails because the model
//! is down.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::describe::{tidy_generated, DescriptionWriter, TemplateWriter};
use crate::forge::WeaponParts;
use crate::{ForgeError, Result, Roller};

const SYSTEM_PROMPT: &str = "You write vivid one-sentence weapon descriptions for an arena combat game. \
Continue the text you are given without repeating it.";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the server, e.g. "http://localhost:8000".
    pub base_url: String,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            model: None,
            max_tokens: 60,
            temperature: 0.8,
            timeout_secs: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize, Debug)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

pub fn description_prompt(parts: &WeaponParts, arena_theme: &str) -> String {
    format!(
        "A {} {} made of {} with {} effects in a {} arena. This legendary weapon",
        parts.descriptor, parts.weapon_type, parts.material, parts.effect, arena_theme
    )
}

pub struct LlmClient {
    config: LlmConfig,
    client: reqwest::blocking::Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ForgeError::TextModel(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user".to_string(), content: prompt.to_string() },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        let url = format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| ForgeError::TextModel(format!("network: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(ForgeError::TextModel(format!("status {}: {}", status, body)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .map_err(|e| ForgeError::TextModel(format!("parse: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ForgeError::TextModel("empty response".to_string()))
    }

    pub fn health_check(&self) -> bool {
        let url = format!("{}/v1/models", self.config.base_url.trim_end_matches('/'));
        self.client
            .get(&url)
            .send()
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

pub struct LlmWriter {
    client: LlmClient,
    fallback: TemplateWriter,
}

impl LlmWriter {
    pub fn new(client: LlmClient, fallback: TemplateWriter) -> Self {
        Self { client, fallback }
    }
}

impl DescriptionWriter for LlmWriter {
    fn describe(&mut self, roller: &mut Roller, parts: &WeaponParts, arena_theme: &str) -> String {
        let prompt = description_prompt(parts, arena_theme);
        match self.client.complete(&prompt) {
            Ok(raw) => match tidy_generated(&raw) {
                Some(text) => return text,
                None => debug!(raw = %raw, "model output too short, using template"),
            },
            Err(e) => warn!(error = %e, "description model failed, using template"),
        }
        self.fallback.describe(roller, parts, arena_theme)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }

    fn is_available(&self) -> bool {
        self.client.health_check()
    }
}
