//! Conversation starter generation
//!
//! Provides:
//! - Prompt construction from a lead and its recent news
//! - A single model call per request
//! - Fallible decoding of the model's JSON reply
//! - Deterministic template fallback on any failure

pub mod prompt;

pub use prompt::{build_prompt, fallback_starters, SYSTEM_PROMPT};

use crate::config::LlmConfig;
use crate::errors::{AppError, Result};
use crate::llm::{ChatModel, CompletionRequest};
use crate::metrics;
use crate::models::{ConversationStarter, Lead, NewsArticle, Tone};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Generation options
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Sampling temperature
    pub temperature: f32,

    /// Output token ceiling
    pub max_tokens: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl From<&LlmConfig> for GenerationOptions {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Deserialize)]
struct StarterReply {
    starters: Vec<StarterItem>,
}

#[derive(Deserialize)]
struct StarterItem {
    text: String,
    #[serde(default)]
    context: Option<String>,
    // Any JSON value; non-strings coerce to the default tone
    #[serde(default)]
    tone: Option<Value>,
}

/// Models often wrap JSON in a Markdown fence; unwrap it if present
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Decode a model reply into starters for `lead_name`
pub fn parse_starters(reply: &str, lead_name: &str) -> Result<Vec<ConversationStarter>> {
    let body = strip_code_fence(reply);
    if body.is_empty() {
        return Err(AppError::ModelError {
            message: "Empty reply".to_string(),
        });
    }

    let parsed: StarterReply = serde_json::from_str(body)?;
    if parsed.starters.is_empty() {
        return Err(AppError::ModelError {
            message: "Reply contained no starters".to_string(),
        });
    }

    Ok(parsed
        .starters
        .into_iter()
        .enumerate()
        .map(|(index, item)| ConversationStarter {
            id: format!("{}-{}", lead_name, index),
            text: item.text,
            context: item.context.unwrap_or_default(),
            tone: Tone::coerce(item.tone.as_ref().and_then(Value::as_str)),
        })
        .collect())
}

/// Generates starters through a chat model, falling back to templates
#[derive(Clone)]
pub struct StarterGenerator {
    model: Arc<dyn ChatModel>,
    options: GenerationOptions,
}

impl StarterGenerator {
    pub fn new(model: Arc<dyn ChatModel>, options: GenerationOptions) -> Self {
        Self { model, options }
    }

    /// Starters for a lead. Never fails; any model or decode error yields
    /// [`fallback_starters`].
    #[instrument(skip(self, lead, articles), fields(lead = %lead.name, articles = articles.len()))]
    pub async fn generate(&self, lead: &Lead, articles: &[NewsArticle]) -> Vec<ConversationStarter> {
        let start = Instant::now();
        let outcome = self.try_generate(lead, articles).await;
        let elapsed = start.elapsed().as_secs_f64();

        match outcome {
            Ok(starters) => {
                metrics::record_starter_generation(elapsed, false);
                tracing::info!(count = starters.len(), "Starters generated");
                starters
            }
            Err(e) => {
                metrics::record_starter_generation(elapsed, true);
                tracing::warn!(
                    lead = %lead.name,
                    model = self.model.model_name(),
                    error = %e,
                    "Error generating conversation starters, using fallback"
                );
                fallback_starters(lead)
            }
        }
    }

    async fn try_generate(
        &self,
        lead: &Lead,
        articles: &[NewsArticle],
    ) -> Result<Vec<ConversationStarter>> {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: build_prompt(lead, articles),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let reply = self.model.complete(&request).await?;
        parse_starters(&reply, &lead.name)
    }
}
