//! YandexGPT completion client for generated channel posts.
//!
//! The generation service is consumed as an opaque "prompt in, text out"
//! call: POST a completion request, read
//! `result.alternatives[0].message.text`, cap the length to Telegram's
//! caption limit. Failures bubble up to the caller, which logs and falls
//! back to canned content.

use anyhow::{bail, Context, Result};
use log::info;
use serde_json::{json, Value};
use std::time::Duration;

const COMPLETION_URL: &str = "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";

/// Telegram caps photo captions at 1024 characters.
pub const CAPTION_LIMIT: usize = 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str =
    "Ты — автор Telegram-канала про жалюзи и шторы. Пиши кратко, ярко, с пользой.";

pub struct PostGenerator {
    client: reqwest::Client,
    api_key: String,
    folder_id: String,
}

impl PostGenerator {
    pub fn new(api_key: String, folder_id: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            folder_id,
        })
    }

    /// Generate a channel post on the given topic.
    pub async fn generate_post(&self, topic: &str) -> Result<String> {
        info!("Requesting generated post for topic: {}", topic);

        let body = completion_request(&self.folder_id, topic);
        let response = self
            .client
            .post(COMPLETION_URL)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("Completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Completion API returned {}: {}", status, detail);
        }

        let value: Value = response
            .json()
            .await
            .context("Completion response is not valid JSON")?;
        let text = extract_completion_text(&value)?;
        Ok(truncate_caption(&text, CAPTION_LIMIT))
    }
}

/// Build the completion request body (wire format of the foundation-models
/// completion endpoint).
pub fn completion_request(folder_id: &str, topic: &str) -> Value {
    json!({
        "modelUri": format!("gpt://{folder_id}/yandexgpt/latest"),
        "completionOptions": {
            "stream": false,
            "temperature": 0.7,
            "maxTokens": 800
        },
        "messages": [
            { "role": "system", "text": SYSTEM_PROMPT },
            { "role": "user", "text": build_prompt(topic) }
        ]
    })
}

/// Marketing prompt for a single channel post.
pub fn build_prompt(topic: &str) -> String {
    format!(
        "Ты — маркетолог в компании по продаже жалюзи и штор.\n\
         Напиши пост для Telegram-канала на тему: \"{topic}\".\n\
         Стиль: дружелюбный, экспертный, с эмодзи и хэштегами.\n\
         Добавь призыв к действию: \"Заказать замер → @yourmanager\".\n\
         Объём: 3-5 строк."
    )
}

/// Pull the generated text out of a completion response.
pub fn extract_completion_text(value: &Value) -> Result<String> {
    let text = value
        .pointer("/result/alternatives/0/message/text")
        .and_then(Value::as_str)
        .context("Completion response has no result.alternatives[0].message.text")?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        bail!("Completion response text is empty");
    }
    Ok(trimmed.to_string())
}

/// Truncate to `limit` characters on a char boundary, appending an ellipsis
/// when anything was cut.
pub fn truncate_caption(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{cut}...")
}
