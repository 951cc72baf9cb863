//! Minimal OpenAI-compatible client for game generation.
//!
//! We only call chat.completions and request a JSON object. Calls are
//! instrumented and log model name, latency and token usage (not contents).
//!
//! NOTE: We never log the API key, and source text is only logged truncated.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::GameMode;
use crate::util::{fill_template, strip_code_fences, trunc_for_log};

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

/// One generation request, already clamped to the session's limits.
#[derive(Debug)]
pub struct GenerationRequest<'a> {
  pub mode: GameMode,
  pub count: usize,
  pub focus: Option<&'a str>,
  pub text: &'a str,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    // Whole-document generation is slow; allow more than a chat turn.
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(90))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// JSON-object chat completion. Generic over the target type T.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_json<T: for<'a> Deserialize<'a>>(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<T, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "studygame/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or(body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();

    serde_json::from_str::<T>(&strip_code_fences(&text)).map_err(|e| format!("JSON parse error: {}", e))
  }

  /// Ask the model for a game payload. The result is raw JSON; callers sanitize it.
  #[instrument(level = "info", skip(self, prompts, req), fields(mode = %req.mode, count = req.count, text_len = req.text.len()))]
  pub async fn generate_payload(&self, prompts: &Prompts, req: &GenerationRequest<'_>) -> Result<Value, String> {
    let count = req.count.to_string();
    let focus = match req.focus {
      Some(f) => fill_template(&prompts.focus_template, &[("focus", f)]),
      None => prompts.focus_default.clone(),
    };
    let user = fill_template(
      &prompts.generate_user_template,
      &[
        ("mode", req.mode.as_str()),
        ("count", &count),
        ("focus", &focus),
        ("format", prompts.formats.for_mode(req.mode)),
        ("text", req.text),
      ],
    );

    let start = Instant::now();
    let result = self.chat_json::<Value>(&self.model, &prompts.generate_system, &user, 0.7).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(_) => info!(?elapsed, "Game payload received"),
      Err(e) => error!(?elapsed, error = %e, source_preview = %trunc_for_log(req.text, 80), "Game generation failed"),
    }
    result
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_body_message_is_extracted() {
    let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Invalid API key"));
    assert_eq!(extract_openai_error("<html>502</html>"), None);
  }

  #[test]
  fn completion_response_tolerates_missing_usage() {
    let body = r#"{"choices": [{"message": {"content": "{\"items\": []}"}}]}"#;
    let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
    assert!(parsed.usage.is_none());
    assert_eq!(parsed.choices[0].message.content.as_deref(), Some("{\"items\": []}"));
  }
}
