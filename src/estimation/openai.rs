//! OpenAI-compatible Chat Completions client using structured outputs.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::prompt::{image_prompt, text_prompt, SYSTEM_PROMPT};
use super::schema::{response_schema, SCHEMA_NAME};
use super::{EstimationError, EstimationGateway, EstimationResult, MealImage, ProfileContext};
use crate::config::InferenceConfig;

const INITIAL_BACKOFF_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    refusal: Option<String>,
}

pub struct OpenAiGateway {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_retries: u32,
}

impl OpenAiGateway {
    pub fn new(config: &InferenceConfig) -> Result<Self, EstimationError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    fn request_body(&self, user_content: Value) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_content }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": response_schema()
                }
            }
        })
    }

    async fn send_once(&self, body: &Value) -> Result<EstimationResult, EstimationError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(EstimationError::RateLimited);
        }
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EstimationError::Api { status, message });
        }

        let parsed: ChatResponse = response.json().await?;
        parse_completion(parsed)
    }

    async fn complete(&self, body: Value) -> Result<EstimationResult, EstimationError> {
        let mut attempt = 0;
        loop {
            match self.send_once(&body).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt);
                    attempt += 1;
                    warn!(attempt, backoff_ms = backoff, error = %e, "inference failed, retrying");
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn parse_completion(parsed: ChatResponse) -> Result<EstimationResult, EstimationError> {
    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or(EstimationError::EmptyResponse)?;
    if let Some(refusal) = message.refusal {
        return Err(EstimationError::Refused(refusal));
    }
    let content = message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(EstimationError::EmptyResponse)?;
    EstimationResult::from_model_output(&content)
}

fn data_url(image: &MealImage) -> String {
    format!("data:{};base64,{}", image.content_type, STANDARD.encode(&image.body))
}

#[async_trait]
impl EstimationGateway for OpenAiGateway {
    #[instrument(skip(self, text, ctx), fields(model = %self.model))]
    async fn estimate_from_text(
        &self,
        text: &str,
        ctx: Option<&ProfileContext>,
    ) -> Result<EstimationResult, EstimationError> {
        let body = self.request_body(json!(text_prompt(text, ctx)));
        let result = self.complete(body).await?;
        debug!(items = result.items.len(), calories = result.total.calories, "text estimated");
        Ok(result)
    }

    #[instrument(skip(self, image, caption, ctx), fields(model = %self.model, bytes = image.body.len()))]
    async fn estimate_from_image(
        &self,
        image: &MealImage,
        caption: Option<&str>,
        ctx: Option<&ProfileContext>,
    ) -> Result<EstimationResult, EstimationError> {
        let content = json!([
            { "type": "text", "text": image_prompt(caption, ctx) },
            { "type": "image_url", "image_url": { "url": data_url(image) } }
        ]);
        let result = self.complete(self.request_body(content)).await?;
        debug!(items = result.items.len(), calories = result.total.calories, "photo estimated");
        Ok(result)
    }
}
