use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Synthesizes a short listing description from its name. Backed by an
/// external text-generation service in production and by a template
/// otherwise; callers must treat any failure as non-fatal.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, location_name: &str) -> anyhow::Result<String>;
}

/// Fixed description used whenever synthesis is unavailable or fails.
pub fn fallback_description(location_name: &str) -> String {
    format!("{location_name} is a point of interest that offers unique experiences for visitors.")
}

/// Synthesize a description, falling back to the template on any error.
/// Never fails the surrounding operation.
pub async fn synthesize(describer: &dyn DescriptionGenerator, location_name: &str) -> String {
    match describer.generate(location_name).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, name = %location_name, "description synthesis failed, using fallback");
            fallback_description(location_name)
        }
    }
}

/// Template-only generator used when no API key is configured (and in
/// tests). Produces the richer static description.
pub struct TemplateDescriber;

#[async_trait]
impl DescriptionGenerator for TemplateDescriber {
    async fn generate(&self, location_name: &str) -> anyhow::Result<String> {
        Ok(format!(
            "{location_name} is a point of interest that offers unique experiences for visitors. \
             This location provides various amenities and services for guests to enjoy."
        ))
    }
}

/// OpenAI chat-completions backed generator.
pub struct OpenAiDescriber {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiDescriber {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl DescriptionGenerator for OpenAiDescriber {
    async fn generate(&self, location_name: &str) -> anyhow::Result<String> {
        let prompt = format!(
            "Generate a brief, professional description (max 100 words) for a location named \
             \"{location_name}\". Focus on what type of place it might be and what visitors can expect."
        );
        let body = json!({
            "model": "gpt-3.5-turbo",
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": 150,
            "temperature": 0.7,
        });

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty());
        content.ok_or_else(|| anyhow::anyhow!("empty completion"))
    }
}
