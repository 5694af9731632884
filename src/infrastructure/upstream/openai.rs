use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    errors::UpstreamError,
    settings::AppConfig,
    use_cases::studio::CardGenerator,
};

use super::{http_client, truncate};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates Adaptive Cards JSON. \
Create visually appealing cards that follow best practices for layout and design.";
const TEMPERATURE: f32 = 0.7;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn user_prompt(description: &str) -> String {
    format!(
        "Create an Adaptive Card JSON for: {description}. Make it visually appealing and functional. \
Add structure input fields, buttons, and other interactive elements to make it user-friendly. \
If the card is a list, make the elements visually distinct and easy to navigate."
    )
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiCardGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCardGenerator {
    pub fn new(config: &AppConfig) -> Result<Self, UpstreamError> {
        Ok(OpenAiCardGenerator {
            client: http_client(config.upstream_timeout())?,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
        })
    }
}

/// Extracts the first choice's text, or the API's own error message.
fn parse_completion(status: u16, body: &str) -> Result<String, UpstreamError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| truncate(body));
        return Err(UpstreamError::Status { status, message });
    }

    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| UpstreamError::InvalidResponse("completion contained no message".into()))
}

#[async_trait]
impl CardGenerator for OpenAiCardGenerator {
    #[tracing::instrument(skip(self, description), fields(model = %self.model))]
    async fn complete(&self, description: &str) -> Result<String, UpstreamError> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::NotConfigured("OpenAI API key"));
        }

        let prompt = user_prompt(description);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            temperature: TEMPERATURE,
        };

        let response = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_completion(status, &body).inspect_err(|e| {
            tracing::warn!(status, error = %e, "Card generation request failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"type\":\"AdaptiveCard\"}"}}]}"#;
        assert_eq!(parse_completion(200, body).unwrap(), r#"{"type":"AdaptiveCard"}"#);
    }

    #[test]
    fn surfaces_api_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let err = parse_completion(401, body).unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 401, message } if message == "Incorrect API key provided"));
    }

    #[test]
    fn empty_choices_are_invalid() {
        assert!(matches!(
            parse_completion(200, r#"{"choices":[]}"#),
            Err(UpstreamError::InvalidResponse(_))
        ));
    }

    #[test]
    fn prompt_embeds_description() {
        assert!(user_prompt("an expense form").starts_with("Create an Adaptive Card JSON for: an expense form."));
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let generator = OpenAiCardGenerator::new(&AppConfig::default()).unwrap();
        assert!(matches!(
            generator.complete("anything").await,
            Err(UpstreamError::NotConfigured(_))
        ));
    }
}
