use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageContent};
use crate::ai::ChatService;
use crate::models::PlantInfo;
use crate::{prompts, Error, Result};
use async_trait::async_trait;

const TEMPERATURE: f32 = 0.5;
const REPLY_MAX_TOKENS: u32 = 1000;
const PLANT_MAX_TOKENS: u32 = 1500;

pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
            model,
        }
    }

    fn request(&self, system: &str, user: String, max_tokens: u32) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system),
                ChatMessage::user(ChatMessageContent::Text(user)),
            ],
            temperature: Some(TEMPERATURE),
            max_tokens: Some(max_tokens),
        }
    }
}

super::impl_openai_options!(OpenAiChatClient);

/// Trimmed text of the first choice, provided it is an assistant turn.
fn assistant_reply(response: &ChatCompletionResponse) -> Result<String> {
    let message = &response
        .choices
        .first()
        .ok_or_else(|| Error::MalformedResponse("No response from OpenAI".to_string()))?
        .message;

    if message.role != "assistant" {
        return Err(Error::MalformedResponse(format!(
            "No reply from the assistant (role: {})",
            message.role
        )));
    }

    message
        .content
        .as_ref()
        .and_then(ChatMessageContent::text)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| Error::MalformedResponse("Assistant reply had no text".to_string()))
}

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn generate_reply(&self, diary_entry: &str) -> Result<String> {
        let request = self.request(
            prompts::REPLY_SYSTEM,
            diary_entry.to_string(),
            REPLY_MAX_TOKENS,
        );

        let response = self.http.chat_completion(&request).await?;
        tracing::debug!("Reply completion returned {} choice(s)", response.choices.len());

        assistant_reply(&response)
    }

    async fn describe_plant(&self, plant: &PlantInfo) -> Result<String> {
        let watering_cycle = plant.watering_cycle.to_string();
        let user = prompts::render(
            prompts::PLANT_PROFILE_USER,
            &[
                ("plant_type", plant.plant_type.as_str()),
                ("plant_name", plant.plant_name.as_str()),
                ("watering_cycle", watering_cycle.as_str()),
                ("start_date", plant.start_date.as_str()),
            ],
        );
        let request = self.request(prompts::PLANT_PROFILE_SYSTEM, user, PLANT_MAX_TOKENS);

        let response = self.http.chat_completion(&request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .and_then(ChatMessageContent::text)
            .ok_or_else(|| Error::MalformedResponse("No response from OpenAI".to_string()))
    }
}
