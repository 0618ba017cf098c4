use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, MessagePart};
use crate::ai::{AnalysisMode, ImageAnalysisService};
use crate::{prompts, Error, Result};
use async_trait::async_trait;

pub struct OpenAiVisionClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiVisionClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
            model,
        }
    }
}

super::impl_openai_options!(OpenAiVisionClient);

fn analysis_messages(image_url: &str, mode: AnalysisMode) -> Vec<ChatMessage> {
    match mode {
        AnalysisMode::Guided => vec![ChatMessage::user(ChatMessageContent::Parts(vec![
            MessagePart::text(prompts::ANALYSIS_QUESTION),
            MessagePart::image(image_url),
        ]))],
        // Instruction follows the image.
        AnalysisMode::Instructed => vec![
            ChatMessage::user(ChatMessageContent::Parts(vec![MessagePart::image(
                image_url,
            )])),
            ChatMessage::system(prompts::HEALTH_SYSTEM),
        ],
    }
}

#[async_trait]
impl ImageAnalysisService for OpenAiVisionClient {
    async fn analyze_image(&self, image_url: &str, mode: AnalysisMode) -> Result<String> {
        tracing::debug!("Analyzing image {} ({:?})", image_url, mode);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: analysis_messages(image_url, mode),
            temperature: None,
            max_tokens: None,
        };

        let response = self.http.chat_completion(&request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .and_then(ChatMessageContent::text)
            .ok_or_else(|| Error::MalformedResponse("Failed to get analysis from OpenAI".to_string()))
    }
}
