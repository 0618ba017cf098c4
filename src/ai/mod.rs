//! AI vendor integration
//!
//! Each capability the relay needs from the generative-AI vendor sits
//! behind its own trait so handlers can run against mocks in tests.

pub mod mock;
pub mod openai;

pub use mock::{MockChatClient, MockImageAnalysisClient, MockImageGenerationClient};
pub use openai::{OpenAiChatClient, OpenAiImageClient, OpenAiVisionClient};

use crate::models::PlantInfo;
use crate::Result;
use async_trait::async_trait;

/// Produces image bytes for a prompt.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}

/// Text chat completions.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Reply to a diary entry. Returns the trimmed assistant message.
    async fn generate_reply(&self, diary_entry: &str) -> Result<String>;

    /// Ask for a personality code describing a plant. Returns the raw
    /// model text; callers extract the code themselves.
    async fn describe_plant(&self, plant: &PlantInfo) -> Result<String>;
}

/// How an image is presented to the multimodal model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Image sent alongside a fixed question in the same user turn.
    Guided,
    /// Image sent alone, followed by a system instruction.
    Instructed,
}

/// Multimodal analysis of an image reachable by URL.
#[async_trait]
pub trait ImageAnalysisService: Send + Sync {
    async fn analyze_image(&self, image_url: &str, mode: AnalysisMode) -> Result<String>;
}
