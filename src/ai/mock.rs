use super::{AnalysisMode, ChatService, ImageAnalysisService, ImageGenerationService};
use crate::models::PlantInfo;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted chat responses, cycled in order. An `Err` entry fails the call.
#[derive(Clone)]
pub struct MockChatClient {
    reply_responses: Arc<Mutex<Vec<std::result::Result<String, String>>>>,
    plant_responses: Arc<Mutex<Vec<std::result::Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            reply_responses: Arc::new(Mutex::new(Vec::new())),
            plant_responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_reply(self, reply: String) -> Self {
        self.reply_responses.lock().unwrap().push(Ok(reply));
        self
    }

    pub fn with_reply_error(self, message: String) -> Self {
        self.reply_responses.lock().unwrap().push(Err(message));
        self
    }

    pub fn with_plant_response(self, response: String) -> Self {
        self.plant_responses.lock().unwrap().push(Ok(response));
        self
    }

    pub fn with_plant_error(self, message: String) -> Self {
        self.plant_responses.lock().unwrap().push(Err(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn next(&self, responses: &Mutex<Vec<std::result::Result<String, String>>>) -> Option<Result<String>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let responses = responses.lock().unwrap();
        if responses.is_empty() {
            return None;
        }
        let index = (*count - 1) % responses.len();
        Some(responses[index].clone().map_err(Error::Upstream))
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn generate_reply(&self, diary_entry: &str) -> Result<String> {
        self.next(&self.reply_responses)
            .unwrap_or_else(|| Ok(format!("Thanks for sharing: {}", diary_entry.trim())))
    }

    async fn describe_plant(&self, plant: &PlantInfo) -> Result<String> {
        self.next(&self.plant_responses)
            .unwrap_or_else(|| Ok(format!("{} feels like an ISFP.", plant.plant_name)))
    }
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    image_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Prompts received so far, oldest first.
    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let count = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Upstream("Mock image generation failure".to_string()));
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            // Minimal JPEG header
            Ok(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0xFF, 0xD9])
        } else {
            Ok(responses[(count - 1) % responses.len()].clone())
        }
    }
}

#[derive(Clone)]
pub struct MockImageAnalysisClient {
    response: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<(String, AnalysisMode)>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageAnalysisClient {
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        *self.response.lock().unwrap() = Some(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_requests(&self) -> Vec<(String, AnalysisMode)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageAnalysisService for MockImageAnalysisClient {
    async fn analyze_image(&self, image_url: &str, mode: AnalysisMode) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((image_url.to_string(), mode));

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Upstream("Mock analysis failure".to_string()));
        }

        Ok(self
            .response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "The plant looks healthy.".to_string()))
    }
}
