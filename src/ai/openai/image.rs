use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::ImageGenerationService;
use crate::{Error, Result};
use async_trait::async_trait;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
            model,
        }
    }

    /// Fetch the vendor's temporary image URL.
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to download generated image: {}", e);
            Error::Downstream(format!("Failed to download generated image: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Generated image download failed (status {})", status);
            return Err(Error::Downstream(format!(
                "Generated image download failed (status {})",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Downstream(format!("Failed to read generated image: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

super::impl_openai_options!(OpenAiImageClient);

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        };

        let response: ImageGenerationResponse = self
            .http
            .post(super::IMAGE_GENERATIONS_PATH, &request)
            .await?;

        let image_data = response
            .data
            .first()
            .ok_or_else(|| Error::MalformedResponse("No image data in OpenAI response".to_string()))?;

        let image_bytes = if let Some(url) = &image_data.url {
            self.download(url).await?
        } else if let Some(b64_json) = &image_data.b64_json {
            use base64::Engine as _;
            base64::engine::general_purpose::STANDARD
                .decode(b64_json)
                .map_err(|e| {
                    Error::MalformedResponse(format!("Failed to decode base64 image: {}", e))
                })?
        } else {
            return Err(Error::MalformedResponse(
                "No image data (neither URL nor base64) in response".to_string(),
            ));
        };

        tracing::debug!("Generated image is {} bytes", image_bytes.len());
        Ok(image_bytes)
    }
}
