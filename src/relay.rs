//! Relay operations: one linear attempt per request, no retries.

use crate::ai::{
    AnalysisMode, ChatService, ImageAnalysisService, ImageGenerationService, OpenAiChatClient,
    OpenAiImageClient, OpenAiVisionClient,
};
use crate::models::{Config, GenerateImageRequest, PlantInfo};
use crate::personality::extract_personality_code;
use crate::records::token::{ServiceAccountKey, DATASTORE_SCOPE};
use crate::records::{FirestoreRecordStore, RecordStore, ServiceAccountTokenSource};
use crate::storage::s3::StorageKeys;
use crate::storage::{image_object_key, BlobStore, S3BlobStore};
use crate::{prompts, Error, Result};
use chrono::Utc;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Forwards client requests to the AI vendor, blob store and record store.
pub struct Relay {
    chat: Box<dyn ChatService>,
    image_gen: Box<dyn ImageGenerationService>,
    vision: Box<dyn ImageAnalysisService>,
    storage: Box<dyn BlobStore>,
    records: Box<dyn RecordStore>,
}

/// Injectable service bundle used to construct [`Relay`] in tests/harnesses.
pub struct RelayServices {
    pub chat: Box<dyn ChatService>,
    pub image_gen: Box<dyn ImageGenerationService>,
    pub vision: Box<dyn ImageAnalysisService>,
    pub storage: Box<dyn BlobStore>,
    pub records: Box<dyn RecordStore>,
}

impl Relay {
    /// Build a relay from concrete service dependencies.
    pub fn with_services(services: RelayServices) -> Self {
        Self {
            chat: services.chat,
            image_gen: services.image_gen,
            vision: services.vision,
            storage: services.storage,
            records: services.records,
        }
    }

    /// Construct the production relay from configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        // Reuse one HTTP connection pool across vendor clients.
        let http_client = reqwest::Client::new();
        let timeout = config.http_timeout_secs.map(Duration::from_secs);

        info!(
            "AI vendor at {} (image: {}, chat: {}, vision: {})",
            config.openai_base_url, config.image_model, config.chat_model, config.vision_model
        );

        let chat = OpenAiChatClient::new_with_client(
            config.openai_api_key.clone(),
            config.chat_model.clone(),
            http_client.clone(),
        )
        .with_base_url(config.openai_base_url.clone())
        .with_timeout(timeout);

        let image_gen = OpenAiImageClient::new_with_client(
            config.openai_api_key.clone(),
            config.image_model.clone(),
            http_client.clone(),
        )
        .with_base_url(config.openai_base_url.clone())
        .with_timeout(timeout);

        let vision = OpenAiVisionClient::new_with_client(
            config.openai_api_key.clone(),
            config.vision_model.clone(),
            http_client.clone(),
        )
        .with_base_url(config.openai_base_url.clone())
        .with_timeout(timeout);

        let keys = match (
            &config.storage_access_key_id,
            &config.storage_secret_access_key,
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StorageKeys {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
            }),
            (None, None) => {
                info!("No storage keys in environment, using shared credentials file");
                None
            }
            _ => {
                return Err(Error::Config(
                    "STORAGE_ACCESS_KEY_ID and STORAGE_SECRET_ACCESS_KEY must be set together"
                        .to_string(),
                ))
            }
        };

        let storage = S3BlobStore::new(
            keys,
            config.storage_endpoint.clone(),
            config.storage_region.clone(),
            config.storage_bucket.clone(),
            config.storage_public_base_url.clone(),
        )
        .await?;
        info!(
            "Blob storage: bucket {} via {}",
            config.storage_bucket, config.storage_endpoint
        );

        let key = ServiceAccountKey::from_file(Path::new(&config.firestore_credentials_file))?;
        let project_id = config
            .firestore_project_id
            .clone()
            .or_else(|| key.project_id.clone())
            .ok_or_else(|| {
                Error::Config(
                    "FIRESTORE_PROJECT_ID not set and credentials file has no project_id"
                        .to_string(),
                )
            })?;
        let tokens = ServiceAccountTokenSource::new(key, DATASTORE_SCOPE, http_client.clone())?;
        info!(
            "Records: project {} collection {}",
            project_id, config.records_collection
        );

        let records = FirestoreRecordStore::new(
            http_client,
            Box::new(tokens),
            project_id,
            config.records_collection.clone(),
        )
        .with_base_url(config.firestore_base_url.clone());

        Ok(Self::with_services(RelayServices {
            chat: Box::new(chat),
            image_gen: Box::new(image_gen),
            vision: Box::new(vision),
            storage: Box::new(storage),
            records: Box::new(records),
        }))
    }

    /// Generate an abstract pastel image, re-host it and record its URL on
    /// the caller's result document. Returns the public URL.
    ///
    /// A record update failure leaves the uploaded object in place.
    pub async fn generate_image(&self, request: &GenerateImageRequest) -> Result<String> {
        let prompt = prompts::render(
            prompts::IMAGE_GENERATION,
            &[
                ("colors", request.result.as_str()),
                ("mood", request.mood_answer.as_str()),
            ],
        );

        let image_data = self.image_gen.generate_image(&prompt).await?;
        info!("Generated image ({} bytes)", image_data.len());

        let key = image_object_key(&request.result, Utc::now().timestamp_millis());
        let public_url = self
            .storage
            .upload_public(&key, &image_data, "image/jpeg")
            .await?;
        info!("Uploaded {} -> {}", key, public_url);

        if let Err(e) = self
            .records
            .set_image_url(&request.phone_number, &public_url)
            .await
        {
            warn!(
                "Record {} not updated; object {} left in storage: {}",
                request.phone_number, key, e
            );
            return Err(e);
        }

        Ok(public_url)
    }

    pub async fn generate_reply(&self, diary_entry: &str) -> Result<String> {
        let reply = self.chat.generate_reply(diary_entry).await?;
        info!("Generated diary reply ({} chars)", reply.chars().count());
        Ok(reply)
    }

    /// Four-letter personality code for a plant, always `[IE][NS][TF][JP]`.
    pub async fn generate_plant_profile(&self, plant: &PlantInfo) -> Result<String> {
        let text = self.chat.describe_plant(plant).await?;

        let code = extract_personality_code(&text).ok_or_else(|| {
            Error::Extraction(format!("No personality code in response: {}", text))
        })?;
        info!("Plant {} profiled as {}", plant.plant_name, code);
        Ok(code.to_string())
    }

    pub async fn analyze_image(&self, image_url: &str, mode: AnalysisMode) -> Result<String> {
        self.vision.analyze_image(image_url, mode).await
    }
}
