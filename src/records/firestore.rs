use super::{AccessTokenSource, RecordStore};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
const IMAGE_URL_FIELD: &str = "imageUrl";

/// Firestore REST client limited to partial updates of existing documents.
pub struct FirestoreRecordStore {
    client: Client,
    tokens: Box<dyn AccessTokenSource>,
    base_url: String,
    project_id: String,
    collection: String,
}

impl FirestoreRecordStore {
    pub fn new(
        client: Client,
        tokens: Box<dyn AccessTokenSource>,
        project_id: String,
        collection: String,
    ) -> Self {
        Self {
            client,
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id,
            collection,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn document_url(&self, record_id: &str, field: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid Firestore URL '{}': {}", self.base_url, e)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Config(format!("Firestore URL '{}' cannot hold a path", self.base_url))
            })?;
            segments.pop_if_empty().extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                self.collection.as_str(),
                record_id,
            ]);
        }
        url.query_pairs_mut()
            .append_pair("updateMask.fieldPaths", field)
            // Never create a document that is not there yet.
            .append_pair("currentDocument.exists", "true");
        Ok(url)
    }
}

#[async_trait]
impl RecordStore for FirestoreRecordStore {
    async fn set_image_url(&self, record_id: &str, image_url: &str) -> Result<()> {
        let url = self.document_url(record_id, IMAGE_URL_FIELD)?;
        let token = self.tokens.access_token().await?;

        let body = serde_json::json!({
            "fields": { "imageUrl": { "stringValue": image_url } }
        });

        let response = self
            .client
            .patch(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Firestore: {}", e);
                Error::Downstream(format!("Failed to reach Firestore: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                "Firestore update of {}/{} failed (status {}): {}",
                self.collection,
                record_id,
                status,
                error_text
            );
            return Err(Error::Downstream(format!(
                "Firestore update failed (status {}): {}",
                status, error_text
            )));
        }

        tracing::info!("Updated {}/{} with image URL", self.collection, record_id);
        Ok(())
    }
}
