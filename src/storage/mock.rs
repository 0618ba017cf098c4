use super::{public_url, BlobStore};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory blob store keyed by object name.
#[derive(Clone)]
pub struct MockBlobStore {
    files: Arc<Mutex<HashMap<String, StoredBlob>>>,
    base_url: String,
    upload_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            base_url: "https://mock-storage.example.com/bucket".to_string(),
            upload_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    pub fn get_files(&self) -> HashMap<String, StoredBlob> {
        self.files.lock().unwrap().clone()
    }
}

impl Default for MockBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn upload_public(&self, key: &str, data: &[u8], content_type: &str) -> Result<String> {
        if *self.should_fail.lock().unwrap() {
            return Err(Error::Downstream("Mock upload failure".to_string()));
        }

        *self.upload_count.lock().unwrap() += 1;
        self.files.lock().unwrap().insert(
            key.to_string(),
            StoredBlob {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        public_url(&self.base_url, key)
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(key)
            .map(|blob| blob.data.clone())
            .ok_or_else(|| Error::Downstream(format!("File not found: {}", key)))
    }
}
