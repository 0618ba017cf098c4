use super::RecordStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory records: `record id -> imageUrl`. Unknown ids fail like a
/// missing document would.
#[derive(Clone)]
pub struct MockRecordStore {
    records: Arc<Mutex<HashMap<String, Option<String>>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_record(self, record_id: String) -> Self {
        self.records.lock().unwrap().insert(record_id, None);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn image_url(&self, record_id: &str) -> Option<String> {
        self.records.lock().unwrap().get(record_id).cloned().flatten()
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn set_image_url(&self, record_id: &str, image_url: &str) -> Result<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(Error::Downstream("Mock record update failure".to_string()));
        }

        let mut records = self.records.lock().unwrap();
        match records.get_mut(record_id) {
            Some(slot) => {
                *slot = Some(image_url.to_string());
                Ok(())
            }
            None => Err(Error::Downstream(format!("No document to update: {}", record_id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_updates_existing_record() {
        let store = MockRecordStore::new().with_record("010".to_string());

        store.set_image_url("010", "https://x/y.jpg").await.unwrap();
        assert_eq!(store.image_url("010").as_deref(), Some("https://x/y.jpg"));
    }

    #[tokio::test]
    async fn test_never_creates_records() {
        let store = MockRecordStore::new();

        assert!(store.set_image_url("010", "https://x/y.jpg").await.is_err());
        assert_eq!(store.image_url("010"), None);
    }
}
