//! Document database access
//!
//! The relay only ever patches one field of an existing result document;
//! documents are created elsewhere.

pub mod firestore;
pub mod mock;
pub mod token;

pub use firestore::FirestoreRecordStore;
pub use mock::MockRecordStore;
pub use token::{AccessTokenSource, ServiceAccountTokenSource, StaticTokenSource};

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Set `imageUrl` on the existing record `record_id`.
    async fn set_image_url(&self, record_id: &str, image_url: &str) -> Result<()>;
}
