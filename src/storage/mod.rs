//! Blob storage for re-hosted images
//!
//! Generated images live at a vendor's temporary URL; they are copied into
//! an S3-compatible bucket (Firebase/GCS through its interoperability
//! endpoint) and served from there under a public URL.

pub mod mock;
pub mod s3;

pub use mock::MockBlobStore;
pub use s3::S3BlobStore;

use crate::{Error, Result};
use async_trait::async_trait;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, readable by anyone. Returns the public URL.
    async fn upload_public(&self, key: &str, data: &[u8], content_type: &str) -> Result<String>;
    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}

/// Public URL of `key` under `base_url`, each key segment percent-encoded.
pub fn public_url(base_url: &str, key: &str) -> Result<String> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|e| Error::Config(format!("Invalid public base URL '{}': {}", base_url, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| Error::Config(format!("Public base URL '{}' cannot hold a path", base_url)))?;
        segments.pop_if_empty().extend(key.split('/'));
    }
    Ok(url.to_string())
}

/// Object key for a generated image: `images/<label>-<unix millis>.jpg`.
pub fn image_object_key(label: &str, unix_millis: i64) -> String {
    format!("images/{}-{}.jpg", label, unix_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_object_key() {
        assert_eq!(
            image_object_key("lavender", 1_704_067_200_000),
            "images/lavender-1704067200000.jpg"
        );
    }

    #[test]
    fn test_distinct_labels_never_share_a_key() {
        assert_ne!(image_object_key("red", 42), image_object_key("blue", 42));
    }

    #[test]
    fn test_public_url_appends_key() {
        assert_eq!(
            public_url("https://storage.googleapis.com/flowe.appspot.com", "images/a-1.jpg").unwrap(),
            "https://storage.googleapis.com/flowe.appspot.com/images/a-1.jpg"
        );
    }

    #[test]
    fn test_public_url_handles_trailing_slash() {
        assert_eq!(
            public_url("https://cdn.example/", "images/a-1.jpg").unwrap(),
            "https://cdn.example/images/a-1.jpg"
        );
    }

    #[test]
    fn test_public_url_encodes_segments() {
        assert_eq!(
            public_url("https://cdn.example/bucket", "images/pink and blue-7.jpg").unwrap(),
            "https://cdn.example/bucket/images/pink%20and%20blue-7.jpg"
        );
    }

    #[test]
    fn test_public_url_rejects_garbage_base() {
        assert!(matches!(
            public_url("not a url", "k"),
            Err(Error::Config(_))
        ));
    }
}
