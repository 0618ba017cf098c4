use super::{public_url, BlobStore};
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region, RequestChecksumCalculation};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{types::ObjectCannedAcl, Client as S3Client};

/// Static HMAC key pair for the storage endpoint.
#[derive(Debug, Clone)]
pub struct StorageKeys {
    pub access_key_id: String,
    pub secret_access_key: String,
}

pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    /// Connect to an S3-compatible endpoint.
    ///
    /// Without explicit `keys`, credentials come from the default provider
    /// chain, which reads the shared credentials file.
    pub async fn new(
        keys: Option<StorageKeys>,
        endpoint: String,
        region: String,
        bucket: String,
        public_base_url: String,
    ) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .endpoint_url(endpoint);

        if let Some(keys) = keys {
            loader = loader.credentials_provider(Credentials::new(
                keys.access_key_id,
                keys.secret_access_key,
                None,
                None,
                "storage-hmac-keys",
            ));
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            // Bucket names like `app.appspot.com` break virtual-host addressing.
            .force_path_style(true)
            // GCS rejects the default flexible checksums.
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .build();

        Ok(Self {
            client: S3Client::from_conf(s3_config),
            bucket,
            public_base_url,
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload_public(&self, key: &str, data: &[u8], content_type: &str) -> Result<String> {
        let body = ByteStream::from(data.to_vec());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to upload {} to bucket {}: {}", key, self.bucket, e);
                Error::Downstream(format!("Failed to upload file: {}", e))
            })?;

        tracing::debug!("Uploaded {} ({} bytes)", key, data.len());
        public_url(&self.public_base_url, key)
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Downstream(format!("Failed to read file: {}", e)))?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Downstream(format!("Failed to read body: {}", e)))?;

        Ok(bytes.into_bytes().to_vec())
    }
}
