use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{object_key, BlobError, BlobStore};
use crate::models::sound::{AudioUpload, SoundKind};

const DEFAULT_REGION: &str = "us-east-1";

/// Blob store backed by an S3 bucket. Region and credentials come from the
/// standard AWS environment/profile chain.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    base_url: String,
}

impl S3BlobStore {
    pub async fn connect(bucket: &str, public_url: Option<&str>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let region = config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let client = Client::new(&config);

        let base_url = match public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => public_base_url(bucket, &region),
        };
        tracing::info!("object storage: s3 bucket {bucket} ({region})");

        Self {
            client,
            bucket: bucket.to_string(),
            base_url,
        }
    }

    /// Probe the bucket once so misconfiguration shows up in the startup log.
    pub async fn check_bucket(&self) -> bool {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                tracing::info!("s3 bucket {} is reachable", self.bucket);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "s3 bucket {} is not reachable: {}",
                    self.bucket,
                    DisplayErrorContext(&e)
                );
                false
            }
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        kind: SoundKind,
        key: &str,
        audio: &AudioUpload,
    ) -> Result<String, BlobError> {
        let full_key = object_key(kind, key);
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .body(ByteStream::from(audio.bytes.clone()));
        if let Some(ref content_type) = audio.content_type {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|e| {
            BlobError::Backend(format!(
                "unable to upload {key} to {}: {}",
                self.bucket,
                DisplayErrorContext(&e)
            ))
        })?;

        let url = format!("{}/{full_key}", self.base_url);
        tracing::info!("uploaded {key} to {url}");
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let key = key_from_url(&self.base_url, url)?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                BlobError::Backend(format!(
                    "unable to delete {key} from {}: {}",
                    self.bucket,
                    DisplayErrorContext(&e)
                ))
            })?;

        tracing::info!("deleted {key} from bucket {}", self.bucket);
        Ok(())
    }
}

/// Virtual-hosted-style URL prefix of a bucket.
pub fn public_base_url(bucket: &str, region: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com")
}

/// Recover the object key from a URL produced by `upload`.
pub fn key_from_url<'a>(base_url: &str, url: &'a str) -> Result<&'a str, BlobError> {
    url.strip_prefix(base_url)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
        .ok_or_else(|| BlobError::MalformedUrl(url.to_string()))
}
