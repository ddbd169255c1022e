use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;

use crate::config::S3Config;
use crate::error::{AppError, Result};

/// Build an AWS S3 client from the provided configuration.
pub async fn build_s3_client(config: &S3Config) -> Result<Client> {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "friend-recommendation-service",
    );

    let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .load()
        .await;

    let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
    if let Some(endpoint) = &config.endpoint {
        if !endpoint.trim().is_empty() {
            builder = builder.endpoint_url(endpoint);
        }
    }

    Ok(Client::from_conf(builder.build()))
}

/// Resolves avatar storage keys to browsable URLs.
#[async_trait]
pub trait AvatarResolver: Send + Sync {
    async fn resolve_url(&self, storage_key: &str) -> Result<String>;
}

/// S3-backed resolver issuing time-limited presigned GET URLs.
pub struct S3AvatarResolver {
    client: Client,
    bucket: String,
    url_ttl: Duration,
}

impl S3AvatarResolver {
    pub fn new(client: Client, config: &S3Config) -> Self {
        Self {
            client,
            bucket: config.bucket_name.clone(),
            url_ttl: Duration::from_secs(config.presigned_url_ttl_secs),
        }
    }
}

#[async_trait]
impl AvatarResolver for S3AvatarResolver {
    async fn resolve_url(&self, storage_key: &str) -> Result<String> {
        let presign_cfg = PresigningConfig::builder()
            .expires_in(self.url_ttl)
            .build()
            .map_err(|e| AppError::Storage(format!("Failed to create presign config: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .presigned(presign_cfg)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to generate presigned URL: {e}")))?;

        Ok(presigned.uri().to_string())
    }
}
