use super::{ObjectStore, PutRequest, UploadBody};
use crate::config::AppConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

// Uploaded artifacts are immutable, so let CDNs cache them for 2 years.
const CACHE_CONTROL: &str = "max-age=63072000";

pub struct S3ObjectStore {
    endpoint: Option<String>,
    access_key: String,
    secret_key: String,
    default_region: String,
    // One client per region, built lazily.
    clients: Mutex<HashMap<String, Client>>,
}

impl S3ObjectStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            endpoint: config.s3_endpoint.clone(),
            access_key: config.s3_access_key.clone(),
            secret_key: config.s3_secret_key.clone(),
            default_region: config.s3_region.clone(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn client_for(&self, region: &str) -> Client {
        // The map holds only fully built clients, so a poisoned lock is
        // still safe to read through.
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = clients.get(region) {
            return client.clone();
        }

        let credentials =
            Credentials::new(&self.access_key, &self.secret_key, None, None, "static");

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &self.endpoint {
            // Path-style addressing is required for MinIO-type endpoints.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());
        info!(region, "connected to S3");

        clients.insert(region.to_string(), client.clone());
        client
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, request: PutRequest) -> Result<()> {
        let client = self.client_for(&request.region);

        let body = match request.body {
            UploadBody::Bytes(bytes) => ByteStream::from(bytes),
            UploadBody::File(path) => ByteStream::from_path(&path)
                .await
                .with_context(|| format!("failed to open upload body {}", path.display()))?,
        };

        let mut put = client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .acl(ObjectCannedAcl::from(request.acl.as_str()))
            .content_type(&request.content_type)
            .cache_control(CACHE_CONTROL)
            .body(body);

        if let Some(meta) = &request.metadata {
            put = put
                .metadata("width", meta.width.to_string())
                .metadata("height", meta.height.to_string());
            if let Some(duration) = meta.duration {
                put = put.metadata("duration", duration.to_string());
            }
        }

        put.send()
            .await
            .with_context(|| format!("failed to upload s3://{}/{}", request.bucket, request.key))?;

        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str, destination: &Path) -> Result<()> {
        let region = self.default_region.clone();
        let client = self.client_for(&region);

        let object = client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("failed to fetch s3://{}/{}", bucket, key))?;

        let data = object
            .body
            .collect()
            .await
            .with_context(|| format!("failed to read body of s3://{}/{}", bucket, key))?
            .into_bytes();

        tokio::fs::write(destination, &data)
            .await
            .with_context(|| format!("failed to write {}", destination.display()))?;

        Ok(())
    }
}
