use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client as S3Client;

use crate::settings::AppConfig;
use super::{ObjectStorage, StorageError};

#[derive(Clone)]
pub struct S3ObjectStorage {
    client: S3Client,
    region: String,
    public_url_base: Option<String>,
}

impl S3ObjectStorage {
    pub async fn from_config(config: &AppConfig) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.s3_endpoint {
            // S3-compatible stores generally need path-style addressing.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let public_url_base = config
            .s3_public_url_base
            .clone()
            .or_else(|| config.s3_endpoint.clone());

        S3ObjectStorage {
            client: S3Client::from_conf(builder.build()),
            region: config.s3_region.clone(),
            public_url_base,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket).prefix(prefix);
            if let Some(token) = &continuation {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StorageError::List(e.to_string()))?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match response.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }

        let objects = paths
            .iter()
            .map(|path| {
                ObjectIdentifier::builder()
                    .key(path)
                    .build()
                    .map_err(|e| StorageError::Remove(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| StorageError::Remove(e.to_string()))?;

        self.client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StorageError::Remove(e.to_string()))?;

        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        match &self.public_url_base {
            Some(base) => format!("{}/{}/{}", base.trim_end_matches('/'), bucket, path),
            None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, self.region, path),
        }
    }
}
