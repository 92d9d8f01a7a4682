pub mod s3;

use async_trait::async_trait;
use derive_more::Display;
use mockall::automock;

/// Seam over the object store holding uploaded résumés and photos. Objects
/// live under a per-identity folder prefix (`{identityId}/{filename}`), which
/// is what teardown enumerates for cleanup.
#[automock]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// All object keys under `prefix`.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

#[derive(Debug, Display)]
pub enum StorageError {
    #[display("Upload failed: {_0}")]
    Upload(String),

    #[display("Listing failed: {_0}")]
    List(String),

    #[display("Removal failed: {_0}")]
    Remove(String),
}

/// Bucket names resolved from configuration once at startup.
#[derive(Debug, Clone)]
pub struct StorageBuckets {
    pub photos: String,
    pub resumes: String,
}
