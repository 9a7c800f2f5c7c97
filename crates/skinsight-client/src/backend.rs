use async_trait::async_trait;
use skinsight_core::ClassificationResult;

use crate::error::ClientError;
use crate::upload::ImageUpload;

/// The operations the CLI needs from the classification service.
///
/// [`BackendClient`](crate::BackendClient) is the production implementation.
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    async fn ping(&self) -> Result<String, ClientError>;

    async fn classify(&self, upload: &ImageUpload) -> Result<ClassificationResult, ClientError>;

    async fn previous_classifications(&self) -> Result<Vec<ClassificationResult>, ClientError>;

    /// Bytes of the stored image behind `result`.
    async fn fetch_image(&self, result: &ClassificationResult) -> Result<Vec<u8>, ClientError>;
}
