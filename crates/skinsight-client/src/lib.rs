//! Client layer: REST calls to the classification service and image uploads.

mod backend;
mod error;
pub mod http;
mod upload;

pub use backend::ClassifierBackend;
pub use error::ClientError;
pub use http::{BackendClient, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use upload::ImageUpload;
