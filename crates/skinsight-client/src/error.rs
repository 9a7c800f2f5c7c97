use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{context}: {source}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context}: server returned {status}: {message}")]
    Server {
        context: &'static str,
        status: u16,
        message: String,
    },

    #[error("{context}: JSON parse error: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file_name} is not a recognised image")]
    NotAnImage { file_name: String },
}

impl ClientError {
    /// HTTP status reported by the service, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Http { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
