//! Interactive session state: the selected image, the request in flight,
//! the last result and the classification history.
//!
//! A [`Session`] owns its backend and is driven one action at a time. Every
//! action that talks to the service takes `&mut self`, so at most one request
//! is ever outstanding. What the user should see is derived from the state by
//! [`Session::view`].

use std::path::Path;
use std::time::Duration;

use skinsight_client::{ClassifierBackend, ClientError, ImageUpload};
use skinsight_core::ClassificationResult;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How long the classifying view stays up after a request completes.
pub const DEFAULT_LINGER: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no image selected")]
    NothingSelected,

    #[error("dismiss the result first: another")]
    ResultShown,

    #[error("a classification is already in progress")]
    Busy,

    #[error("no classification in progress")]
    NotStarted,

    #[error("could not load image: {0}")]
    Load(#[source] ClientError),

    #[error("error classifying the image: {0}")]
    Classify(#[source] ClientError),
}

/// Local description of a selected image, shown before it is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub file_name: String,
    pub mime: &'static str,
    pub dimensions: Option<(u32, u32)>,
    pub size_bytes: usize,
}

impl Preview {
    pub fn of(upload: &ImageUpload) -> Self {
        Self {
            file_name: upload.file_name.clone(),
            mime: upload.mime(),
            dimensions: upload.dimensions(),
            size_bytes: upload.size(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub upload: ImageUpload,
    pub preview: Preview,
}

/// What the user should currently see.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    /// Upload form; classify and clear are enabled only with a selection.
    Upload { selection: Option<&'a Preview> },
    /// A classification request is in flight.
    Classifying,
    /// Last result plus history, newest first.
    Result {
        result: &'a ClassificationResult,
        history: Vec<&'a ClassificationResult>,
    },
}

pub struct Session<B> {
    backend: B,
    linger: Duration,
    selection: Option<Selection>,
    awaiting: bool,
    result: Option<ClassificationResult>,
    history: Vec<ClassificationResult>,
}

impl<B: ClassifierBackend> Session<B> {
    pub fn new(backend: B, linger: Duration) -> Self {
        Self {
            backend,
            linger,
            selection: None,
            awaiting: false,
            result: None,
            history: Vec::new(),
        }
    }

    /// Initial history fetch.
    pub async fn load(&mut self) {
        self.refresh_history().await;
    }

    /// Select an image from disk, replacing any earlier selection.
    ///
    /// On failure the session is left exactly as it was.
    pub fn select(&mut self, path: &Path) -> Result<&Preview, SessionError> {
        self.ensure_upload_form()?;
        let upload = ImageUpload::from_path(path).map_err(SessionError::Load)?;
        self.select_upload(upload)
    }

    pub fn select_upload(&mut self, upload: ImageUpload) -> Result<&Preview, SessionError> {
        self.ensure_upload_form()?;
        let preview = Preview::of(&upload);
        debug!(file = %preview.file_name, mime = preview.mime, "image selected");
        let selection = self.selection.insert(Selection { upload, preview });
        Ok(&selection.preview)
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.ensure_upload_form()?;
        self.selection = None;
        Ok(())
    }

    /// Submit the selected image: [`begin_classify`](Self::begin_classify)
    /// followed by [`finish_classify`](Self::finish_classify).
    pub async fn classify(&mut self) -> Result<ClassificationResult, SessionError> {
        self.begin_classify()?;
        self.finish_classify().await
    }

    /// Mark the selection as submitted. Until
    /// [`finish_classify`](Self::finish_classify) returns, the session shows
    /// [`View::Classifying`] and the upload form actions are refused.
    pub fn begin_classify(&mut self) -> Result<(), SessionError> {
        self.ensure_upload_form()?;
        if self.selection.is_none() {
            return Err(SessionError::NothingSelected);
        }
        self.awaiting = true;
        Ok(())
    }

    /// Send the submitted image to the backend.
    ///
    /// Whatever the outcome, the selection is cleared afterwards and history
    /// is re-fetched. A failed request leaves no result and is returned as
    /// [`SessionError::Classify`].
    pub async fn finish_classify(&mut self) -> Result<ClassificationResult, SessionError> {
        if !self.awaiting {
            return Err(SessionError::NotStarted);
        }
        let Some(selection) = self.selection.as_ref() else {
            self.awaiting = false;
            return Err(SessionError::NothingSelected);
        };

        let outcome = match self.backend.classify(&selection.upload).await {
            Ok(result) => {
                info!(
                    file = %selection.upload.file_name,
                    label = result.predicted_label(),
                    "classification result"
                );
                if !result.is_normalised(0.01) {
                    debug!(sum = result.probability_sum(), "probabilities do not sum to 1");
                }
                self.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "error classifying the image");
                self.result = None;
                Err(SessionError::Classify(e))
            }
        };

        self.selection = None;
        if !self.linger.is_zero() {
            tokio::time::sleep(self.linger).await;
        }
        self.awaiting = false;
        self.refresh_history().await;
        outcome
    }

    /// Dismiss the current result and return to the upload form.
    pub async fn clear_result(&mut self) {
        if self.result.take().is_some() {
            self.refresh_history().await;
        }
    }

    /// Re-fetch history. A failed fetch keeps the previous list.
    pub async fn refresh_history(&mut self) {
        match self.backend.previous_classifications().await {
            Ok(history) => {
                debug!(count = history.len(), "previous classifications");
                self.history = history;
            }
            Err(e) => warn!(error = %e, "error loading previous classifications"),
        }
    }

    /// The upload form is only on screen when nothing is pending and no
    /// result is shown.
    fn ensure_upload_form(&self) -> Result<(), SessionError> {
        if self.awaiting {
            return Err(SessionError::Busy);
        }
        if self.result.is_some() {
            return Err(SessionError::ResultShown);
        }
        Ok(())
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// History in server order (oldest first).
    pub fn history(&self) -> &[ClassificationResult] {
        &self.history
    }

    pub fn view(&self) -> View<'_> {
        if self.is_awaiting() {
            return View::Classifying;
        }
        match &self.result {
            None => View::Upload {
                selection: self.selection.as_ref().map(|s| &s.preview),
            },
            Some(result) => View::Result {
                result,
                history: newest_first(&self.history),
            },
        }
    }
}

pub fn newest_first(history: &[ClassificationResult]) -> Vec<&ClassificationResult> {
    history.iter().rev().collect()
}
