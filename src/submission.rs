//! Submission contract with the analysis service
//!
//! The transport itself (HTTP, retries, timeouts) lives outside this crate
//! behind [`AnalysisService`]. A submission carries one required dataset and
//! an optional reference photo, and yields one payload or a transport error.

use crate::error::AnalysisError;
use crate::report::{ReportView, prepare};
use serde_json::Value;
use std::fmt;

/// Multipart field name for the tabular dataset
pub const DATASET_FIELD: &str = "dataset";
/// Multipart field name for the reference photo
pub const REFERENCE_IMAGE_FIELD: &str = "ref_image";

/// An uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// One analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    dataset: Artifact,
    reference_image: Option<Artifact>,
}

impl Submission {
    #[must_use]
    pub fn new(dataset: Artifact) -> Self {
        Self {
            dataset,
            reference_image: None,
        }
    }

    #[must_use]
    pub fn with_reference_image(mut self, image: Artifact) -> Self {
        self.reference_image = Some(image);
        self
    }

    #[must_use]
    pub fn dataset(&self) -> &Artifact {
        &self.dataset
    }

    #[must_use]
    pub fn reference_image(&self) -> Option<&Artifact> {
        self.reference_image.as_ref()
    }

    /// Multipart parts in upload order, keyed by form field name
    #[must_use]
    pub fn form_parts(&self) -> Vec<(&'static str, &Artifact)> {
        std::iter::once((DATASET_FIELD, &self.dataset))
            .chain(
                self.reference_image
                    .as_ref()
                    .map(|image| (REFERENCE_IMAGE_FIELD, image)),
            )
            .collect()
    }
}

/// Transport to the remote analysis service
///
/// Implementations guarantee at most one request in flight per caller.
pub trait AnalysisService {
    type Error: fmt::Display;

    /// Send a submission and return the raw payload
    ///
    /// # Errors
    ///
    /// Any transport-level failure (connection, timeout, undecodable body).
    fn submit(&self, submission: &Submission) -> Result<Value, Self::Error>;
}

/// Submit and turn whatever comes back into a view
///
/// A transport error is indistinguishable from a malformed payload to the
/// user: both produce the generic failure view.
pub fn analyze<S: AnalysisService>(service: &S, submission: &Submission) -> ReportView {
    match service.submit(submission) {
        Ok(payload) => prepare(&payload),
        Err(err) => {
            log::warn!(
                "Analysis request for {} failed: {err}",
                submission.dataset.file_name
            );
            ReportView::failure(&AnalysisError::MalformedPayload(format!(
                "transport failure: {err}"
            )))
        }
    }
}
