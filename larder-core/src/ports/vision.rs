//! Vision provider port
//!
//! Defines the interface for image-based ingredient recognition. The
//! RecognitionService uses this trait without knowing whether the backend
//! is the real vision API or the deterministic mock.

use thiserror::Error;

use crate::domain::RecognizedItem;

/// Errors a vision provider can produce
///
/// The taxonomy matters: the recognition service falls back to a cached
/// result on `Timeout`, `Api` and `NonJsonResponse`, but never on
/// `MissingApiKey` (a configuration problem the user has to fix).
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("vision request timed out: {0}")]
    Timeout(String),

    #[error("vision request failed: {0}")]
    Api(String),

    #[error("model did not return valid JSON: {0}")]
    NonJsonResponse(String),
}

/// Vision provider result type
pub type VisionResult<T> = std::result::Result<T, VisionError>;

/// Image-based ingredient recognition provider
pub trait VisionProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock")
    fn name(&self) -> &str;

    /// Recognize ingredients in an image
    ///
    /// # Arguments
    /// * `image_bytes` - Raw image data
    /// * `mime_type` - MIME type of the image (e.g., "image/jpeg")
    fn recognize(&self, image_bytes: &[u8], mime_type: &str) -> VisionResult<Vec<RecognizedItem>>;
}
