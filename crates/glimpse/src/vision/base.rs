use async_trait::async_trait;

use crate::errors::VisionError;
use crate::models::annotation::ImageAnnotation;

/// Base trait for image-annotation backends
///
/// Each operation is independent and takes the raw image bytes. Finding nothing is not an
/// error: it yields an empty string or an empty list.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Text found in the image (OCR)
    async fn detect_text(&self, image: &[u8]) -> Result<String, VisionError>;

    /// Names of the objects located in the image
    async fn localize_objects(&self, image: &[u8]) -> Result<Vec<String>, VisionError>;

    /// Labels describing the image as a whole
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>, VisionError>;
}

/// Run all three annotations concurrently and gather them
pub async fn annotate(
    backend: &dyn VisionBackend,
    image: &[u8],
) -> Result<ImageAnnotation, VisionError> {
    let (ocr_text, detected_objects, detected_labels) = tokio::try_join!(
        backend.detect_text(image),
        backend.localize_objects(image),
        backend.detect_labels(image),
    )?;

    Ok(ImageAnnotation::new(
        ocr_text,
        detected_objects,
        detected_labels,
    ))
}
