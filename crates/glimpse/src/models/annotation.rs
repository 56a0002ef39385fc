use serde::Serialize;

/// What the vision backend found in an attached image
///
/// Confidence scores from the backend are dropped; only names survive, in the order the
/// backend returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageAnnotation {
    pub ocr_text: String,
    pub detected_objects: Vec<String>,
    pub detected_labels: Vec<String>,
}

impl ImageAnnotation {
    pub fn new(ocr_text: String, detected_objects: Vec<String>, detected_labels: Vec<String>) -> Self {
        Self {
            ocr_text,
            detected_objects,
            detected_labels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ocr_text.trim().is_empty()
            && self.detected_objects.is_empty()
            && self.detected_labels.is_empty()
    }
}

/// Raw bytes of an image pulled out of a data URL
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}
