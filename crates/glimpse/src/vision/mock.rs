use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::VisionError;
use crate::vision::base::VisionBackend;

/// A mock vision backend with canned results
pub struct MockVision {
    text: String,
    objects: Vec<String>,
    labels: Vec<String>,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockVision {
    pub fn new(text: &str, objects: &[&str], labels: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            objects: objects.iter().map(|o| o.to_string()).collect(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing<S: Into<String>>(message: S) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::new("", &[], &[])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record<T>(&self, value: T) -> Result<T, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(VisionError::Api(message.clone())),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl VisionBackend for MockVision {
    async fn detect_text(&self, _image: &[u8]) -> Result<String, VisionError> {
        self.record(self.text.clone())
    }

    async fn localize_objects(&self, _image: &[u8]) -> Result<Vec<String>, VisionError> {
        self.record(self.objects.clone())
    }

    async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<String>, VisionError> {
        self.record(self.labels.clone())
    }
}
