use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use super::base::VisionBackend;
use crate::auth::TokenSource;
use crate::errors::VisionError;
use crate::providers::utils::{error_body_message, error_message};

pub const VISION_HOST: &str = "https://vision.googleapis.com";
pub const VISION_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GoogleVisionConfig {
    pub host: String,
    pub timeout_secs: u64,
}

impl Default for GoogleVisionConfig {
    fn default() -> Self {
        Self {
            host: VISION_HOST.to_string(),
            timeout_secs: VISION_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Feature {
    TextDetection,
    ObjectLocalization,
    LabelDetection,
}

impl Feature {
    fn as_str(&self) -> &'static str {
        match self {
            Feature::TextDetection => "TEXT_DETECTION",
            Feature::ObjectLocalization => "OBJECT_LOCALIZATION",
            Feature::LabelDetection => "LABEL_DETECTION",
        }
    }
}

/// Client for the Cloud Vision `images:annotate` REST endpoint
pub struct GoogleVisionClient {
    client: Client,
    config: GoogleVisionConfig,
    auth: Box<dyn TokenSource>,
}

impl GoogleVisionClient {
    pub fn new(config: GoogleVisionConfig, auth: Box<dyn TokenSource>) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            auth,
        })
    }

    /// Annotate one image with one feature, returning that image's entry of `responses`
    async fn annotate_feature(&self, image: &[u8], feature: Feature) -> Result<Value, VisionError> {
        let url = format!(
            "{}/v1/images:annotate",
            self.config.host.trim_end_matches('/')
        );
        let payload = json!({
            "requests": [{
                "image": { "content": STANDARD.encode(image) },
                "features": [{ "type": feature.as_str() }]
            }]
        });

        let token = self.auth.access_token().await?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::RequestFailed {
                status,
                body: error_body_message(&body),
            });
        }

        let body: Value = response.json().await?;
        let annotated = body
            .get("responses")
            .and_then(|r| r.get(0))
            .cloned()
            .ok_or_else(|| VisionError::MalformedResponse("no responses in body".to_string()))?;

        if let Some(error) = annotated.get("error") {
            return Err(VisionError::Api(error_message(error)));
        }

        tracing::debug!(feature = feature.as_str(), "image annotated");
        Ok(annotated)
    }
}

/// The first text annotation holds the whole detected text block
pub fn text_from_response(response: &Value) -> String {
    response
        .pointer("/textAnnotations/0/description")
        .or_else(|| response.pointer("/fullTextAnnotation/text"))
        .and_then(|t| t.as_str())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

pub fn object_names_from_response(response: &Value) -> Vec<String> {
    names_from(response, "localizedObjectAnnotations", "name")
}

pub fn labels_from_response(response: &Value) -> Vec<String> {
    names_from(response, "labelAnnotations", "description")
}

fn names_from(response: &Value, list: &str, field: &str) -> Vec<String> {
    response
        .get(list)
        .and_then(|items| items.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(field).and_then(|n| n.as_str()))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl VisionBackend for GoogleVisionClient {
    async fn detect_text(&self, image: &[u8]) -> Result<String, VisionError> {
        let response = self.annotate_feature(image, Feature::TextDetection).await?;
        Ok(text_from_response(&response))
    }

    async fn localize_objects(&self, image: &[u8]) -> Result<Vec<String>, VisionError> {
        let response = self
            .annotate_feature(image, Feature::ObjectLocalization)
            .await?;
        Ok(object_names_from_response(&response))
    }

    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>, VisionError> {
        let response = self.annotate_feature(image, Feature::LabelDetection).await?;
        Ok(labels_from_response(&response))
    }
}
