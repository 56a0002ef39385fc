use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::data_url::decode_data_url;
use crate::errors::{AskError, AskResult};
use crate::models::annotation::DecodedImage;
use crate::models::ask::{AskRequest, AskResponse};
use crate::prompt::{compose_prompt, degraded_prompt};
use crate::providers::base::Provider;
use crate::vision::base::{annotate, VisionBackend};

/// Orchestrator turns one ask request into one reply
///
/// It holds the two backends as long-lived, read-only handles. Nothing is carried between
/// calls to [`Orchestrator::handle_ask`], so concurrent requests never see each other.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    vision: Option<Arc<dyn VisionBackend>>,
}

impl Orchestrator {
    /// Create an orchestrator that answers from text alone
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            vision: None,
        }
    }

    /// Enrich messages that carry an image using this vision backend
    pub fn with_vision(mut self, vision: Arc<dyn VisionBackend>) -> Self {
        self.vision = Some(vision);
        self
    }

    pub fn vision_enabled(&self) -> bool {
        self.vision.is_some()
    }

    pub async fn handle_ask(&self, request: &AskRequest) -> AskResult<AskResponse> {
        if request.message.trim().is_empty() {
            return Err(AskError::MalformedRequest(
                "Please include a message with your question.".to_string(),
            ));
        }

        // An undecodable image fails the request even when there is no vision backend to
        // send it to
        let image = request.image().map(decode_data_url).transpose()?;
        info!(
            message_len = request.message.len(),
            image_bytes = ?image.as_ref().map(|i| i.bytes.len()),
            "handling ask"
        );

        let prompt = self.build_prompt(&request.message, image.as_ref()).await?;
        let completion = self.provider.complete(&prompt).await?;
        debug!(usage = ?completion.usage, "reply generated");

        Ok(AskResponse::new(completion.text))
    }

    async fn build_prompt(&self, message: &str, image: Option<&DecodedImage>) -> AskResult<String> {
        let (image, vision) = match (image, &self.vision) {
            (Some(image), Some(vision)) => (image, vision),
            (Some(_), None) => {
                debug!("no vision backend configured, ignoring attached image");
                return Ok(message.to_string());
            }
            (None, _) => return Ok(message.to_string()),
        };

        match annotate(vision.as_ref(), &image.bytes).await {
            Ok(annotation) => {
                if annotation.is_empty() {
                    info!(mime_type = %image.mime_type, "vision found nothing in the image");
                }
                debug!(
                    mime_type = %image.mime_type,
                    objects = annotation.detected_objects.len(),
                    labels = annotation.detected_labels.len(),
                    "image annotated"
                );
                Ok(compose_prompt(&annotation, message)?)
            }
            Err(e) => {
                warn!(error = %e, "image annotation failed, answering from text alone");
                Ok(degraded_prompt(message)?)
            }
        }
    }
}
