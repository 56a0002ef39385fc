use serde::{Deserialize, Serialize};

/// Body of `POST /api/ask`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub message: String,
    /// A data URL such as `data:image/png;base64,...`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl AskRequest {
    pub fn text<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            image: None,
        }
    }

    pub fn with_image<S: Into<String>>(mut self, image: S) -> Self {
        self.image = Some(image.into());
        self
    }

    /// An empty `image` string is treated the same as no image at all
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|image| !image.trim().is_empty())
    }
}

/// Reply sent back to the caller, on success and on failure alike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub reply: String,
}

impl AskResponse {
    pub fn new<S: Into<String>>(reply: S) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}
