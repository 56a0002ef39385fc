use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// A single free-text completion
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
}

impl Completion {
    pub fn new<S: Into<String>>(text: S, usage: Usage) -> Self {
        Self {
            text: text.into(),
            usage,
        }
    }
}

/// Base trait for generation backends
#[async_trait]
pub trait Provider: Send + Sync {
    /// Complete a free-text prompt into free-text output
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError>;
}
