use async_trait::async_trait;
use std::sync::Mutex;

use crate::errors::ProviderError;
use crate::providers::base::{Completion, Provider, Usage};

/// A mock provider that records every prompt and echoes it back, or fails on demand
pub struct MockProvider {
    prompts: Mutex<Vec<String>>,
    fail_with: Option<String>,
}

impl MockProvider {
    pub fn echo() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing<S: Into<String>>(message: S) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.fail_with {
            Some(message) => Err(ProviderError::Api(message.clone())),
            None => Ok(Completion::new(prompt, Usage::default())),
        }
    }
}
