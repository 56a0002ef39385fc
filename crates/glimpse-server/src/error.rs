use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glimpse::errors::AskError;
use glimpse::models::ask::AskResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Invalid server address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// The environment variable a user should set to provide a config field
///
/// The generation key keeps its historical name `API_KEY`; everything else lives under the
/// `GLIMPSE_` prefix with `__` between nested keys.
pub fn to_env_var(field: &str) -> String {
    if field == "api_key" || field == "generation.api_key" {
        return "API_KEY".to_string();
    }
    format!("GLIMPSE_{}", field.replace('.', "__").to_uppercase())
}

/// Failures of a single request, translated into the `{ "reply": ... }` shape
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    MalformedRequest(String),

    #[error("The request is too large, try a smaller image")]
    PayloadTooLarge,

    #[error(transparent)]
    Ask(#[from] AskError),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn reply(&self) -> String {
        match self {
            ApiError::Ask(AskError::InvalidImage(e)) => format!(
                "Sorry, I couldn't read the attached image ({}). Please try a different image.",
                e
            ),
            ApiError::Ask(AskError::Generation(e)) => format!("Error occurred: {}", e),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Ask(AskError::Generation(e)) => {
                tracing::error!(error = %e, "generation failed")
            }
            ApiError::Ask(AskError::Prompt(e)) => tracing::error!(error = %e, "prompt failed"),
            ApiError::NotFound => {}
            other => tracing::warn!(error = %other, "rejected request"),
        }

        (self.status(), Json(AskResponse::new(self.reply()))).into_response()
    }
}
