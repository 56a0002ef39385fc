use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the generation backend
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Could not reach the generation service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Server(StatusCode),

    #[error("Request failed: {status} - {body}")]
    RequestFailed { status: StatusCode, body: String },

    #[error("Generation API error: {0}")]
    Api(String),

    #[error("The response was blocked: {0}")]
    Blocked(String),

    #[error("Unexpected response from the generation service: {0}")]
    MalformedResponse(String),
}

/// Failures reading the service account credentials
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Failed to read credentials file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credentials are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported credentials type `{0}`, expected `service_account`")]
    UnsupportedType(String),
}

/// Failures obtaining an access token for the vision backend
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint { status: StatusCode, body: String },
}

/// Failures talking to the vision backend
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Vision authorization failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Could not reach the vision service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Vision request failed: {status} - {body}")]
    RequestFailed { status: StatusCode, body: String },

    #[error("Vision API error: {0}")]
    Api(String),

    #[error("Unexpected response from the vision service: {0}")]
    MalformedResponse(String),
}

/// Failures decoding a data-URL image payload
#[derive(Error, Debug)]
pub enum ImageDecodeError {
    #[error("image payload is empty")]
    Empty,

    #[error("image data URL is missing the `,` separator")]
    MissingSeparator,

    #[error("image data URL is not base64 encoded")]
    NotBase64,

    #[error("image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Everything that can fail a single ask request
#[derive(Error, Debug)]
pub enum AskError {
    #[error("{0}")]
    MalformedRequest(String),

    #[error("The attached image could not be read: {0}")]
    InvalidImage(#[from] ImageDecodeError),

    #[error("Failed to build the prompt: {0}")]
    Prompt(#[from] tera::Error),

    #[error(transparent)]
    Generation(#[from] ProviderError),
}

pub type AskResult<T> = Result<T, AskError>;
