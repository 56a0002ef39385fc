use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::errors::CredentialsError;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Where the vision service account key comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialsSource {
    /// The key JSON itself, typically from `GOOGLE_APPLICATION_CREDENTIALS_JSON`
    Inline(String),
    /// A path to the key file, typically from `GOOGLE_APPLICATION_CREDENTIALS`
    File(PathBuf),
}

impl CredentialsSource {
    /// Pick a source, preferring inline JSON over a file path. Blank values count as unset.
    pub fn resolve(inline: Option<String>, path: Option<PathBuf>) -> Option<Self> {
        if let Some(json) = inline.filter(|json| !json.trim().is_empty()) {
            return Some(Self::Inline(json));
        }
        path.filter(|path| !path.as_os_str().is_empty())
            .map(Self::File)
    }

    pub fn load(&self) -> Result<ServiceAccountKey, CredentialsError> {
        match self {
            Self::Inline(json) => ServiceAccountKey::from_json(json),
            Self::File(path) => {
                let json = fs::read_to_string(path).map_err(|source| CredentialsError::Io {
                    path: path.clone(),
                    source,
                })?;
                ServiceAccountKey::from_json(&json)
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Inline(_) => "inline JSON".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// The subset of a Google service account key file needed to mint access tokens
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, CredentialsError> {
        let key: Self = serde_json::from_str(json)?;
        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(other) => Err(CredentialsError::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}
