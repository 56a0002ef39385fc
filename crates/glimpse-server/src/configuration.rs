use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use glimpse::credentials::CredentialsSource;
use glimpse::providers::configs::{
    GeminiProviderConfig, DEFAULT_TIMEOUT_SECS, GEMINI_HOST, GEMINI_MODEL,
};
use glimpse::vision::google::{GoogleVisionConfig, VISION_HOST, VISION_TIMEOUT_SECS};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variables read under their own names rather than the `GLIMPSE_` prefix
pub const API_KEY_VAR: &str = "API_KEY";
pub const CREDENTIALS_JSON_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS_JSON";
pub const CREDENTIALS_PATH_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on a request body, base64 image included
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddress {
            addr: addr.clone(),
            reason: e.to_string(),
        })
    }
}

#[derive(Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_generation_host")]
    pub host: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_output_tokens: Option<i32>,
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

impl GenerationSettings {
    pub fn into_config(self) -> GeminiProviderConfig {
        GeminiProviderConfig {
            host: self.host,
            api_key: self.api_key,
            model: self.model,
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Deserialize)]
pub struct VisionSettings {
    #[serde(default = "default_vision_host")]
    pub host: String,
    #[serde(default = "default_vision_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub credentials_json: Option<String>,
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            host: default_vision_host(),
            timeout_secs: default_vision_timeout(),
            credentials_json: None,
            credentials_path: None,
        }
    }
}

impl VisionSettings {
    /// `None` means image enrichment is disabled
    pub fn credentials_source(&self) -> Option<CredentialsSource> {
        CredentialsSource::resolve(self.credentials_json.clone(), self.credentials_path.clone())
    }

    pub fn client_config(&self) -> GoogleVisionConfig {
        GoogleVisionConfig {
            host: self.host.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub generation: GenerationSettings,
    #[serde(default)]
    pub vision: VisionSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("server.max_body_bytes", default_max_body_bytes() as u64)?
            // Backend defaults
            .set_default("generation.host", default_generation_host())?
            .set_default("generation.model", default_model())?
            .set_default("generation.timeout_secs", default_generation_timeout())?
            .set_default("vision.host", default_vision_host())?
            .set_default("vision.timeout_secs", default_vision_timeout())?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("GLIMPSE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // The well-known names win over their prefixed equivalents
            .set_override_option("generation.api_key", env_value(API_KEY_VAR))?
            .set_override_option("vision.credentials_json", env_value(CREDENTIALS_JSON_VAR))?
            .set_override_option("vision.credentials_path", env_value(CREDENTIALS_PATH_VAR))?
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        match result {
            Ok(settings) if settings.generation.api_key.trim().is_empty() => {
                Err(ConfigError::MissingEnvVar {
                    env_var: API_KEY_VAR.to_string(),
                })
            }
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                if let Some(field) = missing_field(&err.to_string()) {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(&field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

/// Pull the field out of "missing field `api_key`", qualified by its table when the error
/// names one ("... for key `generation`")
fn missing_field(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let (field, rest) = rest.split_once('`')?;
    match rest
        .strip_prefix(" for key `")
        .and_then(|key| key.split_once('`'))
    {
        Some((key, _)) if !key.is_empty() => Some(format!("{}.{}", key, field)),
        _ => Some(field.to_string()),
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

// Cloud Vision takes inline images up to 10 MB, which base64 grows by a third
fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_generation_host() -> String {
    GEMINI_HOST.to_string()
}

fn default_model() -> String {
    GEMINI_MODEL.to_string()
}

fn default_generation_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_vision_host() -> String {
    VISION_HOST.to_string()
}

fn default_vision_timeout() -> u64 {
    VISION_TIMEOUT_SECS
}
