use crate::configuration::{Settings, VisionSettings};
use glimpse::auth::{ServiceAccountAuth, CLOUD_VISION_SCOPE};
use glimpse::errors::ProviderError;
use glimpse::orchestrator::Orchestrator;
use glimpse::providers::gemini::GeminiProvider;
use glimpse::vision::base::VisionBackend;
use glimpse::vision::google::GoogleVisionClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Build both backends once at startup
    ///
    /// Only the generation backend is required. Vision credentials that are missing or
    /// unusable leave image enrichment switched off.
    pub fn from_settings(settings: Settings) -> Result<Self, ProviderError> {
        let provider = GeminiProvider::new(settings.generation.into_config())?;
        info!(model = %provider.model(), "generation backend ready");

        let mut orchestrator = Orchestrator::new(Arc::new(provider));
        if let Some(vision) = build_vision(&settings.vision) {
            orchestrator = orchestrator.with_vision(vision);
        }

        Ok(Self::new(orchestrator))
    }
}

fn build_vision(settings: &VisionSettings) -> Option<Arc<dyn VisionBackend>> {
    let Some(source) = settings.credentials_source() else {
        warn!("no vision credentials configured, image enrichment disabled");
        return None;
    };

    let key = match source.load() {
        Ok(key) => key,
        Err(e) => {
            warn!(source = %source.describe(), error = %e, "vision credentials unusable, image enrichment disabled");
            return None;
        }
    };

    let auth = match ServiceAccountAuth::new(key, CLOUD_VISION_SCOPE) {
        Ok(auth) => auth,
        Err(e) => {
            warn!(error = %e, "vision credentials unusable, image enrichment disabled");
            return None;
        }
    };
    let client_email = auth.client_email().to_string();

    match GoogleVisionClient::new(settings.client_config(), Box::new(auth)) {
        Ok(client) => {
            info!(client_email = %client_email, "vision backend ready");
            let vision: Arc<dyn VisionBackend> = Arc::new(client);
            Some(vision)
        }
        Err(e) => {
            warn!(error = %e, "could not create vision client, image enrichment disabled");
            None
        }
    }
}
