pub mod auth;
pub mod credentials;
pub mod data_url;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod vision;
