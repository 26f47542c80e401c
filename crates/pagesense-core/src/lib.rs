//! Shared configuration and domain types for the PageSense workspace.

pub mod app_config;
pub mod config;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{Keyword, SentimentLabel};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
#[error("unknown sentiment label \"{0}\" (expected positive, negative or neutral)")]
pub struct UnknownLabel(pub String);
