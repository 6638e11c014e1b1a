pub mod app_config;
pub mod clinic;
pub mod config;
pub mod draft;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use clinic::{DeletedClinicSummary, ExistingClinic};
pub use config::{load_app_config, load_app_config_from_env};
pub use draft::{
    Draft, Photo, PhotoSource, PhotoType, Procedure, Provider, SubmissionFlow, WorkingHours,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
