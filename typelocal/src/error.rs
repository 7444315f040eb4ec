use config::ConfigError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {

    #[error("computation failed for {type_name}: {source}")]
    ComputationFailure {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    pub fn is_computation_failure(&self) -> bool {
        matches!(self, AppError::ComputationFailure { .. })
    }
}
