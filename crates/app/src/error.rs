use engine::EngineError;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("api error: {0}")]
    Client(#[from] ClientError),
    #[error("not signed in: run `splitbook login --email <email>` first")]
    NotSignedIn,
    #[error("invalid input: {0}")]
    Input(String),
}
