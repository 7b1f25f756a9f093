use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("subscriber store error: {0}")]
    Store(String),

    #[error("push to {target} failed: {reason}")]
    Notify { target: String, reason: String },

    #[error("instance describe failed: {0}")]
    ComputeQuery(String),

    #[error("instance start request failed: {0}")]
    ComputeStart(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
