use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        // A body that fails to decode is a protocol problem, everything else
        // (timeout, connect, reset) is transient transport.
        if e.is_decode() {
            BotError::Malformed(e.to_string())
        } else {
            BotError::Transport(e.to_string())
        }
    }
}

impl BotError {
    /// Transient failures count against the scheduler's error budget;
    /// malformed payloads and config problems are reported differently.
    pub fn is_transient(&self) -> bool {
        matches!(self, BotError::Transport(_) | BotError::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
