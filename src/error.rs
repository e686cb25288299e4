use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranstatError>;

#[derive(Error, Debug)]
pub enum TranstatError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("Malformed API response: {0}")]
    Protocol(String),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Data integrity error: {0}")]
    Integrity(String),
    #[error("Config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Chart error: {0}")]
    Chart(String),
}
