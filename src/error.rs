use thiserror::Error;

#[derive(Error, Debug)]
pub enum CubeTimeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite Error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Storage Error: {0}")]
    Storage(String),
}

pub type CtResult<T> = Result<T, CubeTimeError>;
