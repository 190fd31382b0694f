use thiserror::Error;

#[derive(Error, Debug)]
pub enum LumbungError {
    #[error("Record {id} not found in '{namespace}'")]
    RecordNotFound { namespace: String, id: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, LumbungError>;
