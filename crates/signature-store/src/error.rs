use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("blob store i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// True for errors the signer can fix (as opposed to storage failures).
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}
