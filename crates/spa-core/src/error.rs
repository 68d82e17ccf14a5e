use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Native compressor unavailable: {0}")]
    NativeUnavailable(String),
    #[error("Native compressor failed: {0}")]
    NativeExecution(String),
    #[error("Native compressor returned a null result")]
    NativeNullResult,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Gzip error: {0}")]
    Gzip(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompressError {
    /// True for the native backend failures the orchestrator may recover from.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::NativeUnavailable(_) | Self::NativeExecution(_) | Self::NativeNullResult
        )
    }
}

pub type Result<T> = std::result::Result<T, CompressError>;
