use std::path::PathBuf;
use thiserror::Error;

pub type VrxResult<T> = std::result::Result<T, VrxError>;

#[derive(Debug, Error)]
pub enum VrxError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pattern(#[from] regex::Error),
    #[error("Variant with identity {id} already present in store")]
    DuplicateIdentity { id: String },
    #[error("No variant with identity {id} in store")]
    MissingIdentity { id: String },
    #[error("Provenance catalog unavailable: {message}")]
    CatalogUnavailable { message: String },
    #[error("Store document is not readable: {}: {message}", path.display())]
    StoreDocument { path: PathBuf, message: String },
}

impl VrxError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[macro_export]
macro_rules! vrx_error {
    ($($arg:tt)*) => {
        $crate::error::VrxError::message(format!($($arg)*))
    };
}
