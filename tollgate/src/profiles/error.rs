use sled::transaction::TransactionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sled::Error> for ProfileError {
    fn from(err: sled::Error) -> Self {
        ProfileError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::SerializationError(err.to_string())
    }
}

impl From<TransactionError<ProfileError>> for ProfileError {
    fn from(err: TransactionError<ProfileError>) -> Self {
        match err {
            TransactionError::Abort(e) => e,
            TransactionError::Storage(e) => e.into(),
        }
    }
}
