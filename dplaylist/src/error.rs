//! Types d'erreurs pour dplaylist

use crate::position::Placement;

/// Erreurs de gestion de playlist
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid value for {name}: {}", .errors.join(", "))]
    InvalidProperty { name: String, errors: Vec<String> },

    #[error("Invalid record: {}", .0.join(", "))]
    InvalidRecord(Vec<String>),

    #[error("Cannot write an item at {0:?}: too far past the end")]
    PositionOutOfRange(Placement),

    #[error("Invalid schema: {0}")]
    Schema(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Storage error: {0}")]
    Storage(#[from] jsonlines::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Messages de validation portés par l'erreur, s'il y en a
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Error::InvalidProperty { errors, .. } => Some(errors),
            Error::InvalidRecord(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Type Result spécialisé pour dplaylist
pub type Result<T> = std::result::Result<T, Error>;
