//! Types d'erreurs pour jsonlines

use std::io;
use std::path::{Path, PathBuf};

/// Erreurs d'accès à un fichier JSON lines
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File does not exist: {}", .0.display())]
    FileDoesNotExist(PathBuf),

    #[error("File is not readable: {}", .0.display())]
    FileIsNotReadable(PathBuf),

    #[error("File is not writable: {}", .0.display())]
    FileIsNotWritable(PathBuf),

    #[error("Line {line} is too far past the end (last reachable line: {limit})")]
    LineOutOfRange { line: usize, limit: usize },

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Vrai si l'erreur signale un fichier absent
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Error::FileDoesNotExist(_))
    }

    /// Convertit une erreur de lecture en erreur typée
    pub(crate) fn reading(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Error::FileDoesNotExist(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Error::FileIsNotReadable(path.to_path_buf()),
            _ => Error::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Convertit une erreur d'écriture en erreur typée
    pub(crate) fn writing(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => Error::FileIsNotWritable(path.to_path_buf()),
            _ => Error::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Type Result spécialisé pour jsonlines
pub type Result<T> = std::result::Result<T, Error>;
