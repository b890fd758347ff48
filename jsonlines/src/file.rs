//! JsonLines : fichier JSON lines sur disque

use crate::lines;
use crate::{Error, LineStore, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fichier JSON lines (un objet JSON ou une ligne vide par ligne)
///
/// Le fichier est relu à chaque opération : aucun contenu n'est conservé
/// entre deux appels. Les écritures passent par un fichier temporaire voisin
/// renommé ensuite, de sorte qu'un lecteur ne voit jamais un fichier tronqué.
///
/// Aucune synchronisation n'est faite entre plusieurs instances pointant sur
/// le même fichier : la dernière écriture l'emporte.
#[derive(Debug, Clone)]
pub struct JsonLines {
    path: PathBuf,
}

impl JsonLines {
    /// Ouvre (sans le créer) le fichier `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Chemin du fichier
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Vérifie si le fichier existe
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Crée un fichier vide s'il n'existe pas encore
    pub fn touch(&self) -> Result<()> {
        if !self.exists() {
            fs::write(&self.path, b"").map_err(|e| Error::writing(&self.path, e))?;
            debug!(path = %self.path.display(), "Created empty JSON lines file");
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LineStore for JsonLines {
    fn read_lines(&self) -> Result<Vec<String>> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| Error::reading(&self.path, e))?;
        Ok(lines::split(&content))
    }

    fn write_lines(&mut self, all: &[String]) -> Result<()> {
        let temp = self.temp_path();
        fs::write(&temp, lines::join(all)).map_err(|e| Error::writing(&self.path, e))?;
        fs::rename(&temp, &self.path).map_err(|e| Error::writing(&self.path, e))?;

        debug!(path = %self.path.display(), lines = all.len(), "JSON lines file written");
        Ok(())
    }
}
