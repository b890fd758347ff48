//! MemoryLines : équivalent en mémoire de JsonLines

use crate::lines;
use crate::{LineStore, Result};

/// Contenu JSON lines conservé en mémoire
///
/// Même modèle de lignes que [`JsonLines`](crate::JsonLines), sans fichier :
/// utile pour les tests et les playlists temporaires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLines {
    content: String,
}

impl MemoryLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Part d'un contenu texte existant
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Contenu texte courant
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl LineStore for MemoryLines {
    fn read_lines(&self) -> Result<Vec<String>> {
        Ok(lines::split(&self.content))
    }

    fn write_lines(&mut self, all: &[String]) -> Result<()> {
        self.content = lines::join(all);
        Ok(())
    }
}
