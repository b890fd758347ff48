//! Configuration des playlists nommées
//!
//! ```yaml
//! playlists:
//!   directory: ./playlists
//!   extension: dpls
//!   create_missing: true
//! ```
//!
//! Chaque clé peut être surchargée par une variable d'environnement
//! `DPLAYLIST_CONFIG__<SECTION>__<CLÉ>`, par exemple
//! `DPLAYLIST_CONFIG__PLAYLISTS__DIRECTORY=/srv/playlists`.

use crate::playlist::Playlist;
use crate::{Error, Result};
use jsonlines::JsonLines;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ENV_PREFIX: &str = "DPLAYLIST_CONFIG__";

/// Racine de la configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistsConfig {
    pub playlists: PlaylistsSection,
}

/// Section `playlists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistsSection {
    /// Répertoire des fichiers de playlist
    pub directory: PathBuf,
    /// Extension des fichiers, sans le point
    pub extension: String,
    /// Crée le répertoire et un fichier vide à l'ouverture
    pub create_missing: bool,
}

impl Default for PlaylistsSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("playlists"),
            extension: "dpls".to_string(),
            create_missing: true,
        }
    }
}

impl PlaylistsConfig {
    /// Lit la configuration depuis un fichier YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        info!(path = %path.display(), "Loading playlists configuration");
        Self::from_yaml_str(&text)
    }

    /// Analyse un texte YAML ; un texte vide donne la configuration par défaut
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Applique les surcharges des variables d'environnement `DPLAYLIST_CONFIG__*`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(env::vars())
    }

    /// Applique des surcharges `(variable, valeur)` ; les variables sans le
    /// préfixe sont ignorées
    pub fn with_overrides<I>(self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut value = serde_yaml::to_value(&self).map_err(|e| Error::Config(e.to_string()))?;

        for (key, raw) in vars {
            let Some(rest) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let path: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
            debug!(variable = %key, "Applying configuration override");
            set_value(&mut value, &path, convert_env_value(&raw))?;
        }

        serde_yaml::from_value(value).map_err(|e| Error::Config(e.to_string()))
    }

    /// Chemin du fichier d'une playlist nommée
    pub fn playlist_path(&self, name: &str) -> PathBuf {
        let section = &self.playlists;
        if section.extension.is_empty() {
            section.directory.join(name)
        } else {
            section
                .directory
                .join(format!("{name}.{}", section.extension))
        }
    }

    /// Ouvre une playlist nommée
    ///
    /// Avec `create_missing`, le répertoire et un fichier vide sont créés au besoin.
    pub fn open(&self, name: &str) -> Result<Playlist<JsonLines>> {
        let path = self.playlist_path(name);

        if self.playlists.create_missing {
            fs::create_dir_all(&self.playlists.directory)?;
            JsonLines::new(&path).touch()?;
        }

        debug!(name, path = %path.display(), "Opening playlist");
        Ok(Playlist::open(path))
    }

    /// Noms des playlists présentes dans le répertoire, triés
    pub fn playlist_names(&self) -> Result<Vec<String>> {
        let directory = &self.playlists.directory;
        if !directory.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(directory)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if extension != self.playlists.extension {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}

fn set_value(data: &mut Value, path: &[String], value: Value) -> Result<()> {
    let Some((key, rest)) = path.split_first() else {
        *data = value;
        return Ok(());
    };

    let Value::Mapping(map) = data else {
        return Err(Error::Config(format!("cannot set '{key}' on a non-mapping node")));
    };

    let key = Value::String(key.clone());
    if rest.is_empty() {
        map.insert(key, value);
        return Ok(());
    }

    let entry = map.entry(key).or_insert(Value::Mapping(Mapping::new()));
    set_value(entry, rest, value)
}

fn convert_env_value(value: &str) -> Value {
    serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = PlaylistsConfig::from_yaml_str("").unwrap();
        assert_eq!(config, PlaylistsConfig::default());
        assert_eq!(config.playlist_path("rock"), PathBuf::from("playlists/rock.dpls"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PlaylistsConfig::from_yaml_str("playlists:\n  extension: jsonl\n").unwrap();
        assert_eq!(config.playlists.extension, "jsonl");
        assert_eq!(config.playlists.directory, PathBuf::from("playlists"));
        assert!(config.playlists.create_missing);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = PlaylistsConfig::from_yaml_str("playlists: [unclosed").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = PlaylistsConfig::default()
            .with_overrides(vars(&[
                ("DPLAYLIST_CONFIG__PLAYLISTS__DIRECTORY", "/srv/playlists"),
                ("DPLAYLIST_CONFIG__PLAYLISTS__CREATE_MISSING", "false"),
                ("OTHER_APP__PLAYLISTS__DIRECTORY", "/tmp"),
            ]))
            .unwrap();

        assert_eq!(config.playlists.directory, PathBuf::from("/srv/playlists"));
        assert!(!config.playlists.create_missing);
        assert_eq!(config.playlists.extension, "dpls");
    }

    #[test]
    fn test_override_with_wrong_type_fails() {
        let result = PlaylistsConfig::default().with_overrides(vars(&[(
            "DPLAYLIST_CONFIG__PLAYLISTS__CREATE_MISSING",
            "not a bool",
        )]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
