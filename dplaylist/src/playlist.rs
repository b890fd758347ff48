//! Playlist adressable par position et par UUID
//!
//! Les lectures n'échouent jamais à cause du stockage : un fichier absent se
//! comporte comme une playlist vide et les autres erreurs sont journalisées
//! puis ignorées. Les écritures valident l'enregistrement avant tout accès au
//! fichier et propagent les erreurs de stockage.

use crate::header::Header;
use crate::item::PlaylistItem;
use crate::iter::Items;
use crate::position::{self, line_of, position_of, Placement, FIRST_ITEM_LINE, HEADER_LINE};
use crate::search::Search;
use crate::{Error, Result};
use jsonlines::{JsonLines, LineStore, Logic};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Playlist descriptive stockée ligne à ligne
pub struct Playlist<S = JsonLines> {
    store: S,
}

impl Playlist<JsonLines> {
    /// Ouvre une playlist sur un fichier, sans y accéder
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_store(JsonLines::new(path))
    }

    pub fn file_name(&self) -> &Path {
        self.store.path()
    }
}

impl<S: LineStore> Playlist<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Nombre de lignes physiques (en-tête compris) et vacuité de la dernière
    pub fn count_lines(&self) -> (usize, bool) {
        downgrade(self.store.count_lines(), "count_lines")
    }

    pub fn line_count(&self) -> usize {
        self.count_lines().0
    }

    /// Dernière ligne occupée, en ignorant une dernière ligne vide
    pub fn last_line(&self) -> Option<usize> {
        let (count, last_blank) = self.count_lines();
        count.checked_sub(if last_blank { 2 } else { 1 })
    }

    pub fn get_item(&self, position: usize) -> Option<PlaylistItem> {
        self.get_items(&[position]).remove(&position)
    }

    /// Items aux positions demandées
    ///
    /// Les positions vides, absentes, malformées ou hors de toute ligne ne
    /// figurent pas dans le résultat.
    pub fn get_items(&self, positions: &[usize]) -> BTreeMap<usize, PlaylistItem> {
        let lines: Vec<usize> = positions.iter().filter_map(|&p| line_of(p)).collect();

        downgrade(self.store.get_objects(&lines), "get_items")
            .into_iter()
            .filter_map(|(line, object)| {
                position_of(line).map(|position| (position, PlaylistItem::from_object(object)))
            })
            .collect()
    }

    /// Dernier item décodable et sa position
    pub fn get_last_item(&self) -> Option<(usize, PlaylistItem)> {
        self.items()
            .rev()
            .find_map(|(position, item)| item.map(|item| (position, item)))
    }

    /// Parcourt les items dans l'ordre du fichier
    pub fn items(&self) -> Items {
        match self.store.objects() {
            Ok(objects) => Items::new(objects),
            Err(e) => {
                log_read_failure(&e, "items");
                Items::empty()
            }
        }
    }

    /// Items portant l'un des UUID demandés, indexés par position
    ///
    /// Pour un UUID présent plusieurs fois, seule la première occurrence est
    /// retenue. Le parcours s'arrête dès que tous les UUID ont été trouvés.
    pub fn get_items_by_uuid<U: AsRef<str>>(&self, uuids: &[U]) -> BTreeMap<usize, PlaylistItem> {
        let mut wanted: HashSet<&str> = uuids.iter().map(|uuid| uuid.as_ref()).collect();
        let mut found = BTreeMap::new();

        if wanted.is_empty() {
            return found;
        }

        for (position, item) in self.items() {
            let Some(item) = item else { continue };
            if item.uuid().is_some_and(|uuid| wanted.remove(uuid)) {
                found.insert(position, item);
                if wanted.is_empty() {
                    break;
                }
            }
        }

        found
    }

    pub fn get_item_by_uuid(&self, uuid: &str) -> Option<(usize, PlaylistItem)> {
        self.get_items_by_uuid(&[uuid]).pop_first()
    }

    /// Position actuelle d'un item, retrouvé par son UUID
    pub fn position_of(&self, item: &PlaylistItem) -> Option<usize> {
        let uuid = item.uuid()?;
        self.get_item_by_uuid(uuid).map(|(position, _)| position)
    }

    pub fn has_item(&self, item: &PlaylistItem) -> bool {
        self.position_of(item).is_some()
    }

    /// Tire au hasard jusqu'à `count` items distincts entre les positions
    /// `from` et `to` incluses (par défaut toute la playlist)
    pub fn get_random_items(
        &self,
        count: usize,
        from: Option<usize>,
        to: Option<usize>,
    ) -> BTreeMap<usize, PlaylistItem> {
        let Some(from_line) = line_of(from.unwrap_or(0)) else {
            return BTreeMap::new();
        };
        // Le stockage borne `to` à sa dernière ligne
        let to_line = to.map(|to| line_of(to).unwrap_or(usize::MAX));

        downgrade(
            self.store.get_random_objects(count, from_line, to_line),
            "get_random_items",
        )
        .into_iter()
        .filter_map(|(line, object)| {
            position_of(line).map(|position| (position, PlaylistItem::from_object(object)))
        })
        .collect()
    }

    /// Écrit un item
    ///
    /// Un item déjà présent (même UUID) est retiré de sa ligne avant d'être
    /// réinséré selon `placement`, en une seule écriture. Les lignes suivantes
    /// sont décalées, jamais écrasées. Une position explicite trop loin après
    /// la fin est refusée avec [`Error::PositionOutOfRange`].
    pub fn set_item(&mut self, item: &PlaylistItem, placement: impl Into<Placement>) -> Result<()> {
        item.validate().map_err(Error::InvalidRecord)?;

        let placement = placement.into();
        let current = self.position_of(item);
        let from = current.and_then(line_of);

        let written = self.store.move_object(item.data(), from, |append| {
            position::target_line(placement, current, append)
        })?;
        let Some(line) = written else {
            warn!(?placement, "Position too far past the end, item not written");
            return Err(Error::PositionOutOfRange(placement));
        };

        debug!(
            uuid = item.uuid().unwrap_or_default(),
            from = ?current,
            to = line - FIRST_ITEM_LINE,
            "Item written"
        );
        Ok(())
    }

    /// Supprime un item retrouvé par son UUID ; `false` s'il est absent
    pub fn delete_item(&mut self, item: &PlaylistItem) -> Result<bool> {
        let Some(position) = self.position_of(item) else {
            return Ok(false);
        };
        let Some(line) = line_of(position) else {
            return Ok(false);
        };

        self.store.delete_object(line)?;
        debug!(uuid = item.uuid().unwrap_or_default(), position, "Item deleted");
        Ok(true)
    }

    /// Supprime l'item d'une position et le retourne ; `None` si elle est vide
    pub fn delete_position(&mut self, position: usize) -> Result<Option<PlaylistItem>> {
        let (Some(line), Some(item)) = (line_of(position), self.get_item(position)) else {
            return Ok(None);
        };

        self.store.delete_object(line)?;
        debug!(position, "Position deleted");
        Ok(Some(item))
    }

    /// En-tête de la playlist, vide si la ligne 0 est absente ou malformée
    pub fn header(&self) -> Header {
        downgrade(self.store.get_object(HEADER_LINE), "header")
            .map(Header::from_object)
            .unwrap_or_default()
    }

    /// Remplace l'en-tête après validation
    pub fn set_header(&mut self, header: &Header) -> Result<()> {
        header.validate().map_err(Error::InvalidRecord)?;
        self.store.set_object(HEADER_LINE, header.data())?;
        debug!("Header written");
        Ok(())
    }

    /// Démarre une recherche sur les items
    pub fn search(&self, logic: Logic) -> Search<'_, S> {
        Search::new(&self.store, logic)
    }
}

fn downgrade<T: Default>(result: jsonlines::Result<T>, operation: &str) -> T {
    result.unwrap_or_else(|e| {
        log_read_failure(&e, operation);
        T::default()
    })
}

fn log_read_failure(error: &jsonlines::Error, operation: &str) {
    if error.is_missing_file() {
        debug!(operation, "Playlist file does not exist yet, reading as empty");
    } else {
        warn!(operation, error = %error, "Cannot read playlist, reading as empty");
    }
}
