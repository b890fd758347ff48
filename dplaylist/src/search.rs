//! Recherche d'items par conditions sur leurs propriétés
//!
//! Enveloppe une [`Query`] du stockage : les résultats sont exprimés en
//! positions et l'en-tête n'y figure jamais.

use crate::item::PlaylistItem;
use crate::position::position_of;
use crate::{Error, Result};
use jsonlines::{ConditionGroup, Direction, LineStore, Logic, Operator, PropertyPath, Query};
use serde_json::Value;
use tracing::{debug, warn};

/// Requête en cours de construction sur une playlist
///
/// # Exemple
///
/// ```no_run
/// use dplaylist::{Direction, Logic, Operator, Playlist};
///
/// let playlist = Playlist::open("rock.dpls");
/// let mut search = playlist.search(Logic::And);
/// search
///     .condition("artist", "Blind Guardian", Operator::Equals)
///     .order_by("title", Direction::Asc);
///
/// for (position, item) in search.find().unwrap() {
///     println!("{position}: {:?}", item.title());
/// }
/// ```
pub struct Search<'a, S> {
    store: &'a S,
    query: Query,
}

impl<'a, S: LineStore> Search<'a, S> {
    pub(crate) fn new(store: &'a S, logic: Logic) -> Self {
        Self {
            store,
            query: Query::new(logic),
        }
    }

    pub fn condition(
        &mut self,
        path: impl Into<PropertyPath>,
        value: impl Into<Value>,
        operator: Operator,
    ) -> &mut Self {
        self.query.condition(path, value, operator);
        self
    }

    pub fn and_group(&mut self) -> &mut ConditionGroup {
        self.query.and_group()
    }

    pub fn or_group(&mut self) -> &mut ConditionGroup {
        self.query.or_group()
    }

    pub fn order_by(&mut self, path: impl Into<PropertyPath>, direction: Direction) -> &mut Self {
        self.query.order_by(path, direction);
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Exécute la requête
    ///
    /// Une expression régulière invalide est une erreur ; une playlist
    /// absente ou illisible donne un résultat vide.
    pub fn find(&self) -> Result<Vec<(usize, PlaylistItem)>> {
        self.query
            .validate()
            .map_err(|e| Error::InvalidQuery(e.to_string()))?;

        let matches = match self.store.find(&self.query) {
            Ok(matches) => matches,
            Err(e) if e.is_missing_file() => {
                debug!("Searching a playlist that does not exist yet");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Search failed, returning no result");
                Vec::new()
            }
        };

        Ok(matches
            .into_iter()
            .filter_map(|(line, object)| {
                position_of(line).map(|position| (position, PlaylistItem::from_object(object)))
            })
            .collect())
    }
}
