//! Parcours séquentiel des items d'une playlist

use crate::item::PlaylistItem;
use crate::position::position_of;
use jsonlines::Objects;

/// Itérateur sur les items, ligne d'en-tête exclue
///
/// Produit `(position, Some(item))` pour chaque ligne décodable et
/// `(position, None)` pour une ligne vide ou malformée, y compris une
/// dernière ligne vide.
pub struct Items {
    objects: Option<Objects>,
}

impl Items {
    pub(crate) fn new(mut objects: Objects) -> Self {
        // Saut de l'en-tête
        objects.next();
        Self {
            objects: Some(objects),
        }
    }

    pub(crate) fn empty() -> Self {
        Self { objects: None }
    }
}

impl Iterator for Items {
    type Item = (usize, Option<PlaylistItem>);

    fn next(&mut self) -> Option<Self::Item> {
        let (line, object) = self.objects.as_mut()?.next()?;
        let position = position_of(line)?;
        Some((position, object.map(PlaylistItem::from_object)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.objects
            .as_ref()
            .map_or((0, Some(0)), |objects| objects.size_hint())
    }
}

impl DoubleEndedIterator for Items {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (line, object) = self.objects.as_mut()?.next_back()?;
        let position = position_of(line)?;
        Some((position, object.map(PlaylistItem::from_object)))
    }
}
