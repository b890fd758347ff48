//! Correspondance entre positions logiques et lignes physiques
//!
//! La ligne 0 porte l'en-tête ; la position `p` d'un item occupe la ligne
//! `p + 1`.

use jsonlines::MAX_PADDING;

/// Ligne physique de l'en-tête
pub const HEADER_LINE: usize = 0;

/// Première ligne physique pouvant porter un item
pub const FIRST_ITEM_LINE: usize = 1;

/// Ligne physique d'une position ; `None` si elle n'est pas représentable
pub fn line_of(position: usize) -> Option<usize> {
    position.checked_add(FIRST_ITEM_LINE)
}

/// Position d'une ligne physique ; `None` pour la ligne d'en-tête
pub fn position_of(line: usize) -> Option<usize> {
    line.checked_sub(FIRST_ITEM_LINE)
}

/// Emplacement souhaité lors de l'écriture d'un item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Garde la position actuelle, ou ajoute en fin pour un nouvel item
    #[default]
    Keep,
    /// Déplace ou ajoute après le dernier item
    End,
    /// Position explicite
    At(usize),
}

impl Placement {
    /// Convertit un indice signé : tout indice négatif désigne la fin
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index).map_or(Placement::End, Placement::At)
    }
}

impl From<usize> for Placement {
    fn from(position: usize) -> Self {
        Placement::At(position)
    }
}

/// Ligne où écrire un item
///
/// `current` est la position de l'item avant son retrait, s'il existait, et
/// `append_line` la ligne d'ajout en fin calculée après ce retrait. La ligne
/// retournée n'est jamais celle de l'en-tête. `None` pour une position
/// explicite trop loin après la fin (plus de [`MAX_PADDING`] lignes vides à
/// créer).
pub fn target_line(placement: Placement, current: Option<usize>, append_line: usize) -> Option<usize> {
    match (placement, current) {
        (Placement::At(position), _) => {
            line_of(position).filter(|&line| line <= append_line.saturating_add(MAX_PADDING))
        }
        (Placement::Keep, Some(position)) => line_of(position),
        (Placement::Keep, None) | (Placement::End, _) => Some(append_line.max(FIRST_ITEM_LINE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(placement: Placement, current: Option<usize>, append: usize) -> usize {
        target_line(placement, current, append).unwrap()
    }

    #[test]
    fn test_line_mapping() {
        assert_eq!(line_of(0), Some(1));
        assert_eq!(line_of(usize::MAX), None);
        assert_eq!(position_of(1), Some(0));
        assert_eq!(position_of(HEADER_LINE), None);
    }

    #[test]
    fn test_placement_from_index() {
        assert_eq!(Placement::from_index(-1), Placement::End);
        assert_eq!(Placement::from_index(-7), Placement::End);
        assert_eq!(Placement::from_index(3), Placement::At(3));
        assert_eq!(Placement::from(2usize), Placement::At(2));
        assert_eq!(Placement::default(), Placement::Keep);
    }

    #[test]
    fn test_target_line() {
        // Position explicite, que l'item existe ou non
        assert_eq!(resolve(Placement::At(4), Some(1), 9), 5);
        assert_eq!(resolve(Placement::At(0), None, 9), 1);

        // Item existant gardé à sa place
        assert_eq!(resolve(Placement::Keep, Some(3), 9), 4);

        // Nouvel item ou déplacement en fin
        assert_eq!(resolve(Placement::Keep, None, 9), 9);
        assert_eq!(resolve(Placement::End, Some(3), 9), 9);

        // Fichier vide : la ligne 0 reste réservée à l'en-tête
        assert_eq!(resolve(Placement::End, None, 0), 1);
    }

    #[test]
    fn test_explicit_position_too_far() {
        assert_eq!(target_line(Placement::At(usize::MAX), None, 9), None);
        assert_eq!(target_line(Placement::At(usize::MAX - 1), None, 9), None);
        assert_eq!(target_line(Placement::At(9 + MAX_PADDING), None, 9), None);

        // Jusqu'à MAX_PADDING lignes vides peuvent être créées
        assert_eq!(
            target_line(Placement::At(8 + MAX_PADDING), None, 9),
            Some(9 + MAX_PADDING)
        );
    }
}
