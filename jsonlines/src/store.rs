//! Trait d'accès ligne à ligne à un fichier JSON lines

use crate::lines::{self, Objects};
use crate::search::Query;
use crate::{Object, Result};
use rand::seq::index;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Stockage de lignes JSON adressables par numéro de ligne (0-based)
///
/// Les implémentations ne fournissent que la lecture et l'écriture de
/// l'ensemble des lignes ; toutes les opérations ligne à ligne sont dérivées
/// et peuvent être surchargées pour de meilleures performances.
///
/// Les lectures échouent avec [`Error::FileDoesNotExist`](crate::Error::FileDoesNotExist)
/// si le support n'existe pas. Les écritures le créent.
pub trait LineStore {
    /// Lit toutes les lignes physiques
    fn read_lines(&self) -> Result<Vec<String>>;

    /// Remplace toutes les lignes physiques
    fn write_lines(&mut self, lines: &[String]) -> Result<()>;

    /// Nombre de lignes et `true` si la dernière est vide
    fn count_lines(&self) -> Result<(usize, bool)> {
        Ok(lines::count(&self.read_lines()?))
    }

    /// Numéro de la ligne qu'occuperait un nouvel enregistrement ajouté en fin
    ///
    /// Avec `skip_trailing_blank`, une dernière ligne vide est réutilisée.
    fn name_last_line(&self, skip_trailing_blank: bool) -> Result<usize> {
        let (count, last_blank) = self.count_lines()?;
        Ok(if skip_trailing_blank && last_blank {
            count - 1
        } else {
            count
        })
    }

    /// Texte brut d'une ligne, `None` si elle n'existe pas
    fn get_line(&self, line: usize) -> Result<Option<String>> {
        Ok(self.read_lines()?.into_iter().nth(line))
    }

    /// Objet d'une ligne, `None` si elle est absente, vide ou malformée
    fn get_object(&self, line: usize) -> Result<Option<Object>> {
        Ok(self.get_line(line)?.as_deref().and_then(lines::decode))
    }

    /// Objets de plusieurs lignes ; les lignes sans objet sont omises
    fn get_objects(&self, wanted: &[usize]) -> Result<BTreeMap<usize, Object>> {
        let wanted: BTreeSet<usize> = wanted.iter().copied().collect();
        let all = self.read_lines()?;

        Ok(wanted
            .into_iter()
            .filter_map(|line| {
                all.get(line)
                    .and_then(|text| lines::decode(text))
                    .map(|object| (line, object))
            })
            .collect())
    }

    /// Parcourt tous les objets du fichier
    fn objects(&self) -> Result<Objects> {
        Ok(Objects::new(self.read_lines()?))
    }

    /// Écrase la ligne `line`
    fn set_object(&mut self, line: usize, object: &Object) -> Result<()> {
        let text = lines::encode(object)?;
        let mut all = lines_for_update(self)?;
        lines::replace(&mut all, line, text)?;
        debug!(line, "Overwriting line");
        self.write_lines(&all)
    }

    /// Insère un objet à la ligne `line`, en décalant les suivantes vers le bas
    fn add_object(&mut self, object: &Object, line: usize) -> Result<()> {
        let text = lines::encode(object)?;
        let mut all = lines_for_update(self)?;
        lines::insert(&mut all, line, text)?;
        debug!(line, "Inserting line");
        self.write_lines(&all)
    }

    /// Retire la ligne `from` puis insère l'objet, en une seule écriture
    ///
    /// `target` reçoit la ligne d'ajout en fin, calculée après le retrait, et
    /// choisit la ligne d'insertion. S'il retourne `None`, rien n'est écrit.
    /// Retourne la ligne écrite.
    fn move_object<F>(
        &mut self,
        object: &Object,
        from: Option<usize>,
        target: F,
    ) -> Result<Option<usize>>
    where
        Self: Sized,
        F: FnOnce(usize) -> Option<usize>,
    {
        let text = lines::encode(object)?;
        let mut all = lines_for_update(self)?;
        if let Some(from) = from {
            lines::remove(&mut all, from);
        }

        let Some(line) = target(lines::append_line(&all)) else {
            return Ok(None);
        };
        lines::insert(&mut all, line, text)?;
        debug!(?from, line, "Moving line");
        self.write_lines(&all)?;
        Ok(Some(line))
    }

    /// Supprime la ligne `line`, en remontant les suivantes
    ///
    /// Retourne `false` si la ligne n'existait pas (aucune écriture).
    fn delete_object(&mut self, line: usize) -> Result<bool> {
        let mut all = lines_for_update(self)?;
        if !lines::remove(&mut all, line) {
            return Ok(false);
        }
        debug!(line, "Deleting line");
        self.write_lines(&all)?;
        Ok(true)
    }

    /// Tire au hasard jusqu'à `count` objets distincts entre les lignes
    /// `from` et `to` incluses (`to` par défaut : dernière ligne)
    fn get_random_objects(
        &self,
        count: usize,
        from: usize,
        to: Option<usize>,
    ) -> Result<BTreeMap<usize, Object>> {
        let all = self.read_lines()?;
        let Some(last) = all.len().checked_sub(1) else {
            return Ok(BTreeMap::new());
        };
        let to = to.map_or(last, |to| to.min(last));
        if count == 0 || from > to {
            return Ok(BTreeMap::new());
        }

        let mut pool: Vec<(usize, Object)> = (from..=to)
            .filter_map(|line| lines::decode(&all[line]).map(|object| (line, object)))
            .collect();

        let amount = count.min(pool.len());
        if amount == 0 {
            return Ok(BTreeMap::new());
        }

        let mut picked: Vec<usize> = index::sample(&mut rand::rng(), pool.len(), amount)
            .into_iter()
            .collect();
        // Retrait par indices décroissants pour garder les autres valides
        picked.sort_unstable_by(|a, b| b.cmp(a));

        Ok(picked
            .into_iter()
            .map(|i| pool.swap_remove(i))
            .collect())
    }

    /// Exécute une requête ; les résultats suivent l'ordre demandé puis l'ordre des lignes
    fn find(&self, query: &Query) -> Result<Vec<(usize, Object)>> {
        query.validate()?;

        let mut results: Vec<(usize, Object)> = self
            .objects()?
            .filter_map(|(line, object)| object.map(|object| (line, object)))
            .filter(|(_, object)| query.matches(object))
            .collect();

        query.sort(&mut results);
        Ok(results)
    }
}

/// Lignes actuelles avant une écriture ; un support absent compte pour vide
fn lines_for_update<S: LineStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    match store.read_lines() {
        Err(e) if e.is_missing_file() => Ok(Vec::new()),
        other => other,
    }
}
