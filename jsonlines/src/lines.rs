//! Modèle de lignes partagé par toutes les implémentations de [`LineStore`](crate::LineStore)
//!
//! Le contenu est découpé sur `\n` : un fichier terminé par un saut de ligne
//! possède donc une dernière ligne vide, et un fichier vide ne contient aucune
//! ligne. Toute écriture termine le fichier par `\n`.

use crate::{Error, Object, Result};
use serde_json::Value;
use std::iter::Enumerate;
use std::vec::IntoIter;
use tracing::trace;

/// Découpe un contenu texte en lignes physiques
pub(crate) fn split(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }

    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Recompose le contenu texte à partir des lignes physiques
pub(crate) fn join(lines: &[String]) -> String {
    let mut content = lines.join("\n");
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

/// Nombre de lignes et vacuité de la dernière
pub(crate) fn count(lines: &[String]) -> (usize, bool) {
    let last_blank = lines
        .last()
        .map(|line| line.trim().is_empty())
        .unwrap_or(false);
    (lines.len(), last_blank)
}

/// Ligne qu'occuperait un objet ajouté en fin ; une dernière ligne vide est réutilisée
pub(crate) fn append_line(lines: &[String]) -> usize {
    match count(lines) {
        (count, true) => count - 1,
        (count, false) => count,
    }
}

/// Nombre maximal de lignes vides ajoutées pour atteindre une ligne au-delà de la fin
pub const MAX_PADDING: usize = 1000;

/// Vérifie que `line` est atteignable sans dépasser [`MAX_PADDING`]
fn check_reachable(lines: &[String], line: usize) -> Result<()> {
    let limit = lines.len().saturating_add(MAX_PADDING);
    if line > limit {
        return Err(Error::LineOutOfRange { line, limit });
    }
    Ok(())
}

/// Insère `text` à la ligne `line`, en décalant les suivantes
///
/// Si `line` est au-delà de la fin, le trou est comblé par des lignes vides.
pub(crate) fn insert(lines: &mut Vec<String>, line: usize, text: String) -> Result<()> {
    check_reachable(lines, line)?;
    if line > lines.len() {
        lines.resize(line, String::new());
    }
    lines.insert(line, text);
    Ok(())
}

/// Remplace la ligne `line` (avec comblement si nécessaire)
pub(crate) fn replace(lines: &mut Vec<String>, line: usize, text: String) -> Result<()> {
    check_reachable(lines, line)?;
    if line < lines.len() {
        lines[line] = text;
    } else {
        lines.resize(line, String::new());
        lines.push(text);
    }
    Ok(())
}

/// Supprime la ligne `line`, en remontant les suivantes
pub(crate) fn remove(lines: &mut Vec<String>, line: usize) -> bool {
    if line < lines.len() {
        lines.remove(line);
        true
    } else {
        false
    }
}

/// Décode une ligne en objet JSON
///
/// Retourne `None` pour une ligne vide, un JSON invalide ou une valeur qui
/// n'est pas un objet : l'appelant ne peut pas distinguer ces cas.
pub fn decode(line: &str) -> Option<Object> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        Ok(other) => {
            trace!(kind = %json_kind(&other), "Line holds a JSON value that is not an object");
            None
        }
        Err(e) => {
            trace!(error = %e, "Line is not valid JSON");
            None
        }
    }
}

/// Encode un objet sur une seule ligne
pub fn encode(object: &Object) -> Result<String> {
    Ok(serde_json::to_string(object)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Itérateur sur les objets d'un fichier, ligne par ligne
///
/// Produit `(ligne, Some(objet))` pour une ligne décodable et `(ligne, None)`
/// pour une ligne vide ou malformée.
pub struct Objects {
    inner: Enumerate<IntoIter<String>>,
}

impl Objects {
    pub(crate) fn new(lines: Vec<String>) -> Self {
        Self {
            inner: lines.into_iter().enumerate(),
        }
    }
}

impl Iterator for Objects {
    type Item = (usize, Option<Object>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(line, text)| (line, decode(&text)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Objects {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|(line, text)| (line, decode(&text)))
    }
}

impl ExactSizeIterator for Objects {}
