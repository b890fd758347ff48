//! Enregistrement générique validé par un schéma
//!
//! L'en-tête et les items d'une playlist partagent la même mécanique : un
//! objet JSON plat dont les écritures sont validées propriété par propriété.
//! Seul le schéma diffère, porté par [`RecordKind`].

use crate::schema::{is_empty_value, Schema};
use crate::{header, item, Error, Object, Result};
use serde_json::Value;
use std::fmt;
use tracing::trace;

/// Nature d'un enregistrement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Header,
    Item,
}

impl RecordKind {
    /// Schéma associé
    pub fn schema(&self) -> &'static Schema {
        match self {
            RecordKind::Header => header::schema(),
            RecordKind::Item => item::schema(),
        }
    }

    /// Règles propres à la nature de l'enregistrement, hors schéma
    fn check(&self, data: &Object, errors: &mut Vec<String>) {
        if let RecordKind::Item = self {
            item::check_title_or_album(data, errors);
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Header => f.write_str("header"),
            RecordKind::Item => f.write_str("item"),
        }
    }
}

/// Objet JSON plat associé à un schéma
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: RecordKind,
    data: Object,
}

impl Record {
    pub fn new(kind: RecordKind) -> Self {
        Self::from_object(kind, Object::new())
    }

    /// Enveloppe un objet existant, sans validation
    pub fn from_object(kind: RecordKind, data: Object) -> Self {
        Self { kind, data }
    }

    /// Décode une ligne JSON ; `None` si elle est vide, invalide ou n'est pas un objet
    pub fn from_json(kind: RecordKind, json: &str) -> Option<Self> {
        let record = jsonlines::decode(json).map(|data| Self::from_object(kind, data));
        if record.is_none() {
            trace!(%kind, "No record in JSON text");
        }
        record
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }

    /// Valeurs textuelles d'une propriété chaîne ou tableau de chaînes
    pub fn get_strings(&self, name: &str) -> Vec<&str> {
        match self.data.get(name) {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Vrai si la propriété est présente et non vide
    pub fn is_set(&self, name: &str) -> bool {
        self.data.get(name).is_some_and(|value| !is_empty_value(value))
    }

    /// Affecte une propriété après validation
    ///
    /// En cas d'échec l'enregistrement est inchangé.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.validate_property(name, &value)
            .map_err(|errors| Error::InvalidProperty {
                name: name.to_string(),
                errors,
            })?;
        self.data.insert(name.to_string(), value);
        Ok(())
    }

    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.data.remove(name)
    }

    /// Supprime toutes les propriétés sauf celles listées
    pub fn clear(&mut self, except: &[&str]) {
        self.data.retain(|name, _| except.contains(&name.as_str()));
    }

    pub fn data(&self) -> &Object {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut Object {
        &mut self.data
    }

    /// Copie indépendante des propriétés
    pub fn copy_of_data(&self) -> Object {
        self.data.clone()
    }

    pub fn into_data(self) -> Object {
        self.data
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    pub fn missing_properties(&self) -> Vec<String> {
        self.schema().missing_properties(&self.data)
    }

    pub fn validate_property(&self, name: &str, value: &Value) -> std::result::Result<(), Vec<String>> {
        self.schema().validate_property(name, value)
    }

    pub fn is_valid_property(&self, name: &str, value: &Value) -> bool {
        self.validate_property(name, value).is_ok()
    }

    /// Valide l'enregistrement complet et retourne tous les messages d'erreur
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();
        self.kind.check(&self.data, &mut errors);
        if let Err(schema_errors) = self.schema().validate(&self.data) {
            errors.extend(schema_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Retire les valeurs vides ou invalides, voir [`Schema::sanitize`]
    pub fn sanitize(&mut self) {
        self.kind.schema().sanitize(&mut self.data);
    }

    /// Sérialisation sur une ligne
    pub fn to_json(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.data).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
