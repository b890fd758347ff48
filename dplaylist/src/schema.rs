//! Schéma déclaratif des propriétés et moteur de validation
//!
//! Un schéma associe à chaque propriété canonique une liste de règles,
//! décrites par une petite grammaire textuelle analysée une seule fois :
//!
//! - `required` : la propriété doit être présente
//! - `is:t1|t2|...` : la valeur doit correspondre à l'un des types
//! - `maxLength:n` : longueur au plus `n`
//! - `length:n` : longueur exactement `n`
//!
//! Les propriétés non canoniques dont le nom suit le motif `xxx<suffixe>`
//! (suffixe alphanumérique ou `_`, 1 à 100 caractères) sont acceptées avec
//! les règles `is:null|alphanumeric|alphanumeric[]` et `maxLength:255`.

use crate::{Error, Object, Result};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const CUSTOM_PREFIX: &str = "xxx";
const CUSTOM_SUFFIX_MAX: usize = 100;

static CUSTOM_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::Is(vec![
            ValueType::Null,
            ValueType::Alphanumeric,
            ValueType::AlphanumericArray,
        ]),
        Rule::MaxLength(255),
    ]
});

/// Types reconnus par la règle `is`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Int,
    Bool,
    Null,
    StringArray,
    IntArray,
    NumericArray,
    Alphanumeric,
    AlphanumericArray,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::Null => "null",
            ValueType::StringArray => "string[]",
            ValueType::IntArray => "int[]",
            ValueType::NumericArray => "numeric[]",
            ValueType::Alphanumeric => "alphanumeric",
            ValueType::AlphanumericArray => "alphanumeric[]",
        }
    }

    /// Vérifie qu'une valeur correspond au type
    ///
    /// Les types tableau exigent un tableau non vide.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Int => is_int(value),
            ValueType::Bool => value.is_boolean(),
            ValueType::Null => value.is_null(),
            ValueType::StringArray => all_elements(value, Value::is_string),
            ValueType::IntArray => all_elements(value, is_int),
            ValueType::NumericArray => all_elements(value, is_numeric),
            ValueType::Alphanumeric => is_alphanumeric(value),
            ValueType::AlphanumericArray => all_elements(value, is_alphanumeric),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "string" => Ok(ValueType::String),
            "int" => Ok(ValueType::Int),
            "bool" => Ok(ValueType::Bool),
            "null" => Ok(ValueType::Null),
            "string[]" => Ok(ValueType::StringArray),
            "int[]" => Ok(ValueType::IntArray),
            "numeric[]" => Ok(ValueType::NumericArray),
            "alphanumeric" => Ok(ValueType::Alphanumeric),
            "alphanumeric[]" => Ok(ValueType::AlphanumericArray),
            other => Err(Error::Schema(format!("unknown type '{other}'"))),
        }
    }
}

/// Règle de validation d'une propriété
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Is(Vec<ValueType>),
    MaxLength(usize),
    Length(usize),
}

impl Rule {
    /// Message d'erreur si `value` enfreint la règle
    ///
    /// `Required` porte sur la présence de la propriété et n'est jamais
    /// enfreinte par une valeur.
    pub fn check(&self, name: &str, value: &Value) -> Option<String> {
        match self {
            Rule::Required => None,
            Rule::Is(types) => {
                if types.iter().any(|t| t.matches(value)) {
                    None
                } else {
                    let names: Vec<&str> = types.iter().map(ValueType::as_str).collect();
                    Some(format!("{name} should be of the types: {}", names.join(", ")))
                }
            }
            Rule::MaxLength(max) => (value_length(value) > *max)
                .then(|| format!("{name} should not be longer than {max} characters")),
            Rule::Length(length) => (value_length(value) != *length)
                .then(|| format!("{name} should be {length} characters long")),
        }
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "required" {
            return Ok(Rule::Required);
        }

        let (kind, argument) = s
            .split_once(':')
            .ok_or_else(|| Error::Schema(format!("unknown rule '{s}'")))?;

        match kind {
            "is" => {
                let types = argument
                    .split('|')
                    .map(ValueType::from_str)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Rule::Is(types))
            }
            "maxLength" => Ok(Rule::MaxLength(parse_length(s, argument)?)),
            "length" => Ok(Rule::Length(parse_length(s, argument)?)),
            _ => Err(Error::Schema(format!("unknown rule '{s}'"))),
        }
    }
}

fn parse_length(rule: &str, argument: &str) -> Result<usize> {
    argument
        .trim()
        .parse()
        .map_err(|_| Error::Schema(format!("invalid length in rule '{rule}'")))
}

/// Ensemble ordonné des propriétés canoniques et de leurs règles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    properties: Vec<(String, Vec<Rule>)>,
}

impl Schema {
    /// Construit un schéma à partir de la grammaire textuelle
    ///
    /// # Exemple
    ///
    /// ```
    /// use dplaylist::Schema;
    ///
    /// let schema = Schema::parse(&[
    ///     ("uuid", &["required", "is:string", "length:36"][..]),
    ///     ("title", &["is:string", "maxLength:255"][..]),
    /// ]).unwrap();
    /// assert!(schema.is_canonical("title"));
    /// ```
    pub fn parse(definition: &[(&str, &[&str])]) -> Result<Self> {
        let properties = definition
            .iter()
            .map(|(name, rules)| {
                let rules = rules
                    .iter()
                    .map(|rule| rule.parse())
                    .collect::<Result<Vec<Rule>>>()?;
                Ok((name.to_string(), rules))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { properties })
    }

    pub fn rules(&self, name: &str) -> Option<&[Rule]> {
        self.properties
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        self.rules(name).is_some()
    }

    /// Propriétés canoniques, dans l'ordre de déclaration
    pub fn canonical_properties(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    pub fn required_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, rules)| rules.contains(&Rule::Required))
            .map(|(name, _)| name.as_str())
    }

    /// Un nom est accepté s'il est canonique ou suit le motif personnalisé
    pub fn is_valid_property_name(&self, name: &str) -> bool {
        self.is_canonical(name) || is_custom_property_name(name)
    }

    /// Valide une valeur pour une propriété
    ///
    /// Toutes les règles sont évaluées et chaque échec produit un message.
    pub fn validate_property(
        &self,
        name: &str,
        value: &Value,
    ) -> std::result::Result<(), Vec<String>> {
        let errors: Vec<String> = if let Some(rules) = self.rules(name) {
            rules.iter().filter_map(|rule| rule.check(name, value)).collect()
        } else if is_custom_property_name(name) {
            CUSTOM_RULES
                .iter()
                .filter_map(|rule| rule.check(name, value))
                .collect()
        } else {
            vec![format!("unrecognized {name} property")]
        };

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn is_valid_property(&self, name: &str, value: &Value) -> bool {
        self.validate_property(name, value).is_ok()
    }

    /// Propriétés obligatoires absentes ou vides, dans l'ordre du schéma
    pub fn missing_properties(&self, data: &Object) -> Vec<String> {
        self.required_properties()
            .filter(|name| data.get(*name).map_or(true, is_empty_value))
            .map(str::to_string)
            .collect()
    }

    /// Valide un ensemble complet de propriétés
    pub fn validate(&self, data: &Object) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let missing = self.missing_properties(data);
        if !missing.is_empty() {
            errors.push(format!(
                "The following properties are missing: {}",
                missing.join(", ")
            ));
        }

        for (name, value) in data {
            if let Err(property_errors) = self.validate_property(name, value) {
                errors.extend(property_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Nettoie les propriétés en place
    ///
    /// Les tableaux perdent leurs éléments vides ; un tableau réduit à un seul
    /// élément valide pour la propriété est remplacé par cet élément. Toute
    /// valeur vide ou invalide est ensuite supprimée.
    pub fn sanitize(&self, data: &mut Object) {
        let mut rejected = Vec::new();

        for (name, value) in data.iter_mut() {
            if let Value::Array(items) = value {
                items.retain(|item| !is_empty_value(item));
                if items.len() == 1 && self.is_valid_property(name, &items[0]) {
                    let single = items.remove(0);
                    *value = single;
                }
            }

            if is_empty_value(value) || !self.is_valid_property(name, value) {
                rejected.push(name.clone());
            }
        }

        for name in rejected {
            data.remove(&name);
        }
    }
}

/// Nom de propriété personnalisée : `xxx` suivi de 1 à 100 caractères `[A-Za-z0-9_]`
pub fn is_custom_property_name(name: &str) -> bool {
    name.strip_prefix(CUSTOM_PREFIX).is_some_and(|suffix| {
        (1..=CUSTOM_SUFFIX_MAX).contains(&suffix.len())
            && suffix
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

/// Une valeur est vide si elle vaut `null`, `false`, `""`, `[]` ou `{}`
///
/// Les nombres ne sont jamais vides, pas plus que la chaîne `"0"`.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// Longueur en caractères d'une valeur, cumulée sur les tableaux
pub fn value_length(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        Value::Number(n) => n.to_string().chars().count(),
        Value::Bool(true) => 1,
        Value::Bool(false) | Value::Null => 0,
        Value::Array(items) => items.iter().map(value_length).sum(),
        Value::Object(_) => 0,
    }
}

/// Nombre JSON, ou chaîne représentant un nombre fini
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty()
                && s
                    .bytes()
                    .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
                && s.parse::<f64>().is_ok_and(f64::is_finite)
        }
        _ => false,
    }
}

fn is_int(value: &Value) -> bool {
    value.as_i64().is_some() || value.as_u64().is_some()
}

fn is_alphanumeric(value: &Value) -> bool {
    value.is_string() || value.is_number()
}

fn all_elements(value: &Value, check: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(check),
        _ => false,
    }
}
