//! Requêtes sur les objets d'un fichier JSON lines
//!
//! Une [`Query`] combine un groupe de conditions racine (ET / OU, avec groupes
//! imbriqués) et des critères de tri.
//!
//! ```
//! use jsonlines::{Direction, Logic, Operator, Query};
//! use serde_json::json;
//!
//! let mut query = Query::new(Logic::And);
//! query
//!     .condition("artist", "Blind Guardian", Operator::Equals)
//!     .order_by("title", Direction::Asc);
//! query
//!     .or_group()
//!     .condition("genre", "metal", Operator::Like)
//!     .condition("genre", json!(["power", "folk"]), Operator::In);
//! ```

use crate::{Error, Object, Result};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Combinaison logique des membres d'un groupe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl FromStr for Logic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Logic::And),
            "OR" => Ok(Logic::Or),
            other => Err(Error::InvalidOperator(other.to_string())),
        }
    }
}

/// Sens de tri
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            other => Err(Error::InvalidOperator(other.to_string())),
        }
    }
}

/// Opérateur de comparaison d'une condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Like,
    NotLike,
    Regex,
    NotRegex,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Regex => "REGEX",
            Operator::NotRegex => "NOT REGEX",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// Forme positive de l'opérateur et indicateur de négation
    fn positive(self) -> (Operator, bool) {
        match self {
            Operator::NotEquals => (Operator::Equals, true),
            Operator::NotIn => (Operator::In, true),
            Operator::NotLike => (Operator::Like, true),
            Operator::NotRegex => (Operator::Regex, true),
            Operator::NotBetween => (Operator::Between, true),
            Operator::IsNotNull => (Operator::IsNull, true),
            other => (other, false),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        match normalized.as_str() {
            "=" | "==" => Ok(Operator::Equals),
            "!=" | "<>" => Ok(Operator::NotEquals),
            "IN" => Ok(Operator::In),
            "NOT IN" => Ok(Operator::NotIn),
            "LIKE" => Ok(Operator::Like),
            "NOT LIKE" => Ok(Operator::NotLike),
            "REGEX" => Ok(Operator::Regex),
            "NOT REGEX" => Ok(Operator::NotRegex),
            "<" => Ok(Operator::LessThan),
            "<=" => Ok(Operator::LessOrEqual),
            ">" => Ok(Operator::GreaterThan),
            ">=" => Ok(Operator::GreaterOrEqual),
            "BETWEEN" => Ok(Operator::Between),
            "NOT BETWEEN" => Ok(Operator::NotBetween),
            "IS NULL" | "NULL" => Ok(Operator::IsNull),
            "IS NOT NULL" | "NOT NULL" => Ok(Operator::IsNotNull),
            _ => Err(Error::InvalidOperator(s.to_string())),
        }
    }
}

/// Chemin vers une propriété, éventuellement imbriquée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// Valeur désignée par le chemin dans `object`
    ///
    /// Un segment numérique indexe un tableau.
    pub fn resolve<'a>(&self, object: &'a Object) -> Option<&'a Value> {
        let (first, rest) = self.0.split_first()?;
        let mut current = object.get(first)?;
        for key in rest {
            current = match current {
                Value::Object(map) => map.get(key)?,
                Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<&str> for PropertyPath {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl From<String> for PropertyPath {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl From<&[&str]> for PropertyPath {
    fn from(keys: &[&str]) -> Self {
        Self::new(keys.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for PropertyPath {
    fn from(keys: [&str; N]) -> Self {
        Self::new(keys)
    }
}

impl From<Vec<String>> for PropertyPath {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

/// Condition élémentaire : `propriété opérateur valeur`
#[derive(Debug, Clone)]
pub struct Condition {
    path: PropertyPath,
    value: Value,
    operator: Operator,
    pattern: Option<std::result::Result<Regex, regex::Error>>,
}

impl Condition {
    pub fn new(path: impl Into<PropertyPath>, value: impl Into<Value>, operator: Operator) -> Self {
        let value = value.into();
        let pattern = match operator.positive().0 {
            Operator::Regex => Some(
                RegexBuilder::new(value.as_str().unwrap_or_default()).build(),
            ),
            _ => None,
        };

        Self {
            path: path.into(),
            value,
            operator,
            pattern,
        }
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Évalue la condition sur un objet
    ///
    /// Une propriété absente vaut `null`. Si la propriété est un tableau, la
    /// condition est vraie dès qu'elle l'est pour l'un de ses éléments.
    pub fn matches(&self, object: &Object) -> bool {
        let actual = self.path.resolve(object).unwrap_or(&Value::Null);
        let (operator, negated) = self.operator.positive();

        let hit = match operator {
            Operator::IsNull => actual.is_null(),
            _ => {
                self.test(operator, actual)
                    || match actual {
                        Value::Array(items) => items.iter().any(|item| self.test(operator, item)),
                        _ => false,
                    }
            }
        };

        hit != negated
    }

    fn test(&self, operator: Operator, actual: &Value) -> bool {
        match operator {
            Operator::Equals => loose_eq(actual, &self.value),
            Operator::In => match &self.value {
                Value::Array(candidates) => candidates.iter().any(|c| loose_eq(actual, c)),
                other => loose_eq(actual, other),
            },
            Operator::Like => {
                let Some(text) = as_text(actual) else {
                    return false;
                };
                let text = text.to_lowercase();
                terms(&self.value)
                    .iter()
                    .any(|term| text.contains(&term.to_lowercase()))
            }
            Operator::Regex => match (&self.pattern, as_text(actual)) {
                (Some(Ok(regex)), Some(text)) => regex.is_match(&text),
                _ => false,
            },
            Operator::LessThan => compare(actual, &self.value) == Some(Ordering::Less),
            Operator::LessOrEqual => matches!(
                compare(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::GreaterThan => compare(actual, &self.value) == Some(Ordering::Greater),
            Operator::GreaterOrEqual => matches!(
                compare(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Between => match self.value.as_array().map(Vec::as_slice) {
                Some([low, high]) => {
                    matches!(
                        compare(actual, low),
                        Some(Ordering::Greater | Ordering::Equal)
                    ) && matches!(
                        compare(actual, high),
                        Some(Ordering::Less | Ordering::Equal)
                    )
                }
                _ => false,
            },
            // Formes négatives et IS NULL traitées par `matches`
            _ => false,
        }
    }

    fn validate(&self) -> Result<()> {
        match &self.pattern {
            Some(Err(e)) => Err(Error::InvalidRegex(e.clone())),
            _ => Ok(()),
        }
    }
}

/// Membre d'un groupe : condition ou sous-groupe
#[derive(Debug, Clone)]
pub enum Member {
    Condition(Condition),
    Group(ConditionGroup),
}

/// Groupe de conditions combinées par ET ou par OU
#[derive(Debug, Clone, Default)]
pub struct ConditionGroup {
    logic: Logic,
    members: Vec<Member>,
}

impl ConditionGroup {
    pub fn new(logic: Logic) -> Self {
        Self {
            logic,
            members: Vec::new(),
        }
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Ajoute une condition au groupe
    pub fn condition(
        &mut self,
        path: impl Into<PropertyPath>,
        value: impl Into<Value>,
        operator: Operator,
    ) -> &mut Self {
        self.members
            .push(Member::Condition(Condition::new(path, value, operator)));
        self
    }

    /// Ajoute un sous-groupe ET et le retourne
    pub fn and_group(&mut self) -> &mut ConditionGroup {
        self.push_group(Logic::And)
    }

    /// Ajoute un sous-groupe OU et le retourne
    pub fn or_group(&mut self) -> &mut ConditionGroup {
        self.push_group(Logic::Or)
    }

    fn push_group(&mut self, logic: Logic) -> &mut ConditionGroup {
        self.members.push(Member::Group(ConditionGroup::new(logic)));
        match self.members.last_mut() {
            Some(Member::Group(group)) => group,
            _ => unreachable!("a group was just pushed"),
        }
    }

    /// Évalue le groupe ; un groupe vide accepte tout
    pub fn matches(&self, object: &Object) -> bool {
        if self.members.is_empty() {
            return true;
        }

        let mut results = self.members.iter().map(|member| match member {
            Member::Condition(condition) => condition.matches(object),
            Member::Group(group) => group.matches(object),
        });

        match self.logic {
            Logic::And => results.all(|hit| hit),
            Logic::Or => results.any(|hit| hit),
        }
    }

    fn validate(&self) -> Result<()> {
        for member in &self.members {
            match member {
                Member::Condition(condition) => condition.validate()?,
                Member::Group(group) => group.validate()?,
            }
        }
        Ok(())
    }
}

/// Requête : conditions + critères de tri
#[derive(Debug, Clone, Default)]
pub struct Query {
    root: ConditionGroup,
    order: Vec<(PropertyPath, Direction)>,
}

impl Query {
    pub fn new(logic: Logic) -> Self {
        Self {
            root: ConditionGroup::new(logic),
            order: Vec::new(),
        }
    }

    pub fn root(&self) -> &ConditionGroup {
        &self.root
    }

    pub fn condition(
        &mut self,
        path: impl Into<PropertyPath>,
        value: impl Into<Value>,
        operator: Operator,
    ) -> &mut Self {
        self.root.condition(path, value, operator);
        self
    }

    pub fn and_group(&mut self) -> &mut ConditionGroup {
        self.root.and_group()
    }

    pub fn or_group(&mut self) -> &mut ConditionGroup {
        self.root.or_group()
    }

    /// Ajoute un critère de tri (appliqués dans l'ordre d'ajout)
    pub fn order_by(&mut self, path: impl Into<PropertyPath>, direction: Direction) -> &mut Self {
        self.order.push((path.into(), direction));
        self
    }

    pub fn matches(&self, object: &Object) -> bool {
        self.root.matches(object)
    }

    /// Vérifie que les expressions régulières de la requête sont valides
    pub fn validate(&self) -> Result<()> {
        self.root.validate()
    }

    /// Trie les résultats selon les critères ; tri stable, les égalités
    /// gardent l'ordre d'entrée
    pub fn sort(&self, results: &mut [(usize, Object)]) {
        if self.order.is_empty() {
            return;
        }

        results.sort_by(|(_, a), (_, b)| {
            for (path, direction) in &self.order {
                let ordering = order_values(path.resolve(a), path.resolve(b));
                let ordering = match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn terms(value: &Value) -> Vec<Cow<'_, str>> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        other => as_text(other).into_iter().collect(),
    }
}

/// Égalité tolérante : un nombre est égal à sa représentation textuelle
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_))
        | (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_)) => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.to_lowercase().cmp(&y.to_lowercase())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => as_number(a)?.partial_cmp(&as_number(b)?),
    }
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Ordre total utilisé pour le tri des résultats
fn order_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => {
            x.to_lowercase().cmp(&y.to_lowercase())
        }
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => order_values(x.first(), y.first()),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("=".parse::<Operator>().unwrap(), Operator::Equals);
        assert_eq!("not  like".parse::<Operator>().unwrap(), Operator::NotLike);
        assert_eq!("IS NOT NULL".parse::<Operator>().unwrap(), Operator::IsNotNull);
        assert!("~".parse::<Operator>().is_err());
    }

    #[test]
    fn test_equals_on_array_property() {
        let item = object(json!({"artist": ["Blind Guardian", "Hansi Kürsch"]}));
        assert!(Condition::new("artist", "Blind Guardian", Operator::Equals).matches(&item));
        assert!(!Condition::new("artist", "Nightwish", Operator::Equals).matches(&item));
        assert!(Condition::new("artist", "Nightwish", Operator::NotEquals).matches(&item));
    }

    #[test]
    fn test_like_is_case_insensitive_and_accepts_several_terms() {
        let item = object(json!({"title": "Lazy Day Blues"}));
        assert!(Condition::new("title", "blues", Operator::Like).matches(&item));
        assert!(Condition::new("title", json!(["Blues", "kandeloj"]), Operator::Like).matches(&item));
        assert!(!Condition::new("title", "rock", Operator::Like).matches(&item));
    }

    #[test]
    fn test_missing_property_is_null() {
        let item = object(json!({"title": "x"}));
        assert!(Condition::new("album", Value::Null, Operator::IsNull).matches(&item));
        assert!(Condition::new("title", Value::Null, Operator::IsNotNull).matches(&item));
    }

    #[test]
    fn test_numeric_comparisons() {
        let item = object(json!({"year": 1992, "meta": {"rating": "4"}}));
        assert!(Condition::new("year", 2000, Operator::LessThan).matches(&item));
        assert!(Condition::new("year", json!([1990, 1995]), Operator::Between).matches(&item));
        assert!(Condition::new(["meta", "rating"], 4, Operator::Equals).matches(&item));
        assert!(Condition::new(["meta", "rating"], 3, Operator::GreaterOrEqual).matches(&item));
    }

    #[test]
    fn test_regex_and_invalid_regex() {
        let item = object(json!({"title": "Nightfall"}));
        assert!(Condition::new("title", "^Night", Operator::Regex).matches(&item));

        let mut query = Query::new(Logic::And);
        query.condition("title", "(", Operator::Regex);
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_groups() {
        let item = object(json!({"title": "Nightfall", "artist": "Blind Guardian"}));

        let mut query = Query::new(Logic::And);
        query.condition("artist", "Blind Guardian", Operator::Equals);
        query
            .or_group()
            .condition("title", "Valhalla", Operator::Equals)
            .condition("title", "night", Operator::Like);
        assert!(query.matches(&item));

        query.and_group().condition("title", "x", Operator::Equals);
        assert!(!query.matches(&item));

        assert!(Query::new(Logic::Or).matches(&item));
    }

    #[test]
    fn test_sort_is_stable_and_case_insensitive() {
        let mut results = vec![
            (1, object(json!({"title": "b"}))),
            (2, object(json!({"title": "A"}))),
            (3, object(json!({}))),
            (4, object(json!({"title": "a"}))),
        ];

        let mut query = Query::default();
        query.order_by("title", Direction::Asc);
        query.sort(&mut results);

        let lines: Vec<usize> = results.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![3, 2, 4, 1]);

        let mut query = Query::default();
        query.order_by("title", Direction::Desc);
        query.sort(&mut results);
        let lines: Vec<usize> = results.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_sort_desc_keeps_line_order_on_case_ties() {
        let mut results = vec![
            (1, object(json!({"title": "A"}))),
            (2, object(json!({"title": "a"}))),
        ];

        let mut query = Query::default();
        query.order_by("title", Direction::Desc);
        query.sort(&mut results);

        let lines: Vec<usize> = results.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![1, 2]);
    }
}
