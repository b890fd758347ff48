//! # jsonlines - Stockage ligne à ligne d'objets JSON
//!
//! Cette crate fournit l'accès à un fichier « JSON lines » (un objet JSON par
//! ligne, ou une ligne vide) par numéro de ligne :
//! - Lecture d'une ou plusieurs lignes, parcours complet
//! - Écrasement, insertion (avec décalage) et suppression de lignes
//! - Tirage aléatoire d'objets
//! - Requêtes avec conditions, groupes ET/OU et tri
//!
//! # Architecture
//!
//! - **LineStore** : trait d'accès ; seules la lecture et l'écriture de
//!   l'ensemble des lignes sont à fournir
//! - **JsonLines** : implémentation sur fichier
//! - **MemoryLines** : implémentation en mémoire
//! - **Query** : moteur de requêtes
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use jsonlines::{JsonLines, LineStore, Logic, Operator, Query};
//! use serde_json::json;
//!
//! # fn main() -> jsonlines::Result<()> {
//! let mut store = JsonLines::new("/tmp/tracks.jsonl");
//!
//! let object = json!({"title": "Nightfall"}).as_object().cloned().unwrap();
//! let line = store.name_last_line(true)?;
//! store.add_object(&object, line)?;
//!
//! let mut query = Query::new(Logic::And);
//! query.condition("title", "night", Operator::Like);
//! for (line, object) in store.find(&query)? {
//!     println!("{line}: {}", object["title"]);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod file;
mod lines;
mod memory;
mod search;
mod store;

// Réexports publics
pub use error::{Error, Result};
pub use file::JsonLines;
pub use lines::{decode, encode, Objects, MAX_PADDING};
pub use memory::MemoryLines;
pub use search::{Condition, ConditionGroup, Direction, Logic, Member, Operator, PropertyPath, Query};
pub use store::LineStore;

/// Objet JSON stocké sur une ligne
pub type Object = serde_json::Map<String, serde_json::Value>;
