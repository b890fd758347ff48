//! # dplaylist - Playlists descriptives
//!
//! Une playlist descriptive est un fichier texte dont chaque ligne porte un
//! objet JSON : la ligne 0 contient l'en-tête (titre, description), les
//! lignes suivantes les pistes. Chaque piste est adressable par sa position
//! (0 pour la première piste) et par son UUID.
//!
//! ## Fonctionnalités
//!
//! - Validation déclarative des propriétés (types, longueurs, propriétés
//!   personnalisées `xxx*`) et nettoyage des valeurs
//! - Lecture par position, par lot de positions ou par UUID
//! - Insertion, déplacement et suppression avec décalage des positions
//! - Tirage aléatoire et recherche par conditions
//! - Ouverture de playlists nommées depuis une configuration YAML
//!
//! ## Exemple
//!
//! ```no_run
//! use dplaylist::{Header, Placement, Playlist, PlaylistItem};
//!
//! # fn main() -> dplaylist::Result<()> {
//! let mut playlist = Playlist::open("/tmp/demo.dpls");
//!
//! let mut header = Header::new();
//! header.set_title("Demo")?;
//! playlist.set_header(&header)?;
//!
//! let mut item = PlaylistItem::new();
//! item.set_title("Nightfall")?;
//! item.set("artist", "Blind Guardian")?;
//! playlist.set_item(&item, Placement::End)?;
//!
//! assert_eq!(playlist.position_of(&item), Some(0));
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
mod header;
pub mod identity;
mod item;
mod iter;
mod playlist;
pub mod position;
mod record;
pub mod schema;
mod search;

// Réexports publics
pub use config::{PlaylistsConfig, PlaylistsSection};
pub use error::{Error, Result};
pub use header::Header;
pub use identity::{generate_uuid, uuid_from_bytes};
pub use item::PlaylistItem;
pub use iter::Items;
pub use playlist::Playlist;
pub use position::Placement;
pub use record::{Record, RecordKind};
pub use schema::{Rule, Schema, ValueType};
pub use search::Search;

pub use jsonlines::{Direction, JsonLines, LineStore, Logic, MemoryLines, Object, Operator};
