//! Item de playlist : une piste identifiée par un UUID

use crate::identity;
use crate::record::{Record, RecordKind};
use crate::schema::{is_empty_value, Schema};
use crate::{Object, Result};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::ops::{Deref, DerefMut};

static ITEM_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::parse(&[
        ("uuid", &["required", "is:string", "length:36"][..]),
        ("title", &["is:string", "maxLength:255"][..]),
        ("artist", &["is:string|string[]", "maxLength:255"][..]),
        ("featuring", &["is:string|string[]", "maxLength:255"][..]),
        ("soundtrack", &["is:string|string[]", "maxLength:255"][..]),
        ("cover", &["is:string", "maxLength:255"][..]),
        ("album", &["is:string", "maxLength:255"][..]),
        ("genre", &["is:string|string[]", "maxLength:255"][..]),
    ])
    .expect("item schema definition is valid")
});

pub(crate) fn schema() -> &'static Schema {
    &ITEM_SCHEMA
}

/// Un item doit porter au moins un titre ou un album
pub(crate) fn check_title_or_album(data: &Object, errors: &mut Vec<String>) {
    let filled = |name: &str| data.get(name).is_some_and(|value| !is_empty_value(value));
    if !filled("title") && !filled("album") {
        errors.push("Inform a title or an album".to_string());
    }
}

/// Piste d'une playlist
///
/// Tout item porte un `uuid`, généré à la construction s'il est absent.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistItem(Record);

impl PlaylistItem {
    pub fn new() -> Self {
        Self::from_object(Object::new())
    }

    pub fn from_object(data: Object) -> Self {
        let mut item = Self(Record::from_object(RecordKind::Item, data));
        if !item.is_set("uuid") {
            item.generate_uuid();
        }
        item
    }

    pub fn from_json(json: &str) -> Option<Self> {
        jsonlines::decode(json).map(Self::from_object)
    }

    /// Remplace l'identifiant par un nouvel UUID et le retourne
    pub fn generate_uuid(&mut self) -> String {
        let uuid = identity::generate_uuid();
        self.0
            .data_mut()
            .insert("uuid".to_string(), Value::String(uuid.clone()));
        uuid
    }

    /// Copie de l'item sous un nouvel identifiant
    pub fn create_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.generate_uuid();
        copy
    }

    pub fn uuid(&self) -> Option<&str> {
        self.get_str("uuid")
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    pub fn album(&self) -> Option<&str> {
        self.get_str("album")
    }

    pub fn cover(&self) -> Option<&str> {
        self.get_str("cover")
    }

    pub fn artists(&self) -> Vec<&str> {
        self.get_strings("artist")
    }

    pub fn genres(&self) -> Vec<&str> {
        self.get_strings("genre")
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.set("title", title.into())
    }

    pub fn set_album(&mut self, album: impl Into<String>) -> Result<()> {
        self.set("album", album.into())
    }

    pub fn into_record(self) -> Record {
        self.0
    }
}

impl Default for PlaylistItem {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PlaylistItem {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl DerefMut for PlaylistItem {
    fn deref_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}
