//! En-tête de playlist (ligne 0 du fichier)

use crate::record::{Record, RecordKind};
use crate::schema::Schema;
use crate::{Object, Result};
use once_cell::sync::Lazy;
use std::ops::{Deref, DerefMut};

static HEADER_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::parse(&[
        ("title", &["is:string", "maxLength:255"][..]),
        ("description", &["is:string", "maxLength:255"][..]),
    ])
    .expect("header schema definition is valid")
});

pub(crate) fn schema() -> &'static Schema {
    &HEADER_SCHEMA
}

/// Métadonnées de la playlist : titre et description
#[derive(Debug, Clone, PartialEq)]
pub struct Header(Record);

impl Header {
    pub fn new() -> Self {
        Self(Record::new(RecordKind::Header))
    }

    pub fn from_object(data: Object) -> Self {
        Self(Record::from_object(RecordKind::Header, data))
    }

    pub fn from_json(json: &str) -> Option<Self> {
        Record::from_json(RecordKind::Header, json).map(Self)
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.set("title", title.into())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.set("description", description.into())
    }

    pub fn into_record(self) -> Record {
        self.0
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Header {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl DerefMut for Header {
    fn deref_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}
