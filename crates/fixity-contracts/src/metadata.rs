//! Descriptive metadata, characterization terms, and the field mapping
//! between them.
//!
//! Descriptive fields are a closed set (`DescField`). Mapping targets are
//! resolved against that set once, when configuration is loaded, so merging
//! characterization output never looks a field up by name at call time.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FixityError, FixityResult};

/// A descriptive-metadata field of a generic file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescField {
    RelatedUrl,
    BasedNear,
    PartOf,
    Contributor,
    Creator,
    Title,
    Tag,
    Description,
    Publisher,
    DateCreated,
    DateUploaded,
    DateModified,
    Subject,
    Language,
    Date,
    Rights,
    ResourceType,
    Format,
    Identifier,
}

impl DescField {
    /// Every descriptive field, in declaration order.
    pub const ALL: [DescField; 19] = [
        DescField::RelatedUrl,
        DescField::BasedNear,
        DescField::PartOf,
        DescField::Contributor,
        DescField::Creator,
        DescField::Title,
        DescField::Tag,
        DescField::Description,
        DescField::Publisher,
        DescField::DateCreated,
        DescField::DateUploaded,
        DescField::DateModified,
        DescField::Subject,
        DescField::Language,
        DescField::Date,
        DescField::Rights,
        DescField::ResourceType,
        DescField::Format,
        DescField::Identifier,
    ];

    /// The snake_case name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            DescField::RelatedUrl => "related_url",
            DescField::BasedNear => "based_near",
            DescField::PartOf => "part_of",
            DescField::Contributor => "contributor",
            DescField::Creator => "creator",
            DescField::Title => "title",
            DescField::Tag => "tag",
            DescField::Description => "description",
            DescField::Publisher => "publisher",
            DescField::DateCreated => "date_created",
            DescField::DateUploaded => "date_uploaded",
            DescField::DateModified => "date_modified",
            DescField::Subject => "subject",
            DescField::Language => "language",
            DescField::Date => "date",
            DescField::Rights => "rights",
            DescField::ResourceType => "resource_type",
            DescField::Format => "format",
            DescField::Identifier => "identifier",
        }
    }

    /// Look a field up by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for DescField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multi-valued descriptive metadata, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescMetadata {
    fields: BTreeMap<DescField, Vec<String>>,
}

impl DescMetadata {
    /// All values of `field`, in insertion order. Empty when unset.
    pub fn get(&self, field: DescField) -> &[String] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace every value of `field`.
    pub fn set(&mut self, field: DescField, values: Vec<String>) {
        if values.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, values);
        }
    }

    /// Add `value` to `field` unless it is already present.
    ///
    /// Returns true when the value was added.
    pub fn append(&mut self, field: DescField, value: impl Into<String>) -> bool {
        let value = value.into();
        let values = self.fields.entry(field).or_default();
        if values.contains(&value) {
            false
        } else {
            values.push(value);
            true
        }
    }

    pub fn is_empty(&self, field: DescField) -> bool {
        self.get(field).is_empty()
    }
}

/// One characterization term value: a scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// Iterate the contained values; a scalar yields exactly one.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        match self {
            FieldValue::One(v) => std::slice::from_ref(v).iter(),
            FieldValue::Many(vs) => vs.iter(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::One(v) => v.is_empty(),
            FieldValue::Many(vs) => vs.iter().all(String::is_empty),
        }
    }
}

/// Flat mapping of characterization term name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMap(BTreeMap<String, FieldValue>);

impl TermMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: impl Into<String>, value: FieldValue) {
        self.0.insert(term.into(), value);
    }

    pub fn get(&self, term: &str) -> Option<&FieldValue> {
        self.0.get(term)
    }

    pub fn has_field(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

/// A single resolved mapping row: characterization term → descriptive field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapEntry {
    pub term: String,
    pub target: DescField,
}

/// The resolved characterization-to-descriptive field table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    entries: Vec<FieldMapEntry>,
}

impl FieldMapping {
    /// Resolve `(term, descriptive field name)` pairs.
    ///
    /// Returns `FixityError::ConfigError` when a target does not name a
    /// known descriptive field.
    pub fn resolve<I, T, D>(pairs: I) -> FixityResult<Self>
    where
        I: IntoIterator<Item = (T, D)>,
        T: Into<String>,
        D: AsRef<str>,
    {
        let mut entries = Vec::new();
        for (term, target) in pairs {
            let term = term.into();
            let target_name = target.as_ref();
            let target = DescField::from_name(target_name).ok_or_else(|| FixityError::ConfigError {
                reason: format!(
                    "characterization term '{term}' maps to unknown descriptive field '{target_name}'"
                ),
            })?;
            entries.push(FieldMapEntry { term, target });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FieldMapEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FieldMapping {
    /// `file_title → title`, `file_author → creator`.
    fn default() -> Self {
        Self {
            entries: vec![
                FieldMapEntry { term: "file_title".to_string(), target: DescField::Title },
                FieldMapEntry { term: "file_author".to_string(), target: DescField::Creator },
            ],
        }
    }
}
