//! The generic file: a deposited digital object plus its metadata.
//!
//! A `GenericFile` is a working copy. Repositories hand one out from
//! `FileRepository::find`, callers mutate it, and `FileRepository::save`
//! persists the changes. Content set through `set_content` stays staged (and
//! `content_changed()` stays true) until a save writes it as a new version.

use crate::{ids::ObjectId, metadata::{DescField, DescMetadata}};

#[derive(Debug, Clone)]
pub struct GenericFile {
    /// Persistent identifier.
    pub id: ObjectId,
    /// Display label, normally the uploaded file name.
    label: String,
    /// File name recorded by characterization.
    pub filename: Option<String>,
    /// Descriptive metadata (`descMetadata` datastream).
    pub desc: DescMetadata,
    /// Raw characterization output (`characterization` datastream).
    pub characterization: Option<serde_json::Value>,
    staged_content: Option<Vec<u8>>,
    new_object: bool,
}

impl GenericFile {
    /// Create a new, unsaved object. The title defaults to `label`.
    pub fn new(id: ObjectId, label: impl Into<String>) -> Self {
        let mut file = Self {
            id,
            label: String::new(),
            filename: None,
            desc: DescMetadata::default(),
            characterization: None,
            staged_content: None,
            new_object: true,
        };
        file.set_label(label);
        file
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Change the display label. An empty title is filled from it.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        if self.desc.is_empty(DescField::Title) && !self.label.is_empty() {
            self.desc.set(DescField::Title, vec![self.label.clone()]);
        }
    }

    /// Stage new content; marks the content datastream changed.
    pub fn set_content(&mut self, bytes: impl Into<Vec<u8>>) {
        self.staged_content = Some(bytes.into());
    }

    /// The pre-save dirty flag of the content datastream.
    pub fn content_changed(&self) -> bool {
        self.staged_content.is_some()
    }

    pub fn staged_content(&self) -> Option<&[u8]> {
        self.staged_content.as_deref()
    }

    /// Remove and return the staged content. Used by repositories on save.
    pub fn take_staged_content(&mut self) -> Option<Vec<u8>> {
        self.staged_content.take()
    }

    /// True until the object has been saved once.
    pub fn is_new_object(&self) -> bool {
        self.new_object
    }

    /// Record that the object now exists in a repository.
    pub fn mark_persisted(&mut self) {
        self.new_object = false;
    }
}
