//! Seams to the external collaborators feeding the engine.
//!
//! The core never reaches into a host runtime. Hosts hand it a corpus of
//! indexable paths, a flat command list, and a snapshot of addressable
//! objects through these traits; the in-memory implementations below cover
//! tests and embedders that already hold their data.

use std::collections::HashMap;

use anyhow::Result;

/// Supplies the full set of indexable paths for one index rebuild.
pub trait CorpusProvider: Send + Sync {
    /// One-shot full enumeration of every indexable path.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying source is unavailable; the index
    /// reports that to sessions as an unavailable corpus rather than a crash.
    fn enumerate(&self) -> Result<Vec<String>>;
}

/// Supplies named, executable command strings; consumed read-only per session.
pub trait CommandProvider: Send + Sync {
    fn commands(&self) -> Vec<String>;
}

/// An addressable in-memory object as reported by its host.
#[derive(Debug, Clone)]
pub struct LiveObject {
    pub id: u64,
    pub name: String,
}

/// Supplies a snapshot of live objects, plus extracted text for the
/// text-search variant.
pub trait LiveObjectProvider: Send + Sync {
    fn objects(&self) -> Vec<LiveObject>;

    /// Text blob to match against for the text-search category.
    fn extracted_text(&self, object: &LiveObject) -> String;
}

/// Corpus backed by a fixed in-memory path list.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    paths: Vec<String>,
}

impl StaticCorpus {
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl CorpusProvider for StaticCorpus {
    fn enumerate(&self) -> Result<Vec<String>> {
        Ok(self.paths.clone())
    }
}

/// Command provider backed by a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticCommands {
    commands: Vec<String>,
}

impl StaticCommands {
    #[must_use]
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }
}

impl CommandProvider for StaticCommands {
    fn commands(&self) -> Vec<String> {
        self.commands.clone()
    }
}

/// Live-object provider backed by fixed objects and text blobs.
#[derive(Debug, Clone, Default)]
pub struct StaticObjects {
    objects: Vec<LiveObject>,
    texts: HashMap<u64, String>,
}

impl StaticObjects {
    #[must_use]
    pub fn new(objects: Vec<LiveObject>) -> Self {
        Self {
            objects,
            texts: HashMap::new(),
        }
    }

    /// Attach an extracted text blob to the object with the given id.
    #[must_use]
    pub fn with_text(mut self, id: u64, text: impl Into<String>) -> Self {
        self.texts.insert(id, text.into());
        self
    }
}

impl LiveObjectProvider for StaticObjects {
    fn objects(&self) -> Vec<LiveObject> {
        self.objects.clone()
    }

    fn extracted_text(&self, object: &LiveObject) -> String {
        self.texts.get(&object.id).cloned().unwrap_or_default()
    }
}
