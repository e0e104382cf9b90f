//! Extend-prompt storage
//!
//! Loads a directory of UTF-8 prompt files into an immutable store, one
//! prompt per file. Entries are sorted by file name before indices are
//! assigned, because raw directory-listing order is OS-dependent. Each
//! prompt is also addressable by its file stem.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Error type for prompt store operations
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("prompt index {index} out of range ({len} prompts loaded)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown prompt name: {0}")]
    UnknownName(String),

    #[error("duplicate prompt name: {0}")]
    DuplicateName(String),
}

/// Selects a prompt by load position or by file stem.
///
/// Positional selection exists for index-driven callers; names are stable
/// across platforms and preferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSelector {
    Index(usize),
    Name(String),
}

impl From<usize> for PromptSelector {
    fn from(index: usize) -> Self {
        PromptSelector::Index(index)
    }
}

impl From<&str> for PromptSelector {
    fn from(name: &str) -> Self {
        PromptSelector::Name(name.to_string())
    }
}

impl From<String> for PromptSelector {
    fn from(name: String) -> Self {
        PromptSelector::Name(name)
    }
}

#[derive(Debug, Clone)]
struct PromptEntry {
    name: String,
    text: String,
}

/// Immutable collection of extend prompts, loaded once at startup.
///
/// Construct with [`PromptStore::load`] and pass by reference into whatever
/// consumes it; there is no process-wide instance.
#[derive(Debug, Clone)]
pub struct PromptStore {
    entries: Vec<PromptEntry>,
    by_name: HashMap<String, usize>,
}

impl PromptStore {
    /// Read every regular file in `dir` as a UTF-8 prompt.
    ///
    /// Fails if the directory cannot be listed, a file cannot be read as
    /// UTF-8, or two files share a stem. Subdirectories are skipped.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, PromptError> {
        let dir = dir.as_ref();
        let listing = fs::read_dir(dir).map_err(|source| PromptError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|source| PromptError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let file_type = entry.file_type().map_err(|source| PromptError::Io {
                path: entry.path(),
                source,
            })?;
            if file_type.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut entries = Vec::with_capacity(paths.len());
        let mut by_name = HashMap::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(&path).map_err(|source| PromptError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            if by_name.insert(name.clone(), entries.len()).is_some() {
                return Err(PromptError::DuplicateName(name));
            }
            debug!("loaded extend prompt '{}' ({} bytes)", name, text.len());
            entries.push(PromptEntry { name, text });
        }

        Ok(Self { entries, by_name })
    }

    /// The prompt at `index`, in file-name order.
    pub fn get(&self, index: usize) -> Result<&str, PromptError> {
        self.entries
            .get(index)
            .map(|entry| entry.text.as_str())
            .ok_or(PromptError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// The prompt whose file stem is `name`.
    pub fn get_named(&self, name: &str) -> Result<&str, PromptError> {
        self.by_name
            .get(name)
            .map(|&index| self.entries[index].text.as_str())
            .ok_or_else(|| PromptError::UnknownName(name.to_string()))
    }

    pub fn resolve(&self, selector: &PromptSelector) -> Result<&str, PromptError> {
        match selector {
            PromptSelector::Index(index) => self.get(*index),
            PromptSelector::Name(name) => self.get_named(name),
        }
    }

    /// Prompt names in index order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
