//! Per-page template data.
//!
//! A [`DataCollection`] maps source-file paths to the variables used when that
//! file is rendered. Keys are normalised on insert and on lookup so that
//! `site/index.twig`, `./site/index.twig` and `site//index.twig` all name the
//! same page.
//!
//! Relative keys may be written relative to the source root being walked, or
//! relative to a base directory (the directory of the site config that named
//! the data file, see [`DataCollection::with_base`]).

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{io_err, ConfigError};

/// Variables handed to the template engine for one page.
pub type TemplateData = Map<String, Value>;

/// Mapping from source-file path to [`TemplateData`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataCollection {
    entries: BTreeMap<String, TemplateData>,
    base: Option<PathBuf>,
}

fn normalize_key(path: &Path) -> String {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    cleaned.to_string_lossy().replace('\\', "/")
}

impl DataCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the data for the page at `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl AsRef<Path>, data: TemplateData) -> Option<TemplateData> {
        self.entries.insert(normalize_key(path.as_ref()), data)
    }

    /// Resolve relative keys against `base` as well.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// Exact lookup by path.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&TemplateData> {
        self.entries.get(&normalize_key(path.as_ref()))
    }

    /// Look up the data for a page found while walking `source_root`.
    ///
    /// The full path as walked is tried first, then the path relative to the
    /// base directory (if set), then the path relative to `source_root`.
    pub fn lookup(&self, path: &Path, source_root: &Path) -> Option<&TemplateData> {
        let relative_to = |root: &Path| {
            path.strip_prefix(root)
                .ok()
                .and_then(|rel| self.get(rel))
        };
        self.get(path)
            .or_else(|| self.base.as_deref().and_then(relative_to))
            .or_else(|| relative_to(source_root))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(normalised key, data)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateData)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a collection from a `.yaml`, `.yml` or `.json` file.
    ///
    /// The file must be a mapping of page path → mapping of variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let raw: BTreeMap<String, Value> = match ext.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?,
            Some("json") => serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            _ => {
                return Err(ConfigError::UnsupportedDataFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        Self::from_values(raw)
    }

    fn from_values(raw: BTreeMap<String, Value>) -> Result<Self, ConfigError> {
        let mut collection = DataCollection::new();
        for (key, value) in raw {
            match value {
                Value::Object(map) => {
                    collection.insert(&key, map);
                }
                Value::Null => {
                    collection.insert(&key, TemplateData::new());
                }
                _ => return Err(ConfigError::NotAnObject { key }),
            }
        }
        Ok(collection)
    }
}

impl<P: AsRef<Path>> FromIterator<(P, TemplateData)> for DataCollection {
    fn from_iter<I: IntoIterator<Item = (P, TemplateData)>>(iter: I) -> Self {
        let mut collection = DataCollection::new();
        for (path, data) in iter {
            collection.insert(path, data);
        }
        collection
    }
}
