//! On-disk site description.
//!
//! # File format
//!
//! ```yaml
//! source: site                  # required
//! destination: dist             # required
//! source_extension: .twig       # optional, default `.twig`
//! destination_extension: .html  # optional, default `.html`
//! pattern: '^[^_].*\.twig$'     # optional regex over file names
//! data: data.yaml               # optional `.yaml` / `.yml` / `.json`
//! templates: site               # optional include root, default `source`
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{
    RendererConfig, SelectionPattern, DEFAULT_DESTINATION_EXTENSION, DEFAULT_SOURCE_EXTENSION,
};
use crate::data::DataCollection;
use crate::error::{io_err, ConfigError};

fn default_source_extension() -> String {
    DEFAULT_SOURCE_EXTENSION.to_string()
}

fn default_destination_extension() -> String {
    DEFAULT_DESTINATION_EXTENSION.to_string()
}

/// A site to build: where templates live, where pages go, and how to pick them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    #[serde(default = "default_destination_extension")]
    pub destination_extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,
    /// Directory relative paths were resolved against; relative data keys
    /// resolve against it too.
    #[serde(skip)]
    pub base: Option<PathBuf>,
}

impl SiteConfig {
    /// A config with default extensions and no data file.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        SiteConfig {
            source: source.into(),
            destination: destination.into(),
            source_extension: default_source_extension(),
            destination_extension: default_destination_extension(),
            pattern: None,
            data: None,
            templates: None,
            base: None,
        }
    }

    /// Load a site config from YAML.
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` (with path + line context) if malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let config: SiteConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Resolve every relative path against `base`.
    pub fn relative_to(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        SiteConfig {
            source: resolve(self.source),
            destination: resolve(self.destination),
            data: self.data.map(resolve),
            templates: self.templates.map(resolve),
            base: Some(base.to_path_buf()),
            ..self
        }
    }

    /// Root the template engine resolves includes against.
    pub fn template_root(&self) -> &Path {
        self.templates.as_deref().unwrap_or(&self.source)
    }

    /// Build the [`RendererConfig`] described by this site.
    pub fn renderer_config(&self) -> Result<RendererConfig, ConfigError> {
        let pattern = self
            .pattern
            .as_deref()
            .map(SelectionPattern::regex)
            .transpose()?;
        Ok(RendererConfig::new(
            self.source_extension.clone(),
            self.destination_extension.clone(),
            pattern,
        ))
    }

    /// Read the data collection, or an empty one when no data file is set.
    ///
    /// Relative keys in the data file may name pages relative to the config
    /// file's directory (`site/index.twig`) or to the source root
    /// (`index.twig`).
    pub fn load_data(&self) -> Result<DataCollection, ConfigError> {
        let data = match &self.data {
            Some(path) => DataCollection::load(path)?,
            None => DataCollection::new(),
        };
        Ok(match &self.base {
            Some(base) => data.with_base(base),
            None => data,
        })
    }
}
