//! Renderer configuration — extensions and the page selection pattern.
//!
//! A [`RendererConfig`] is immutable once built: only read accessors are
//! exposed, so one config can back any number of build runs.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::ConfigError;

/// Suffix identifying template files when none is configured.
pub const DEFAULT_SOURCE_EXTENSION: &str = ".twig";

/// Suffix given to generated pages when none is configured.
pub const DEFAULT_DESTINATION_EXTENSION: &str = ".html";

// ---------------------------------------------------------------------------
// SelectionPattern
// ---------------------------------------------------------------------------

/// Predicate deciding whether a file name is rendered as a standalone page.
///
/// Patterns only ever see the bare file name (`index.twig`), never the
/// directory part of the path.
#[derive(Clone)]
pub enum SelectionPattern {
    /// Name ends with the extension and does not start with `_`.
    ///
    /// Underscore-prefixed files are partials: includable by other templates,
    /// never rendered on their own.
    Extension(String),
    /// Name matches the regular expression.
    Regex(Regex),
    /// Caller-supplied predicate.
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl SelectionPattern {
    /// The default rule for `extension`.
    pub fn for_extension(extension: impl Into<String>) -> Self {
        Self::Extension(extension.into())
    }

    /// Compile `pattern` into a regex-backed selection pattern.
    pub fn regex(pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Wrap an arbitrary predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Whether `file_name` selects a page.
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::Extension(ext) => {
                !file_name.starts_with('_')
                    && file_name.len() > ext.len()
                    && file_name.ends_with(ext.as_str())
            }
            Self::Regex(re) => re.is_match(file_name),
            Self::Predicate(f) => f(file_name),
        }
    }
}

impl fmt::Debug for SelectionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(ext) => f.debug_tuple("Extension").field(ext).finish(),
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// RendererConfig
// ---------------------------------------------------------------------------

/// Extensions and selection pattern for a page renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    source_extension: String,
    destination_extension: String,
    pattern: SelectionPattern,
}

impl RendererConfig {
    /// Build a config. When `pattern` is `None` the default rule for
    /// `source_extension` is used.
    pub fn new(
        source_extension: impl Into<String>,
        destination_extension: impl Into<String>,
        pattern: Option<SelectionPattern>,
    ) -> Self {
        let source_extension = source_extension.into();
        let pattern =
            pattern.unwrap_or_else(|| SelectionPattern::for_extension(source_extension.clone()));
        RendererConfig {
            source_extension,
            destination_extension: destination_extension.into(),
            pattern,
        }
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn destination_extension(&self) -> &str {
        &self.destination_extension
    }

    pub fn pattern(&self) -> &SelectionPattern {
        &self.pattern
    }

    /// Whether `file_name` should be rendered as a page.
    pub fn selects(&self, file_name: &str) -> bool {
        self.pattern.matches(file_name)
    }

    /// Swap a trailing source extension for the destination extension.
    ///
    /// Names without the source extension (possible with a custom pattern)
    /// are returned unchanged.
    pub fn destination_file_name(&self, file_name: &str) -> String {
        match file_name.strip_suffix(self.source_extension.as_str()) {
            Some(stem) if !self.source_extension.is_empty() => {
                format!("{stem}{}", self.destination_extension)
            }
            _ => file_name.to_string(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig::new(DEFAULT_SOURCE_EXTENSION, DEFAULT_DESTINATION_EXTENSION, None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
