//! Error types for pages-build.

use std::path::PathBuf;

use thiserror::Error;

use pages_core::ConfigError;
use pages_renderer::RenderError;

/// All errors that can arise from building pages.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A directory that had to be walked does not exist.
    #[error("directory \"{path}\" not found")]
    DirectoryNotFound { path: PathBuf },

    /// A path that has to be a directory exists as something else.
    #[error("\"{path}\" is not a directory")]
    NotADirectory { path: PathBuf },

    /// The template engine could not produce markup for a page.
    #[error("render error: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The site configuration or its data file could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience constructor for [`BuildError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.into(),
        source,
    }
}
