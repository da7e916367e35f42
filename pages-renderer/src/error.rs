//! Error types for pages-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera failed to parse or render a template (syntax error, missing
    /// include, undefined variable, ...).
    #[error("failed to render {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// Template data could not be turned into a Tera context.
    #[error("context serialization error: {0}")]
    Context(#[source] tera::Error),

    /// Filesystem error while loading templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
