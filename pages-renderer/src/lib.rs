//! # pages-renderer
//!
//! Template and formatting collaborators for the page builder.
//!
//! - [`TemplateEngine`] turns a template file plus [`TemplateData`] into
//!   markup; [`TeraEngine`] is the Tera-backed implementation.
//! - [`Formatter`] tidies rendered markup; [`PrettyFormatter`] is the default.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pages_core::TemplateData;
//! use pages_renderer::{Formatter, PrettyFormatter, TemplateEngine, TeraEngine};
//!
//! fn render(path: &Path) -> Result<String, pages_renderer::RenderError> {
//!     let engine = TeraEngine::new(".twig").with_root("site");
//!     let html = engine.render_file(path, &TemplateData::new())?;
//!     Ok(PrettyFormatter.format(&html))
//! }
//! ```
//!
//! [`TemplateData`]: pages_core::TemplateData

pub mod engine;
pub mod error;
pub mod format;

pub use engine::{TemplateEngine, TeraEngine};
pub use error::RenderError;
pub use format::{Formatter, PrettyFormatter};
