//! # pages-build
//!
//! Directory-walking page builder.
//!
//! [`PageRenderer::run`] walks a source tree, renders every file its
//! selection pattern picks, and writes the pages under a destination root.
//! [`build_site`] wires a [`SiteConfig`](pages_core::SiteConfig) to a
//! renderer in one call.

pub mod error;
pub mod renderer;
pub mod site;
mod writer;

pub use error::BuildError;
pub use renderer::PageRenderer;
pub use site::{build_from_file, build_site, BuildReport};
