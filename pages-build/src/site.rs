//! Whole-site build entrypoint.
//!
//! Loads the data collection, builds a [`PageRenderer`] whose Tera engine
//! resolves includes against the site's template root, and runs it.

use std::path::{Path, PathBuf};

use tracing::info;

use pages_core::SiteConfig;
use pages_renderer::{PrettyFormatter, TeraEngine};

use crate::error::BuildError;
use crate::renderer::PageRenderer;

/// Outcome of building a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Destination paths written, in traversal order.
    pub pages: Vec<PathBuf>,
}

/// Build every page of `site`.
pub fn build_site(site: &SiteConfig) -> Result<BuildReport, BuildError> {
    let config = site.renderer_config()?;
    let data = site.load_data()?;
    let engine = TeraEngine::new(config.source_extension()).with_root(site.template_root());
    let renderer = PageRenderer::with_collaborators(config, engine, PrettyFormatter);

    let pages = renderer.run(&site.source, &site.destination, &data)?;
    info!("site built: {} page(s) in {}", pages.len(), site.destination.display());

    Ok(BuildReport {
        source: site.source.clone(),
        destination: site.destination.clone(),
        pages,
    })
}

/// Load a YAML site config from `path` and build it.
pub fn build_from_file(path: &Path) -> Result<BuildReport, BuildError> {
    let site = SiteConfig::load(path)?;
    build_site(&site)
}
