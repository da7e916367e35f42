//! Template engine seam and its Tera implementation.
//!
//! # Template names
//!
//! [`TeraEngine`] registers every template under a root directory, named by
//! its path relative to that root with `/` separators. A page at
//! `site/blog/post.twig` rendered with root `site` can therefore
//! `{% include "_partials/header.twig" %}` or `{% extends "_base.twig" %}`.
//!
//! The root is the configured one ([`TeraEngine::with_root`]) or else the
//! directory the page was found under. A configured root outside that
//! directory (say `layouts/` next to `site/`) is loaded alongside it: names
//! from both are registered, pages relative to their own directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use tracing::debug;

use pages_core::{TemplateData, DEFAULT_SOURCE_EXTENSION};

use crate::error::{io_err, RenderError};

/// Renders a template file with the given variables into markup.
pub trait TemplateEngine {
    fn render_file(&self, path: &Path, data: &TemplateData) -> Result<String, RenderError>;

    /// Render a page found while walking `page_root`.
    ///
    /// Engines that resolve template names against a directory use
    /// `page_root` for that unless configured otherwise.
    fn render_under(
        &self,
        page_root: &Path,
        path: &Path,
        data: &TemplateData,
    ) -> Result<String, RenderError> {
        let _ = page_root;
        self.render_file(path, data)
    }
}

impl<T: TemplateEngine + ?Sized> TemplateEngine for &T {
    fn render_file(&self, path: &Path, data: &TemplateData) -> Result<String, RenderError> {
        (**self).render_file(path, data)
    }

    fn render_under(
        &self,
        page_root: &Path,
        path: &Path,
        data: &TemplateData,
    ) -> Result<String, RenderError> {
        (**self).render_under(page_root, path, data)
    }
}

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn listing_dir(dir: &Path) -> &Path {
    if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    }
}

fn collect_template_files(
    dir: &Path,
    extension: &str,
    out: &mut Vec<PathBuf>,
) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, extension, out)?;
        } else if meta.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(extension))
        {
            out.push(path);
        }
    }
    Ok(())
}

fn load_templates(
    root: &Path,
    extension: &str,
    out: &mut HashMap<String, String>,
) -> Result<(), RenderError> {
    let root = listing_dir(root);
    let mut files = Vec::new();
    collect_template_files(root, extension, &mut files)?;
    for path in files {
        let rel = path.strip_prefix(root).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        out.insert(name, contents);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TeraEngine
// ---------------------------------------------------------------------------

/// Tera-based [`TemplateEngine`].
///
/// Templates are re-read on every call; each render sees the files as they
/// are on disk at that moment.
#[derive(Debug, Clone)]
pub struct TeraEngine {
    extension: String,
    root: Option<PathBuf>,
}

impl TeraEngine {
    /// Engine that registers files ending in `extension` as templates.
    pub fn new(extension: impl Into<String>) -> Self {
        TeraEngine {
            extension: extension.into(),
            root: None,
        }
    }

    /// Resolve template names (includes, extends) against `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn build_tera(&self, page_root: &Path, path: &Path) -> Result<(Tera, String), RenderError> {
        let template_root = self.root.as_deref().unwrap_or(page_root);
        let mut templates = HashMap::new();
        load_templates(template_root, &self.extension, &mut templates)?;

        let nested = page_root.starts_with(template_root) && path.starts_with(template_root);
        let base = if nested { template_root } else { page_root };
        if !nested {
            load_templates(page_root, &self.extension, &mut templates)?;
        }

        let name = normalize_template_name(path.strip_prefix(base).unwrap_or(path));
        if !templates.contains_key(&name) {
            // Rendered file does not carry the template extension (custom
            // selection pattern); register it explicitly.
            let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
            templates.insert(name.clone(), contents);
        }
        debug!(
            "loaded {} template(s) from {}",
            templates.len(),
            template_root.display()
        );

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|source| RenderError::Template {
                path: path.to_path_buf(),
                source,
            })?;
        Ok((tera, name))
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        TeraEngine::new(DEFAULT_SOURCE_EXTENSION)
    }
}

impl TemplateEngine for TeraEngine {
    fn render_file(&self, path: &Path, data: &TemplateData) -> Result<String, RenderError> {
        let page_root = path.parent().unwrap_or_else(|| Path::new(""));
        self.render_under(page_root, path, data)
    }

    fn render_under(
        &self,
        page_root: &Path,
        path: &Path,
        data: &TemplateData,
    ) -> Result<String, RenderError> {
        let (tera, name) = self.build_tera(page_root, path)?;
        let context = Context::from_serialize(data).map_err(RenderError::Context)?;
        tera.render(&name, &context)
            .map_err(|source| RenderError::Template {
                path: path.to_path_buf(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
