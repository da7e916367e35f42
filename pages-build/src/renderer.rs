//! [`PageRenderer`] — walks a source tree and renders every selected page.
//!
//! ## Traversal
//!
//! Entries of each directory are processed in file-name order. A directory is
//! recursed into before its next sibling is looked at, so the returned paths
//! are depth-first. Symlinks and non-UTF-8 names are skipped, as is every file
//! the selection pattern rejects. The first error aborts the walk; pages
//! already written stay on disk.
//!
//! ## Page data
//!
//! Each page receives the [`DataCollection`] entry keyed by its path (either
//! as walked, or relative to the source root), or an empty mapping.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use pages_core::{DataCollection, RendererConfig, TemplateData};
use pages_renderer::{Formatter, PrettyFormatter, RenderError, TemplateEngine, TeraEngine};

use crate::error::{io_err, BuildError};
use crate::writer;

/// Renders template trees into page trees.
///
/// Holds no per-run state: build once, call [`run`](Self::run) as often as
/// needed.
#[derive(Debug, Clone)]
pub struct PageRenderer<E = TeraEngine, F = PrettyFormatter> {
    config: RendererConfig,
    engine: E,
    formatter: F,
}

impl PageRenderer {
    /// Renderer backed by [`TeraEngine`] and [`PrettyFormatter`].
    ///
    /// During [`run`](Self::run), template includes resolve against the
    /// source root being walked; [`render_page`](Self::render_page) resolves
    /// them against the page's own directory.
    pub fn new(config: RendererConfig) -> Self {
        let engine = TeraEngine::new(config.source_extension());
        PageRenderer::with_collaborators(config, engine, PrettyFormatter)
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        PageRenderer::new(RendererConfig::default())
    }
}

impl<E, F> PageRenderer<E, F>
where
    E: TemplateEngine,
    F: Formatter,
{
    /// Renderer with a caller-supplied template engine and formatter.
    pub fn with_collaborators(config: RendererConfig, engine: E, formatter: F) -> Self {
        PageRenderer {
            config,
            engine,
            formatter,
        }
    }

    /// Extensions and selection pattern this renderer was built with.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render every selected file under `source_root` into `destination_root`.
    ///
    /// Returns the destination paths written, in traversal order. Fails with
    /// [`BuildError::DirectoryNotFound`] before touching the filesystem if
    /// `source_root` does not exist.
    pub fn run(
        &self,
        source_root: &Path,
        destination_root: &Path,
        data: &DataCollection,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let pages = self.render_dir(source_root, source_root, destination_root, data)?;
        info!(
            "rendered {} page(s) from {} into {}",
            pages.len(),
            source_root.display(),
            destination_root.display()
        );
        Ok(pages)
    }

    /// Render one template to `destination`, creating parent directories and
    /// overwriting any existing file.
    pub fn render_page(
        &self,
        source: &Path,
        destination: &Path,
        data: &TemplateData,
    ) -> Result<(), BuildError> {
        let markup = self.engine.render_file(source, data);
        self.write_rendered(source, destination, markup)
    }

    fn write_rendered(
        &self,
        source: &Path,
        destination: &Path,
        markup: Result<String, RenderError>,
    ) -> Result<(), BuildError> {
        let markup = markup.map_err(|e| BuildError::Render {
            path: source.to_path_buf(),
            source: e,
        })?;

        if let Some(parent) = destination.parent() {
            writer::ensure_dir(parent)?;
        }
        writer::write_page(destination, &self.formatter.format(&markup))?;

        info!("wrote: {}", destination.display());
        Ok(())
    }

    fn render_dir(
        &self,
        directory: &Path,
        source_root: &Path,
        destination_root: &Path,
        data: &DataCollection,
    ) -> Result<Vec<PathBuf>, BuildError> {
        if !directory.exists() {
            return Err(BuildError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        let mut entries = fs::read_dir(directory)
            .map_err(|e| io_err(directory, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| io_err(directory, e))?;
        entries.sort_by_key(|e| e.file_name());

        let mut results = Vec::new();
        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;

            if file_type.is_dir() {
                let pages = self.render_dir(&path, source_root, destination_root, data)?;
                results.extend(pages);
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!("skipping non-UTF-8 name: {}", path.display());
                continue;
            };
            if !file_type.is_file() || !self.config.selects(&name) {
                debug!("skipping: {}", path.display());
                continue;
            }

            let destination = self.destination_for(&path, &name, source_root, destination_root);
            let empty = TemplateData::new();
            let page_data = data.lookup(&path, source_root).unwrap_or(&empty);
            let markup = self.engine.render_under(source_root, &path, page_data);
            self.write_rendered(&path, &destination, markup)?;
            results.push(destination);
        }
        Ok(results)
    }

    /// `source_root/rel/name.src` → `destination_root/rel/name.dst`.
    fn destination_for(
        &self,
        path: &Path,
        name: &str,
        source_root: &Path,
        destination_root: &Path,
    ) -> PathBuf {
        let rel = path.strip_prefix(source_root).unwrap_or(path);
        let mut destination = destination_root.join(rel);
        destination.set_file_name(self.config.destination_file_name(name));
        destination
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;

    use pages_core::SelectionPattern;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    /// Engine that echoes the file name and data, recording every call.
    #[derive(Default)]
    struct RecordingEngine {
        calls: RefCell<Vec<(PathBuf, TemplateData)>>,
    }

    impl TemplateEngine for RecordingEngine {
        fn render_file(&self, path: &Path, data: &TemplateData) -> Result<String, RenderError> {
            self.calls
                .borrow_mut()
                .push((path.to_path_buf(), data.clone()));
            Ok(format!(
                "{}:{}",
                path.file_name().unwrap().to_string_lossy(),
                Value::Object(data.clone())
            ))
        }
    }

    /// Engine that records the page root each page is rendered under.
    #[derive(Default)]
    struct RootRecordingEngine {
        roots: RefCell<Vec<PathBuf>>,
    }

    impl TemplateEngine for RootRecordingEngine {
        fn render_file(&self, _path: &Path, _data: &TemplateData) -> Result<String, RenderError> {
            Ok(String::new())
        }

        fn render_under(
            &self,
            page_root: &Path,
            _path: &Path,
            _data: &TemplateData,
        ) -> Result<String, RenderError> {
            self.roots.borrow_mut().push(page_root.to_path_buf());
            Ok(String::new())
        }
    }

    /// Engine that fails on one file name.
    struct FailingEngine(&'static str);

    impl TemplateEngine for FailingEngine {
        fn render_file(&self, path: &Path, _data: &TemplateData) -> Result<String, RenderError> {
            if path.ends_with(self.0) {
                Err(RenderError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
                })
            } else {
                Ok("ok".to_string())
            }
        }
    }

    fn identity(s: &str) -> String {
        s.to_string()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn vars(value: Value) -> TemplateData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn destination_maps_root_and_extension() {
        let renderer = PageRenderer::default();
        let dest = renderer.destination_for(
            Path::new("site/blog/post.twig"),
            "post.twig",
            Path::new("site"),
            Path::new("dist"),
        );
        assert_eq!(dest, PathBuf::from("dist/blog/post.html"));
    }

    #[test]
    fn destination_keeps_names_without_source_extension() {
        let pattern = SelectionPattern::predicate(|n| n.ends_with(".txt"));
        let renderer = PageRenderer::new(RendererConfig::new(".twig", ".html", Some(pattern)));
        let dest = renderer.destination_for(
            Path::new("src/notes.txt"),
            "notes.txt",
            Path::new("src"),
            Path::new("out"),
        );
        assert_eq!(dest, PathBuf::from("out/notes.txt"));
    }

    #[test]
    fn run_renders_only_selected_files_depth_first() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        let dist = tmp.path().join("dist");
        touch(&site, "a/deep.twig");
        touch(&site, "b.twig");
        touch(&site, "_partial.twig");
        touch(&site, "style.css");
        touch(&site, "c/_nested_partial.twig");

        let engine = RecordingEngine::default();
        let renderer =
            PageRenderer::with_collaborators(RendererConfig::default(), &engine, identity);
        let pages = renderer.run(&site, &dist, &DataCollection::new()).unwrap();

        assert_eq!(pages, vec![dist.join("a/deep.html"), dist.join("b.html")]);
        assert_eq!(engine.calls.borrow().len(), 2);
        assert!(!dist.join("style.css").exists(), "non-matching files are not copied");
        assert!(!dist.join("c").exists(), "no directory for partial-only folders");
    }

    #[test]
    fn run_passes_path_keyed_data() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        touch(&site, "index.twig");
        touch(&site, "other.twig");

        let mut data = DataCollection::new();
        data.insert(site.join("index.twig"), vars(json!({ "title": "Hi" })));

        let engine = RecordingEngine::default();
        let renderer =
            PageRenderer::with_collaborators(RendererConfig::default(), &engine, identity);
        renderer.run(&site, &tmp.path().join("dist"), &data).unwrap();

        let calls = engine.calls.borrow();
        let index = calls.iter().find(|(p, _)| p.ends_with("index.twig")).unwrap();
        let other = calls.iter().find(|(p, _)| p.ends_with("other.twig")).unwrap();
        assert_eq!(index.1, vars(json!({ "title": "Hi" })));
        assert!(other.1.is_empty());
    }

    #[test]
    fn run_renders_nested_pages_under_the_source_root() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        touch(&site, "index.twig");
        touch(&site, "blog/2024/post.twig");

        let engine = RootRecordingEngine::default();
        let renderer =
            PageRenderer::with_collaborators(RendererConfig::default(), &engine, identity);
        renderer
            .run(&site, &tmp.path().join("dist"), &DataCollection::new())
            .unwrap();

        assert_eq!(*engine.roots.borrow(), vec![site.clone(), site]);
    }

    #[test]
    fn run_resolves_root_partials_from_nested_pages() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        let dist = tmp.path().join("dist");
        fs::create_dir_all(site.join("blog")).unwrap();
        fs::write(site.join("_partial.twig"), "<header></header>").unwrap();
        fs::write(site.join("blog/post.twig"), "{% include \"_partial.twig\" %}").unwrap();

        let pages = PageRenderer::default()
            .run(&site, &dist, &DataCollection::new())
            .unwrap();

        assert_eq!(pages, vec![dist.join("blog/post.html")]);
        assert_eq!(
            fs::read_to_string(dist.join("blog/post.html")).unwrap(),
            "<header></header>\n"
        );
    }

    #[test]
    fn run_writes_formatted_output() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        let dist = tmp.path().join("dist");
        touch(&site, "index.twig");

        let renderer = PageRenderer::with_collaborators(
            RendererConfig::default(),
            RecordingEngine::default(),
            |s: &str| format!("<{s}>"),
        );
        renderer.run(&site, &dist, &DataCollection::new()).unwrap();

        assert_eq!(
            fs::read_to_string(dist.join("index.html")).unwrap(),
            "<index.twig:{}>"
        );
    }

    #[test]
    fn formatter_output_is_written_unchanged() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        let dist = tmp.path().join("dist");
        touch(&site, "index.twig");

        let renderer = PageRenderer::with_collaborators(
            RendererConfig::default(),
            RecordingEngine::default(),
            |_: &str| "<p>\r\n</p>\r\n".to_string(),
        );
        renderer.run(&site, &dist, &DataCollection::new()).unwrap();

        assert_eq!(fs::read(dist.join("index.html")).unwrap(), b"<p>\r\n</p>\r\n");
    }

    #[test]
    fn run_missing_root_fails_without_writes() {
        let tmp = TempDir::new().unwrap();
        let dist = tmp.path().join("dist");
        let renderer = PageRenderer::default();

        let err = renderer
            .run(&tmp.path().join("missing"), &dist, &DataCollection::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::DirectoryNotFound { .. }), "got: {err}");
        assert!(err.to_string().contains("missing"));
        assert!(!dist.exists());
    }

    #[test]
    fn render_failure_aborts_remaining_pages() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        let dist = tmp.path().join("dist");
        touch(&site, "a.twig");
        touch(&site, "b.twig");
        touch(&site, "c.twig");

        let renderer = PageRenderer::with_collaborators(
            RendererConfig::default(),
            FailingEngine("b.twig"),
            identity,
        );
        let err = renderer.run(&site, &dist, &DataCollection::new()).unwrap_err();

        assert!(matches!(err, BuildError::Render { ref path, .. } if path.ends_with("b.twig")));
        assert!(dist.join("a.html").exists(), "earlier pages stay on disk");
        assert!(!dist.join("b.html").exists());
        assert!(!dist.join("c.html").exists(), "later pages are never rendered");
    }

    #[test]
    fn render_page_rejects_file_in_destination_path() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        touch(&site, "post.twig");
        let blocker = tmp.path().join("dist");
        fs::write(&blocker, "i am a file").unwrap();

        let renderer = PageRenderer::with_collaborators(
            RendererConfig::default(),
            RecordingEngine::default(),
            identity,
        );
        let err = renderer
            .render_page(
                &site.join("post.twig"),
                &blocker.join("blog").join("post.html"),
                &TemplateData::new(),
            )
            .unwrap_err();

        assert!(matches!(err, BuildError::NotADirectory { ref path } if *path == blocker));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "i am a file");
    }

    #[test]
    #[cfg(unix)]
    fn symlinks_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        touch(&site, "real.twig");
        std::os::unix::fs::symlink(site.join("real.twig"), site.join("link.twig")).unwrap();

        let renderer = PageRenderer::with_collaborators(
            RendererConfig::default(),
            RecordingEngine::default(),
            identity,
        );
        let pages = renderer
            .run(&site, &tmp.path().join("dist"), &DataCollection::new())
            .unwrap();
        assert_eq!(pages, vec![tmp.path().join("dist/real.html")]);
    }
}
