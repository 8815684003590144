//! Template expansion driver.
//!
//! One call to [`TemplateRenderer::render`] runs the whole pipeline:
//!
//! 1. resolve the template against the configured search roots;
//! 2. open the container and parse the parts holding cells (the content
//!    stream of an OpenDocument file, every worksheet of a workbook);
//! 3. relocate note directives and mark typed cells;
//! 4. hand the serialized markup to the [`Evaluator`];
//! 5. re-parse the result and write typed cell values;
//! 6. write a new container, raw-copying every other entry, to a uniquely
//!    named file in the output directory.
//!
//! Nothing is written unless every step succeeds.

use super::cell_type::{apply_cell_types, mark_cells};
use super::config::RenderConfig;
use super::context::Context;
use super::dialect::{NoteSource, OdsDialect, SheetDialect, XlsxDialect};
use super::directive::{PlacedDirective, parse_directive, relocate};
use super::evaluator::{Evaluator, prepare_markup};
use super::format::{TemplateFormat, output_type};
use super::locate::TemplateSource;
use crate::common::markup::Document;
use crate::common::{Error, RenderPhase, Result};
use crate::odf::constants::{ODF_MANIFEST, ODF_MIMETYPE};
use crate::odf::core::manifest::set_root_media_type;
use crate::odf::{EntryOverrides, Package, ods};
use crate::ooxml::constants::CONTENT_TYPES_PART;
use crate::ooxml::opc::ContentTypes;
use crate::ooxml::xlsx::{
    SharedStrings, Workbook, comment_notes, comments_part, document_content_type,
    inline_shared_strings, remove_comments,
};
use std::collections::HashSet;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A rendered container waiting in the output directory.
///
/// The file is not removed on drop; move it with
/// [`persist_to`](Self::persist_to) or delete it when done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Path of the rendered container
    pub output_path: PathBuf,
    /// Path of the template it was rendered from
    pub template_path: PathBuf,
    container_type: Option<String>,
}

impl RenderedDocument {
    /// File name to offer for download: the template's file name without
    /// its leading `prefix_` segment, with the extension of the rendered
    /// document type.
    ///
    /// `rep_sales.ots` becomes `sales.ods`; a name without `_` is kept.
    pub fn download_name(&self) -> String {
        let name = self
            .template_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match name.split_once('_') {
            Some((_, rest)) if !rest.is_empty() => rest.to_string(),
            _ => name,
        };
        match self.output_type() {
            Some((_, extension)) => Path::new(&name)
                .with_extension(extension)
                .to_string_lossy()
                .into_owned(),
            None => name,
        }
    }

    /// Media type of the rendered document, derived from the container's
    /// type (a template renders into its document type).
    pub fn media_type(&self) -> Option<&'static str> {
        self.output_type().map(|(media_type, _)| media_type)
    }

    fn output_type(&self) -> Option<(&'static str, &'static str)> {
        self.container_type.as_deref().and_then(output_type)
    }

    /// Move the rendered file to `destination`, replacing any file there.
    pub fn persist_to(self, destination: impl AsRef<Path>) -> Result<PathBuf> {
        let destination = destination.as_ref();
        let moved = std::fs::rename(&self.output_path, destination).or_else(|_| {
            // Different filesystem: copy, then drop the original
            std::fs::copy(&self.output_path, destination)
                .and_then(|_| std::fs::remove_file(&self.output_path))
        });
        moved.map_err(|e| {
            Error::WriteFailed(format!(
                "Cannot move {} to {}: {}",
                self.output_path.display(),
                destination.display(),
                e
            ))
        })?;
        Ok(destination.to_path_buf())
    }
}

/// A failed render, with the template path when it had been resolved.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RenderFailure {
    pub template_path: Option<PathBuf>,
    #[source]
    pub error: Error,
}

impl RenderFailure {
    /// Phase the render failed in.
    pub fn phase(&self) -> RenderPhase {
        self.error.phase()
    }
}

impl From<RenderFailure> for Error {
    fn from(failure: RenderFailure) -> Self {
        failure.error
    }
}

/// Entries to replace and the container type of the template.
struct RenderedParts {
    overrides: EntryOverrides,
    container_type: Option<String>,
}

/// Renders spreadsheet templates with an [`Evaluator`].
///
/// A renderer holds no per-render state and can serve concurrent renders
/// from several threads when its evaluator is `Sync`.
///
/// # Examples
///
/// ```no_run
/// use sheet_stencil::template::{Context, RenderConfig, TemplateRenderer};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let renderer = TemplateRenderer::with_minijinja(
///     RenderConfig::default().with_search_root("/srv/templates"),
/// );
/// let mut context = Context::new();
/// context.insert("rows", json!([{"name": "bolts", "qty": 40}]));
///
/// let rendered = renderer.render("rep_stock.ots", &context)?;
/// rendered.persist_to("/tmp/stock.ods")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TemplateRenderer<E> {
    config: RenderConfig,
    evaluator: E,
}

impl<E: Evaluator> TemplateRenderer<E> {
    /// Create a renderer with the default configuration.
    pub fn new(evaluator: E) -> Self {
        Self::with_config(RenderConfig::default(), evaluator)
    }

    /// Create a renderer with `config`.
    pub fn with_config(config: RenderConfig, evaluator: E) -> Self {
        Self { config, evaluator }
    }

    /// The configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Render a template into a fresh file in the output directory.
    pub fn render(
        &self,
        source: impl Into<TemplateSource>,
        context: &Context,
    ) -> std::result::Result<RenderedDocument, RenderFailure> {
        let template_path = source
            .into()
            .resolve(&self.config.search_roots)
            .map_err(|error| RenderFailure {
                template_path: None,
                error,
            })?;
        log::debug!("Rendering template {}", template_path.display());

        self.render_file(&template_path, context)
            .map_err(|error| RenderFailure {
                template_path: Some(template_path.clone()),
                error,
            })
    }

    /// Render a template and move the result to `destination`.
    pub fn render_to(
        &self,
        source: impl Into<TemplateSource>,
        context: &Context,
        destination: impl AsRef<Path>,
    ) -> std::result::Result<PathBuf, RenderFailure> {
        let rendered = self.render(source, context)?;
        let template_path = rendered.template_path.clone();
        let output_path = rendered.output_path.clone();
        rendered.persist_to(destination).map_err(|error| {
            if let Err(e) = std::fs::remove_file(&output_path) {
                log::warn!("Cannot remove {}: {}", output_path.display(), e);
            }
            RenderFailure {
                template_path: Some(template_path),
                error,
            }
        })
    }

    /// Expand an OpenDocument content stream without touching any
    /// container.
    ///
    /// `context` is used as given except that a fresh position tracker is
    /// added under the configured name when that name is free.
    pub fn render_content(&self, content: &[u8], context: &Context) -> Result<Vec<u8>> {
        let context = context.with_default_tracker(&self.config.tracker_name);
        let (rendered, _) = self.expand(Document::parse(content)?, &OdsDialect, &context)?;
        Ok(rendered)
    }

    /// Relocate, evaluate and write typed cells for one part.
    fn expand<D: SheetDialect>(
        &self,
        mut doc: Document,
        dialect: &D,
        context: &Context,
    ) -> Result<(Vec<u8>, Vec<PlacedDirective>)> {
        let directives = relocate(&mut doc, dialect)?;
        let marked = mark_cells(&mut doc, dialect);
        log::debug!("Relocated {} directives, marked {} typed cells", directives.len(), marked);

        let markup = prepare_markup(
            &doc.to_xml(),
            &self.config.aliases,
            self.evaluator.delimiters(),
        )?;
        log::trace!("Evaluator input:\n{}", markup);

        let rendered = self
            .evaluator
            .render(&markup, context)
            .map_err(Error::Evaluator)?;

        let mut doc = Document::parse_str(&rendered)?;
        dialect.finish(&mut doc);
        let written = apply_cell_types(&mut doc, dialect)?;
        log::debug!("Wrote {} typed cells", written);
        Ok((doc.to_bytes(), directives))
    }

    fn render_file(&self, template_path: &Path, context: &Context) -> Result<RenderedDocument> {
        let package = Package::open(template_path)?;
        // One tracker serves every part of the document
        let context = context.with_default_tracker(&self.config.tracker_name);
        let parts = match TemplateFormat::detect(&package) {
            TemplateFormat::OpenDocument => self.render_opendocument(&package, &context)?,
            TemplateFormat::OfficeOpenXml => self.render_workbook(&package, &context)?,
        };

        let suffix = self.output_suffix(template_path, parts.container_type.as_deref());
        let output_path = package.write_to_temp(self.config.output_dir(), &suffix, &parts.overrides)?;
        log::debug!("Rendered {} into {}", template_path.display(), output_path.display());

        Ok(RenderedDocument {
            output_path,
            template_path: template_path.to_path_buf(),
            container_type: parts.container_type,
        })
    }

    fn render_opendocument<R: Read + Seek>(&self, package: &Package<R>, context: &Context) -> Result<RenderedParts> {
        let entry = &self.config.content_entry;
        let doc = Document::parse(&package.read_entry(entry)?)?;
        let (rendered, _) = self.expand(doc, &OdsDialect, context)?;

        let mut overrides = EntryOverrides::new();
        overrides.insert(entry.clone(), rendered);

        let container_type = package.mimetype().map(str::to_string);
        let retyped = container_type
            .as_deref()
            .and_then(|mimetype| Some((mimetype, output_type(mimetype)?.0)))
            .filter(|(mimetype, media_type)| mimetype != media_type);
        if let Some((_, media_type)) = retyped {
            overrides.insert(ODF_MIMETYPE.to_string(), media_type.as_bytes().to_vec());
            if package.has_entry(ODF_MANIFEST) {
                let mut manifest = Document::parse(&package.read_entry(ODF_MANIFEST)?)?;
                if set_root_media_type(&mut manifest, media_type) {
                    overrides.insert(ODF_MANIFEST.to_string(), manifest.to_bytes());
                }
            }
        }

        Ok(RenderedParts {
            overrides,
            container_type,
        })
    }

    fn render_workbook<R: Read + Seek>(&self, package: &Package<R>, context: &Context) -> Result<RenderedParts> {
        let workbook = Workbook::locate(package)?;
        let strings = match &workbook.shared_strings {
            Some(part) if package.has_entry(part) => SharedStrings::parse(&package.read_entry(part)?)?,
            _ => SharedStrings::default(),
        };

        let mut overrides = EntryOverrides::new();
        for sheet in &workbook.sheets {
            let mut doc = Document::parse(&package.read_entry(&sheet.part)?)?;
            let inlined = inline_shared_strings(&mut doc, &strings)?;
            log::debug!("Inlined {} shared strings in {}", inlined, sheet.part);

            let comments = match comments_part(package, &sheet.part)? {
                Some(part) => {
                    let doc = Document::parse(&package.read_entry(&part)?)?;
                    Some((part, doc))
                },
                None => None,
            };
            let notes = comments
                .as_ref()
                .map(|(_, doc)| comment_notes(doc))
                .unwrap_or_default();
            let dialect = XlsxDialect::new(&sheet.name, notes.clone());

            let (rendered, placed) = self.expand(doc, &dialect, context)?;
            overrides.insert(sheet.part.clone(), rendered);

            let relocated: HashSet<String> = placed
                .into_iter()
                .filter_map(|p| match p.source {
                    NoteSource::Part(cell_ref) => Some(cell_ref),
                    NoteSource::Inline(_) => None,
                })
                .collect();
            for note in &notes {
                if !relocated.contains(&note.cell_ref) && parse_directive(&note.text).is_some() {
                    log::warn!("Directive comment on {}.{} has no cell; left in place", sheet.name, note.cell_ref);
                }
            }
            if let Some((part, mut doc)) = comments
                && !relocated.is_empty()
            {
                remove_comments(&mut doc, &relocated);
                overrides.insert(part, doc.to_bytes());
            }
        }
        overrides.insert(workbook.part.clone(), workbook.with_full_calculation());

        let mut types = ContentTypes::read(package)?;
        let container_type = types.get(&workbook.part).map(str::to_string);
        if let Some(document_type) = container_type.as_deref().and_then(document_content_type) {
            types.set(&workbook.part, document_type);
            overrides.insert(CONTENT_TYPES_PART.to_string(), types.to_bytes());
        }

        Ok(RenderedParts {
            overrides,
            container_type,
        })
    }

    fn output_suffix(&self, template_path: &Path, container_type: Option<&str>) -> String {
        if let Some(suffix) = &self.config.output_suffix {
            return suffix.clone();
        }
        match container_type.and_then(output_type) {
            Some((_, extension)) => format!(".{}", extension),
            None => template_path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default(),
        }
    }

    /// Names of the sheets of a template, in document order.
    pub fn sheet_names(&self, source: impl Into<TemplateSource>) -> Result<Vec<String>> {
        let template_path = source.into().resolve(&self.config.search_roots)?;
        let package = Package::open(&template_path)?;
        match TemplateFormat::detect(&package) {
            TemplateFormat::OpenDocument => {
                let doc = Document::parse(&package.read_entry(&self.config.content_entry)?)?;
                Ok(ods::sheet_names(&doc))
            },
            TemplateFormat::OfficeOpenXml => Ok(Workbook::locate(&package)?.sheet_names()),
        }
    }
}

#[cfg(feature = "minijinja")]
impl TemplateRenderer<super::MiniJinjaEvaluator> {
    /// Create a renderer backed by the bundled MiniJinja evaluator.
    pub fn with_minijinja(config: RenderConfig) -> Self {
        Self::with_config(config, super::MiniJinjaEvaluator::new())
    }
}
