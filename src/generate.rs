// ABOUTME: Presentation generation pipeline for the fold-deck application
// ABOUTME: Resolves images, renders the deck and writes the finished page with its assets

use crate::content::IngestReport;
use crate::errors::{DeckError, Result};
use crate::html::{RenderOptions, Renderer};
use crate::images::{self, ResolveStats};
use crate::loader::Presentation;
use crate::resources::{self, ResourceFile, ResourceKind, Theme};
use crate::template::{PageParts, Template};
use crate::utils;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Sub-folder of the output folder that receives resolved images.
pub const IMAGES_SUBDIR: &str = "images";

/// Everything a generation run needs besides the presentation itself.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Used when `output_dir` is not set: output goes to `output_root/<title>`.
    pub output_root: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    /// Placeholder image; the bundled one is used when unset.
    pub placeholder: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub theme: Theme,
    pub css_files: Vec<ResourceFile>,
    pub js_files: Vec<ResourceFile>,
    pub embed_resources: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("output"),
            output_dir: None,
            images_dir: None,
            placeholder: None,
            template_path: None,
            theme: Theme::Dark,
            css_files: Vec::new(),
            js_files: Vec::new(),
            embed_resources: true,
        }
    }
}

impl GenerateOptions {
    /// Output folder for a presentation with the given title.
    pub fn output_dir_for(&self, title: &str) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.output_root.join(utils::sanitize_title(title)))
    }
}

/// Summary of a finished generation run.
#[derive(Debug, Clone)]
pub struct GeneratedPresentation {
    pub output_dir: PathBuf,
    pub html_path: PathBuf,
    pub images: ResolveStats,
    pub ingest: IngestReport,
}

/// Generate the full presentation page and its supporting files.
///
/// Configuration problems (template, output folder) are detected before
/// anything is written.
pub fn generate_presentation(
    presentation: Presentation,
    options: &GenerateOptions,
) -> Result<GeneratedPresentation> {
    info!("Generating presentation \"{}\"", presentation.title);

    let template = match &options.template_path {
        Some(path) => Template::load(path)?,
        None => Template::builtin(),
    };

    let output_dir = options.output_dir_for(&presentation.title);
    utils::validate_directory_writable(&output_dir)?;

    resources::write_static_assets(&output_dir, options.theme)?;
    let placeholder = match &options.placeholder {
        Some(path) => path.clone(),
        None => resources::stage_builtin_placeholder(&output_dir)?,
    };

    let Presentation { title, deck, .. } = presentation;
    let ingest = deck.report;
    let resolved = images::resolve(
        deck,
        options.images_dir.as_deref(),
        &output_dir.join(IMAGES_SUBDIR),
        &placeholder,
    )?;

    let renderer = Renderer::new(RenderOptions {
        image_base: IMAGES_SUBDIR.to_string(),
    });
    let rendered = renderer.render_deck(&resolved);

    let head_resources =
        resources::resource_tags(&options.css_files, ResourceKind::Css, options.embed_resources);
    let body_resources =
        resources::resource_tags(&options.js_files, ResourceKind::Js, options.embed_resources);
    let page = template.fill(&PageParts {
        title: &title,
        toc: &rendered.toc,
        breadcrumbs: &rendered.breadcrumbs,
        sections: &rendered.sections,
        theme_css: options.theme.css_file_name(),
        head_resources: &head_resources,
        body_resources: &body_resources,
    });

    let html_path = output_dir.join(format!("{}.html", utils::sanitize_title(&title)));
    write_html_to_file(&page, &html_path)?;
    info!("Presentation saved to {:?}", html_path);

    Ok(GeneratedPresentation {
        output_dir,
        html_path,
        images: resolved.stats(),
        ingest,
    })
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            utils::ensure_directory_exists(parent)?;
        }
    }

    fs::write(output_path, html_content).map_err(DeckError::FileReadError)?;

    Ok(())
}
