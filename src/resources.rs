// ABOUTME: Resource handling for the fold-deck application
// ABOUTME: Extra CSS/JS resources plus the static assets and themes bundled into the binary

use crate::errors::{DeckError, Result};
use crate::utils;
use log::{info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CORE_CSS: &str = include_str!("../static/css/core.css");
const SCRIPT_JS: &str = include_str!("../static/js/script.js");
const THEME_DARK_CSS: &str = include_str!("../static/css/themes/style-dark.css");
const THEME_BLUE_CSS: &str = include_str!("../static/css/themes/style-blue.css");
const PLACEHOLDER_SVG: &str = include_str!("../static/images/placeholder.svg");

/// File name of the bundled placeholder image.
pub const PLACEHOLDER_FILE_NAME: &str = "placeholder.svg";

/// Colour theme for the generated page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Dark,
    Blue,
}

impl Theme {
    pub fn css_file_name(&self) -> &'static str {
        match self {
            Theme::Dark => "style-dark.css",
            Theme::Blue => "style-blue.css",
        }
    }

    fn stylesheet(&self) -> &'static str {
        match self {
            Theme::Dark => THEME_DARK_CSS,
            Theme::Blue => THEME_BLUE_CSS,
        }
    }
}

impl FromStr for Theme {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "blue" => Ok(Theme::Blue),
            other => Err(DeckError::ConfigError(format!(
                "Unknown theme '{}'; available themes: dark, blue",
                other
            ))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Blue => write!(f, "blue"),
        }
    }
}

/// Kind of extra resource injected into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Css,
    Js,
}

/// Represents a resource file that can be either local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    /// Create a new ResourceFile from a path string.
    /// The path can be either a local file path or a URL.
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Read the contents of a local resource.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            return Err(DeckError::ValidationError(format!(
                "Remote resource {} can only be linked",
                self.path
            )));
        }
        info!("Reading local resource: {}", self.path);
        let path = Path::new(&self.path);
        utils::validate_file_exists(path)?;
        Ok(fs::read_to_string(path)?)
    }

    /// Generate the HTML tag for the resource. Remote resources are always
    /// linked; local ones are embedded when `embed` is set.
    pub fn tag(&self, kind: ResourceKind, embed: bool) -> Result<String> {
        if self.is_remote || !embed {
            return Ok(match kind {
                ResourceKind::Css => format!(r#"<link rel="stylesheet" href="{}">"#, self.path),
                ResourceKind::Js => format!(r#"<script src="{}"></script>"#, self.path),
            });
        }
        let content = self.content()?;
        Ok(match kind {
            ResourceKind::Css => format!("<style>{}</style>", content),
            ResourceKind::Js => format!("<script>{}</script>", content),
        })
    }
}

/// Tags for all resources of one kind. Unreadable resources are skipped.
pub fn resource_tags(files: &[ResourceFile], kind: ResourceKind, embed: bool) -> String {
    let mut tags = String::new();
    for file in files {
        match file.tag(kind, embed) {
            Ok(tag) => {
                tags.push_str(&tag);
                tags.push('\n');
            }
            Err(e) => {
                warn!("Skipping resource {}: {}", file.path, e);
            }
        }
    }
    tags
}

/// Write the bundled stylesheets and client script under `output_dir/static`.
pub fn write_static_assets(output_dir: &Path, theme: Theme) -> Result<()> {
    let css_dir = output_dir.join("static").join("css");
    let themes_dir = css_dir.join("themes");
    let js_dir = output_dir.join("static").join("js");
    utils::ensure_directory_exists(&themes_dir)?;
    utils::ensure_directory_exists(&js_dir)?;

    fs::write(css_dir.join("core.css"), CORE_CSS)?;
    fs::write(js_dir.join("script.js"), SCRIPT_JS)?;
    fs::write(themes_dir.join(theme.css_file_name()), theme.stylesheet())?;
    info!("Wrote static assets with {} theme to {:?}", theme, output_dir);
    Ok(())
}

/// Write the bundled placeholder image and return its path.
pub fn stage_builtin_placeholder(output_dir: &Path) -> Result<PathBuf> {
    let images_dir = output_dir.join("static").join("images");
    utils::ensure_directory_exists(&images_dir)?;
    let path = images_dir.join(PLACEHOLDER_FILE_NAME);
    fs::write(&path, PLACEHOLDER_SVG)?;
    Ok(path)
}
