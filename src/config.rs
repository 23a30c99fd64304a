// ABOUTME: Configuration module for the fold-deck application
// ABOUTME: Provides environment-driven defaults and merges command-line overrides over them

use crate::generate::GenerateOptions;
use crate::resources::{ResourceFile, Theme};
use log::warn;
use std::env;
use std::path::PathBuf;

const DEFAULT_OUTPUT_ROOT: &str = "output";
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    /// Parent folder for per-presentation output folders.
    pub output_root: PathBuf,
    pub images_dir: Option<PathBuf>,
    pub placeholder: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub theme: Theme,
    pub embed_resources: bool,
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            images_dir: None,
            placeholder: None,
            template_path: None,
            theme: Theme::Dark,
            embed_resources: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let path_var = |name: &str| env::var(name).ok().filter(|s| !s.is_empty()).map(PathBuf::from);

        let output_root = path_var("FOLD_DECK_OUTPUT_ROOT")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT));
        let theme = match env::var("FOLD_DECK_THEME") {
            Ok(name) => name.parse::<Theme>().unwrap_or_else(|e| {
                warn!("{}; falling back to the dark theme", e);
                Theme::Dark
            }),
            Err(_) => Theme::Dark,
        };
        let embed_resources = env::var("EMBED_RESOURCES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);
        let debounce_ms = env::var("FOLD_DECK_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        Self {
            output_root,
            images_dir: path_var("FOLD_DECK_IMAGES_DIR"),
            placeholder: path_var("FOLD_DECK_PLACEHOLDER"),
            template_path: path_var("FOLD_DECK_TEMPLATE"),
            theme,
            embed_resources,
            debounce_ms,
        }
    }

    /// Get generation options, preferring explicit overrides over this config
    #[allow(clippy::too_many_arguments)]
    pub fn get_generate_options(
        &self,
        output_dir: Option<PathBuf>,
        images_dir: Option<PathBuf>,
        placeholder: Option<PathBuf>,
        template_path: Option<PathBuf>,
        theme: Option<Theme>,
        css: &[String],
        js: &[String],
        embed_resources: Option<bool>,
    ) -> GenerateOptions {
        GenerateOptions {
            output_root: self.output_root.clone(),
            output_dir,
            images_dir: images_dir.or_else(|| self.images_dir.clone()),
            placeholder: placeholder.or_else(|| self.placeholder.clone()),
            template_path: template_path.or_else(|| self.template_path.clone()),
            theme: theme.unwrap_or(self.theme),
            css_files: css.iter().map(|path| ResourceFile::new(path)).collect(),
            js_files: js.iter().map(|path| ResourceFile::new(path)).collect(),
            embed_resources: embed_resources.unwrap_or(self.embed_resources),
        }
    }
}
