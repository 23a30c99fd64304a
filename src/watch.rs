// ABOUTME: Watch module for monitoring deck changes and regenerating the presentation
// ABOUTME: Debounces file system events for the deck, images, template and local resources

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;

use crate::errors::{DeckError, Result};
use crate::generate::{self, GenerateOptions, GeneratedPresentation};
use crate::loader;
use crate::utils;

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Deck file to watch
    pub deck_path: PathBuf,

    /// Options for every regeneration
    pub options: GenerateOptions,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,
}

/// Paths whose changes trigger a regeneration.
struct WatchTargets {
    deck: PathBuf,
    images_dir: Option<PathBuf>,
    files: Vec<PathBuf>,
    output_dir: PathBuf,
}

impl WatchTargets {
    fn new(config: &WatchConfig, generated: &GeneratedPresentation) -> Self {
        let mut files: Vec<PathBuf> = config
            .options
            .css_files
            .iter()
            .chain(config.options.js_files.iter())
            .filter(|resource| !resource.is_remote)
            .map(|resource| absolute_or_self(Path::new(&resource.path)))
            .collect();
        if let Some(template) = &config.options.template_path {
            files.push(absolute_or_self(template));
        }
        if let Some(placeholder) = &config.options.placeholder {
            files.push(absolute_or_self(placeholder));
        }

        Self {
            deck: absolute_or_self(&config.deck_path),
            images_dir: config.options.images_dir.as_deref().map(absolute_or_self),
            files,
            output_dir: absolute_or_self(&generated.output_dir),
        }
    }

    /// Directories to register with the watcher, without nested duplicates.
    fn roots(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        candidates.extend(self.deck.parent().map(Path::to_path_buf));
        candidates.extend(self.images_dir.iter().filter(|dir| dir.is_dir()).cloned());
        candidates.extend(self.files.iter().filter_map(|f| f.parent().map(Path::to_path_buf)));
        candidates.sort();

        let mut roots: Vec<PathBuf> = Vec::new();
        for candidate in candidates {
            if !roots.iter().any(|root| candidate.starts_with(root)) {
                roots.push(candidate);
            }
        }
        roots
    }

    fn is_relevant(&self, path: &Path) -> bool {
        let path = absolute_or_self(path);

        // Our own writes must never retrigger a build
        if path.starts_with(&self.output_dir) {
            return false;
        }
        if path == self.deck || self.files.contains(&path) {
            return true;
        }
        matches!(&self.images_dir, Some(dir) if path.starts_with(dir))
    }
}

fn absolute_or_self(path: &Path) -> PathBuf {
    utils::get_absolute_path(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Starts watching a deck file and regenerates the presentation when it or
/// its inputs change. Runs until the event channel closes.
pub fn watch_deck(config: WatchConfig) -> Result<()> {
    utils::validate_file_exists(&config.deck_path)?;

    // Initial generation; configuration errors stop watch mode right away
    let generated = regenerate(&config)?;
    let mut targets = WatchTargets::new(&config, &generated);

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| DeckError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    for root in targets.roots() {
        debug!("Watching {:?}", root);
        debouncer
            .watcher()
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| {
                DeckError::WatchError(format!("Failed to watch directory {:?}: {}", root, e))
            })?;
    }

    info!(
        "Watching {:?} for changes (Press Ctrl+C to stop)",
        config.deck_path
    );

    let mut last_processed = Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|event| {
                    event.paths.iter().any(|path| {
                        let hit = targets.is_relevant(path);
                        if hit {
                            debug!("Detected relevant change in {:?}", path);
                        }
                        hit
                    })
                });

                let now = Instant::now();
                if relevant
                    && now.duration_since(last_processed)
                        > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate(&config) {
                        Ok(generated) => {
                            info!("Regenerated {:?}", generated.html_path);
                            targets.output_dir = absolute_or_self(&generated.output_dir);
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to regenerate presentation: {}", e),
                    }
                }
            }
            Err(errors) => {
                for e in errors {
                    error!("Watch error: {:?}", e);
                }
            }
        }
    }

    Ok(())
}

/// Reload the deck from disk and regenerate everything.
fn regenerate(config: &WatchConfig) -> Result<GeneratedPresentation> {
    info!("Regenerating presentation...");
    let presentation = loader::load_presentation(&config.deck_path)?;
    generate::generate_presentation(presentation, &config.options)
}
