// ABOUTME: Image resolution for fold-deck presentations
// ABOUTME: Stages every node's image into the output folder, falling back to a placeholder

use crate::content::{Cell, ContentItem, ContentNode, Deck};
use crate::errors::Result;
use crate::utils;
use log::{debug, info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// What happened to the images of one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Source images copied into the destination.
    pub copied: usize,
    /// Nodes that ended up pointing at the placeholder.
    pub placeholders: usize,
    /// Named images whose source file could not be found or copied.
    pub missing: usize,
    /// Nodes left without a usable image because the placeholder was absent.
    pub unresolved: usize,
}

/// A content tree whose `image` fields are final destination basenames.
///
/// Only the resolver (or [`ResolvedDeck::from_staged`]) can build one, so the
/// renderer cannot be handed a tree that still needs resolving.
#[derive(Debug, Clone)]
pub struct ResolvedDeck {
    nodes: Vec<ContentNode>,
    stats: ResolveStats,
}

impl ResolvedDeck {
    /// Wrap a deck whose images were already staged by the caller.
    pub fn from_staged(deck: Deck) -> Self {
        Self {
            nodes: deck.nodes,
            stats: ResolveStats::default(),
        }
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }
}

/// Copies referenced images from an optional source directory into a
/// destination directory.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    source_dir: Option<PathBuf>,
    dest_dir: PathBuf,
    placeholder: PathBuf,
}

impl ImageResolver {
    pub fn new(source_dir: Option<&Path>, dest_dir: &Path, placeholder: &Path) -> Self {
        Self {
            source_dir: source_dir.map(Path::to_path_buf),
            dest_dir: dest_dir.to_path_buf(),
            placeholder: placeholder.to_path_buf(),
        }
    }

    /// Resolve every node in document order, depth-first.
    ///
    /// An unusable destination directory fails before any node is visited.
    /// Missing source images and a missing placeholder are absorbed.
    pub fn resolve(&self, deck: Deck) -> Result<ResolvedDeck> {
        utils::validate_directory_writable(&self.dest_dir)?;
        info!("Resolving images into {:?}", self.dest_dir);

        let mut pass = ResolvePass {
            source: self.source_mode(),
            dest_dir: &self.dest_dir,
            placeholder: self.placeholder_source(),
            placeholder_staged: false,
            stats: ResolveStats::default(),
        };

        let mut nodes = deck.nodes;
        for node in &mut nodes {
            pass.visit(node);
        }

        let stats = pass.stats;
        info!(
            "Images resolved: {} copied, {} placeholder, {} missing, {} unresolved",
            stats.copied, stats.placeholders, stats.missing, stats.unresolved
        );
        Ok(ResolvedDeck { nodes, stats })
    }

    fn source_mode(&self) -> SourceMode<'_> {
        match &self.source_dir {
            None => {
                debug!("No images directory given; assuming images are already staged");
                SourceMode::Staged
            }
            Some(dir) if dir.is_dir() => SourceMode::Directory(dir),
            Some(dir) => {
                warn!(
                    "Images directory {:?} does not exist; every image falls back to the placeholder",
                    dir
                );
                SourceMode::Unusable
            }
        }
    }

    fn placeholder_source(&self) -> Option<(&Path, String)> {
        if !self.placeholder.is_file() {
            warn!(
                "Placeholder image {:?} not found; nodes without images stay unresolved",
                self.placeholder
            );
            return None;
        }
        let name = utils::file_name_of(&self.placeholder.to_string_lossy())?;
        Some((self.placeholder.as_path(), name))
    }
}

/// Convenience wrapper around [`ImageResolver::resolve`].
pub fn resolve(
    deck: Deck,
    source_dir: Option<&Path>,
    dest_dir: &Path,
    placeholder: &Path,
) -> Result<ResolvedDeck> {
    ImageResolver::new(source_dir, dest_dir, placeholder).resolve(deck)
}

/// True when `image` is a relative path that stays below its base directory.
fn is_contained_reference(image: &str) -> bool {
    Path::new(image)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

enum SourceMode<'a> {
    /// No source directory: named images are assumed to be in place.
    Staged,
    Directory(&'a Path),
    /// A source directory was given but is not a directory.
    Unusable,
}

struct ResolvePass<'a> {
    source: SourceMode<'a>,
    dest_dir: &'a Path,
    placeholder: Option<(&'a Path, String)>,
    placeholder_staged: bool,
    stats: ResolveStats,
}

impl ResolvePass<'_> {
    fn visit(&mut self, node: &mut ContentNode) {
        self.resolve_node(node);
        for item in &mut node.content {
            self.visit_item(item);
        }
        for fold in &mut node.folds {
            self.visit(fold);
        }
    }

    fn visit_item(&mut self, item: &mut ContentItem) {
        match item {
            ContentItem::Fold(folds) => {
                for fold in folds {
                    self.visit(fold);
                }
            }
            ContentItem::Row(row) => self.visit_cells(&mut row.cells),
            ContentItem::Columns(columns) => self.visit_cells(&mut columns.cells),
            ContentItem::Text(_) | ContentItem::Markup(_) | ContentItem::Chart(_) => {}
        }
    }

    fn visit_cells(&mut self, cells: &mut [Cell]) {
        for item in cells.iter_mut().flat_map(|cell| cell.iter_mut()) {
            self.visit_item(item);
        }
    }

    fn resolve_node(&mut self, node: &mut ContentNode) {
        if let Some(image) = node.image.clone() {
            match self.source {
                SourceMode::Staged => {
                    if let Some(name) = utils::file_name_of(&image) {
                        node.image = Some(name);
                    }
                    return;
                }
                SourceMode::Directory(dir) => {
                    if let Some(name) = self.copy_source_image(dir, &image) {
                        node.image = Some(name);
                        self.stats.copied += 1;
                        return;
                    }
                    self.stats.missing += 1;
                }
                SourceMode::Unusable => self.stats.missing += 1,
            }
        }
        self.apply_placeholder(node);
    }

    /// Copy `dir/image` into the destination, returning the staged basename.
    fn copy_source_image(&self, dir: &Path, image: &str) -> Option<String> {
        if !is_contained_reference(image) {
            warn!(
                "Image reference {:?} points outside the images directory; using placeholder",
                image
            );
            return None;
        }
        let source = dir.join(image);
        if !source.is_file() {
            warn!("Image file {:?} not found; using placeholder", source);
            return None;
        }
        let name = utils::file_name_of(image)?;
        match fs::copy(&source, self.dest_dir.join(&name)) {
            Ok(_) => {
                debug!("Copied image {:?} to {:?}", source, self.dest_dir);
                Some(name)
            }
            Err(e) => {
                warn!("Failed to copy image {:?}: {}; using placeholder", source, e);
                None
            }
        }
    }

    fn apply_placeholder(&mut self, node: &mut ContentNode) {
        if !self.placeholder_staged {
            self.stage_placeholder();
        }
        match &self.placeholder {
            Some((_, name)) => {
                node.image = Some(name.clone());
                self.stats.placeholders += 1;
            }
            None => self.stats.unresolved += 1,
        }
    }

    /// Copy the placeholder once, skipping the copy if it is already present.
    fn stage_placeholder(&mut self) {
        self.placeholder_staged = true;
        let Some((source, name)) = &self.placeholder else {
            return;
        };
        let target = self.dest_dir.join(name);
        if target.exists() {
            debug!("Placeholder already present at {:?}", target);
            return;
        }
        if let Err(e) = fs::copy(source, &target) {
            warn!("Failed to copy placeholder {:?}: {}", source, e);
            self.placeholder = None;
        }
    }
}
