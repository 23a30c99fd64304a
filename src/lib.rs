// ABOUTME: Library module for the fold-deck program.
// ABOUTME: Contains content ingestion, image resolution, rendering and page generation.

// Reexport modules
pub mod config;
pub mod content;
pub mod errors;
pub mod generate;
pub mod html;
pub mod ids;
pub mod images;
pub mod loader;
pub mod resources;
pub mod template;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use content::{Cell, Columns, ContentItem, ContentNode, Deck, IngestReport, Row};
pub use errors::{DeckError, Result};
pub use generate::{GenerateOptions, GeneratedPresentation, generate_presentation};
pub use html::{RenderOptions, RenderedDeck, Renderer};
pub use ids::IdPath;
pub use images::{ImageResolver, ResolveStats, ResolvedDeck, resolve};
pub use loader::{Presentation, load_presentation};
pub use resources::{ResourceFile, Theme};
pub use template::Template;
pub use watch::{WatchConfig, watch_deck};

#[cfg(test)]
mod tests;
