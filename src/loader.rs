// ABOUTME: Deck file loading for the fold-deck application
// ABOUTME: Decodes JSON or YAML deck files and provides the built-in sample deck

use crate::content::Deck;
use crate::errors::{DeckError, Result};
use crate::utils;
use log::info;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Untitled Presentation";
pub const DEFAULT_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_DATE: &str = "Unknown Date";

/// A loaded presentation: deck metadata plus its content tree.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub title: String,
    pub author: String,
    pub date: String,
    pub deck: Deck,
}

impl Presentation {
    /// Build a presentation from a decoded top-level mapping.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str, default: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_string()
        };
        Self {
            title: text("title", DEFAULT_TITLE),
            author: text("author", DEFAULT_AUTHOR),
            date: text("date", DEFAULT_DATE),
            deck: Deck::from_sections(value.get("sections").unwrap_or(&Value::Null)),
        }
    }

    /// The example deck generated when no deck file is given.
    pub fn sample() -> Self {
        Self::from_value(&sample_deck())
    }
}

/// Supported deck file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckFormat {
    Json,
    Yaml,
}

impl DeckFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(DeckFormat::Json),
            "yaml" | "yml" => Ok(DeckFormat::Yaml),
            _ => Err(DeckError::ConfigError(format!(
                "Unsupported deck file format {:?}; use JSON or YAML",
                path
            ))),
        }
    }
}

/// Load and ingest a deck file.
pub fn load_presentation(path: &Path) -> Result<Presentation> {
    info!("Loading deck from {:?}", path);
    utils::validate_file_exists(path)?;
    let format = DeckFormat::from_path(path)?;
    let source = fs::read_to_string(path)?;
    let value = parse_deck(&source, format, path)?;
    if !value.is_object() {
        return Err(DeckError::parse(path, "top level must be a mapping"));
    }

    let presentation = Presentation::from_value(&value);
    info!(
        "Loaded \"{}\": {} sections, {} folds",
        presentation.title,
        presentation.deck.nodes.len(),
        presentation.deck.fold_count()
    );
    Ok(presentation)
}

/// Decode deck source text into a generic value tree.
pub fn parse_deck(source: &str, format: DeckFormat, path: &Path) -> Result<Value> {
    match format {
        DeckFormat::Json => serde_json::from_str(source).map_err(|e| DeckError::parse(path, e)),
        DeckFormat::Yaml => serde_yaml::from_str(source).map_err(|e| DeckError::parse(path, e)),
    }
}

fn sample_deck() -> Value {
    let title = "Fold Deck Sample";
    let author = "The fold-deck authors";
    let date = "Sample edition";
    json!({
        "title": title,
        "author": author,
        "date": date,
        "sections": [
            {
                "title": "",
                "content": [
                    format!("<h1>{}</h1>", title),
                    format!("<h3>by {}</h3>", author),
                    format!("<p>{}</p>", date)
                ],
                "dark": true
            },
            {
                "title": "Getting Started",
                "content": [
                    "<p>Each section is one slide. Click anywhere outside a fold to advance.</p>",
                    "Plain text lines are wrapped in paragraphs automatically."
                ],
                "folds": [
                    {
                        "title": "What is a fold?",
                        "content": ["<p>A collapsible panel with its own content and folds.</p>"],
                        "folds": [
                            {
                                "title": "Nested folds",
                                "content": ["Folds nest to any depth."]
                            },
                            {
                                "title": "Styling",
                                "content": ["Deeper folds share the deepest visual level."]
                            }
                        ]
                    },
                    {
                        "content": ["A fold without a title gets a default label."]
                    }
                ]
            },
            {
                "title": "Layouts",
                "content": [
                    "<h2>Rows and columns</h2>",
                    {
                        "columns": {
                            "count": 2,
                            "sizes": ["40%"],
                            "cells": [
                                "Left column, 40% wide.",
                                { "html": "<ul><li>Right column</li><li>Default width</li></ul>" }
                            ]
                        }
                    },
                    {
                        "row": {
                            "count": 2,
                            "cells": [
                                { "columns": { "count": 1, "cells": ["Row cell with columns"] } },
                                { "folds": { "title": "Fold in a cell", "content": ["Hidden detail."] } }
                            ]
                        }
                    }
                ]
            },
            {
                "title": "Charts",
                "content": ["Charts live inside folds and render when opened."],
                "folds": [
                    {
                        "title": "Quarterly results",
                        "chart": {
                            "type": "bar",
                            "data": {
                                "labels": ["Q1", "Q2", "Q3", "Q4"],
                                "datasets": [{ "label": "Revenue", "data": [12, 19, 7, 15] }]
                            },
                            "options": { "responsive": true }
                        }
                    }
                ]
            },
            {
                "title": "Thank You",
                "content": [
                    "<h2>Thank you!</h2>",
                    "<p>Questions?</p>"
                ],
                "dark": true
            }
        ]
    })
}
