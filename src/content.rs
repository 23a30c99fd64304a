// ABOUTME: Content tree model for fold-deck presentations
// ABOUTME: Builds the typed node/item tree from an already-decoded JSON or YAML value

use log::warn;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Width used for a column slot that has no explicit size.
pub const DEFAULT_COLUMN_SIZE: &str = "100%";

/// Largest row or column slot count accepted beyond the cells actually given.
pub const MAX_SLOT_COUNT: usize = 64;

/// A slide, section or fold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentNode {
    pub title: String,
    pub content: Vec<ContentItem>,
    pub folds: Vec<ContentNode>,
    pub image: Option<String>,
    pub dark: bool,
    /// Opaque chart definition, embedded verbatim for the client script.
    pub chart: Option<Value>,
}

/// One entry of a node's `content` list, classified once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    /// Plain text, wrapped in a paragraph when rendered.
    Text(String),
    /// Already-formatted markup, emitted verbatim.
    Markup(String),
    Row(Row),
    Columns(Columns),
    Fold(Vec<ContentNode>),
    Chart(Value),
}

/// Contents of a single row or column slot.
pub type Cell = Vec<ContentItem>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub count: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    pub count: usize,
    pub sizes: Vec<String>,
    pub cells: Vec<Cell>,
}

impl Columns {
    /// Width for slot `index`, defaulting to full width.
    pub fn size(&self, index: usize) -> &str {
        self.sizes
            .get(index)
            .map(String::as_str)
            .unwrap_or(DEFAULT_COLUMN_SIZE)
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

impl ContentItem {
    /// Classify a text item as markup or plain text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if is_markup(&text) {
            ContentItem::Markup(text)
        } else {
            ContentItem::Text(text)
        }
    }
}

/// True when `text` contains at least one `<...>` tag-shaped substring.
///
/// This is a heuristic, not a parser: `"a < b"` stays plain text, while a
/// literal `"<tag>"` the author meant as text is treated as markup.
pub fn is_markup(text: &str) -> bool {
    tag_pattern().is_match(text)
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is a valid regex"))
}

/// A deck's first node is a title node iff its title is empty.
pub fn has_title_node(nodes: &[ContentNode]) -> bool {
    nodes.first().map_or(false, |node| node.title.is_empty())
}

/// Counters for values dropped while building the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub dropped_nodes: usize,
    pub dropped_folds: usize,
    pub dropped_items: usize,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.dropped_nodes + self.dropped_folds + self.dropped_items
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

/// The unresolved content tree of a presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deck {
    pub nodes: Vec<ContentNode>,
    pub report: IngestReport,
}

impl Deck {
    pub fn new(nodes: Vec<ContentNode>) -> Self {
        Self {
            nodes,
            report: IngestReport::default(),
        }
    }

    /// Build a deck from a decoded `sections` value.
    pub fn from_sections(sections: &Value) -> Self {
        let mut ingest = Ingest::default();
        let nodes = ingest.sections(sections);
        Self {
            nodes,
            report: ingest.report,
        }
    }

    /// Number of folds anywhere in the tree, inline fold lists included.
    pub fn fold_count(&self) -> usize {
        self.nodes.iter().map(count_folds).sum()
    }
}

fn count_folds(node: &ContentNode) -> usize {
    let inline: usize = node.content.iter().map(count_item_folds).sum();
    let own: usize = node.folds.iter().map(|fold| 1 + count_folds(fold)).sum();
    inline + own
}

fn count_item_folds(item: &ContentItem) -> usize {
    let cells = match item {
        ContentItem::Fold(folds) => {
            return folds.iter().map(|fold| 1 + count_folds(fold)).sum();
        }
        ContentItem::Row(row) => &row.cells,
        ContentItem::Columns(columns) => &columns.cells,
        _ => return 0,
    };
    cells
        .iter()
        .flat_map(|cell| cell.iter())
        .map(count_item_folds)
        .sum()
}

/// Tree builder; keeps a location trail for diagnostics.
#[derive(Default)]
struct Ingest {
    report: IngestReport,
    location: Vec<String>,
}

impl Ingest {
    fn here(&self) -> String {
        if self.location.is_empty() {
            "<root>".to_string()
        } else {
            self.location.join(".")
        }
    }

    fn sections(&mut self, value: &Value) -> Vec<ContentNode> {
        match value {
            Value::Null => Vec::new(),
            Value::Array(entries) => {
                let mut nodes = Vec::with_capacity(entries.len());
                for (i, entry) in entries.iter().enumerate() {
                    self.location.push(format!("sections[{}]", i));
                    match entry {
                        Value::Object(map) => nodes.push(self.node(map)),
                        other => {
                            warn!("Dropping non-mapping section at {}: {}", self.here(), other);
                            self.report.dropped_nodes += 1;
                        }
                    }
                    self.location.pop();
                }
                nodes
            }
            other => {
                warn!("Expected a sequence of sections, got {}", other);
                self.report.dropped_nodes += 1;
                Vec::new()
            }
        }
    }

    fn node(&mut self, map: &Map<String, Value>) -> ContentNode {
        let title = match map.get("title") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(_) => {
                warn!("Ignoring structured title at {}", self.here());
                String::new()
            }
        };

        let image = match map.get("image") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::String(_)) => None,
            Some(other) => {
                warn!("Ignoring non-string image at {}: {}", self.here(), other);
                None
            }
        };

        let content = match map.get("content") {
            Some(value) => {
                self.location.push("content".to_string());
                let items = self.items(value);
                self.location.pop();
                items
            }
            None => Vec::new(),
        };

        let folds = match map.get("folds") {
            Some(value) => {
                self.location.push("folds".to_string());
                let folds = self.folds(value);
                self.location.pop();
                folds
            }
            None => Vec::new(),
        };

        ContentNode {
            title,
            content,
            folds,
            image,
            dark: map.get("dark").and_then(Value::as_bool).unwrap_or(false),
            chart: map.get("chart").filter(|v| !v.is_null()).cloned(),
        }
    }

    /// Normalize a `folds` value: a single mapping becomes a one-element
    /// list; anything that is neither a mapping nor a list is dropped.
    fn folds(&mut self, value: &Value) -> Vec<ContentNode> {
        match value {
            Value::Null => Vec::new(),
            Value::Object(map) => vec![self.node(map)],
            Value::Array(entries) => {
                let mut folds = Vec::with_capacity(entries.len());
                for (j, entry) in entries.iter().enumerate() {
                    self.location.push(format!("[{}]", j));
                    match entry {
                        Value::Object(map) => folds.push(self.node(map)),
                        other => {
                            warn!("Dropping malformed fold at {}: {}", self.here(), other);
                            self.report.dropped_folds += 1;
                        }
                    }
                    self.location.pop();
                }
                folds
            }
            other => {
                warn!("Dropping malformed folds value at {}: {}", self.here(), other);
                self.report.dropped_folds += 1;
                Vec::new()
            }
        }
    }

    fn items(&mut self, value: &Value) -> Vec<ContentItem> {
        let mut items = Vec::new();
        match value {
            Value::Null => {}
            Value::Array(entries) => {
                for (k, entry) in entries.iter().enumerate() {
                    self.location.push(format!("[{}]", k));
                    self.item(entry, &mut items);
                    self.location.pop();
                }
            }
            single => self.item(single, &mut items),
        }
        items
    }

    fn item(&mut self, value: &Value, out: &mut Vec<ContentItem>) {
        match value {
            Value::String(s) => out.push(ContentItem::from_text(s.as_str())),
            Value::Number(_) | Value::Bool(_) => out.push(ContentItem::Text(value.to_string())),
            Value::Object(map) => self.structured(map, out),
            Value::Array(entries) => {
                for entry in entries {
                    self.item(entry, out);
                }
            }
            Value::Null => {
                warn!("Dropping null content item at {}", self.here());
                self.report.dropped_items += 1;
            }
        }
    }

    fn structured(&mut self, map: &Map<String, Value>, out: &mut Vec<ContentItem>) {
        let mut recognized = false;

        if let Some(value) = map.get("html") {
            recognized = true;
            match value.as_str() {
                Some(html) => out.push(ContentItem::Markup(html.to_string())),
                None => self.drop_item("html", value),
            }
        }
        if let Some(value) = map.get("text") {
            recognized = true;
            match value {
                Value::String(s) => out.push(ContentItem::from_text(s.as_str())),
                Value::Number(_) | Value::Bool(_) => out.push(ContentItem::Text(value.to_string())),
                other => self.drop_item("text", other),
            }
        }
        if let Some(value) = map.get("columns") {
            recognized = true;
            match self.columns(value) {
                Some(columns) => out.push(ContentItem::Columns(columns)),
                None => self.drop_item("columns", value),
            }
        }
        if let Some(value) = map.get("row") {
            recognized = true;
            match self.row(value) {
                Some(row) => out.push(ContentItem::Row(row)),
                None => self.drop_item("row", value),
            }
        }
        if let Some(value) = map.get("rows") {
            recognized = true;
            let entries = match value {
                Value::Array(entries) => entries.as_slice(),
                single => std::slice::from_ref(single),
            };
            for entry in entries {
                match self.row(entry) {
                    Some(row) => out.push(ContentItem::Row(row)),
                    None => self.drop_item("rows", entry),
                }
            }
        }
        for key in ["folds", "fold"] {
            if let Some(value) = map.get(key) {
                recognized = true;
                self.location.push(key.to_string());
                let folds = self.folds(value);
                self.location.pop();
                if !folds.is_empty() {
                    out.push(ContentItem::Fold(folds));
                }
            }
        }
        if let Some(value) = map.get("chart") {
            recognized = true;
            if !value.is_null() {
                out.push(ContentItem::Chart(value.clone()));
            }
        }

        if !recognized {
            warn!(
                "Dropping content mapping with no known keys at {}: {:?}",
                self.here(),
                map.keys().collect::<Vec<_>>()
            );
            self.report.dropped_items += 1;
        }
    }

    fn drop_item(&mut self, key: &str, value: &Value) {
        warn!("Dropping malformed `{}` block at {}: {}", key, self.here(), value);
        self.report.dropped_items += 1;
    }

    fn row(&mut self, value: &Value) -> Option<Row> {
        let map = value.as_object()?;
        let cells = self.cells(map.get("cells"));
        let count = self.count(map, cells.len());
        Some(Row { count, cells })
    }

    fn columns(&mut self, value: &Value) -> Option<Columns> {
        let map = value.as_object()?;
        let cells = self.cells(map.get("cells"));
        let count = self.count(map, cells.len());
        let sizes = match map.get("sizes") {
            Some(Value::Array(sizes)) => sizes
                .iter()
                .map(|size| {
                    size.as_str()
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or(DEFAULT_COLUMN_SIZE)
                        .to_string()
                })
                .collect(),
            Some(Value::String(size)) => vec![size.clone()],
            _ => Vec::new(),
        };
        Some(Columns {
            count,
            sizes,
            cells,
        })
    }

    /// Slot count; never above `MAX_SLOT_COUNT` unless more cells are given.
    fn count(&self, map: &Map<String, Value>, fallback: usize) -> usize {
        let requested = match map.get("count") {
            None | Some(Value::Null) => return fallback,
            Some(value) => match value.as_u64() {
                Some(n) => n,
                None => {
                    warn!("Invalid count {} at {}; using {}", value, self.here(), fallback);
                    return fallback;
                }
            },
        };
        let ceiling = fallback.max(MAX_SLOT_COUNT);
        match usize::try_from(requested) {
            Ok(n) if n <= ceiling => n,
            _ => {
                warn!("Count {} at {} is too large; using {}", requested, self.here(), ceiling);
                ceiling
            }
        }
    }

    fn cells(&mut self, value: Option<&Value>) -> Vec<Cell> {
        match value {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(n, entry)| {
                    self.location.push(format!("cells[{}]", n));
                    let cell = self.cell(entry);
                    self.location.pop();
                    cell
                })
                .collect(),
            Some(single) => vec![self.cell(single)],
        }
    }

    fn cell(&mut self, value: &Value) -> Cell {
        let mut items = Vec::new();
        if !value.is_null() {
            self.item(value, &mut items);
        }
        items
    }
}
