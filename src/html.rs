// ABOUTME: HTML rendering module for the fold-deck application
// ABOUTME: Produces the table of contents, breadcrumbs and nested section markup

use crate::content::{self, Cell, Columns, ContentItem, ContentNode, Row};
use crate::ids::IdPath;
use crate::images::ResolvedDeck;
use serde_json::Value;

/// Deepest visual level a fold can have; deeper folds reuse it.
pub const MAX_FOLD_LEVEL: usize = 5;

/// Toggle label for a fold without a title.
pub const FOLD_FALLBACK_TITLE: &str = "Details";

/// Breadcrumb label for an untitled first node.
pub const TITLE_NODE_LABEL: &str = "Title";

/// Rendering knobs that depend on the output layout.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory, relative to the page, that holds the resolved images.
    pub image_base: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_base: "images".to_string(),
        }
    }
}

/// The three fragments substituted into the page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDeck {
    pub toc: String,
    pub breadcrumbs: String,
    pub sections: String,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn render_deck(&self, deck: &ResolvedDeck) -> RenderedDeck {
        RenderedDeck {
            toc: self.render_toc(deck),
            breadcrumbs: self.render_breadcrumbs(deck),
            sections: self.render(deck),
        }
    }

    /// One link per navigable node. An untitled first node is the title
    /// node: it gets no entry and shifts every target index down by one.
    pub fn render_toc(&self, deck: &ResolvedDeck) -> String {
        let nodes = deck.nodes();
        let offset = usize::from(content::has_title_node(nodes));
        let mut out = String::new();
        for (i, node) in nodes.iter().enumerate().skip(offset) {
            out.push_str(&format!(
                "<a href=\"#\" class=\"toc-link\" data-index=\"{}\">{}</a>\n",
                i - offset,
                escape_html(&nav_label(node, i))
            ));
        }
        out
    }

    /// One entry per top-level node, title node included, at its absolute index.
    pub fn render_breadcrumbs(&self, deck: &ResolvedDeck) -> String {
        let mut out = String::new();
        for (i, node) in deck.nodes().iter().enumerate() {
            out.push_str(&format!(
                "<li><a href=\"#\" data-index=\"{}\">{}</a></li>\n",
                i,
                escape_html(&nav_label(node, i))
            ));
        }
        out
    }

    /// Render every top-level node and, recursively, everything below it.
    pub fn render(&self, deck: &ResolvedDeck) -> String {
        let mut out = String::new();
        let mut path = IdPath::new();
        for (i, node) in deck.nodes().iter().enumerate() {
            self.render_node(node, i, 0, &mut path, &mut out);
        }
        out
    }

    fn render_node(
        &self,
        node: &ContentNode,
        index: usize,
        depth: usize,
        path: &mut IdPath,
        out: &mut String,
    ) {
        let dark = if node.dark { " dark" } else { "" };
        if depth == 0 {
            out.push_str(&format!(
                "<div id=\"section-{}\" class=\"section top-level{}\">\n",
                index, dark
            ));
        } else {
            out.push_str(&format!("<div class=\"nested-section nested{}\">\n", dark));
        }
        out.push_str("<div class=\"content-wrapper\">\n<div class=\"text-content\">\n");

        for (k, item) in node.content.iter().enumerate() {
            self.render_item(item, index, k, depth, path, out);
        }
        self.render_folds(&node.folds, index, depth, path, out);
        if let Some(chart) = &node.chart {
            render_chart(chart, out);
        }

        out.push_str("</div>\n");
        self.render_image(node, out);
        out.push_str("</div>\n</div>\n");
    }

    fn render_item(
        &self,
        item: &ContentItem,
        owner: usize,
        index: usize,
        depth: usize,
        path: &mut IdPath,
        out: &mut String,
    ) {
        match item {
            ContentItem::Text(text) => {
                out.push_str(&format!("<p>{}</p>\n", text));
            }
            ContentItem::Markup(markup) => {
                out.push_str(markup);
                out.push('\n');
            }
            ContentItem::Row(row) => {
                let mark = path.enter_item(owner, index);
                self.render_row(row, depth, path, out);
                path.reset(mark);
            }
            ContentItem::Columns(columns) => {
                let mark = path.enter_item(owner, index);
                self.render_columns(columns, depth, path, out);
                path.reset(mark);
            }
            ContentItem::Fold(folds) => {
                let mark = path.enter_item(owner, index);
                self.render_folds(folds, owner, depth, path, out);
                path.reset(mark);
            }
            ContentItem::Chart(chart) => render_chart(chart, out),
        }
    }

    fn render_row(&self, row: &Row, depth: usize, path: &mut IdPath, out: &mut String) {
        out.push_str("<div class=\"row\">\n");
        for n in 0..row.count {
            let mark = path.enter_row_slot(n);
            out.push_str("<div class=\"row-cell\">\n");
            self.render_cell(row.cell(n), depth + 1, path, out);
            out.push_str("</div>\n");
            path.reset(mark);
        }
        out.push_str("</div>\n");
    }

    fn render_columns(&self, columns: &Columns, depth: usize, path: &mut IdPath, out: &mut String) {
        out.push_str("<div class=\"columns\">\n");
        for n in 0..columns.count {
            let mark = path.enter_column_slot(n);
            out.push_str(&format!(
                "<div class=\"column\" style=\"width: {};\">\n",
                escape_html(columns.size(n))
            ));
            self.render_cell(columns.cell(n), depth + 1, path, out);
            out.push_str("</div>\n");
            path.reset(mark);
        }
        out.push_str("</div>\n");
    }

    fn render_cell(&self, cell: Option<&Cell>, depth: usize, path: &mut IdPath, out: &mut String) {
        let Some(items) = cell else {
            return;
        };
        for (n, item) in items.iter().enumerate() {
            self.render_item(item, n, n, depth, path, out);
        }
    }

    /// Toggle control plus content panel for each fold owned by `owner`.
    fn render_folds(
        &self,
        folds: &[ContentNode],
        owner: usize,
        depth: usize,
        path: &mut IdPath,
        out: &mut String,
    ) {
        let level = fold_level(depth + 1);
        for (j, fold) in folds.iter().enumerate() {
            let id = path.fold_id(depth, owner, j);
            let title = if fold.title.trim().is_empty() {
                FOLD_FALLBACK_TITLE
            } else {
                fold.title.as_str()
            };
            out.push_str(&format!(
                "<button class=\"collapsible level-{}\" aria-expanded=\"false\" aria-controls=\"{}\">{}</button>\n",
                level,
                id,
                escape_html(title)
            ));
            out.push_str(&format!(
                "<div id=\"{}\" class=\"content-panel level-{}\">\n",
                id, level
            ));

            let mark = path.enter_fold(depth, owner, j);
            self.render_node(fold, 0, depth + 1, path, out);
            path.reset(mark);

            out.push_str("</div>\n");
        }
    }

    fn render_image(&self, node: &ContentNode, out: &mut String) {
        let Some(image) = node.image.as_deref().filter(|image| !image.is_empty()) else {
            return;
        };
        let src = if self.options.image_base.is_empty() {
            image.to_string()
        } else {
            format!("{}/{}", self.options.image_base.trim_end_matches('/'), image)
        };
        let alt = if node.title.is_empty() {
            "Slide Image".to_string()
        } else {
            format!("{} Image", node.title)
        };
        out.push_str(&format!(
            "<div class=\"image-content\">\n<img src=\"{}\" alt=\"{}\">\n</div>\n",
            escape_html(&src),
            escape_html(&alt)
        ));
    }
}

/// Presentational fold level; recursion itself is never capped.
pub fn fold_level(depth: usize) -> usize {
    depth.min(MAX_FOLD_LEVEL)
}

fn nav_label(node: &ContentNode, index: usize) -> String {
    match (node.title.is_empty(), index) {
        (false, _) => node.title.clone(),
        (true, 0) => TITLE_NODE_LABEL.to_string(),
        (true, i) => format!("Section {}", i),
    }
}

fn render_chart(chart: &Value, out: &mut String) {
    out.push_str(&format!(
        "<div class=\"chart-container\" data-chart-data='{}'>\n<canvas></canvas>\n</div>\n",
        chart_attribute(chart)
    ));
}

/// Chart JSON made safe for a single-quoted attribute. The contents are
/// otherwise untouched; the client parses them back with `JSON.parse`.
pub fn chart_attribute(chart: &Value) -> String {
    chart.to_string().replace('&', "&amp;").replace('\'', "&#39;")
}

/// Escape special HTML characters in text and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
