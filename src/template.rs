// ABOUTME: Page template handling for the fold-deck application
// ABOUTME: Loads the page shell and substitutes rendered fragments into its tokens

use crate::errors::{DeckError, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Page shell compiled into the binary.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/core.html");

const REQUIRED_TOKEN: &str = "sections";

/// Values for the `{{token}}` placeholders of a template.
#[derive(Debug, Clone, Default)]
pub struct PageParts<'a> {
    pub title: &'a str,
    pub toc: &'a str,
    pub breadcrumbs: &'a str,
    pub sections: &'a str,
    pub theme_css: &'a str,
    pub head_resources: &'a str,
    pub body_resources: &'a str,
}

impl PageParts<'_> {
    fn lookup(&self, token: &str) -> Option<String> {
        let value = match token {
            // The title is plain text; everything else is already markup
            "title" => return Some(crate::html::escape_html(self.title)),
            "toc" => self.toc,
            "breadcrumbs" => self.breadcrumbs,
            "sections" => self.sections,
            "theme_css" => self.theme_css,
            "head_resources" => self.head_resources,
            "body_resources" => self.body_resources,
            _ => return None,
        };
        Some(value.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn builtin() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Read a custom template; unreadable or incomplete templates are fatal.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading page template from {:?}", path);
        let source = fs::read_to_string(path).map_err(|e| {
            DeckError::ConfigError(format!("Cannot read template {:?}: {}", path, e))
        })?;
        Self::parse(source)
    }

    pub fn parse(source: String) -> Result<Self> {
        let marker = format!("{{{{{}}}}}", REQUIRED_TOKEN);
        if !source.contains(&marker) {
            return Err(DeckError::TemplateError(format!(
                "template has no {} placeholder",
                marker
            )));
        }
        Ok(Self { source })
    }

    /// Substitute every known `{{token}}` in a single pass.
    ///
    /// Inserted fragments are never rescanned, so content that happens to
    /// contain `{{title}}` is left alone. Unknown tokens are kept verbatim.
    pub fn fill(&self, parts: &PageParts) -> String {
        let mut out = String::with_capacity(self.source.len() + parts.sections.len());
        let mut rest = self.source.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };
            let token = after[..end].trim();
            match parts.lookup(token) {
                Some(value) => out.push_str(&value),
                None => {
                    debug!("Leaving unknown template token {{{{{}}}}}", token);
                    out.push_str(&rest[start..start + 2 + end + 2]);
                }
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }
}
