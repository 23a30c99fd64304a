use super::*;
use crate::content::{is_markup, MAX_SLOT_COUNT};
use crate::html::{chart_attribute, fold_level, FOLD_FALLBACK_TITLE, MAX_FOLD_LEVEL};
use crate::loader::DeckFormat;
use crate::resources::{resource_tags, ResourceKind};
use crate::template::PageParts;
use crate::utils::sanitize_title;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn deck(sections: Value) -> Deck {
    Deck::from_sections(&sections)
}

fn staged(sections: Value) -> ResolvedDeck {
    ResolvedDeck::from_staged(deck(sections))
}

fn render_body(sections: Value) -> String {
    Renderer::default().render(&staged(sections))
}

fn count_matches(haystack: &str, pattern: &str) -> usize {
    Regex::new(pattern)
        .expect("Invalid test regex")
        .find_iter(haystack)
        .count()
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[test]
fn test_markup_classification_heuristic() {
    assert!(is_markup("<b>bold</b>"));
    assert!(is_markup("text with <br> inside"));
    assert!(!is_markup("plain text"));
    assert!(!is_markup("a < b"));
    assert!(!is_markup("a > b"));
    assert!(!is_markup("<>"));
}

#[test]
fn test_string_items_are_classified_at_ingestion() {
    let deck = deck(json!([{ "title": "A", "content": ["<b>bold</b>", "plain text", 42] }]));
    assert_eq!(
        deck.nodes[0].content,
        vec![
            ContentItem::Markup("<b>bold</b>".to_string()),
            ContentItem::Text("plain text".to_string()),
            ContentItem::Text("42".to_string()),
        ]
    );
    assert!(deck.report.is_clean());
}

#[test]
fn test_html_key_is_always_markup() {
    let deck = deck(json!([{ "title": "A", "content": [{ "html": "no tags here" }] }]));
    assert_eq!(
        deck.nodes[0].content,
        vec![ContentItem::Markup("no tags here".to_string())]
    );
}

#[test]
fn test_single_fold_mapping_is_normalized_to_list() {
    let deck = deck(json!([{ "title": "A", "folds": { "title": "Only" } }]));
    assert_eq!(deck.nodes[0].folds.len(), 1);
    assert_eq!(deck.nodes[0].folds[0].title, "Only");
    assert!(deck.report.is_clean());
}

#[test]
fn test_malformed_folds_are_dropped_and_counted() {
    let deck = deck(json!([
        { "title": "A", "folds": "not a fold" },
        { "title": "B", "folds": [{ "title": "kept" }, 3, null] }
    ]));
    assert!(deck.nodes[0].folds.is_empty());
    assert_eq!(deck.nodes[1].folds.len(), 1);
    assert_eq!(deck.report.dropped_folds, 3);
    assert_eq!(deck.report.dropped_items, 0);
}

#[test]
fn test_unknown_mappings_and_nulls_are_dropped() {
    let deck = deck(json!([
        "not a section",
        { "title": "A", "content": [{ "mystery": true }, null, "kept"] }
    ]));
    assert_eq!(deck.nodes.len(), 1);
    assert_eq!(deck.nodes[0].content, vec![ContentItem::Text("kept".to_string())]);
    assert_eq!(deck.report.dropped_nodes, 1);
    assert_eq!(deck.report.dropped_items, 2);
    assert_eq!(deck.report.total(), 3);
}

#[test]
fn test_structured_blocks_and_count_defaults() {
    let deck = deck(json!([{
        "title": "A",
        "content": [
            { "columns": { "sizes": ["30%", 7], "cells": ["one", "two"] } },
            { "rows": [{ "count": 3, "cells": ["r"] }, { "cells": [] }] }
        ]
    }]));
    let content = &deck.nodes[0].content;
    assert_eq!(content.len(), 3);

    match &content[0] {
        ContentItem::Columns(columns) => {
            assert_eq!(columns.count, 2);
            assert_eq!(columns.size(0), "30%");
            assert_eq!(columns.size(1), "100%");
            assert_eq!(columns.size(5), "100%");
        }
        other => panic!("Expected columns, got {:?}", other),
    }
    match &content[1] {
        ContentItem::Row(row) => {
            assert_eq!(row.count, 3);
            assert!(row.cell(2).is_none());
        }
        other => panic!("Expected row, got {:?}", other),
    }
    assert!(matches!(&content[2], ContentItem::Row(row) if row.count == 0));
}

#[test]
fn test_oversized_counts_are_clamped() {
    let many_cells: Vec<String> = (0..80).map(|i| format!("cell {}", i)).collect();
    let deck = deck(json!([{
        "title": "A",
        "content": [
            { "row": { "count": 1_000_000_000_000u64, "cells": ["a", "b"] } },
            { "columns": { "count": 100, "cells": many_cells } },
            { "columns": { "count": 10, "cells": ["a"] } }
        ]
    }]));
    let content = &deck.nodes[0].content;
    assert!(matches!(&content[0], ContentItem::Row(row) if row.count == MAX_SLOT_COUNT));
    assert!(matches!(&content[1], ContentItem::Columns(columns) if columns.count == 80));
    assert!(matches!(&content[2], ContentItem::Columns(columns) if columns.count == 10));

    let body = Renderer::default().render(&ResolvedDeck::from_staged(deck));
    assert_eq!(
        count_matches(&body, r#"<div class="row-cell">"#),
        MAX_SLOT_COUNT
    );
}

#[test]
fn test_node_fields_are_read_leniently() {
    let deck = deck(json!([
        { "title": 2024, "image": "a.png", "dark": true, "chart": { "type": "bar" } },
        { "content": "single item", "image": 5 }
    ]));
    let first = &deck.nodes[0];
    assert_eq!(first.title, "2024");
    assert_eq!(first.image.as_deref(), Some("a.png"));
    assert!(first.dark);
    assert_eq!(first.chart, Some(json!({ "type": "bar" })));

    let second = &deck.nodes[1];
    assert_eq!(second.title, "");
    assert_eq!(second.image, None);
    assert_eq!(second.content, vec![ContentItem::Text("single item".to_string())]);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn test_markup_is_verbatim_and_text_is_wrapped() {
    let body = render_body(json!([{ "title": "A", "content": ["<b>bold</b>", "plain text"] }]));
    assert!(body.contains("<b>bold</b>\n"));
    assert!(!body.contains("<p><b>bold</b></p>"));
    assert!(body.contains("<p>plain text</p>"));
}

#[test]
fn test_toc_skips_untitled_first_node() {
    let deck = staged(json!([
        { "title": "", "content": ["<h1>Deck</h1>"] },
        { "title": "Intro" },
        { "title": "Outro" }
    ]));
    let toc = Renderer::default().render_toc(&deck);
    assert_eq!(count_matches(&toc, "<a "), 2);
    assert!(toc.contains(r#"data-index="0">Intro</a>"#));
    assert!(toc.contains(r#"data-index="1">Outro</a>"#));
}

#[test]
fn test_toc_counts_every_node_without_title_node() {
    let deck = staged(json!([{ "title": "One" }, { "title": "Two" }, { "title": "Three" }]));
    let toc = Renderer::default().render_toc(&deck);
    assert_eq!(count_matches(&toc, "<a "), 3);
    assert!(toc.contains(r#"data-index="0">One</a>"#));
    assert!(toc.contains(r#"data-index="2">Three</a>"#));
}

#[test]
fn test_breadcrumbs_include_title_node_at_absolute_index() {
    let deck = staged(json!([{ "title": "" }, { "title": "Intro" }]));
    let crumbs = Renderer::default().render_breadcrumbs(&deck);
    assert_eq!(count_matches(&crumbs, "<li>"), 2);
    assert!(crumbs.contains(r##"<a href="#" data-index="0">Title</a>"##));
    assert!(crumbs.contains(r##"<a href="#" data-index="1">Intro</a>"##));
}

#[test]
fn test_section_indices_use_full_ordering() {
    let body = render_body(json!([{ "title": "", "dark": true }, { "title": "Intro" }]));
    assert!(body.contains(r#"<div id="section-0" class="section top-level dark">"#));
    assert!(body.contains(r#"<div id="section-1" class="section top-level">"#));
}

#[test]
fn test_titles_are_escaped_in_navigation() {
    let deck = staged(json!([{ "title": "Q&A <live>" }]));
    let toc = Renderer::default().render_toc(&deck);
    assert!(toc.contains("Q&amp;A &lt;live&gt;"));
}

#[test]
fn test_columns_fill_missing_sizes_and_cells() {
    let body = render_body(json!([{
        "title": "A",
        "content": [{ "columns": { "count": 2, "sizes": ["30%"], "cells": ["short"] } }]
    }]));
    let expected = concat!(
        "<div class=\"columns\">\n",
        "<div class=\"column\" style=\"width: 30%;\">\n",
        "<p>short</p>\n",
        "</div>\n",
        "<div class=\"column\" style=\"width: 100%;\">\n",
        "</div>\n",
        "</div>\n"
    );
    assert!(body.contains(expected), "Unexpected columns markup:\n{}", body);
}

#[test]
fn test_row_renders_one_slot_per_count() {
    let body = render_body(json!([{
        "title": "A",
        "content": [{ "row": { "count": 2, "cells": [{ "columns": { "cells": ["<em>x</em>"] } }] } }]
    }]));
    assert_eq!(count_matches(&body, r#"<div class="row-cell">"#), 2);
    assert!(body.contains("<em>x</em>"));
}

#[test]
fn test_fold_without_title_uses_fallback_label() {
    let body = render_body(json!([{ "title": "A", "folds": [{ "content": ["hidden"] }] }]));
    assert!(body.contains(&format!(
        r#"<button class="collapsible level-1" aria-expanded="false" aria-controls="collapsible-0-0-0">{}</button>"#,
        FOLD_FALLBACK_TITLE
    )));
    assert!(body.contains(r#"<div id="collapsible-0-0-0" class="content-panel level-1">"#));
    assert!(body.contains(r#"<div class="nested-section nested">"#));
}

#[test]
fn test_fold_identifiers_thread_the_path() {
    let body = render_body(json!([
        { "title": "" },
        { "title": "A", "folds": [{ "title": "A1", "folds": [{ "title": "A1a" }] }] }
    ]));
    assert!(body.contains(r#"aria-controls="collapsible-0-1-0""#));
    assert!(body.contains(r#"aria-controls="collapsible-0-1-0-1-0-0""#));
}

#[test]
fn test_fold_identifiers_are_unique_and_paired() {
    let sections = json!([
        { "title": "", "content": ["<h1>T</h1>"] },
        {
            "title": "A",
            "content": [
                { "columns": { "count": 2, "cells": [
                    { "folds": [{ "title": "C1" }, { "title": "C2" }] },
                    [
                        { "row": { "count": 1, "cells": [
                            { "folds": { "title": "R1", "folds": [{ "title": "R1a" }] } }
                        ] } },
                        { "folds": { "title": "C3" } }
                    ]
                ] } },
                { "folds": [{ "title": "Inline" }] }
            ],
            "folds": [
                { "title": "A1", "folds": [
                    { "title": "A1a" },
                    { "title": "A1b", "folds": { "title": "A1b-i" } }
                ] },
                { "title": "A2" }
            ]
        },
        {
            "title": "B",
            "folds": [
                { "title": "B1" },
                { "title": "B2", "content": [{ "columns": { "cells": [{ "folds": { "title": "deep" } }] } }] }
            ]
        }
    ]);
    let expected_folds = deck(sections.clone()).fold_count();
    assert_eq!(expected_folds, 14);

    let body = render_body(sections);
    let controls: Vec<String> = Regex::new(r#"aria-controls="([^"]+)""#)
        .unwrap()
        .captures_iter(&body)
        .map(|c| c[1].to_string())
        .collect();
    let panels: Vec<String> = Regex::new(r#"<div id="([^"]+)" class="content-panel"#)
        .unwrap()
        .captures_iter(&body)
        .map(|c| c[1].to_string())
        .collect();

    assert_eq!(controls.len(), expected_folds);
    assert_eq!(panels.len(), expected_folds);

    let control_set: HashSet<&String> = controls.iter().collect();
    let panel_set: HashSet<&String> = panels.iter().collect();
    assert_eq!(control_set.len(), controls.len(), "Duplicate toggle ids: {:?}", controls);
    assert_eq!(control_set, panel_set);
}

#[test]
fn test_fold_identifiers_differ_across_sections_with_same_shape() {
    let section = |title: &str| {
        json!({
            "title": title,
            "content": [
                { "columns": { "count": 1, "cells": [{ "folds": { "title": "In column" } }] } },
                { "row": { "count": 1, "cells": [{ "folds": { "title": "In row" } }] } },
                { "folds": { "title": "Inline" } }
            ]
        })
    };
    let body = render_body(json!([section("One"), section("Two"), section("Three")]));

    let ids: Vec<String> = Regex::new(r#"aria-controls="([^"]+)""#)
        .unwrap()
        .captures_iter(&body)
        .map(|c| c[1].to_string())
        .collect();
    assert_eq!(ids.len(), 9);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "Duplicate toggle ids: {:?}", ids);

    assert!(ids.contains(&"collapsible-n0i0-col0-n0i0-1-0-0".to_string()));
    assert!(ids.contains(&"collapsible-n1i0-col0-n0i0-1-0-0".to_string()));
    assert!(ids.contains(&"collapsible-n2i2-0-2-0".to_string()));
    for id in &ids {
        assert!(body.contains(&format!(r#"<div id="{}" class="content-panel"#, id)));
    }
}

#[test]
fn test_fold_level_is_clamped_but_depth_is_not() {
    assert_eq!(fold_level(1), 1);
    assert_eq!(fold_level(MAX_FOLD_LEVEL), MAX_FOLD_LEVEL);
    assert_eq!(fold_level(42), MAX_FOLD_LEVEL);

    let mut chain = json!({ "title": "L7" });
    for level in (1..7).rev() {
        chain = json!({ "title": format!("L{}", level), "folds": [chain] });
    }
    let body = render_body(json!([{ "title": "Top", "folds": [chain] }]));

    assert!(body.contains(r#"class="collapsible level-5""#));
    assert!(!body.contains("level-6"));
    assert!(body.contains(
        r#"aria-controls="collapsible-0-0-0-1-0-0-2-0-0-3-0-0-4-0-0-5-0-0-6-0-0">L7</button>"#
    ));
}

#[test]
fn test_chart_is_embedded_opaquely() {
    let chart = json!({ "label": "it's" });
    assert_eq!(chart_attribute(&chart), r#"{"label":"it&#39;s"}"#);

    let body = render_body(json!([{
        "title": "A",
        "folds": [{ "title": "Chart", "chart": { "type": "bar", "data": { "labels": ["Q1"] } } }]
    }]));
    assert!(body.contains(
        r#"<div class="chart-container" data-chart-data='{"data":{"labels":["Q1"]},"type":"bar"}'>"#
    ));
    assert!(body.contains("<canvas></canvas>"));
}

#[test]
fn test_image_block_uses_resolved_name() {
    let body = render_body(json!([{ "title": "Pic", "image": "a.png" }, { "title": "None" }]));
    assert_eq!(count_matches(&body, r#"class="image-content""#), 1);
    assert!(body.contains(r#"<img src="images/a.png" alt="Pic Image">"#));

    let bare = Renderer::new(RenderOptions {
        image_base: String::new(),
    })
    .render(&staged(json!([{ "title": "Pic", "image": "a.png" }])));
    assert!(bare.contains(r#"<img src="a.png""#));
}

#[test]
fn test_id_path_reset_restores_prefix() {
    let mut path = IdPath::new();
    let root = path.fold_id(0, 1, 2);
    let mark = path.enter_item(1, 3);
    let inner = path.enter_fold(1, 0, 0);
    assert_eq!(path.fold_id(2, 0, 0), "collapsible-n1i3-1-0-0-2-0-0");
    path.reset(inner);
    path.reset(mark);
    assert_eq!(path.fold_id(0, 1, 2), root);
    assert_eq!(root, "collapsible-0-1-2");
}

// ---------------------------------------------------------------------------
// Image resolution
// ---------------------------------------------------------------------------

struct ImageFixture {
    _temp: TempDir,
    source: std::path::PathBuf,
    dest: std::path::PathBuf,
    placeholder: std::path::PathBuf,
}

fn image_fixture() -> ImageFixture {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let source = temp.path().join("src");
    let assets = temp.path().join("assets");
    fs::create_dir_all(source.join("sub")).unwrap();
    fs::create_dir_all(&assets).unwrap();
    fs::write(source.join("a.png"), b"a-bytes").unwrap();
    fs::write(source.join("sub").join("b.png"), b"b-bytes").unwrap();
    let placeholder = assets.join("ph.png");
    fs::write(&placeholder, b"placeholder").unwrap();
    ImageFixture {
        source,
        dest: temp.path().join("out").join("images"),
        placeholder,
        _temp: temp,
    }
}

#[test]
fn test_resolve_copies_existing_images_and_fills_placeholders() {
    let fx = image_fixture();
    let resolved = resolve(
        deck(json!([
            { "title": "A", "image": "a.png" },
            { "title": "B" },
            { "title": "C", "image": "sub/b.png" }
        ])),
        Some(&fx.source),
        &fx.dest,
        &fx.placeholder,
    )
    .expect("Resolution failed");

    let nodes = resolved.nodes();
    assert_eq!(nodes[0].image.as_deref(), Some("a.png"));
    assert_eq!(nodes[1].image.as_deref(), Some("ph.png"));
    assert_eq!(nodes[2].image.as_deref(), Some("b.png"));
    assert_eq!(fs::read(fx.dest.join("a.png")).unwrap(), b"a-bytes");
    assert!(fx.dest.join("ph.png").exists());
    assert_eq!(list_dir(&fx.dest), vec!["a.png", "b.png", "ph.png"]);

    let stats = resolved.stats();
    assert_eq!(stats.copied, 2);
    assert_eq!(stats.placeholders, 1);
    assert_eq!(stats.missing, 0);
}

#[test]
fn test_resolve_falls_back_for_missing_source_file() {
    let fx = image_fixture();
    let resolved = resolve(
        deck(json!([{ "title": "A", "image": "gone.png" }])),
        Some(&fx.source),
        &fx.dest,
        &fx.placeholder,
    )
    .unwrap();
    assert_eq!(resolved.nodes()[0].image.as_deref(), Some("ph.png"));
    assert_eq!(resolved.stats().missing, 1);
    assert_eq!(list_dir(&fx.dest), vec!["ph.png"]);
}

#[test]
fn test_resolve_refuses_references_outside_source_dir() {
    let fx = image_fixture();
    let outside = fx.source.parent().unwrap().join("secret.png");
    fs::write(&outside, b"secret").unwrap();

    let resolved = resolve(
        deck(json!([
            { "title": "Up", "image": "../secret.png" },
            { "title": "Absolute", "image": outside.to_str().unwrap() },
            { "title": "Dot", "image": "./a.png" }
        ])),
        Some(&fx.source),
        &fx.dest,
        &fx.placeholder,
    )
    .unwrap();

    let nodes = resolved.nodes();
    assert_eq!(nodes[0].image.as_deref(), Some("ph.png"));
    assert_eq!(nodes[1].image.as_deref(), Some("ph.png"));
    assert_eq!(nodes[2].image.as_deref(), Some("a.png"));
    assert_eq!(resolved.stats().missing, 2);
    assert_eq!(list_dir(&fx.dest), vec!["a.png", "ph.png"]);
}

#[test]
fn test_resolve_is_idempotent() {
    let fx = image_fixture();
    let input = deck(json!([
        { "title": "A", "image": "a.png", "folds": [{ "title": "F" }] },
        { "title": "B", "image": "missing.png" }
    ]));

    let first = resolve(input.clone(), Some(&fx.source), &fx.dest, &fx.placeholder).unwrap();
    let listing = list_dir(&fx.dest);
    let second = resolve(input, Some(&fx.source), &fx.dest, &fx.placeholder).unwrap();

    assert_eq!(first.nodes(), second.nodes());
    assert_eq!(list_dir(&fx.dest), listing);
    assert_eq!(listing, vec!["a.png", "ph.png"]);
}

#[test]
fn test_resolve_visits_folds_and_cells() {
    let fx = image_fixture();
    let resolved = resolve(
        deck(json!([{
            "title": "A",
            "image": "a.png",
            "content": [{ "columns": { "cells": [{ "folds": { "title": "In cell", "image": "sub/b.png" } }] } }],
            "folds": [{ "title": "F", "folds": [{ "title": "FF" }] }]
        }])),
        Some(&fx.source),
        &fx.dest,
        &fx.placeholder,
    )
    .unwrap();

    let node = &resolved.nodes()[0];
    match &node.content[0] {
        ContentItem::Columns(columns) => match &columns.cells[0][0] {
            ContentItem::Fold(folds) => assert_eq!(folds[0].image.as_deref(), Some("b.png")),
            other => panic!("Expected fold, got {:?}", other),
        },
        other => panic!("Expected columns, got {:?}", other),
    }
    assert_eq!(node.folds[0].image.as_deref(), Some("ph.png"));
    assert_eq!(node.folds[0].folds[0].image.as_deref(), Some("ph.png"));
    assert_eq!(resolved.stats().placeholders, 2);
}

#[test]
fn test_resolve_without_source_keeps_staged_names() {
    let fx = image_fixture();
    let resolved = resolve(
        deck(json!([{ "title": "A", "image": "nested/dir/c.png" }, { "title": "B" }])),
        None,
        &fx.dest,
        &fx.placeholder,
    )
    .unwrap();
    assert_eq!(resolved.nodes()[0].image.as_deref(), Some("c.png"));
    assert_eq!(resolved.nodes()[1].image.as_deref(), Some("ph.png"));
    assert_eq!(list_dir(&fx.dest), vec!["ph.png"]);
}

#[test]
fn test_resolve_with_missing_source_dir_uses_placeholder_everywhere() {
    let fx = image_fixture();
    let resolved = resolve(
        deck(json!([{ "title": "A", "image": "a.png" }])),
        Some(&fx.source.join("nope")),
        &fx.dest,
        &fx.placeholder,
    )
    .unwrap();
    assert_eq!(resolved.nodes()[0].image.as_deref(), Some("ph.png"));
    assert_eq!(resolved.stats().missing, 1);
}

#[test]
fn test_resolve_without_placeholder_leaves_fields_alone() {
    let fx = image_fixture();
    let resolved = resolve(
        deck(json!([{ "title": "A", "image": "gone.png" }, { "title": "B" }])),
        Some(&fx.source),
        &fx.dest,
        &fx.placeholder.with_file_name("absent.png"),
    )
    .expect("A missing placeholder must not be fatal");
    assert_eq!(resolved.nodes()[0].image.as_deref(), Some("gone.png"));
    assert_eq!(resolved.nodes()[1].image, None);
    assert_eq!(resolved.stats().unresolved, 2);
    assert!(list_dir(&fx.dest).is_empty());
}

#[test]
fn test_resolve_rejects_unusable_destination() {
    let fx = image_fixture();
    let blocker = fx.source.join("a.png");
    let result = resolve(
        deck(json!([{ "title": "A" }])),
        Some(&fx.source),
        &blocker,
        &fx.placeholder,
    );
    assert!(matches!(result, Err(DeckError::ConfigError(_))));
}

// ---------------------------------------------------------------------------
// Loading, templates, resources and the full pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_deck_format_from_extension() {
    assert_eq!(DeckFormat::from_path(Path::new("deck.json")).unwrap(), DeckFormat::Json);
    assert_eq!(DeckFormat::from_path(Path::new("deck.YML")).unwrap(), DeckFormat::Yaml);
    assert!(matches!(
        DeckFormat::from_path(Path::new("deck.toml")),
        Err(DeckError::ConfigError(_))
    ));
}

#[test]
fn test_load_yaml_deck() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deck.yaml");
    fs::write(
        &path,
        "title: My Talk\nsections:\n  - title: ''\n    content: ['<h1>My Talk</h1>']\n  - title: Intro\n    folds:\n      title: More\n      content: [Details here]\n",
    )
    .unwrap();

    let presentation = load_presentation(&path).expect("Failed to load deck");
    assert_eq!(presentation.title, "My Talk");
    assert_eq!(presentation.author, loader::DEFAULT_AUTHOR);
    assert_eq!(presentation.deck.nodes.len(), 2);
    assert_eq!(presentation.deck.fold_count(), 1);
}

#[test]
fn test_load_rejects_non_mapping_deck() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deck.json");
    fs::write(&path, "[1, 2, 3]").unwrap();
    assert!(matches!(
        load_presentation(&path),
        Err(DeckError::DeckParseError { .. })
    ));
}

#[test]
fn test_sample_deck_has_title_node_and_folds() {
    let sample = Presentation::sample();
    assert!(content::has_title_node(&sample.deck.nodes));
    assert_eq!(sample.deck.fold_count(), 6);
    assert!(sample.deck.report.is_clean());
}

#[test]
fn test_template_fill_is_single_pass() {
    let template = Template::parse(
        "<title>{{title}}</title>{{ toc }}|{{sections}}|{{unknown}}".to_string(),
    )
    .unwrap();
    let page = template.fill(&PageParts {
        title: "R&D",
        toc: "<a>t</a>",
        sections: "<p>{{title}}</p>",
        ..Default::default()
    });
    assert_eq!(page, "<title>R&amp;D</title><a>t</a>|<p>{{title}}</p>|{{unknown}}");
}

#[test]
fn test_template_requires_sections_token() {
    assert!(matches!(
        Template::parse("<html>{{title}}</html>".to_string()),
        Err(DeckError::TemplateError(_))
    ));
    assert!(Template::builtin().fill(&PageParts::default()).contains("<!DOCTYPE html>"));
}

#[test]
fn test_resource_tags_link_remote_and_embed_local() {
    let temp = TempDir::new().unwrap();
    let css_path = temp.path().join("extra.css");
    fs::write(&css_path, "body { color: red; }").unwrap();

    let files = vec![
        ResourceFile::new("https://example.com/a.css"),
        ResourceFile::new(css_path.to_str().unwrap()),
        ResourceFile::new("/definitely/missing.css"),
    ];
    let tags = resource_tags(&files, ResourceKind::Css, true);
    assert!(tags.contains(r#"<link rel="stylesheet" href="https://example.com/a.css">"#));
    assert!(tags.contains("<style>body { color: red; }</style>"));
    assert!(!tags.contains("missing.css"));

    let linked = resource_tags(&files[1..2], ResourceKind::Js, false);
    assert!(linked.starts_with("<script src="));
}

#[test]
fn test_theme_parsing() {
    assert_eq!("Blue".parse::<Theme>().unwrap(), Theme::Blue);
    assert_eq!(Theme::Dark.css_file_name(), "style-dark.css");
    assert!("green".parse::<Theme>().is_err());
}

#[test]
fn test_sanitize_title() {
    assert_eq!(sanitize_title("Example Presentation"), "Example_Presentation");
    assert_eq!(sanitize_title("Q3 results: v2.0!"), "Q3_results_v20");
    assert_eq!(sanitize_title("???"), "presentation");
}

#[test]
fn test_generate_presentation_writes_page_and_assets() {
    let temp = TempDir::new().unwrap();
    let options = GenerateOptions {
        output_dir: Some(temp.path().join("deck")),
        theme: Theme::Blue,
        ..Default::default()
    };

    let generated =
        generate_presentation(Presentation::sample(), &options).expect("Generation failed");

    assert_eq!(generated.html_path, temp.path().join("deck").join("Fold_Deck_Sample.html"));
    let page = fs::read_to_string(&generated.html_path).unwrap();
    assert!(page.contains("<title>Fold Deck Sample</title>"));
    assert!(page.contains(r#"<div id="section-0" class="section top-level dark">"#));
    assert!(page.contains("static/css/themes/style-blue.css"));
    assert!(page.contains(r#"<img src="images/placeholder.svg""#));
    assert!(!page.contains("{{"));

    let out = temp.path().join("deck");
    assert!(out.join("static/js/script.js").is_file());
    assert!(out.join("static/css/core.css").is_file());
    assert!(out.join("static/css/themes/style-blue.css").is_file());
    assert!(out.join("images/placeholder.svg").is_file());
    assert_eq!(generated.images.placeholders, Presentation::sample().deck.nodes.len() + 6);
}

#[test]
fn test_generate_fails_fast_on_bad_template() {
    let temp = TempDir::new().unwrap();
    let options = GenerateOptions {
        output_dir: Some(temp.path().join("deck")),
        template_path: Some(temp.path().join("missing.html")),
        ..Default::default()
    };
    let result = generate_presentation(Presentation::sample(), &options);
    assert!(matches!(result, Err(DeckError::ConfigError(_))));
    assert!(!temp.path().join("deck").exists());
}
