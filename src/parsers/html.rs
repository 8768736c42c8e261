use crate::error::BrowserError;
use crate::parsers::clean_fragment;
use scraper::{Html, Selector};
use serde_json::Value;

/// In-page script that collects leaf text nodes depth first, in document
/// order, starting from `document.body`
pub const LEAF_TEXT_SCRIPT: &str = r#"
function getAllLeafNodesText(element) {
    let nodes = [];
    if (element.hasChildNodes()) {
        for (let child of element.childNodes) {
            nodes = nodes.concat(getAllLeafNodesText(child));
        }
    } else if (element.nodeType === Node.TEXT_NODE && element.textContent.trim() !== "") {
        nodes.push(element.textContent.trim());
    }
    return nodes;
}
return getAllLeafNodesText(document.body);
"#;

/// Collects the text of every leaf text node under `<body>` in document order
///
/// Falls back to the document root when the page has no body element.
/// `<template>` contents are inert in a live page and are skipped.
pub fn leaf_texts(document: &Html) -> Vec<String> {
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    // descendants() is a pre-order walk, which matches document order
    root.descendants()
        .filter(|node| !node.has_children())
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| element.name() == "template")
            })
        })
        .filter_map(|node| node.value().as_text().and_then(|text| clean_fragment(text)))
        .collect()
}

/// Parses a rendered DOM serialization and collects its leaf text
pub fn parse_leaf_texts(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let texts = leaf_texts(&doc);
    ::log::debug!("HTML parser found {} leaf text fragments", texts.len());
    texts
}

/// Converts the value returned by [`LEAF_TEXT_SCRIPT`] into leaf text
pub fn leaf_texts_from_script(value: Value) -> Result<Vec<String>, BrowserError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => clean_fragment(&text).map(Ok),
                other => Some(Err(BrowserError::Rendering(format!(
                    "leaf text script returned a non-string entry: {}",
                    other
                )))),
            })
            .collect(),
        // document.body is gone or the page was torn down
        Value::Null => Err(BrowserError::Rendering(
            "leaf text script returned null".to_string(),
        )),
        other => Err(BrowserError::Rendering(format!(
            "leaf text script returned {}",
            other
        ))),
    }
}
