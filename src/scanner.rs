//! HTML attribute scanner: extracts reference-bearing attributes and anchor
//! identifiers from one document.
//!
//! Parsing is tree-sitter based, so malformed markup degrades to ERROR nodes
//! instead of failing the scan; whatever tags survive are still extracted.

use std::collections::HashSet;
use std::path::Path;

use tree_sitter::{Node, Parser, Tree, TreeCursor};

use crate::error::Error;
use crate::types::Reference;

/// Everything extracted from one HTML file: outbound references plus the
/// anchor identifiers other files may point at.
#[derive(Debug, Default)]
pub struct PageScan {
    /// Every element `id` value (trimmed, non-empty).
    pub ids: HashSet<String>,
    /// Legacy `<a name="...">` anchors.
    pub names: HashSet<String>,
    /// Reference-bearing attribute occurrences, in document order.
    pub refs: Vec<Reference>,
}

impl PageScan {
    /// Union of ids and legacy names — the file's addressable anchors.
    pub fn anchors(&self) -> HashSet<String> {
        self.ids.union(&self.names).cloned().collect()
    }
}

/// One opening tag: lowercased name plus its attribute map.
/// Attribute names are lowercased; a repeated attribute keeps its first value.
struct TagEvent {
    attributes: Vec<(String, String)>,
    name: String,
}

impl TagEvent {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Pull-based iterator over every opening tag in a parsed document,
/// in document order. Walks the CST pre-order with a single cursor.
struct TagIterator<'tree, 'src> {
    cursor: TreeCursor<'tree>,
    source: &'src str,
}

impl<'tree, 'src> TagIterator<'tree, 'src> {
    fn new(tree: &'tree Tree, source: &'src str) -> Self {
        Self {
            cursor: tree.walk(),
            source,
        }
    }

    /// Advance the cursor one step in pre-order. Returns false once the
    /// whole tree has been visited.
    fn advance(&mut self) -> bool {
        if self.cursor.goto_first_child() {
            return true;
        }
        loop {
            if self.cursor.goto_next_sibling() {
                return true;
            }
            if !self.cursor.goto_parent() {
                return false;
            }
        }
    }
}

impl Iterator for TagIterator<'_, '_> {
    type Item = TagEvent;

    fn next(&mut self) -> Option<TagEvent> {
        loop {
            if !self.advance() {
                return None;
            }
            let node = self.cursor.node();
            if matches!(node.kind(), "start_tag" | "self_closing_tag") {
                return Some(read_tag(node, self.source));
            }
        }
    }
}

/// Scan one HTML document. Pure function of `content`; `file` is only
/// attached to the extracted references.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if tree-sitter cannot produce a tree.
pub fn scan(file: &Path, content: &str) -> Result<PageScan, Error> {
    let tree = parse_document(file, content)?;
    let mut page = PageScan::default();

    for tag in TagIterator::new(&tree, content) {
        collect_anchors(&tag, &mut page);
        collect_references(&tag, file, &mut page.refs);
    }

    Ok(page)
}

/// Lenient file read: invalid UTF-8 bytes are substituted, never fatal.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be read at all.
pub fn read_to_string_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse source into a tree-sitter tree using the HTML grammar.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the language cannot be set or parsing fails.
fn parse_document(file: &Path, content: &str) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_html::LANGUAGE.into())
        .map_err(|e| Error::ParseFailed {
            file: file.to_path_buf(),
            reason: e.to_string(),
        })?;

    parser.parse(content, None).ok_or_else(|| Error::ParseFailed {
        file: file.to_path_buf(),
        reason: "tree-sitter returned None".to_string(),
    })
}

/// Read a start tag node into a `TagEvent`.
fn read_tag(node: Node<'_>, source: &str) -> TagEvent {
    let mut name = String::new();
    let mut attributes: Vec<(String, String)> = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "tag_name" => {
                name = node_text(child, source).to_ascii_lowercase();
            },
            "attribute" => {
                if let Some((key, value)) = read_attribute(child, source)
                    && !attributes.iter().any(|(existing, _)| *existing == key)
                {
                    attributes.push((key, value));
                }
            },
            _ => {},
        }
    }

    TagEvent { attributes, name }
}

/// Read one attribute node into a lowercased (name, value) pair.
/// A bare boolean attribute gets an empty value.
fn read_attribute(node: Node<'_>, source: &str) -> Option<(String, String)> {
    let mut name = None;
    let mut value = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "attribute_name" => {
                name = Some(node_text(child, source).to_ascii_lowercase());
            },
            "attribute_value" => {
                value = node_text(child, source).to_string();
            },
            "quoted_attribute_value" => {
                value = quoted_value_text(child, source);
            },
            _ => {},
        }
    }

    name.map(|n| (n, value))
}

/// Extract the inner text of a quoted attribute value (empty if `""`).
fn quoted_value_text(node: Node<'_>, source: &str) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "attribute_value" {
            return node_text(child, source).to_string();
        }
    }
    String::new()
}

fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Record `id` (any element) and legacy `name` (anchor elements only).
fn collect_anchors(tag: &TagEvent, page: &mut PageScan) {
    if let Some(id) = tag.attribute("id") {
        let id = id.trim();
        if !id.is_empty() {
            page.ids.insert(id.to_string());
        }
    }

    if tag.name == "a"
        && let Some(name) = tag.attribute("name")
    {
        let name = name.trim();
        if !name.is_empty() {
            page.names.insert(name.to_string());
        }
    }
}

/// Collect reference attributes on the fixed tag/attribute allow-list.
fn collect_references(tag: &TagEvent, file: &Path, refs: &mut Vec<Reference>) {
    match tag.name.as_str() {
        "a" | "link" => push_reference(tag, "href", file, refs),
        "form" => push_reference(tag, "action", file, refs),
        "img" | "source" => {
            push_reference(tag, "src", file, refs);
            push_srcset_candidates(tag, file, refs);
        },
        "script" => push_reference(tag, "src", file, refs),
        _ => {},
    }
}

/// Push one reference if the attribute is present and non-empty.
fn push_reference(tag: &TagEvent, attribute: &str, file: &Path, refs: &mut Vec<Reference>) {
    let Some(url) = tag.attribute(attribute) else {
        return;
    };
    if url.is_empty() {
        return;
    }
    refs.push(Reference {
        attribute: attribute.to_string(),
        file: file.to_path_buf(),
        tag: tag.name.clone(),
        url: url.to_string(),
    });
}

/// Split a `srcset` value at commas and push one reference per candidate URL
/// (the token before the width/density descriptor). Treating the whole value
/// as one URL would spuriously fail for every multi-candidate srcset.
fn push_srcset_candidates(tag: &TagEvent, file: &Path, refs: &mut Vec<Reference>) {
    let Some(value) = tag.attribute("srcset") else {
        return;
    };

    for candidate in value.split(',') {
        let Some(url) = candidate.split_whitespace().next() else {
            continue;
        };
        refs.push(Reference {
            attribute: "srcset".to_string(),
            file: file.to_path_buf(),
            tag: tag.name.clone(),
            url: url.to_string(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test helpers")]
mod tests {
    use super::*;

    fn scan_str(content: &str) -> PageScan {
        scan(Path::new("index.html"), content).unwrap()
    }

    #[test]
    fn collects_allow_listed_attributes() {
        let page = scan_str(
            r#"<html><body>
            <a href="pages/about.html">about</a>
            <link rel="stylesheet" href="assets/site.css">
            <script src="js/header.js"></script>
            <img src="assets/logo.png">
            <form action="/submit"></form>
            <iframe src="ignored.html"></iframe>
            </body></html>"#,
        );

        let urls: Vec<&str> = page.refs.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["pages/about.html", "assets/site.css", "js/header.js", "assets/logo.png", "/submit"]
        );
        // iframe is not on the allow-list.
        assert!(!urls.contains(&"ignored.html"));
    }

    #[test]
    fn collects_ids_and_legacy_names() {
        let page = scan_str(
            r#"<div id="top"></div>
            <a name="legacy"></a>
            <span name="not-an-anchor"></span>
            <p id="  "></p>"#,
        );

        assert!(page.ids.contains("top"));
        assert!(page.names.contains("legacy"));
        assert!(!page.names.contains("not-an-anchor"));
        assert_eq!(page.ids.len(), 1);

        let anchors = page.anchors();
        assert!(anchors.contains("top") && anchors.contains("legacy"));
    }

    #[test]
    fn srcset_is_split_into_candidates() {
        let page = scan_str(
            r#"<img srcset="assets/small.png 480w, assets/large.png 1024w" src="assets/fallback.png">"#,
        );

        let urls: Vec<&str> = page.refs.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["assets/fallback.png", "assets/small.png", "assets/large.png"]
        );
        assert!(page.refs.iter().any(|r| r.attribute == "srcset"));
    }

    #[test]
    fn malformed_markup_still_yields_surviving_tags() {
        let page = scan_str(r#"<div><a href="ok.html">text<p></div><<<"#);
        assert_eq!(page.refs.len(), 1);
        assert_eq!(page.refs[0].url, "ok.html");
    }

    #[test]
    fn empty_attribute_values_are_not_references() {
        let page = scan_str(r#"<a href="">nothing</a><script src></script>"#);
        assert!(page.refs.is_empty());
    }

    #[test]
    fn uppercase_tags_and_attributes_are_normalized() {
        let page = scan_str(r#"<A HREF="x.html" ID="Top">x</A>"#);
        assert_eq!(page.refs.len(), 1);
        assert_eq!(page.refs[0].tag, "a");
        assert_eq!(page.refs[0].attribute, "href");
        assert!(page.ids.contains("Top"));
    }
}
