//! HTML file-set discovery: the root index page, the pages tree, and the
//! (optionally excluded) admin tree, in deterministic lexical order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Public pages tree, always scanned.
const PAGES_TREE: &str = "pages";

/// Admin tree, included unless the caller opts out.
const ADMIN_TREE: &str = "admin";

/// Collect every HTML file under the discovery roots. Traversal within each
/// tree is sorted lexically by full path; the combined list is deduplicated
/// preserving order, so repeated runs over an unchanged tree see the same
/// files in the same sequence.
pub fn html_files(root: &Path, include_admin: bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();

    let index = root.join("index.html");
    if index.is_file() {
        files.push(index);
    }

    files.extend(html_files_under(&root.join(PAGES_TREE)));

    if include_admin {
        files.extend(html_files_under(&root.join(ADMIN_TREE)));
    }

    dedupe_preserving_order(files)
}

/// Recursively collect `*.html` under one directory, sorted lexically.
fn html_files_under(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// De-dupe while preserving order.
fn dedupe_preserving_order(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    files.into_iter().filter(|p| seen.insert(p.clone())).collect()
}
