//! URL classification and root-contained path resolution.
//!
//! Classification is pure string logic; resolution is lexical (no
//! filesystem access) so a target can be judged root-contained before it
//! is known to exist. Existence checking applies the directory → index
//! fallback.

use std::path::{Component, Path, PathBuf};

/// Schemes that are never checked, regardless of target existence.
const SKIP_SCHEMES: [&str; 5] = ["mailto:", "tel:", "javascript:", "data:", "blob:"];

/// A classified reference, derived on demand from a raw attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// http(s) or protocol-relative. Recorded for the optional probe,
    /// never resolved locally.
    External {
        /// The URL with a protocol-relative `//` rewritten to `https:`.
        url: String,
    },
    /// `#fragment` with no path: the anchor must exist in the current file.
    FragmentOnly {
        /// Fragment without the leading `#`.
        fragment: String,
    },
    /// A path inside the site, possibly carrying a fragment.
    Internal {
        /// Whether the path's textual form ends in `/`: the reference
        /// addresses a directory and only an index file satisfies it.
        dir_style: bool,
        /// Fragment without the leading `#`, if present and non-empty.
        fragment: Option<String>,
        /// Path part, query and fragment stripped.
        path: String,
    },
    /// Empty, bare `#`, or a non-navigational scheme. Inert.
    Skip,
}

/// Categorize a raw reference string.
pub fn classify(raw: &str) -> Link {
    let raw = raw.trim();

    if raw.is_empty() || raw == "#" || SKIP_SCHEMES.iter().any(|s| raw.starts_with(s)) {
        return Link::Skip;
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Link::External { url: raw.to_string() };
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return Link::External { url: format!("https://{rest}") };
    }

    let (path, fragment) = split_path_and_fragment(raw);
    if path.is_empty() {
        return match fragment {
            Some(fragment) => Link::FragmentOnly { fragment },
            // Bare query strings ("?draft=1") address the current page.
            None => Link::Skip,
        };
    }

    Link::Internal {
        dir_style: path.ends_with('/'),
        fragment,
        path,
    }
}

/// Split a reference into (path, fragment), stripping any `?query` from the
/// path part. The fragment is `None` when absent or empty.
fn split_path_and_fragment(raw: &str) -> (String, Option<String>) {
    let (base, fragment) = match raw.split_once('#') {
        Some((base, fragment)) => (base, fragment),
        None => (raw, ""),
    };
    let path = base.split('?').next().unwrap_or("").trim().to_string();
    let fragment = if fragment.is_empty() {
        None
    } else {
        Some(fragment.to_string())
    };
    (path, fragment)
}

/// Resolve an internal path relative to the referring file's directory
/// (or the root for `/`-prefixed paths). `None` means the normalized path
/// escapes the site root: the reference is inert — neither an error nor a
/// valid target.
pub fn resolve_internal(root: &Path, source_file: &Path, path: &str) -> Option<PathBuf> {
    let base_dir = source_file.parent().unwrap_or(root);
    resolve_from_dir(root, base_dir, path)
}

/// Resolve an internal path against an explicit base directory.
/// Used directly by the remote pass, where references have no referring file.
pub fn resolve_from_dir(root: &Path, base_dir: &Path, path: &str) -> Option<PathBuf> {
    let candidate = if let Some(rest) = path.strip_prefix('/') {
        root.join(rest)
    } else {
        base_dir.join(path)
    };

    let normalized = normalize_path(&candidate);
    if normalized.starts_with(root) {
        Some(normalized)
    } else {
        None
    }
}

/// Decide whether a resolved path exists as a link target.
///
/// An existing regular file is found as-is. An existing directory — or a
/// dir-style reference whose path doesn't exist yet — is found only if it
/// contains an `index.html` regular file; a bare directory listing is never
/// an acceptable target. The returned path is the one actually checked.
pub fn target_exists(path: &Path, dir_style: bool) -> (bool, PathBuf) {
    if path.is_file() {
        return (true, path.to_path_buf());
    }
    if path.is_dir() || dir_style {
        let index = path.join("index.html");
        let found = index.is_file();
        return (found, index);
    }
    (false, path.to_path_buf())
}

/// Collapse `.` and `..` components in a path without touching the
/// filesystem. Popping past the filesystem root leaves a relative path,
/// which then fails the containment check upstream.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    components.iter().collect()
}

/// Handle a single path component during normalization.
/// Pops the last component for `..` when possible, preserves it otherwise.
fn push_normalized_component<'a>(
    components: &mut Vec<Component<'a>>,
    component: Component<'a>,
) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => {
            let can_pop = matches!(
                components.last(),
                Some(c) if !matches!(c, Component::ParentDir)
            );
            if can_pop {
                components.pop();
            } else {
                components.push(component);
            }
        },
        other => components.push(other),
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test helpers")]
mod tests {
    use super::*;

    #[test]
    fn empty_bare_hash_and_schemes_are_skipped() {
        for raw in ["", "   ", "#", "mailto:x@y.z", "tel:+123", "javascript:void(0)", "data:image/png;base64,AAAA", "blob:abc"] {
            assert_eq!(classify(raw), Link::Skip, "{raw:?}");
        }
    }

    #[test]
    fn http_and_protocol_relative_are_external() {
        assert_eq!(
            classify("https://example.com/a"),
            Link::External { url: "https://example.com/a".to_string() }
        );
        assert_eq!(
            classify("//cdn.example.com/lib.js"),
            Link::External { url: "https://cdn.example.com/lib.js".to_string() }
        );
    }

    #[test]
    fn fragment_only_and_bare_query() {
        assert_eq!(
            classify("#bio"),
            Link::FragmentOnly { fragment: "bio".to_string() }
        );
        assert_eq!(
            classify("?draft=1#sec"),
            Link::FragmentOnly { fragment: "sec".to_string() }
        );
        assert_eq!(classify("?draft=1"), Link::Skip);
    }

    #[test]
    fn internal_with_query_and_fragment() {
        assert_eq!(
            classify("pages/about.html?v=2#bio"),
            Link::Internal {
                dir_style: false,
                fragment: Some("bio".to_string()),
                path: "pages/about.html".to_string(),
            }
        );
    }

    #[test]
    fn empty_fragment_is_dropped() {
        assert_eq!(
            classify("pages/about.html#"),
            Link::Internal {
                dir_style: false,
                fragment: None,
                path: "pages/about.html".to_string(),
            }
        );
    }

    #[test]
    fn trailing_slash_marks_dir_style() {
        let Link::Internal { dir_style, .. } = classify("pages/projects/") else {
            panic!("expected internal");
        };
        assert!(dir_style);
    }

    #[test]
    fn relative_resolution_stays_in_root() {
        let root = Path::new("/site");
        let source = Path::new("/site/pages/about.html");
        assert_eq!(
            resolve_internal(root, source, "../index.html"),
            Some(PathBuf::from("/site/index.html"))
        );
    }

    #[test]
    fn root_relative_resolution() {
        let root = Path::new("/site");
        let source = Path::new("/site/pages/projects/alpha.html");
        assert_eq!(
            resolve_internal(root, source, "/assets/site.css"),
            Some(PathBuf::from("/site/assets/site.css"))
        );
    }

    #[test]
    fn traversal_out_of_root_is_inert() {
        let root = Path::new("/site");
        let source = Path::new("/site/pages/projects/alpha.html");
        assert_eq!(resolve_internal(root, source, "../../../etc/passwd"), None);
        assert_eq!(resolve_internal(root, source, "../../../../../../etc/passwd"), None);
    }

    #[test]
    fn existing_file_is_found_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.html");
        std::fs::write(&file, "<html></html>").unwrap();

        let (found, checked) = target_exists(&file, false);
        assert!(found);
        assert_eq!(checked, file);
    }

    #[test]
    fn directory_needs_an_index_file() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("docs");
        std::fs::create_dir(&sub).unwrap();

        let (found, checked) = target_exists(&sub, false);
        assert!(!found);
        assert_eq!(checked, sub.join("index.html"));

        std::fs::write(sub.join("index.html"), "<html></html>").unwrap();
        let (found, checked) = target_exists(&sub, false);
        assert!(found);
        assert_eq!(checked, sub.join("index.html"));
    }

    #[test]
    fn dir_style_reference_to_missing_path_checks_index() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let (found, checked) = target_exists(&missing, true);
        assert!(!found);
        assert_eq!(checked, missing.join("index.html"));

        // Without the dir-style marker the missing path itself is reported.
        let (found, checked) = target_exists(&missing, false);
        assert!(!found);
        assert_eq!(checked, missing);
    }
}
