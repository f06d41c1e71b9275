//! Fixed structural checks on the client-side navigation scripts.
//!
//! The header and footer are injected by JS at page load, so their link
//! targets never appear in the scanned HTML. These checks read the scripts'
//! literal structures instead: the `projectLinks` entry list in the header
//! script, plus the fixed set of top-level pages both scripts depend on.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::issue::{Issue, Origin};
use crate::scanner;

/// Script that renders the site header and project dropdown.
const NAV_SCRIPT: &str = "js/header.js";

/// Script that renders the site footer.
const FOOTER_SCRIPT: &str = "js/footer.js";

/// Directory the `projectLinks` entries must resolve under.
const PROJECT_PAGES_DIR: &str = "pages/projects";

/// Footer "Dashboard" link target.
const ADMIN_LANDING: &str = "admin/index.html";

/// Top-level pages the header navigation links to in every variant.
const REQUIRED_PAGES: [&str; 5] = [
    "index.html",
    "pages/projects.html",
    "pages/about.html",
    "admin/index.html",
    "admin/dashboard.html",
];

/// Run both structural checks, appending findings in a fixed order.
pub fn check(root: &Path, issues: &mut Vec<Issue>) {
    check_header_script(root, issues);
    check_footer_script(root, issues);
}

/// Validate the static navigation set in the header script.
/// This catches broken links that are injected client-side.
///
/// # Panics
///
/// Panics if the hardcoded entry regex is invalid (compile-time invariant).
fn check_header_script(root: &Path, issues: &mut Vec<Issue>) {
    let script = root.join(NAV_SCRIPT);
    let Ok(text) = scanner::read_to_string_lossy(&script) else {
        issues.push(Issue::StructuralMismatch {
            reason: "missing (header navigation cannot render)".to_string(),
            script: PathBuf::from(NAV_SCRIPT),
        });
        return;
    };

    let pattern = Regex::new(r"href:\s*'([^']+\.html)'").expect("valid regex");
    let entries: Vec<&str> = pattern
        .captures_iter(&text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect();

    if entries.is_empty() {
        issues.push(Issue::StructuralMismatch {
            reason: "could not find the projectLinks href list".to_string(),
            script: PathBuf::from(NAV_SCRIPT),
        });
        return;
    }

    for entry in entries {
        let target = root.join(PROJECT_PAGES_DIR).join(entry);
        if !target.is_file() {
            issues.push(Issue::MissingTarget {
                checked: PathBuf::from(PROJECT_PAGES_DIR).join(entry),
                origin: Origin::Script { file: PathBuf::from(NAV_SCRIPT) },
                raw_url: entry.to_string(),
            });
        }
    }

    for page in REQUIRED_PAGES {
        if !root.join(page).is_file() {
            issues.push(Issue::RequiredPageMissing { page: PathBuf::from(page) });
        }
    }
}

/// The footer script only needs to exist, plus the admin landing page its
/// "Dashboard" link points at.
fn check_footer_script(root: &Path, issues: &mut Vec<Issue>) {
    if !root.join(FOOTER_SCRIPT).is_file() {
        issues.push(Issue::StructuralMismatch {
            reason: "missing (footer links cannot render)".to_string(),
            script: PathBuf::from(FOOTER_SCRIPT),
        });
    }

    if !root.join(ADMIN_LANDING).is_file() {
        issues.push(Issue::RequiredPageMissing { page: PathBuf::from(ADMIN_LANDING) });
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test helpers")]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// A complete site skeleton that passes both structural checks.
    fn write_valid_skeleton(root: &Path) {
        write(
            root,
            "js/header.js",
            "const projectLinks = [\n  { href: 'alpha.html', label: 'Alpha' },\n];\n",
        );
        write(root, "js/footer.js", "// footer\n");
        write(root, "pages/projects/alpha.html", "<html></html>");
        for page in REQUIRED_PAGES {
            write(root, page, "<html></html>");
        }
    }

    #[test]
    fn valid_skeleton_produces_no_issues() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_skeleton(dir.path());

        let mut issues = Vec::new();
        check(dir.path(), &mut issues);
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn missing_header_script_is_one_structural_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_skeleton(dir.path());
        std::fs::remove_file(dir.path().join("js/header.js")).unwrap();

        let mut issues = Vec::new();
        check_header_script(dir.path(), &mut issues);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], Issue::StructuralMismatch { .. }));
    }

    #[test]
    fn unextractable_entry_list_stops_after_one_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_skeleton(dir.path());
        write(dir.path(), "js/header.js", "const projectLinks = buildLinks();\n");

        let mut issues = Vec::new();
        check_header_script(dir.path(), &mut issues);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], Issue::StructuralMismatch { .. }));
    }

    #[test]
    fn entry_without_a_page_is_a_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_skeleton(dir.path());
        std::fs::remove_file(dir.path().join("pages/projects/alpha.html")).unwrap();

        let mut issues = Vec::new();
        check_header_script(dir.path(), &mut issues);
        assert_eq!(issues.len(), 1);
        let Issue::MissingTarget { checked, .. } = &issues[0] else {
            panic!("expected missing target: {issues:?}");
        };
        assert_eq!(checked, &PathBuf::from("pages/projects/alpha.html"));
    }

    #[test]
    fn footer_requires_script_and_admin_landing() {
        let dir = tempfile::tempdir().unwrap();

        let mut issues = Vec::new();
        check_footer_script(dir.path(), &mut issues);
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], Issue::StructuralMismatch { .. }));
        assert!(matches!(issues[1], Issue::RequiredPageMissing { .. }));
    }
}
