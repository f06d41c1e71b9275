//! Validation orchestrator: drives discovery, the two-pass index/validate
//! sequence, the structural script checks, and the optional passes.
//!
//! The anchor index must be complete before any fragment check runs, so a
//! same-file or cross-file fragment is checkable regardless of scan order.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::discover;
use crate::error::Error;
use crate::external;
use crate::index::AnchorIndex;
use crate::issue::{Issue, Origin};
use crate::navigation;
use crate::remote;
use crate::resolver::{self, Link};
use crate::scanner;
use crate::types::Reference;

/// What a run should do beyond the always-on local pass.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Probe distinct external URLs after the local pass.
    pub check_external: bool,
    /// Cross-check hrefs from the remote projects collection.
    pub check_projects: bool,
    /// Scan the admin tree.
    pub include_admin: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            check_external: false,
            check_projects: false,
            include_admin: true,
        }
    }
}

/// Outcome of a full run. The run failed iff `issues` is non-empty.
#[derive(Debug, Default)]
pub struct Report {
    /// Distinct external URLs seen in the scanned files, sorted.
    pub external: BTreeSet<String>,
    /// Ordered, append-only finding list.
    pub issues: Vec<Issue>,
    /// Number of HTML files scanned.
    pub scanned: usize,
}

/// Run the checker against a site root.
///
/// # Errors
///
/// Returns `Error::Io` if the root itself cannot be resolved. Everything
/// per-file or per-record is accumulated as an issue instead.
pub fn run(root: &Path, options: &Options) -> Result<Report, Error> {
    let root = root.canonicalize()?;
    let files = discover::html_files(&root, options.include_admin);

    // First pass: the complete anchor map, before any validation.
    let index = AnchorIndex::build(&files);

    let mut report = Report {
        scanned: files.len(),
        ..Report::default()
    };

    // Second pass: re-scan each file and check its references.
    for file in &files {
        let page = match read_and_scan(file) {
            Ok(page) => page,
            Err(reason) => {
                report.issues.push(Issue::ParseFailure {
                    file: relative_to_root(&root, file),
                    reason,
                });
                continue;
            },
        };

        for reference in &page.refs {
            check_reference(&root, reference, &index, &mut report);
        }
    }

    navigation::check(&root, &mut report.issues);

    if options.check_projects {
        remote::check_remote_projects(&root, &index, &mut report.issues);
    }

    if options.check_external {
        report.issues.extend(external::probe_all(&report.external));
    }

    Ok(report)
}

/// Read leniently and scan one file, mapping any failure to a reason string.
fn read_and_scan(file: &Path) -> Result<scanner::PageScan, String> {
    let content = scanner::read_to_string_lossy(file).map_err(|e| e.to_string())?;
    scanner::scan(file, &content).map_err(|e| match e {
        Error::ParseFailed { reason, .. } => reason,
        other => other.to_string(),
    })
}

/// Per-reference algorithm: classify, resolve, check existence, then
/// check the fragment against the prebuilt index.
fn check_reference(root: &Path, reference: &Reference, index: &AnchorIndex, report: &mut Report) {
    match resolver::classify(&reference.url) {
        Link::Skip => {},
        Link::External { url } => {
            report.external.insert(url);
        },
        Link::FragmentOnly { fragment } => {
            if !index.contains(&reference.file, &fragment) {
                report.issues.push(Issue::MissingAnchor {
                    anchor_file: relative_to_root(root, &reference.file),
                    fragment,
                    origin: page_origin(root, reference),
                });
            }
        },
        Link::Internal { dir_style, fragment, path } => {
            check_internal(root, reference, index, report, dir_style, fragment.as_deref(), &path);
        },
    }
}

/// Existence + fragment check for an internal reference. A path that
/// escapes the root resolves to nothing and is inert by policy.
fn check_internal(
    root: &Path,
    reference: &Reference,
    index: &AnchorIndex,
    report: &mut Report,
    dir_style: bool,
    fragment: Option<&str>,
    path: &str,
) {
    let Some(target) = resolver::resolve_internal(root, &reference.file, path) else {
        return;
    };

    let (found, checked) = resolver::target_exists(&target, dir_style);
    if !found {
        report.issues.push(Issue::MissingTarget {
            checked: relative_to_root(root, &checked),
            origin: page_origin(root, reference),
            raw_url: reference.url.trim().to_string(),
        });
        return;
    }

    let Some(fragment) = fragment else { return };
    if !is_html(&checked) {
        return;
    }
    // Only scanned files have authoritative anchor sets; an existing HTML
    // file outside the discovery roots is not second-guessed.
    if let Some(anchors) = index.anchors_for(&checked)
        && !anchors.contains(fragment)
    {
        report.issues.push(Issue::MissingAnchor {
            anchor_file: relative_to_root(root, &checked),
            fragment: fragment.to_string(),
            origin: page_origin(root, reference),
        });
    }
}

fn page_origin(root: &Path, reference: &Reference) -> Origin {
    Origin::Page {
        attribute: reference.attribute.clone(),
        file: relative_to_root(root, &reference.file),
        tag: reference.tag.clone(),
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

fn relative_to_root(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
