//! Remote link source adapter: cross-checks project hrefs stored in the
//! Supabase `projects` collection against the local page tree.
//!
//! Project cards render on `pages/projects.html`, so relative hrefs resolve
//! from `pages/`. External hrefs are accepted without verification. Opt-in;
//! any fetch or auth failure produces exactly one finding and the run
//! continues.

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;

use crate::error::Error;
use crate::index::AnchorIndex;
use crate::issue::{Issue, Origin};
use crate::resolver::{self, Link};
use crate::scanner;

/// Configuration artifact with literal endpoint/key assignments.
const CONFIG_SCRIPT: &str = "js/supabase-config.js";

/// Read query against the projects collection.
const PROJECTS_QUERY: &str = "/rest/v1/projects?select=href,is_published";

/// Base directory remote hrefs resolve from.
const PAGES_DIR: &str = "pages";

/// Per-request timeout for the REST fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Endpoint URL and anon key parsed from the config script.
struct RemoteConfig {
    anon_key: String,
    url: String,
}

/// One row of the projects collection.
#[derive(Debug, serde::Deserialize)]
struct ProjectRecord {
    /// Link target as stored remotely; may be empty for drafts.
    #[serde(default)]
    href: String,
    /// Publish state. Rows are validated regardless — unpublished pages
    /// still ship in the deployed tree.
    #[serde(default)]
    #[allow(dead_code, reason = "part of the REST row shape")]
    is_published: bool,
}

/// Fetch the projects collection and validate every href against the local
/// tree and the prebuilt anchor index.
pub fn check_remote_projects(root: &Path, index: &AnchorIndex, issues: &mut Vec<Issue>) {
    let Some(config) = load_config(root) else {
        issues.push(Issue::RemoteSourceFailure {
            reason: format!("{CONFIG_SCRIPT} missing or invalid"),
        });
        return;
    };

    let records = match fetch_projects(&config) {
        Ok(records) => records,
        Err(e) => {
            issues.push(Issue::RemoteSourceFailure { reason: e.to_string() });
            return;
        },
    };

    let base_dir = root.join(PAGES_DIR);
    for record in &records {
        check_record(root, &base_dir, index, record, issues);
    }
}

/// Parse the literal `url:` and `anonKey:` assignments from the config
/// script. `None` if the file is missing or either value is absent.
///
/// # Panics
///
/// Panics if a hardcoded regex is invalid (compile-time invariant).
fn load_config(root: &Path) -> Option<RemoteConfig> {
    let text = scanner::read_to_string_lossy(&root.join(CONFIG_SCRIPT)).ok()?;

    let url_pattern = Regex::new(r"url:\s*'([^']+)'").expect("valid regex");
    let key_pattern = Regex::new(r"anonKey:\s*'([^']+)'").expect("valid regex");

    let url = url_pattern.captures(&text)?.get(1)?.as_str().trim().to_string();
    let anon_key = key_pattern.captures(&text)?.get(1)?.as_str().trim().to_string();
    if url.is_empty() || anon_key.is_empty() {
        return None;
    }

    Some(RemoteConfig { anon_key, url })
}

/// Authenticated read query against the projects collection.
///
/// # Errors
///
/// Returns `Error::Http` on transport/status failures and `Error::Json` if
/// the response body is not a JSON array of rows.
fn fetch_projects(config: &RemoteConfig) -> Result<Vec<ProjectRecord>, Error> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;

    let endpoint = format!("{}{PROJECTS_QUERY}", config.url.trim_end_matches('/'));
    let response = client
        .get(&endpoint)
        .header("apikey", &config.anon_key)
        .header("Authorization", format!("Bearer {}", config.anon_key))
        .header("Accept", "application/json")
        .send()?
        .error_for_status()?;

    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// Apply the classifier/resolver to one remote href. Escapes are flagged
/// (remote content is less trusted than local pages), missing targets and
/// anchors are reported with remote origin.
fn check_record(
    root: &Path,
    base_dir: &Path,
    index: &AnchorIndex,
    record: &ProjectRecord,
    issues: &mut Vec<Issue>,
) {
    let href = record.href.trim();

    let Link::Internal { dir_style, fragment, path } = resolver::classify(href) else {
        // Skip, fragment-only, and external hrefs are accepted as-is.
        return;
    };

    let Some(target) = resolver::resolve_from_dir(root, base_dir, &path) else {
        issues.push(Issue::RemoteHrefInvalid { href: href.to_string() });
        return;
    };

    let (found, checked) = resolver::target_exists(&target, dir_style);
    let checked_relative = relative_to_root(root, &checked);
    if !found {
        issues.push(Issue::MissingTarget {
            checked: checked_relative,
            origin: Origin::Remote,
            raw_url: href.to_string(),
        });
        return;
    }

    let Some(fragment) = fragment else { return };
    if !is_html(&checked) {
        return;
    }
    if let Some(anchors) = index.anchors_for(&checked)
        && !anchors.contains(&fragment)
    {
        issues.push(Issue::MissingAnchor {
            anchor_file: checked_relative,
            fragment,
            origin: Origin::Remote,
        });
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
