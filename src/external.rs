//! Best-effort external reachability probe. Opt-in: external endpoints are
//! outside the repository's control, so this never runs by default.

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::issue::Issue;

/// Per-request timeout. Bounded so one dead host can't stall the run.
const PROBE_TIMEOUT: Duration = Duration::from_millis(7500);

/// Probe every distinct external URL (already in sorted order from the
/// `BTreeSet`), one HEAD request each. Returns one issue per non-success.
pub fn probe_all(urls: &BTreeSet<String>) -> Vec<Issue> {
    let mut issues = Vec::new();

    match Client::builder().timeout(PROBE_TIMEOUT).build() {
        Ok(client) => {
            for url in urls {
                if let Some(reason) = probe(&client, url) {
                    issues.push(Issue::ExternalUnreachable {
                        reason,
                        url: url.clone(),
                    });
                }
            }
        },
        Err(e) => {
            issues.extend(urls.iter().map(|url| Issue::ExternalUnreachable {
                reason: e.to_string(),
                url: url.clone(),
            }));
        },
    }

    issues
}

/// Issue one HEAD request. `None` on a final status in 200–399; otherwise
/// the status or transport error text.
fn probe(client: &Client, url: &str) -> Option<String> {
    match client.head(url).send() {
        Ok(response) => {
            let code = response.status().as_u16();
            if (200..400).contains(&code) {
                None
            } else {
                Some(format!("HTTP {code}"))
            }
        },
        Err(e) => Some(e.to_string()),
    }
}
