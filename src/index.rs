//! Anchor index: every scanned file's addressable anchors, built once
//! before validation so fragment checks never depend on scan order.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::scanner;

/// Map from scanned file to its anchor set (ids ∪ legacy names).
/// Built once per run and passed by reference into both the primary and the
/// remote validation pass; read-only afterwards.
#[derive(Debug, Default)]
pub struct AnchorIndex {
    anchors: HashMap<PathBuf, HashSet<String>>,
}

impl AnchorIndex {
    /// Scan every file in the set. A file that fails to read or parse gets
    /// an empty anchor set here; the validation pass reports the failure
    /// when it re-reads the file.
    pub fn build(files: &[PathBuf]) -> Self {
        let mut anchors: HashMap<PathBuf, HashSet<String>> = HashMap::new();

        for file in files {
            let set = scanner::read_to_string_lossy(file)
                .ok()
                .and_then(|content| scanner::scan(file, &content).ok())
                .map(|page| page.anchors())
                .unwrap_or_default();
            anchors.insert(file.clone(), set);
        }

        Self { anchors }
    }

    /// Anchor set for a scanned file; `None` if the file was never scanned.
    /// Callers skip fragment checks against unscanned files rather than
    /// guessing with an empty set.
    pub fn anchors_for(&self, file: &Path) -> Option<&HashSet<String>> {
        self.anchors.get(file)
    }

    /// Whether a scanned file contains the given anchor.
    pub fn contains(&self, file: &Path, fragment: &str) -> bool {
        self.anchors_for(file).is_some_and(|set| set.contains(fragment))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test helpers")]
mod tests {
    use super::*;

    #[test]
    fn indexes_ids_and_names_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let about = dir.path().join("about.html");
        std::fs::write(&about, r#"<h2 id="bio">Bio</h2><a name="contact"></a>"#).unwrap();

        let index = AnchorIndex::build(&[about.clone()]);
        assert!(index.contains(&about, "bio"));
        assert!(index.contains(&about, "contact"));
        assert!(!index.contains(&about, "missing"));
    }

    #[test]
    fn unreadable_file_gets_an_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone.html");

        let index = AnchorIndex::build(&[gone.clone()]);
        assert_eq!(index.anchors_for(&gone).map(HashSet::len), Some(0));
    }

    #[test]
    fn unscanned_file_is_none_not_empty() {
        let index = AnchorIndex::build(&[]);
        assert!(index.anchors_for(Path::new("never-scanned.html")).is_none());
    }
}
