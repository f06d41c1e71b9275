/// Core domain types for site references.
use std::path::PathBuf;

/// One reference-bearing attribute occurrence, as extracted by the scanner.
/// A multi-candidate `srcset` contributes one `Reference` per candidate URL.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Attribute the URL came from (`href`, `src`, `srcset`, `action`).
    pub attribute: String,
    /// HTML file containing this reference (absolute path).
    pub file: PathBuf,
    /// Lowercased tag name of the element.
    pub tag: String,
    /// Raw attribute value, untrimmed.
    pub url: String,
}
