/// The validation finding taxonomy.
///
/// Every finding is individually non-fatal: a run accumulates an ordered
/// `Vec<Issue>` and fails iff the list is non-empty. Paths inside issues are
/// always relative to the site root so two runs over an unchanged tree
/// render identical reports.
use std::fmt;
use std::path::PathBuf;

/// A single finding about the site. Accumulated, never propagated.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Issue {
    /// An external URL did not answer with a 2xx/3xx status (opt-in probe).
    #[error("external link failed: {url} ({reason})")]
    ExternalUnreachable {
        /// HTTP status or transport error text.
        reason: String,
        /// The probed URL.
        url: String,
    },

    /// A fragment does not exist in the target file's anchor set.
    #[error("{origin}: missing anchor '#{fragment}' in {}", anchor_file.display())]
    MissingAnchor {
        /// File whose anchor set was consulted.
        anchor_file: PathBuf,
        /// The fragment that was not found.
        fragment: String,
        /// Where the reference came from.
        origin: Origin,
    },

    /// A resolved internal path does not exist (no usable index fallback).
    #[error("{origin}: missing target for '{raw_url}' -> {}", checked.display())]
    MissingTarget {
        /// The path whose existence was actually checked (index file for
        /// directory-style references).
        checked: PathBuf,
        /// Where the reference came from.
        origin: Origin,
        /// The reference as written.
        raw_url: String,
    },

    /// One HTML file could not be read or parsed; it contributed empty
    /// references and anchors and the run continued.
    #[error("{}: failed to scan HTML: {reason}", file.display())]
    ParseFailure {
        /// The unscannable file.
        file: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A remote-sourced href resolves outside the site root. Unlike local
    /// references, which are silently inert when they escape, remote content
    /// is less trusted and escapes are flagged.
    #[error("remote project href escapes the site root: '{href}'")]
    RemoteHrefInvalid {
        /// The offending href as stored remotely.
        href: String,
    },

    /// The remote source could not be configured, reached, or decoded.
    /// Emitted at most once per run; the run continues without the pass.
    #[error("remote projects check failed: {reason}")]
    RemoteSourceFailure {
        /// Description of the failure.
        reason: String,
    },

    /// One of the fixed top-level pages is absent.
    #[error("missing required page: {}", page.display())]
    RequiredPageMissing {
        /// Root-relative path of the missing page.
        page: PathBuf,
    },

    /// A navigation or footer script is missing, or its expected literal
    /// structure could not be extracted.
    #[error("{}: {reason}", script.display())]
    StructuralMismatch {
        /// Description of the mismatch.
        reason: String,
        /// Root-relative path of the script.
        script: PathBuf,
    },
}

/// Identifies what produced a reference: a scanned page, a navigation-script
/// entry, or a record from the remote content store.
#[derive(Debug, Clone)]
pub enum Origin {
    /// An attribute occurrence in a scanned HTML file.
    Page {
        /// Attribute name the URL came from.
        attribute: String,
        /// Root-relative path of the referring file.
        file: PathBuf,
        /// Lowercased tag name.
        tag: String,
    },
    /// A row fetched from the remote projects collection.
    Remote,
    /// An entry extracted from a navigation script's literal list.
    Script {
        /// Root-relative path of the script.
        file: PathBuf,
    },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Page { attribute, file, tag } => {
                write!(f, "{}: {tag}[{attribute}]", file.display())
            },
            Origin::Remote => write!(f, "remote project"),
            Origin::Script { file } => write!(f, "{}", file.display()),
        }
    }
}
