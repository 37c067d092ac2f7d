//! Structured error types for the boxflow layout engine.
//!
//! Layout itself has exactly two failure modes (negative flex and a broken
//! traversal invariant). Everything else here belongs to the collaborators
//! around it: building trees, parsing percentages, reading JSON.

use thiserror::Error;

use crate::tree::NodeId;

/// A fatal layout failure. The whole call is aborted and no geometry is
/// returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A node declared a negative flex weight.
    #[error("flex cannot be negative: node {node} has flex {flex}")]
    InvalidFlex { node: String, flex: f64 },

    /// A queue that must hold an element was empty. Only reachable through a
    /// malformed tree or an engine bug.
    #[error("traversal invariant violated: {0}")]
    TraversalInvariant(&'static str),
}

/// Misuse of the append-only tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} is already attached to a parent")]
    AlreadyAttached(NodeId),

    #[error("attaching node {0} would create a cycle")]
    WouldCycle(NodeId),
}

/// A width, height or offset string that is not of the form `<number>%`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid percentage {input:?}: expected a number followed by '%'")]
pub struct PercentageError {
    pub input: String,
}

/// The unified error type returned by the JSON entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON input failed to parse as a valid boxflow document.
    #[error("failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// Layout rejected the document.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The layout result could not be serialized.
    #[error("failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  hint: {hint}")
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check field names, \
                 enum values (kebab-case) and percentage strings."
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        Error::Parse { source: e, hint }
    }
}
