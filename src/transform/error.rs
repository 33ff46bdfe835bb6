//! Failures inside the stripper. They never escape [`super::transform`]; any of
//! them makes the transformer hand back the original source.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StripError {
    /// A token that cannot appear at this position
    #[error("unexpected '{found}' at byte {pos}")]
    Unexpected {
        /// Byte offset of the token
        pos: usize,
        /// First character of the offending token
        found: String,
    },

    /// A literal or comment runs to the end of the input
    #[error("unterminated {what} starting at byte {pos}")]
    Unterminated {
        /// Byte offset where the construct starts
        pos: usize,
        /// Kind of construct
        what: &'static str,
    },

    /// Valid TypeScript whose type-free form needs more than removal or enum lowering
    #[error("unsupported construct at byte {pos}: {construct}")]
    Unsupported {
        /// Byte offset of the construct
        pos: usize,
        /// Short name of the construct
        construct: &'static str,
    },

    /// Nesting deeper than the stripper is willing to recurse
    #[error("nesting too deep at byte {pos}")]
    TooDeep {
        /// Byte offset where the limit was hit
        pos: usize,
    },

    /// Two recorded edits cover the same bytes
    #[error("overlapping edits at byte {pos}")]
    OverlappingEdits {
        /// Start of the second edit
        pos: usize,
    },
}
