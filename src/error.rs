//! Fatal, structured diagnostics.
//!
//! Everything in this crate is fail-fast: there is no recovery path, no
//! partial result. A caller sees either a value or one of these variants.

use thiserror::Error;

/// All errors this crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed operand, unknown mnemonic, displacement out of range,
    /// wrong operand count, or junk at line end.
    #[error("line {line}, column {column}: {message} (near \"{text}\")")]
    Parse {
        line: usize,
        column: usize,
        message: String,
        text: String,
    },

    /// An instruction/EA combination the cost model has no table entry
    /// for. Carries the instruction's textual rendering.
    #[error("unsupported construct: {rendering}")]
    UnsupportedConstruct { rendering: String },

    /// Inconsistency in register-change bookkeeping, an impossible
    /// dispatch state, or mismatched operand arity. These should be
    /// unreachable; surfacing them beats silently producing a wrong
    /// number.
    #[error("internal invariant violated: {tag}")]
    Invariant { tag: &'static str },

    /// Wraps an error with the input file being processed when it
    /// occurred, for the directory-walking test harness.
    #[error("while processing {file}: {source}")]
    InFile {
        file: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    #[must_use]
    pub fn parse(line: usize, column: usize, message: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn unsupported(rendering: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            rendering: rendering.into(),
        }
    }

    #[must_use]
    pub fn invariant(tag: &'static str) -> Self {
        Self::Invariant { tag }
    }

    /// Attach file context, used by the directory-walking harness.
    #[must_use]
    pub fn in_file(self, file: impl Into<String>) -> Self {
        Self::InFile {
            file: file.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
