//! Error types for tree navigation and editing

use std::path::PathBuf;

use rowan::{TextRange, TextSize};
use thiserror::Error;

use crate::cst::SyntaxKind;

/// Main error type for syntax tree operations
#[derive(Debug, Error)]
pub enum CstError {
    /// Offset lies outside the range of the tree being queried
    #[error("Offset {offset:?} is outside the tree range {range:?}")]
    OffsetOutOfRange { offset: TextSize, range: TextRange },

    /// Range is not contained in the tree being queried
    #[error("Range {requested:?} is outside the tree range {range:?}")]
    RangeOutOfBounds {
        requested: TextRange,
        range: TextRange,
    },

    /// Element is expected to be a direct child of a node but is not
    #[error("{kind:?}@{range:?} is not a direct child of {parent_kind:?}@{parent_range:?}")]
    NotAChild {
        kind: SyntaxKind,
        range: TextRange,
        parent_kind: SyntaxKind,
        parent_range: TextRange,
    },

    /// A child replacement was requested without anything to replace
    #[error("Nothing to delete: the replaced child set is empty")]
    EmptyDeletion,

    /// Element referenced by an edit script is not part of the target tree
    #[error("{kind:?}@{range:?} is not a descendant of the target tree")]
    NotFound { kind: SyntaxKind, range: TextRange },

    /// Two operations of one edit script touch the same element
    #[error("Conflicting edits on {kind:?}@{range:?}: {message}")]
    ConflictingEdits {
        kind: SyntaxKind,
        range: TextRange,
        message: String,
    },

    /// Text edits passed as one batch overlap each other
    #[error("Overlapping text edits at {first:?} and {second:?}")]
    OverlappingEdits { first: TextRange, second: TextRange },

    /// Tree builder was finished in an inconsistent state
    #[error("Unbalanced tree builder: {message}")]
    UnbalancedBuilder { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Offset or range lookups that found nothing to look at
    Lookup,
    /// Arguments that violate an operation's preconditions
    InvalidArgument,
    /// Edit scripts that reference elements of another tree
    NotFound,
    Config,
    Io,
}

impl CstError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CstError::OffsetOutOfRange { .. } | CstError::RangeOutOfBounds { .. } => {
                ErrorKind::Lookup
            }
            CstError::NotAChild { .. }
            | CstError::EmptyDeletion
            | CstError::ConflictingEdits { .. }
            | CstError::OverlappingEdits { .. }
            | CstError::UnbalancedBuilder { .. } => ErrorKind::InvalidArgument,
            CstError::NotFound { .. } => ErrorKind::NotFound,
            CstError::ConfigError { .. } => ErrorKind::Config,
            CstError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Check if this error is recoverable by the caller
    ///
    /// Every tree operation is pure, so anything short of a broken
    /// configuration or file access is fixed by retrying with better input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Config | ErrorKind::Io)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a conflicting edits error
    pub fn conflicting_edits(kind: SyntaxKind, range: TextRange, message: impl Into<String>) -> Self {
        Self::ConflictingEdits {
            kind,
            range,
            message: message.into(),
        }
    }

    /// Create an unbalanced builder error
    pub fn unbalanced_builder(message: impl Into<String>) -> Self {
        Self::UnbalancedBuilder {
            message: message.into(),
        }
    }
}
