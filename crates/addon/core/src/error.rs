//! Common error infrastructure for addon-core.
//!
//! Every builder operation that can reject its input returns [`BuildError`].
//! Construction is in-memory and deterministic, so an error always points at
//! an authoring bug in the caller rather than a transient condition: nothing
//! here is retried.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each failure mode is its own variant with the offending ids
//! - **Severity Classification**: Errors are categorized for reporting
//! - **Fail Fast**: Validation happens before mutation wherever possible

use strum::{AsRefStr, Display};

/// Severity level of an error, used for categorization and reporting.
///
/// - **Validation**: Invalid input that should be rejected and fixed by the author
/// - **Fatal**: Indexing into builder state that does not exist
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unresolved branch name, duplicate controller state
    Validation,

    /// Fatal error - the caller referenced builder state that was never created.
    ///
    /// Examples: loop state bound to a controller index that does not exist
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error should abort the whole build.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Which family of animation controllers an index refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ControllerKind {
    /// Behavior-pack controller driving timed commands.
    Behavior,
    /// Resource-pack controller driving animations.
    Render,
}

/// Errors surfaced while assembling entity documents.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("{kind} controller index {index} out of range ({len} created)")]
    ControllerIndex {
        kind: ControllerKind,
        index: usize,
        len: usize,
    },

    #[error("controller `{controller}` already has a state named `{state}`")]
    DuplicateState { controller: String, state: String },

    #[error("branch `{name}` was connected from {sources:?} but never given a target state")]
    UnresolvedBranch { name: String, sources: Vec<String> },

    #[error("branch `{name}` already targets `{existing}`, cannot retarget to `{requested}`")]
    DuplicateBranchTarget {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("branch name `{name}` collides with a generated state id or condition token")]
    ReservedBranchName { name: String },

    #[error("{context}: {message}")]
    MissingParameter {
        context: &'static str,
        message: &'static str,
    },

    #[error("tag sensor has {tags} tags but {events} events")]
    TagEventMismatch { tags: usize, events: usize },

    #[error("string variable `%{variable}` is not a string and can only replace a whole value")]
    VariableType { variable: String },
}

/// Common interface of the errors raised by the builders.
///
/// Lets callers classify failures without matching on every variant.
pub trait AddonError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization and testing.
    fn error_code(&self) -> &'static str;
}

impl AddonError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ControllerIndex { .. } => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ControllerIndex { .. } => "controller_index",
            Self::DuplicateState { .. } => "duplicate_state",
            Self::UnresolvedBranch { .. } => "unresolved_branch",
            Self::DuplicateBranchTarget { .. } => "duplicate_branch_target",
            Self::ReservedBranchName { .. } => "reserved_branch_name",
            Self::TagEventMismatch { .. } => "tag_event_mismatch",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::VariableType { .. } => "variable_type",
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_index_is_fatal() {
        let err = BuildError::ControllerIndex {
            kind: ControllerKind::Render,
            index: 3,
            len: 1,
        };
        assert!(err.severity().is_fatal());
        assert_eq!(err.error_code(), "controller_index");
        assert_eq!(
            err.to_string(),
            "render controller index 3 out of range (1 created)"
        );
    }

    #[test]
    fn unresolved_branch_is_validation() {
        let err = BuildError::UnresolvedBranch {
            name: "hurt".into(),
            sources: vec!["state_1".into()],
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.severity().as_str(), "validation");
    }
}
