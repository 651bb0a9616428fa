//! Commit graph error types
//!
//! Every failure is local to a single user action. Operations validate all
//! their preconditions before touching the store, so an `Err` always means
//! the graph is exactly as it was before the call.

use thiserror::Error;

use crate::graph::types::InvalidNameError;

/// the main error type for graph operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// `init_graph` was called on a graph that already has a root commit
    #[error("git graph may only be initialized once")]
    AlreadyInitialized,

    /// an operation ran before `init_graph`
    #[error("git graph is not initialized")]
    NotInitialized,

    /// branch name is malformed, taken, or its first letter clashes
    #[error("invalid branch name '{name}': {reason}")]
    InvalidBranchName { name: String, reason: String },

    /// tag name is malformed
    #[error("invalid tag name '{name}': {reason}")]
    InvalidTagName { name: String, reason: String },

    /// caller-supplied commit id is malformed
    #[error("invalid commit id '{id}': {reason}")]
    InvalidCommitId { id: String, reason: String },

    /// checkout target matches no branch, tag or commit
    #[error("ref not found: {0}")]
    RefNotFound(String),

    /// the named branch does not exist
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// the named tag does not exist
    #[error("tag not found: {0}")]
    TagNotFound(String),

    /// the named commit does not exist
    #[error("commit not found: {0}")]
    CommitNotFound(String),

    /// the branch HEAD is attached to cannot be deleted
    #[error("cannot delete branch '{0}' checked out by HEAD")]
    CannotDeleteCheckedOutBranch(String),

    /// target is already contained in the current history
    #[error("nothing to merge: {current} already contains {target}")]
    NothingToMerge { current: String, target: String },

    /// target is already contained in the current history
    #[error("nothing to rebase: {current} is already based on {target}")]
    NothingToRebase { current: String, target: String },

    /// a tag with that name exists
    #[error("tag already exists: {0}")]
    TagAlreadyExists(String),

    /// cherry-picked commit is already part of HEAD's history
    #[error("commit {0} is already part of the current history")]
    AlreadyApplied(String),
}

impl GraphError {
    pub(crate) fn invalid_branch(name: &str, reason: impl ToString) -> Self {
        Self::InvalidBranchName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_tag(name: &str, err: InvalidNameError) -> Self {
        Self::InvalidTagName {
            name: name.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn invalid_commit_id(id: &str, err: InvalidNameError) -> Self {
        Self::InvalidCommitId {
            id: id.to_string(),
            reason: err.to_string(),
        }
    }

    /// check if this error indicates the resource doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::RefNotFound(_)
                | GraphError::BranchNotFound(_)
                | GraphError::TagNotFound(_)
                | GraphError::CommitNotFound(_)
        )
    }

    /// check if this error is a name collision
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            GraphError::TagAlreadyExists(_) | GraphError::InvalidBranchName { .. }
        )
    }

    /// check if the graph state made the operation pointless or forbidden
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GraphError::AlreadyInitialized
                | GraphError::NotInitialized
                | GraphError::CannotDeleteCheckedOutBranch(_)
                | GraphError::NothingToMerge { .. }
                | GraphError::NothingToRebase { .. }
                | GraphError::AlreadyApplied(_)
        )
    }
}

/// result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let not_found = GraphError::BranchNotFound("feature".into());
        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());

        let conflict = GraphError::TagAlreadyExists("v1".into());
        assert!(!conflict.is_not_found());
        assert!(conflict.is_conflict());

        let nothing = GraphError::NothingToMerge {
            current: "m2".into(),
            target: "m1".into(),
        };
        assert!(nothing.is_precondition());
        assert_eq!(nothing.to_string(), "nothing to merge: m2 already contains m1");
    }

    #[test]
    fn test_invalid_tag_message() {
        let err = GraphError::invalid_tag("", InvalidNameError::Empty);
        assert_eq!(err.to_string(), "invalid tag name '': name cannot be empty");
    }
}
