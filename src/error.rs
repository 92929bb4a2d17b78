//! Errors reported by the checked attachment operations.
use thiserror::Error;

/// Why a checked attachment was refused.
///
/// Only the `try_*` operations report these. The unchecked operations treat
/// the same situations as caller preconditions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("subtree is already attached to a parent")]
    AlreadyAttached,

    #[error("attaching the subtree would make a node its own ancestor")]
    CycleDetected,

    #[error("the same subtree was given for both child slots")]
    DuplicateChild,
}

pub type NodeResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::AlreadyAttached.to_string(),
            "subtree is already attached to a parent"
        );
        assert!(Error::CycleDetected.to_string().contains("own ancestor"));
        assert!(Error::DuplicateChild.to_string().contains("both child slots"));
    }
}
