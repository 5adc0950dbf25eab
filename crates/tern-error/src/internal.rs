//! Internal contract violations
//!
//! These signal a bug in the front end itself, never a problem with the
//! user's program, and are kept apart from the diagnostics the user sees.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// A node was downcast to a variant it does not hold.
    #[error("internal error: expected a `{expected}` node but found `{found}`")]
    BadCast {
        expected: &'static str,
        found: &'static str,
    },

    /// A backtracking save-point was released while none was open.
    #[error("internal error: released a backtrack save-point that was never marked")]
    UnbalancedBacktrack,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_cast_message() {
        let err = InternalError::BadCast {
            expected: "expr::Binary",
            found: "stmt::Block",
        };
        assert_eq!(
            err.to_string(),
            "internal error: expected a `expr::Binary` node but found `stmt::Block`"
        );
    }
}
