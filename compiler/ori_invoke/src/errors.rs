//! Invoker compilation and invocation errors.

/// Failure to compile or run an invoker.
///
/// Members and shapes are rendered with host type names when the error is
/// raised, so errors stay readable after the host is gone.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    /// No member corresponds to the shape.
    #[error("no member matches `{shape}`")]
    MemberNotFound { shape: String },

    /// The shape leaves the signature open and overloads differ.
    #[error("`{shape}` is ambiguous between {}", .candidates.join(", "))]
    AmbiguousShape {
        shape: String,
        candidates: Vec<String>,
    },

    #[error("`{member}` takes {expected} argument(s), got {got}")]
    ArityMismatch {
        member: String,
        expected: usize,
        got: usize,
    },

    /// Instance member invoked without a target.
    #[error("`{member}` needs a target instance")]
    NullTarget { member: String },

    /// The target is not an instance of the member's declaring type.
    #[error("`{member}` cannot be invoked on `{got}`")]
    TargetMismatch { member: String, got: String },

    #[error("argument {index} of `{member}` expects `{expected}`, got `{got}`")]
    ArgumentType {
        member: String,
        index: usize,
        expected: String,
        got: String,
    },

    /// A cache already serving one host was handed to another.
    #[error("invoker cache is attached to another host")]
    ForeignCache,

    /// The member body reported a failure.
    #[error("`{member}` failed: {message}")]
    Invocation { member: String, message: String },
}

impl InvokeError {
    /// Whether the failure was found before any member code ran.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            InvokeError::MemberNotFound { .. } | InvokeError::AmbiguousShape { .. }
        )
    }
}
