//! Object model errors

use crate::value::Value;
use thiserror::Error;

/// Errors raised by class creation, member definition and dispatch.
///
/// Every error is fail-fast: the operation that produced it is aborted and
/// the error is handed back to the immediate caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ObjectError {
    /// Class name is not a non-empty string
    #[error("Invalid class name: expected a non-empty string, got {found}")]
    InvalidName {
        /// Description of the rejected name
        found: String,
    },

    /// Base is not a class created by the same factory
    #[error("Invalid base class: {found} was not created by this factory")]
    InvalidBase {
        /// Description of the rejected base
        found: String,
    },

    /// A `define` argument is not a map
    #[error("Invalid member group at position {position}: expected a map, got {found}")]
    InvalidMemberGroup {
        /// 1-based position of the group in the `define` call
        position: usize,
        /// Type name of the offending argument
        found: String,
    },

    /// Assignment to a name the object model resolves itself
    #[error("Reserved name '{name}' cannot be assigned on {target}")]
    ReservedName {
        /// The reserved name
        name: String,
        /// Class or instance the assignment targeted
        target: String,
    },

    /// Method call on a name no class in the chain defines
    #[error("Undefined member '{name}' on {class}")]
    UndefinedMember {
        /// Member name
        name: String,
        /// Name of the receiver's class
        class: String,
    },

    /// Attempt to call a value that is not a function or class
    #[error("'{name}' is not callable (found {found})")]
    NotCallable {
        /// Name the value was looked up under
        name: String,
        /// Type name of the value
        found: String,
    },

    /// Bound function called without an instance as its first argument
    #[error("'{name}' expects an instance receiver, got {found}")]
    InvalidReceiver {
        /// Function name
        name: String,
        /// Type name of the first argument
        found: String,
    },

    /// Registry lookup for a name that was never declared
    #[error("Unknown class: {name}")]
    UnknownClass {
        /// Class name
        name: String,
    },

    /// Factory configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error raised by user code inside a constructor or method
    #[error("{0}")]
    Raised(Value),
}

/// Result type used throughout the object model
pub type ObjectResult<T> = Result<T, ObjectError>;
