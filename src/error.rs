//! Error types for wrapper generation.

use thiserror::Error;

/// Errors raised while generating wrapper fragments.
///
/// All of these are generation-time failures: the driver must discard any
/// partial output for the affected function. Type errors in the *emitted*
/// code (wrong argument type, failed enum lookup, ...) are not represented
/// here; they are encoded into the generated C and surface per call at
/// runtime of the wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// A parameter's declared type has no registered handler.
    #[error("no handler registered for type '{type_name}' (parameter '{parameter}')")]
    UnknownType {
        type_name: String,
        parameter: String,
    },

    /// The declared return type has no registered handler.
    #[error("no handler registered for return type '{type_name}'")]
    UnknownReturnType { type_name: String },

    /// The category cannot appear in parameter position.
    #[error("{category} type cannot be used as parameter '{parameter}'")]
    UnsupportedParameter {
        category: &'static str,
        parameter: String,
    },

    /// The category cannot appear in return position.
    #[error("{category} type cannot be used as a return value")]
    UnsupportedReturn { category: &'static str },
}
