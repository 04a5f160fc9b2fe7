//! errors.rs - Custom error types for the redact-core library.
//!
//! Errors are split by the phase that raises them: [`CompileError`] while an
//! instruction is turned into an evaluator, [`TransformError`] while a method
//! rewrites a value, and [`RedactError`] for a whole redaction call. Every
//! error is terminal for the call that produced it.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

use crate::instruction::OpCode;

/// Raised by a registered method, either when its factory rejects the static
/// arguments or when the bound transformer is handed a value it cannot change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransformError {
    #[error("in redaction method {method}: value can only be a string, found {found}")]
    NotString { method: String, found: &'static str },

    #[error("in redaction method {method}: invalid argument: {reason}")]
    InvalidArgument { method: String, reason: String },
}

/// Raised while compiling an instruction. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    #[error("invalid operation chain: {0}")]
    InvalidChain(String),

    #[error("no matching transformer found: transformer for {0} not found")]
    UnknownTransformer(String),

    #[error("invalid argument: {0} is not a valid opcode for an argument")]
    InvalidArgument(OpCode),

    #[error("could not compile method {method} for rule {instruction}: {source}")]
    Method {
        method: String,
        instruction: String,
        #[source]
        source: TransformError,
    },
}

/// Raised by a redaction call. The partially built copy is discarded.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedactError {
    #[error("must be struct or map/slice of structs, found {0}")]
    NotStruct(&'static str),

    #[error("failed to compile instruction for field '{field}' of {type_name}: {source}")]
    Compile {
        type_name: &'static str,
        field: String,
        #[source]
        source: CompileError,
    },

    #[error("failed to redact field '{field}' of {type_name}: {source}")]
    Transform {
        type_name: &'static str,
        field: String,
        #[source]
        source: TransformError,
    },

    #[error("internal redaction error: {0}")]
    Internal(String),
}
