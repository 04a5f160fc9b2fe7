// redact-core/src/rules/mod.rs
//! Compiled redaction rules.
//!
//! [`compiler`] turns an instruction into an [`Evaluator`]; [`evaluator`]
//! decides at redaction time which rule, if any, applies to a caller's groups.

pub mod args;
pub mod compiler;
pub mod evaluator;

pub use args::Arg;
pub use compiler::compile_instruction;
pub use evaluator::{Evaluator, GroupSelector, Rule, NO_GROUP, WILDCARD_GROUP};
