// redact-core/src/lib.rs
//! # Redact Core Library
//!
//! `redact-core` produces redacted copies of structured values. Fields are
//! annotated with a small instruction language describing which caller groups
//! see which transformation:
//!
//! ```text
//! ~[admin,csr]=star(-4)
//! ```
//!
//! reads "for everyone except `admin` and `csr`, mask all but the last four
//! characters". Instructions are compiled once per type into evaluators,
//! cached, and applied while walking a clone of the input.
//!
//! ## Modules
//!
//! * `instruction`: Scanner, decoders and the opcode nodes an instruction parses into.
//! * `rules`: The compiler from opcode nodes to rules, and the runtime evaluator.
//! * `methods`: The method registry and the built-in `zero`, `star`, `remove` and `redact` methods.
//! * `field`: The scalar view transformers operate on, and unwrapping of indirection.
//! * `cache`: Per-type field metadata, compiled on first use.
//! * `walker`: The `Redact` trait and its implementations for containers and leaves.
//! * `redactor`: The `Redactor` facade and the `redact` entry points.
//! * `config`: YAML configuration for a `Redactor`.
//! * `errors`: Compile, transform and redaction errors.
//!
//! ## Usage Example
//!
//! ```rust
//! use redact_core::{redact, Redact};
//!
//! #[derive(Debug, Clone, Redact)]
//! struct Customer {
//!     name: String,
//!     #[redact("~admin=star(-4)")]
//!     phone: String,
//! }
//!
//! let customer = Customer { name: "Ada".into(), phone: "555-555-1234".into() };
//! let copy = redact(&customer, &["support"]).unwrap();
//! assert_eq!(copy.phone, "********1234");
//! assert_eq!(customer.phone, "555-555-1234");
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns a typed error: [`CompileError`] for a bad
//! instruction, [`TransformError`] from a method, and [`RedactError`] for a
//! whole redaction call. Configuration loading uses `anyhow::Result`.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod cache;
pub mod config;
pub mod errors;
pub mod field;
pub mod instruction;
pub mod methods;
pub mod redactor;
pub mod rules;
pub mod walker;

/// Re-exports the error types.
pub use errors::{CompileError, RedactError, TransformError};

/// Re-exports the instruction parser and its node types.
pub use instruction::opcode::Node;
pub use instruction::{parse_instruction, Literal, OpCode};

/// Re-exports the compiler and compiled rule types.
pub use rules::{compile_instruction, Arg, Evaluator, GroupSelector, Rule};

/// Re-exports the method registry.
pub use methods::{transformer, MethodFactory, MethodRegistry, Transformer};

/// Re-exports the field-level traits and the dynamic field wrapper.
pub use field::{AnyValue, RedactField, Scalar};

/// Re-exports the metadata cache.
pub use cache::{FieldMetadata, FieldSpec, MetadataCache, TypeMetadata};

/// Re-exports the walker and the dynamic record wrapper.
pub use walker::{AnyRecord, Redact, RedactRecord, Walker};

/// Re-exports the facade and the top-level entry points.
pub use redactor::{default_redactor, redact, redact_record, Redactor};

pub use config::RedactorConfig;

/// Derives [`Redact`] and [`RedactRecord`] for structs and enums.
#[cfg(feature = "derive")]
pub use redact_derive::Redact;
