// redact-derive/src/lib.rs
//! Procedural macros for redact-core
//!
//! This crate provides one macro:
//! - `#[derive(Redact)]` - Generate the walk function and field metadata of a record

use proc_macro::TokenStream;

mod redact;

/// Derive macro for redactable records.
///
/// Implements `redact_core::Redact` and `redact_core::RedactRecord` for
/// structs and enums. The type must also implement `Clone`: the copy starts
/// as a clone of the input.
///
/// Fields without an attribute are walked with `redact_core::Redact::walk`,
/// so annotated fields of records nested inside them are redacted too. Their
/// type must implement `Redact`; use `#[redact(skip)]` for anything else.
///
/// # Attributes
///
/// - `#[redact("...")]` - Attach an instruction to a field holding a scalar,
///   possibly behind `Option`, `Box`, `Rc`, `Arc` or `AnyValue`
/// - `#[redact(nested)]` - Recurse into a composite field (a record or a
///   container of records) and list it in the type's metadata
/// - `#[redact(skip)]` - Copy the field as cloned, without walking it
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Redact)]
/// pub struct Customer {
///     #[redact("~admin=star(-4)")]
///     phone: String,
///     #[redact(nested)]
///     addresses: Vec<Address>,
///     created_at: u64,
///     #[redact(skip)]
///     session: SessionHandle,
/// }
/// ```
#[proc_macro_derive(Redact, attributes(redact))]
pub fn derive_redact(input: TokenStream) -> TokenStream {
    redact::derive_redact_impl(input)
}
