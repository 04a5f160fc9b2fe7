#![allow(dead_code)]

use redact_derive::Redact;

#[derive(Clone, Redact)]
struct Account {
    #[redact("  ")]
    email: String,
}

fn main() {}
