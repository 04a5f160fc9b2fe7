#![allow(dead_code)]

use redact_derive::Redact;

#[derive(Clone, Redact)]
struct Account {
    #[redact("admin=zero")]
    #[redact("all=star")]
    email: String,
}

fn main() {}
