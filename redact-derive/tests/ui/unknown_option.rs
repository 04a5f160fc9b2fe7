#![allow(dead_code)]

use redact_derive::Redact;

#[derive(Clone, Redact)]
struct Account {
    #[redact(nest)]
    email: String,
}

fn main() {}
