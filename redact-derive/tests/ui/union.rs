#![allow(dead_code)]

use redact_derive::Redact;

#[derive(Redact)]
union Bits {
    word: u32,
    bytes: [u8; 4],
}

fn main() {}
