// redact-core/src/instruction/mod.rs
//! Parsing of field instructions into opcode nodes.
//!
//! An instruction is the string attached to a field, for example
//! `~[admin,csr]=star(-4)`. Parsing is a single pass over a [`Scanner`] that
//! dispatches on delimiters and produces an ordered list of [`Node`]s:
//!
//! ```text
//! ~[admin,csr]=star(-4)
//! Set{admin~, csr~}~  Run  String("star")  Params{Int(-4)}
//! ```
//!
//! Parsing never fails. Whether the nodes form valid rules is decided by the
//! compiler in [`crate::rules::compiler`].

pub mod decoder;
pub mod opcode;
pub mod scanner;

use log::debug;

use decoder::{decode_list, decode_string, decode_token, RawToken};
use opcode::{classify, Node};
use scanner::{Scanned, Scanner};

pub use opcode::{Literal, OpCode};

fn list_children(scanner: &mut Scanner<'_>) -> Vec<Node> {
    decode_list(scanner)
        .into_iter()
        .map(|token| classify(token, false))
        .collect()
}

/// Parses an instruction into its opcode nodes.
///
/// A `~` delimiter inverts whichever node comes next, scalar, set or
/// parameter list alike. Stray `]`, `)` and `,` at the top level start a new
/// bare token, which is usually empty and becomes a `Nil` node.
pub fn parse_instruction(instruction: &str) -> Vec<Node> {
    let mut scanner = Scanner::new(instruction);
    let mut nodes = Vec::new();
    let mut pending_inversion = false;

    loop {
        let node = match scanner.next_byte() {
            Scanned::End => break,
            Scanned::Delimiter(b'~') => {
                pending_inversion = true;
                continue;
            }
            Scanned::Delimiter(b'=') => Node::Run,
            Scanned::Delimiter(b'|') => Node::Chain,
            Scanned::Delimiter(b'(') => Node::Params {
                children: list_children(&mut scanner),
                inverted: std::mem::take(&mut pending_inversion),
            },
            Scanned::Delimiter(b'[') => Node::Set {
                children: list_children(&mut scanner),
                inverted: std::mem::take(&mut pending_inversion),
            },
            Scanned::Delimiter(b'"') => classify(
                RawToken::Quoted(decode_string(&mut scanner)),
                std::mem::take(&mut pending_inversion),
            ),
            Scanned::Delimiter(_) => classify(
                RawToken::Bare(decode_token(&mut scanner)),
                std::mem::take(&mut pending_inversion),
            ),
            Scanned::Content(_) => {
                scanner.rewind();
                classify(
                    RawToken::Bare(decode_token(&mut scanner)),
                    std::mem::take(&mut pending_inversion),
                )
            }
        };
        nodes.push(node);
    }

    debug!("Parsed instruction '{}' into {} nodes.", instruction, nodes.len());
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(s: &str, inverted: bool) -> Node {
        Node::Scalar {
            literal: Literal::Str(s.to_string()),
            inverted,
        }
    }

    #[test]
    fn test_set_of_mixed_strings() {
        let nodes = parse_instruction(r#"[test,"test2","\"test3\""]"#);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].op_code(), OpCode::Set);
        let children = nodes[0].children();
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| c.op_code() == OpCode::String));
        assert_eq!(children[0].as_str(), Some("test"));
        assert_eq!(children[1].as_str(), Some("test2"));
        assert_eq!(children[2].as_str(), Some(r#""test3""#));
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse_instruction(r#""\"test3\"""#), vec![string(r#""test3""#, false)]);
        assert_eq!(parse_instruction(r#""test3""#), vec![string("test3", false)]);
        assert_eq!(parse_instruction("test3"), vec![string("test3", false)]);
    }

    #[test]
    fn test_full_rule() {
        let nodes = parse_instruction("~[admin,csr]=star(-4)");
        let codes: Vec<OpCode> = nodes.iter().map(Node::op_code).collect();
        assert_eq!(codes, vec![OpCode::Set, OpCode::Run, OpCode::String, OpCode::Params]);
        assert!(nodes[0].is_inverted());
        assert!(nodes[0].children().iter().all(|c| !c.is_inverted()));
        assert_eq!(nodes[3].children()[0].literal(), Some(&Literal::Int(-4)));
    }

    #[test]
    fn test_inversion_is_one_shot() {
        let nodes = parse_instruction("~admin=zero");
        assert_eq!(nodes[0], string("admin", true));
        assert_eq!(nodes[2], string("zero", false));
    }

    #[test]
    fn test_inversion_applies_to_quoted_string() {
        let nodes = parse_instruction(r#"~"admin"=zero"#);
        assert_eq!(nodes[0], string("admin", true));
    }

    #[test]
    fn test_chain_marker() {
        let codes: Vec<OpCode> = parse_instruction("a=zero|b=star")
            .iter()
            .map(Node::op_code)
            .collect();
        assert_eq!(
            codes,
            vec![
                OpCode::String,
                OpCode::Run,
                OpCode::String,
                OpCode::Chain,
                OpCode::String,
                OpCode::Run,
                OpCode::String
            ]
        );
    }

    #[test]
    fn test_empty_params() {
        let nodes = parse_instruction("all=zero()");
        assert_eq!(nodes[3].op_code(), OpCode::Params);
        assert!(nodes[3].children().is_empty());
    }

    #[test]
    fn test_stray_close_bracket_yields_nil() {
        let nodes = parse_instruction("]=zero");
        assert_eq!(nodes[0].op_code(), OpCode::Nil);
        assert_eq!(nodes[1], Node::Run);
    }

    #[test]
    fn test_params_literals() {
        let nodes = parse_instruction(r#"redact(*,"-",1.5,true)"#);
        let args: Vec<&Literal> = nodes[1].children().iter().filter_map(Node::literal).collect();
        assert_eq!(
            args,
            vec![
                &Literal::Str("*".into()),
                &Literal::Str("-".into()),
                &Literal::Float(1.5),
                &Literal::Bool(true)
            ]
        );
    }
}
