// redact-core/src/instruction/opcode.rs
//! Opcode nodes and literal classification.
//!
//! A parsed instruction is an ordered `Vec<Node>`. Scalars carry a typed
//! [`Literal`]; sets and parameter lists own their children; `Run` and `Chain`
//! are bare markers.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;

use super::decoder::RawToken;

/// Discriminant of a [`Node`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Set,
    Params,
    String,
    Float,
    Int,
    Bool,
    Run,
    Nil,
    Chain,
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpCode::Set => "set",
            OpCode::Params => "params",
            OpCode::String => "string",
            OpCode::Float => "float",
            OpCode::Int => "int",
            OpCode::Bool => "bool",
            OpCode::Run => "run",
            OpCode::Nil => "nil",
            OpCode::Chain => "chain",
        };
        write!(f, "{}", s)
    }
}

/// A typed scalar value read from an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Literal {
    pub fn op_code(&self) -> OpCode {
        match self {
            Literal::Nil => OpCode::Nil,
            Literal::Str(_) => OpCode::String,
            Literal::Int(_) => OpCode::Int,
            Literal::Float(_) => OpCode::Float,
            Literal::Bool(_) => OpCode::Bool,
        }
    }
}

/// One element of a parsed instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar { literal: Literal, inverted: bool },
    Set { children: Vec<Node>, inverted: bool },
    Params { children: Vec<Node>, inverted: bool },
    /// `=`, separates the group selector from the method name.
    Run,
    /// `|`, separates rules.
    Chain,
}

impl Node {
    pub fn op_code(&self) -> OpCode {
        match self {
            Node::Scalar { literal, .. } => literal.op_code(),
            Node::Set { .. } => OpCode::Set,
            Node::Params { .. } => OpCode::Params,
            Node::Run => OpCode::Run,
            Node::Chain => OpCode::Chain,
        }
    }

    pub fn is_inverted(&self) -> bool {
        match self {
            Node::Scalar { inverted, .. } | Node::Set { inverted, .. } | Node::Params { inverted, .. } => *inverted,
            Node::Run | Node::Chain => false,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Set { children, .. } | Node::Params { children, .. } => children,
            _ => &[],
        }
    }

    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Node::Scalar { literal, .. } => Some(literal),
            _ => None,
        }
    }

    /// The string value of a `String` scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar { literal: Literal::Str(s), .. } => Some(s),
            _ => None,
        }
    }
}

/// Classifies a raw token into a scalar node.
///
/// Precedence:
/// 1. an empty bare token is `Nil`;
/// 2. a quoted token is always a `String`, after stripping a leading `~`
///    which inverts the node;
/// 3. a bare token made only of digits, `.` and `-` is numeric: a `Float` if
///    it contains a `.`, an `Int` otherwise, and a `String` when parsing fails;
/// 4. any other bare token loses a leading `~` (inverting the node), then is
///    a `Bool` if it reads `true`/`false` in any case, or a `String`.
///
/// `pending_inversion` comes from a `~` delimiter right before the token and
/// is OR'ed into the result on every path.
pub fn classify(token: RawToken, pending_inversion: bool) -> Node {
    let (literal, inverted) = match token {
        RawToken::Bare(text) if text.is_empty() => (Literal::Nil, false),
        RawToken::Quoted(text) => {
            let (text, inverted) = strip_inversion(text);
            (Literal::Str(text), inverted)
        }
        RawToken::Bare(text) => classify_bare(text),
    };
    Node::Scalar {
        literal,
        inverted: inverted || pending_inversion,
    }
}

fn strip_inversion(text: String) -> (String, bool) {
    match text.strip_prefix('~') {
        Some(rest) => (rest.to_string(), true),
        None => (text, false),
    }
}

fn classify_bare(text: String) -> (Literal, bool) {
    let numeric = text.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'-');
    if numeric {
        let literal = if text.contains('.') {
            match text.parse::<f64>() {
                Ok(v) => Literal::Float(v),
                Err(_) => Literal::Str(text),
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => Literal::Int(v),
                Err(_) => Literal::Str(text),
            }
        };
        return (literal, false);
    }

    let (text, inverted) = strip_inversion(text);
    let literal = if text.eq_ignore_ascii_case("true") {
        Literal::Bool(true)
    } else if text.eq_ignore_ascii_case("false") {
        Literal::Bool(false)
    } else {
        Literal::Str(text)
    };
    (literal, inverted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(s: &str) -> RawToken {
        RawToken::Bare(s.to_string())
    }

    fn scalar(literal: Literal, inverted: bool) -> Node {
        Node::Scalar { literal, inverted }
    }

    #[test]
    fn test_op_code_display() {
        let cases = [
            (OpCode::Set, "set"),
            (OpCode::Params, "params"),
            (OpCode::String, "string"),
            (OpCode::Float, "float"),
            (OpCode::Int, "int"),
            (OpCode::Bool, "bool"),
            (OpCode::Run, "run"),
            (OpCode::Nil, "nil"),
            (OpCode::Chain, "chain"),
        ];
        for (code, want) in cases {
            assert_eq!(code.to_string(), want);
        }
    }

    #[test]
    fn test_empty_is_nil() {
        assert_eq!(classify(bare(""), false), scalar(Literal::Nil, false));
        assert_eq!(classify(bare(""), true), scalar(Literal::Nil, true));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(classify(bare("-4"), false), scalar(Literal::Int(-4), false));
        assert_eq!(classify(bare("6.43"), false), scalar(Literal::Float(6.43), false));
    }

    #[test]
    fn test_numeric_parse_failure_falls_back_to_string() {
        assert_eq!(classify(bare("1.2.3"), false), scalar(Literal::Str("1.2.3".into()), false));
        assert_eq!(classify(bare("5-5"), false), scalar(Literal::Str("5-5".into()), false));
        assert_eq!(classify(bare("-"), false), scalar(Literal::Str("-".into()), false));
    }

    #[test]
    fn test_quoted_numbers_stay_strings() {
        let node = classify(RawToken::Quoted("42".into()), false);
        assert_eq!(node, scalar(Literal::Str("42".into()), false));
        let node = classify(RawToken::Quoted("true".into()), false);
        assert_eq!(node, scalar(Literal::Str("true".into()), false));
    }

    #[test]
    fn test_quoted_inversion() {
        let node = classify(RawToken::Quoted("~admin".into()), false);
        assert_eq!(node, scalar(Literal::Str("admin".into()), true));
    }

    #[test]
    fn test_bools_any_case() {
        assert_eq!(classify(bare("TRUE"), false), scalar(Literal::Bool(true), false));
        assert_eq!(classify(bare("False"), false), scalar(Literal::Bool(false), false));
        assert_eq!(classify(bare("~true"), false), scalar(Literal::Bool(true), true));
    }

    #[test]
    fn test_bare_string_inversion_preserves_case() {
        assert_eq!(classify(bare("~Admin"), false), scalar(Literal::Str("Admin".into()), true));
    }

    #[test]
    fn test_pending_inversion_applies() {
        assert_eq!(classify(bare("admin"), true), scalar(Literal::Str("admin".into()), true));
        assert_eq!(classify(bare("3"), true), scalar(Literal::Int(3), true));
    }
}
