// redact-core/src/rules/args.rs
//! Method arguments and their coercions.

use crate::instruction::{Literal, OpCode};

/// A static argument handed to a method factory, e.g. the `-4` in `star(-4)`.
///
/// Coercions never fail: a value that cannot be read as the requested type
/// yields that type's zero value.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    value: Literal,
}

impl Arg {
    pub fn new(value: Literal) -> Self {
        Self { value }
    }

    pub fn op_code(&self) -> OpCode {
        self.value.op_code()
    }

    pub fn literal(&self) -> &Literal {
        &self.value
    }

    pub fn as_string(&self) -> String {
        match &self.value {
            Literal::Nil => String::new(),
            Literal::Str(s) => s.clone(),
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) => v.to_string(),
            Literal::Bool(v) => v.to_string(),
        }
    }

    pub fn as_int(&self) -> i64 {
        match &self.value {
            Literal::Nil => 0,
            Literal::Str(s) => s.parse().unwrap_or(0),
            Literal::Int(v) => *v,
            Literal::Float(v) => *v as i64,
            Literal::Bool(v) => i64::from(*v),
        }
    }

    pub fn as_float(&self) -> f64 {
        match &self.value {
            Literal::Nil => 0.0,
            Literal::Str(s) => s.parse().unwrap_or(0.0),
            Literal::Int(v) => *v as f64,
            Literal::Float(v) => *v,
            Literal::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn as_bool(&self) -> bool {
        match &self.value {
            Literal::Nil => false,
            Literal::Str(s) => parse_bool(s).unwrap_or(false),
            Literal::Int(v) => *v != 0,
            Literal::Float(v) => *v != 0.0,
            Literal::Bool(v) => *v,
        }
    }
}

impl From<Literal> for Arg {
    fn from(value: Literal) -> Self {
        Self::new(value)
    }
}

/// Textual booleans in the spellings configuration files commonly use.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(value: Literal) -> Arg {
        Arg::new(value)
    }

    #[test]
    fn test_as_float() {
        assert_eq!(arg(Literal::Str("6.43".into())).as_float(), 6.43);
        assert_eq!(arg(Literal::Int(6)).as_float(), 6.0);
        assert_eq!(arg(Literal::Bool(true)).as_float(), 1.0);
        assert_eq!(arg(Literal::Float(6.44)).as_float(), 6.44);
        assert_eq!(arg(Literal::Nil).as_float(), 0.0);
    }

    #[test]
    fn test_as_int() {
        assert_eq!(arg(Literal::Str("6".into())).as_int(), 6);
        assert_eq!(arg(Literal::Int(6)).as_int(), 6);
        assert_eq!(arg(Literal::Bool(true)).as_int(), 1);
        assert_eq!(arg(Literal::Float(6.44)).as_int(), 6);
        assert_eq!(arg(Literal::Str("six".into())).as_int(), 0);
    }

    #[test]
    fn test_as_string() {
        assert_eq!(arg(Literal::Str("6".into())).as_string(), "6");
        assert_eq!(arg(Literal::Int(6)).as_string(), "6");
        assert_eq!(arg(Literal::Bool(true)).as_string(), "true");
        assert_eq!(arg(Literal::Float(6.44)).as_string(), "6.44");
        assert_eq!(arg(Literal::Nil).as_string(), "");
    }

    #[test]
    fn test_as_bool() {
        assert!(arg(Literal::Str("1".into())).as_bool());
        assert!(arg(Literal::Int(1)).as_bool());
        assert!(!arg(Literal::Int(0)).as_bool());
        assert!(arg(Literal::Bool(true)).as_bool());
        assert!(arg(Literal::Float(1.0)).as_bool());
        assert!(!arg(Literal::Str("yes".into())).as_bool());
    }
}
