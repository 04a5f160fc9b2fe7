// redact-core/src/methods/builtin.rs
//! The methods every registry starts with: `zero`, `star`, `remove` and
//! `redact`.
//!
//! Offsets and masks work on characters, not bytes, so multi-byte text is
//! never split. Offsets larger than the value are clamped.

use crate::errors::TransformError;
use crate::field::Scalar;
use crate::rules::args::Arg;

use super::{transformer, Transformer};

fn text_of<'a>(method: &str, value: &'a mut dyn Scalar) -> Result<&'a mut String, TransformError> {
    let found = value.type_name();
    value.text_mut().ok_or_else(|| TransformError::NotString {
        method: method.to_string(),
        found,
    })
}

/// Splits a signed offset into its direction and a length clamped to `len`.
fn clamp_offset(offset: i64, len: usize) -> (bool, usize) {
    let magnitude = usize::try_from(offset.unsigned_abs()).unwrap_or(usize::MAX);
    (offset >= 0, magnitude.min(len))
}

fn first_int(args: &[Arg]) -> i64 {
    args.first().map(Arg::as_int).unwrap_or(0)
}

/// `zero()`: resets any scalar to its zero value.
///
/// `"66"` becomes `""`, `66` becomes `0`.
pub fn zero(_args: &[Arg]) -> Result<Transformer, TransformError> {
    Ok(transformer(|value| {
        value.set_zero();
        Ok(())
    }))
}

/// `star(offset)`: masks characters with `*`.
///
/// A positive offset keeps that many leading characters, a negative one keeps
/// that many trailing characters. `555-555-1234` with `star(-4)` is
/// `********1234`. Without an argument the whole value is masked.
pub fn star(args: &[Arg]) -> Result<Transformer, TransformError> {
    let offset = first_int(args);
    Ok(transformer(move |value| {
        let text = text_of("star", value)?;
        let len = text.chars().count();
        let (leading, keep) = clamp_offset(offset, len);
        let masked: String = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let kept = if leading { i < keep } else { i >= len - keep };
                if kept {
                    c
                } else {
                    '*'
                }
            })
            .collect();
        *text = masked;
        Ok(())
    }))
}

/// `remove(offset)`: truncates the value.
///
/// A positive offset keeps only that many leading characters, a negative one
/// keeps only that many trailing characters. `555-555-1234` with
/// `remove(-4)` is `1234`. Without an argument the value becomes empty.
pub fn remove(args: &[Arg]) -> Result<Transformer, TransformError> {
    let offset = first_int(args);
    Ok(transformer(move |value| {
        let text = text_of("remove", value)?;
        let len = text.chars().count();
        let (leading, keep) = clamp_offset(offset, len);
        let kept: String = if leading {
            text.chars().take(keep).collect()
        } else {
            text.chars().skip(len - keep).collect()
        };
        *text = kept;
        Ok(())
    }))
}

/// `redact(mask, allowed)`: replaces every character not listed in `allowed`
/// with the first character of `mask` (default `*`).
///
/// `555-555-1234` with `redact("*","-")` is `***-***-****`.
pub fn redact(args: &[Arg]) -> Result<Transformer, TransformError> {
    let mask = args
        .first()
        .and_then(|a| a.as_string().chars().next())
        .unwrap_or('*');
    let allowed: Vec<char> = args
        .get(1)
        .map(|a| a.as_string().chars().collect())
        .unwrap_or_default();
    Ok(transformer(move |value| {
        let text = text_of("redact", value)?;
        let masked: String = text
            .chars()
            .map(|c| if allowed.contains(&c) { c } else { mask })
            .collect();
        *text = masked;
        Ok(())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Literal;

    fn int(v: i64) -> Arg {
        Arg::new(Literal::Int(v))
    }

    fn text(s: &str) -> Arg {
        Arg::new(Literal::Str(s.to_string()))
    }

    fn apply(t: &Transformer, input: &str) -> String {
        let mut value = input.to_string();
        t(&mut value).unwrap();
        value
    }

    #[test]
    fn test_star_offsets() {
        assert_eq!(apply(&star(&[int(-4)]).unwrap(), "555-555-1234"), "********1234");
        assert_eq!(apply(&star(&[int(3)]).unwrap(), "555-555-1234"), "555*********");
        assert_eq!(apply(&star(&[]).unwrap(), "test"), "****");
        assert_eq!(apply(&star(&[int(4)]).unwrap(), "test@test.com"), "test*********");
    }

    #[test]
    fn test_star_offset_is_stable_across_calls() {
        let t = star(&[int(-4)]).unwrap();
        assert_eq!(apply(&t, "555-555-1234"), "********1234");
        assert_eq!(apply(&t, "555-555-1234"), "********1234");
    }

    #[test]
    fn test_star_offset_past_end() {
        assert_eq!(apply(&star(&[int(10)]).unwrap(), "abc"), "abc");
        assert_eq!(apply(&star(&[int(-10)]).unwrap(), "abc"), "abc");
    }

    #[test]
    fn test_remove_offsets() {
        assert_eq!(apply(&remove(&[int(-4)]).unwrap(), "555-555-1234"), "1234");
        assert_eq!(apply(&remove(&[int(3)]).unwrap(), "555-555-1234"), "555");
        assert_eq!(apply(&remove(&[]).unwrap(), "test"), "");
        assert_eq!(apply(&remove(&[int(9)]).unwrap(), "ab"), "ab");
    }

    #[test]
    fn test_remove_counts_characters() {
        assert_eq!(apply(&remove(&[int(2)]).unwrap(), "héllo"), "hé");
    }

    #[test]
    fn test_redact_allowed_characters() {
        let t = redact(&[text("*"), text("-")]).unwrap();
        assert_eq!(apply(&t, "555-555-1234"), "***-***-****");
    }

    #[test]
    fn test_redact_defaults() {
        assert_eq!(apply(&redact(&[]).unwrap(), "abc"), "***");
        assert_eq!(apply(&redact(&[text("")]).unwrap(), "abc"), "***");
        assert_eq!(apply(&redact(&[text("#")]).unwrap(), "a-c"), "###");
    }

    #[test]
    fn test_zero_any_scalar() {
        let t = zero(&[]).unwrap();
        let mut n: i64 = 66;
        t(&mut n).unwrap();
        assert_eq!(n, 0);
        assert_eq!(apply(&t, "66"), "");
    }

    #[test]
    fn test_string_methods_reject_numbers() {
        let t = star(&[]).unwrap();
        let mut n: u32 = 5;
        let err = t(&mut n).unwrap_err();
        assert_eq!(
            err,
            TransformError::NotString {
                method: "star".to_string(),
                found: "u32"
            }
        );
    }
}
