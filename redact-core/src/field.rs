// redact-core/src/field.rs
//! The field-level view a transformer works on.
//!
//! A redaction method only ever sees a [`Scalar`]: a string, a number, a
//! boolean or a char. Annotated fields may hold that scalar behind layers of
//! indirection (`Option`, `Box`, `Rc`, `Arc`, [`AnyValue`]); [`RedactField`]
//! peels those layers off in place so the wrapper structure of the copy is
//! identical to the source.
//!
//! License: MIT OR APACHE 2.0

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A leaf value that a redaction method can rewrite.
pub trait Scalar {
    /// Mutable access to the text of string-like scalars.
    fn text_mut(&mut self) -> Option<&mut String> {
        None
    }

    /// Resets the value to its type's zero value.
    fn set_zero(&mut self);

    /// Short type name used in error messages.
    fn type_name(&self) -> &'static str;
}

/// A field type whose innermost value is a [`Scalar`].
pub trait RedactField {
    /// Unwraps indirection down to the scalar. `None` means the value is
    /// absent (for example an empty `Option`) and is left untouched.
    fn scalar_mut(&mut self) -> Option<&mut dyn Scalar>;
}

impl Scalar for String {
    fn text_mut(&mut self) -> Option<&mut String> {
        Some(self)
    }

    fn set_zero(&mut self) {
        self.clear();
    }

    fn type_name(&self) -> &'static str {
        "string"
    }
}

impl RedactField for String {
    fn scalar_mut(&mut self) -> Option<&mut dyn Scalar> {
        Some(self)
    }
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn set_zero(&mut self) {
                    *self = <$ty>::default();
                }

                fn type_name(&self) -> &'static str {
                    stringify!($ty)
                }
            }

            impl RedactField for $ty {
                fn scalar_mut(&mut self) -> Option<&mut dyn Scalar> {
                    Some(self)
                }
            }
        )*
    };
}

impl_scalar!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);

impl<T: RedactField> RedactField for Option<T> {
    fn scalar_mut(&mut self) -> Option<&mut dyn Scalar> {
        self.as_mut()?.scalar_mut()
    }
}

impl<T: RedactField> RedactField for Box<T> {
    fn scalar_mut(&mut self) -> Option<&mut dyn Scalar> {
        (**self).scalar_mut()
    }
}

// Shared pointers are detached before mutation so the source keeps its value.
impl<T: RedactField + Clone> RedactField for Rc<T> {
    fn scalar_mut(&mut self) -> Option<&mut dyn Scalar> {
        Rc::make_mut(self).scalar_mut()
    }
}

impl<T: RedactField + Clone> RedactField for Arc<T> {
    fn scalar_mut(&mut self) -> Option<&mut dyn Scalar> {
        Arc::make_mut(self).scalar_mut()
    }
}

/// Object-safe companion of [`RedactField`] used by [`AnyValue`].
pub trait DynField: RedactField + Send + Sync + fmt::Debug {
    fn clone_box(&self) -> Box<dyn DynField>;
    fn as_any(&self) -> &dyn Any;
}

impl<T> DynField for T
where
    T: RedactField + Clone + Send + Sync + fmt::Debug + 'static,
{
    fn clone_box(&self) -> Box<dyn DynField> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A dynamically typed field value, such as a string or a boxed optional
/// string, whose concrete type is only known at runtime.
#[derive(Debug)]
pub struct AnyValue(Box<dyn DynField>);

impl AnyValue {
    pub fn new<T>(value: T) -> Self
    where
        T: RedactField + Clone + Send + Sync + fmt::Debug + 'static,
    {
        Self(Box::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        Self((*self.0).clone_box())
    }
}

impl RedactField for AnyValue {
    fn scalar_mut(&mut self) -> Option<&mut dyn Scalar> {
        (*self.0).scalar_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        let mut n: i32 = 42;
        n.set_zero();
        assert_eq!(n, 0);
        let mut f: f64 = 1.5;
        f.set_zero();
        assert_eq!(f, 0.0);
        let mut b = true;
        b.set_zero();
        assert!(!b);
        let mut s = String::from("secret");
        s.set_zero();
        assert!(s.is_empty());
    }

    #[test]
    fn test_only_strings_expose_text() {
        let mut n: u64 = 7;
        assert!(n.text_mut().is_none());
        let mut s = String::from("x");
        assert!(s.text_mut().is_some());
    }

    #[test]
    fn test_unwraps_nested_indirection() {
        let mut value: Option<Box<Option<String>>> = Some(Box::new(Some("abc".to_string())));
        let scalar = value.scalar_mut().unwrap();
        scalar.text_mut().unwrap().push('d');
        assert_eq!(value, Some(Box::new(Some("abcd".to_string()))));
    }

    #[test]
    fn test_absent_option() {
        let mut value: Option<String> = None;
        assert!(value.scalar_mut().is_none());
    }

    #[test]
    fn test_rc_is_detached_before_mutation() {
        let source = Rc::new("shared".to_string());
        let mut copy = Rc::clone(&source);
        copy.scalar_mut().unwrap().set_zero();
        assert_eq!(*source, "shared");
        assert_eq!(*copy, "");
    }

    #[test]
    fn test_any_value_clone_is_independent() {
        let original = AnyValue::new(Some("tmp".to_string()));
        let mut copy = original.clone();
        copy.scalar_mut().unwrap().set_zero();
        assert_eq!(original.downcast_ref::<Option<String>>(), Some(&Some("tmp".to_string())));
        assert_eq!(copy.downcast_ref::<Option<String>>(), Some(&Some(String::new())));
        assert!(copy.is::<Option<String>>());
    }
}
