// redact-core/src/walker.rs
//! walker.rs - The recursive cloning traversal.
//!
//! [`Redact::walk`] produces a redacted copy of a value. Containers rebuild
//! themselves element by element, records (via `#[derive(Redact)]`) clone
//! every field, run the compiled evaluator on fields carrying an instruction
//! and walk every other field that is not marked `skip`.
//!
//! The input is never modified. Any error aborts the walk and the partially
//! built copy is dropped.
//!
//! License: MIT OR APACHE 2.0

use std::any::{type_name, Any};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use log::trace;

use crate::cache::{FieldSpec, TypeMetadata};
use crate::errors::RedactError;
use crate::field::{AnyValue, RedactField};
use crate::redactor::Redactor;

/// A value that can be walked to produce a redacted copy.
pub trait Redact: Sized {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError>;
}

/// A record type with field annotations. Implemented by `#[derive(Redact)]`.
pub trait RedactRecord: Redact + 'static {
    /// The annotated fields, in declaration order. Fields without an
    /// annotation are not listed.
    fn field_specs() -> Vec<FieldSpec>;
}

/// Traversal state handed down through [`Redact::walk`].
#[derive(Debug, Clone, Copy)]
pub struct Walker<'a> {
    redactor: &'a Redactor,
    groups: &'a [String],
    in_record: bool,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(redactor: &'a Redactor, groups: &'a [String]) -> Self {
        Self {
            redactor,
            groups,
            in_record: false,
        }
    }

    /// The active caller groups.
    pub fn groups(&self) -> &[String] {
        self.groups
    }

    /// Whether a record has been entered above the current value.
    pub fn in_record(&self) -> bool {
        self.in_record
    }

    /// The walker used for the fields of a record.
    pub fn enter_record(&self) -> Walker<'a> {
        Walker {
            in_record: true,
            ..*self
        }
    }

    /// Compiled metadata of the record type `T`.
    pub fn metadata<T: RedactRecord>(&self) -> Result<Arc<TypeMetadata>, RedactError> {
        self.redactor.metadata::<T>()
    }

    /// Runs the evaluator of field `index` on `field`, in place.
    ///
    /// Absent values (an empty `Option` anywhere in the indirection chain) and
    /// fields without an instruction are left untouched.
    pub fn apply<F: RedactField + ?Sized>(&self, metadata: &TypeMetadata, index: usize, field: &mut F) -> Result<(), RedactError> {
        let Some(meta) = metadata.field(index) else {
            return Err(RedactError::Internal(format!(
                "{} has no field metadata at index {}",
                metadata.type_name(),
                index
            )));
        };
        let Some(evaluator) = meta.evaluator() else {
            return Ok(());
        };
        let Some(scalar) = field.scalar_mut() else {
            trace!("Field '{}' of {} is absent.", meta.name(), metadata.type_name());
            return Ok(());
        };
        let matched = evaluator
            .evaluate(scalar, self.groups)
            .map_err(|source| RedactError::Transform {
                type_name: metadata.type_name(),
                field: meta.name().to_string(),
                source,
            })?;
        trace!(
            "Field '{}' of {}: instruction '{}' matched={}.",
            meta.name(),
            metadata.type_name(),
            evaluator.instruction(),
            matched
        );
        Ok(())
    }

    /// Copies a leaf value. Only valid below a record.
    pub fn leaf<T: Clone>(&self, value: &T) -> Result<T, RedactError> {
        if self.in_record {
            Ok(value.clone())
        } else {
            Err(RedactError::NotStruct(type_name::<T>()))
        }
    }
}

impl<T: Redact> Redact for Option<T> {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        self.as_ref().map(|value| value.walk(walker)).transpose()
    }
}

impl<T: Redact> Redact for Box<T> {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        Ok(Box::new((**self).walk(walker)?))
    }
}

impl<T: Redact> Redact for Rc<T> {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        Ok(Rc::new((**self).walk(walker)?))
    }
}

impl<T: Redact> Redact for Arc<T> {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        Ok(Arc::new((**self).walk(walker)?))
    }
}

impl<T: Redact> Redact for Vec<T> {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        self.iter().map(|item| item.walk(walker)).collect()
    }
}

impl<T: Redact> Redact for VecDeque<T> {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        self.iter().map(|item| item.walk(walker)).collect()
    }
}

impl<T: Redact, const N: usize> Redact for [T; N] {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        let items = self
            .iter()
            .map(|item| item.walk(walker))
            .collect::<Result<Vec<T>, RedactError>>()?;
        <[T; N]>::try_from(items)
            .map_err(|items| RedactError::Internal(format!("array of length {} rebuilt with {} elements", N, items.len())))
    }
}

// Keys are copied as they are; only values are walked.
impl<K, V, S> Redact for HashMap<K, V, S>
where
    K: Clone + Eq + Hash,
    V: Redact,
    S: BuildHasher + Default,
{
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        let mut out = HashMap::with_capacity_and_hasher(self.len(), S::default());
        for (key, value) in self {
            out.insert(key.clone(), value.walk(walker)?);
        }
        Ok(out)
    }
}

impl<K: Clone + Ord, V: Redact> Redact for BTreeMap<K, V> {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        let mut out = BTreeMap::new();
        for (key, value) in self {
            out.insert(key.clone(), value.walk(walker)?);
        }
        Ok(out)
    }
}

impl<T, S> Redact for HashSet<T, S>
where
    T: Redact + Eq + Hash,
    S: BuildHasher + Default,
{
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        self.iter().map(|item| item.walk(walker)).collect()
    }
}

impl<T: Redact + Ord> Redact for BTreeSet<T> {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        self.iter().map(|item| item.walk(walker)).collect()
    }
}

macro_rules! impl_tuple {
    ($(($($name:ident : $index:tt),+)),* $(,)?) => {
        $(
            impl<$($name: Redact),+> Redact for ($($name,)+) {
                fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
                    Ok(($(self.$index.walk(walker)?,)+))
                }
            }
        )*
    };
}

impl_tuple!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
);

macro_rules! impl_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Redact for $ty {
                fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
                    walker.leaf(self)
                }
            }
        )*
    };
}

impl_leaf!(
    String, &'static str, (), i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char
);

// Unannotated `AnyValue` fields are copied; an instruction is needed to change them.
impl_leaf!(AnyValue);

/// Object-safe companion of [`Redact`] used by [`AnyRecord`].
pub trait DynRecord: Send + Sync + fmt::Debug {
    fn clone_box(&self) -> Box<dyn DynRecord>;
    fn walk_boxed(&self, walker: &Walker<'_>) -> Result<Box<dyn DynRecord>, RedactError>;
    fn as_any(&self) -> &dyn Any;
}

impl<T> DynRecord for T
where
    T: Redact + Clone + Send + Sync + fmt::Debug + 'static,
{
    fn clone_box(&self) -> Box<dyn DynRecord> {
        Box::new(self.clone())
    }

    fn walk_boxed(&self, walker: &Walker<'_>) -> Result<Box<dyn DynRecord>, RedactError> {
        Ok(Box::new(self.walk(walker)?))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A dynamically typed walkable value: a record, a collection of records or
/// another wrapper, whose concrete type is only known at runtime.
#[derive(Debug)]
pub struct AnyRecord(Box<dyn DynRecord>);

impl AnyRecord {
    pub fn new<T>(value: T) -> Self
    where
        T: Redact + Clone + Send + Sync + fmt::Debug + 'static,
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

impl Clone for AnyRecord {
    fn clone(&self) -> Self {
        Self((*self.0).clone_box())
    }
}

impl Redact for AnyRecord {
    fn walk(&self, walker: &Walker<'_>) -> Result<Self, RedactError> {
        Ok(Self((*self.0).walk_boxed(walker)?))
    }
}
