//! Approximate byte cost of entries
//!
//! The cost model is deliberately coarse: text counts its characters,
//! sequences count their elements times the element width, primitives count
//! their storage width, and anything composite is charged a flat
//! [`COMPOSITE_COST`] without walking its contents. The only guarantees are
//! determinism and growth with data volume.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::mem::size_of;
use std::sync::Arc;

/// Flat cost charged for maps, records and other composite values.
pub const COMPOSITE_COST: u64 = 64;

/// Per-element cost for sequences whose element width is not known.
pub const ELEMENT_UNIT: u64 = 1;

/// Approximate storage cost of a value.
///
/// The default implementation charges [`COMPOSITE_COST`], so record types can
/// opt in with an empty impl:
///
/// ```
/// use linear::EstimateSize;
///
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// impl EstimateSize for Person {}
///
/// let person = Person { name: "Alice".into(), age: 30 };
/// assert_eq!(person.estimated_size(), linear::COMPOSITE_COST);
/// ```
pub trait EstimateSize {
    /// Estimated size of the value in bytes
    fn estimated_size(&self) -> u64 {
        COMPOSITE_COST
    }

    /// Whether the value stands for "no value"; absent values are rejected
    /// by every write.
    fn is_absent(&self) -> bool {
        false
    }
}

/// Estimated cost of storing `value` under `key`.
pub fn estimate<V>(key: &str, value: &V) -> u64
where
    V: EstimateSize + ?Sized,
{
    text_len(key) + value.estimated_size()
}

fn text_len(text: &str) -> u64 {
    text.chars().count() as u64
}

fn element_width<T>() -> u64 {
    (size_of::<T>() as u64).max(ELEMENT_UNIT)
}

impl EstimateSize for str {
    fn estimated_size(&self) -> u64 {
        text_len(self)
    }
}

impl EstimateSize for String {
    fn estimated_size(&self) -> u64 {
        text_len(self)
    }
}

impl<T> EstimateSize for [T] {
    fn estimated_size(&self) -> u64 {
        self.len() as u64 * element_width::<T>()
    }
}

impl<T, const N: usize> EstimateSize for [T; N] {
    fn estimated_size(&self) -> u64 {
        N as u64 * element_width::<T>()
    }
}

impl<T> EstimateSize for Vec<T> {
    fn estimated_size(&self) -> u64 {
        self.as_slice().estimated_size()
    }
}

impl<T> EstimateSize for VecDeque<T> {
    fn estimated_size(&self) -> u64 {
        self.len() as u64 * element_width::<T>()
    }
}

impl<K, V, S> EstimateSize for HashMap<K, V, S> {}
impl<K, V> EstimateSize for BTreeMap<K, V> {}
impl<T, S> EstimateSize for HashSet<T, S> {}
impl<T> EstimateSize for BTreeSet<T> {}

impl<T: EstimateSize> EstimateSize for Option<T> {
    fn estimated_size(&self) -> u64 {
        self.as_ref().map_or(0, EstimateSize::estimated_size)
    }

    fn is_absent(&self) -> bool {
        self.as_ref().map_or(true, EstimateSize::is_absent)
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for &T {
    fn estimated_size(&self) -> u64 {
        (**self).estimated_size()
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Box<T> {
    fn estimated_size(&self) -> u64 {
        (**self).estimated_size()
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: EstimateSize + ?Sized> EstimateSize for Arc<T> {
    fn estimated_size(&self) -> u64 {
        (**self).estimated_size()
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl EstimateSize for serde_json::Value {
    fn estimated_size(&self) -> u64 {
        use serde_json::Value;

        match self {
            Value::Null => 0,
            Value::Bool(_) => size_of::<bool>() as u64,
            Value::Number(_) => size_of::<f64>() as u64,
            Value::String(s) => text_len(s),
            Value::Array(items) => items.len() as u64 * ELEMENT_UNIT,
            Value::Object(_) => COMPOSITE_COST,
        }
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

macro_rules! impl_primitive_size {
    ($($ty:ty),* $(,)?) => {
        $(
            impl EstimateSize for $ty {
                fn estimated_size(&self) -> u64 {
                    size_of::<$ty>() as u64
                }
            }
        )*
    };
}

impl_primitive_size!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, ()
);
