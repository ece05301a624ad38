//! Predicates over the element types of an aggregate.
//!
//! Nothing else in this crate depends on these; they answer questions like "does this tuple hold
//! each type at most once?", which matter when elements are later looked up by type rather than by
//! position.

use std::any::TypeId;

use crate::least::Least;
use crate::unary::Number;

/// An aggregate whose element types can be listed at run time.
///
/// Implemented for every tuple of `'static` types up to arity 32 and for arrays.
pub trait TypeList {
    /// The [`TypeId`] of every element type, in position order.
    fn type_ids() -> Vec<TypeId>;
}

impl<T: 'static, const N: usize> TypeList for [T; N]
where
    Number<N>: Least,
{
    fn type_ids() -> Vec<TypeId> {
        vec![TypeId::of::<T>(); N]
    }
}

/// Whether no type occurs twice in `L`.
///
/// # Examples
///
/// ```
/// use hetview::predicate::all_unique;
///
/// assert!(all_unique::<(u8, String, f64)>());
/// assert!(!all_unique::<(u8, String, u8)>());
/// assert!(all_unique::<()>());
/// ```
pub fn all_unique<L: TypeList>() -> bool {
    let ids = L::type_ids();
    ids.iter()
        .enumerate()
        .all(|(i, id)| !ids[i + 1..].contains(id))
}

/// Whether `T` occurs in `L`.
///
/// # Examples
///
/// ```
/// use hetview::predicate::one_of;
///
/// assert!(one_of::<String, (u8, String)>());
/// assert!(!one_of::<&'static str, (u8, String)>());
/// ```
pub fn one_of<T: 'static, L: TypeList>() -> bool {
    position_of::<T, L>().is_some()
}

/// The first position at which `T` occurs in `L`, if any.
pub fn position_of<T: 'static, L: TypeList>() -> Option<usize> {
    let target = TypeId::of::<T>();
    L::type_ids().into_iter().position(|id| id == target)
}
