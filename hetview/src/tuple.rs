//! The shape of aggregates a view can traverse: a statically known length, and statically indexed
//! access to each element.
//!
//! Tuples up to arity 32 and arrays `[T; N]` with `N` up to [`MAX_COUNT`] are supported out of the
//! box. Any other type joins in by implementing [`TupleLike`] and one [`Get`] per position:
//!
//! ```
//! use hetview::tuple::{Get, TupleLike};
//! use hetview::unary::Number;
//!
//! struct Pair {
//!     name: String,
//!     score: u32,
//! }
//!
//! impl TupleLike for Pair {
//!     type Length = Number<2>;
//! }
//!
//! impl Get<0> for Pair {
//!     type Element = String;
//!     fn get(&self) -> &String { &self.name }
//!     fn get_mut(&mut self) -> &mut String { &mut self.name }
//!     fn into_element(self) -> String { self.name }
//! }
//!
//! impl Get<1> for Pair {
//!     type Element = u32;
//!     fn get(&self) -> &u32 { &self.score }
//!     fn get_mut(&mut self) -> &mut u32 { &mut self.score }
//!     fn into_element(self) -> u32 { self.score }
//! }
//!
//! hetview::assert_tuple_like!(Pair, (u8, char), [f32; 4]);
//! ```
//!
//! A type from another crate cannot be given a [`Get`] impl here, so a view can instead be told to
//! reach into it through an [`Extract`] policy, the counterpart of a free-standing accessor.
//!
//! [`MAX_COUNT`]: crate::meta_iota::MAX_COUNT

use crate::least::Least;
use crate::unary::{Constant, Number};

/// An aggregate with a statically known number of elements.
pub trait TupleLike {
    /// The number of elements, as a type-level [`Number`].
    type Length: Least;

    /// The number of elements.
    const LENGTH: usize = <Self::Length as Constant>::VALUE;
}

/// Statically indexed access to the element at position `I`.
pub trait Get<const I: usize>: TupleLike {
    /// The type of the element at position `I`.
    type Element;

    /// Borrow the element.
    fn get(&self) -> &Self::Element;

    /// Mutably borrow the element.
    fn get_mut(&mut self) -> &mut Self::Element;

    /// Move the element out, discarding the rest of the aggregate.
    fn into_element(self) -> Self::Element
    where
        Self: Sized;
}

/// The type of the element at position `I` of `A`.
pub type Element<A, const I: usize> = <A as Get<I>>::Element;

/// A policy for reaching the element at position `I` of an aggregate `A`.
///
/// Views are parameterized by their extraction policy, which defaults to [`Member`].
///
/// # Examples
///
/// ```
/// use hetview::prelude::*;
/// use hetview::tuple::Extract;
///
/// // Reads the tuple backwards.
/// struct Reversed;
///
/// impl Extract<(i32, char), 0> for Reversed {
///     type Element = char;
///     fn extract(a: &(i32, char)) -> &char { &a.1 }
///     fn extract_mut(a: &mut (i32, char)) -> &mut char { &mut a.1 }
///     fn extract_owned(a: (i32, char)) -> char { a.1 }
/// }
///
/// impl Extract<(i32, char), 1> for Reversed {
///     type Element = i32;
///     fn extract(a: &(i32, char)) -> &i32 { &a.0 }
///     fn extract_mut(a: &mut (i32, char)) -> &mut i32 { &mut a.0 }
///     fn extract_owned(a: (i32, char)) -> i32 { a.0 }
/// }
///
/// struct Show;
///
/// impl<T: ToString> Visit<&T> for Show {
///     type Output = String;
///     fn visit(&mut self, value: &T) -> String {
///         value.to_string()
///     }
/// }
///
/// let pair = (1, 'x');
/// let reversed = view(&pair).with_extractor::<Reversed>();
/// let shown: Vec<String> = reversed.iter().map(|a| a.apply(Show)).collect();
/// assert_eq!(shown, ["x", "1"]);
/// ```
pub trait Extract<A, const I: usize> {
    /// The type of the element reached.
    type Element;

    /// Borrow the element.
    fn extract(aggregate: &A) -> &Self::Element;

    /// Mutably borrow the element.
    fn extract_mut(aggregate: &mut A) -> &mut Self::Element;

    /// Move the element out of the aggregate.
    fn extract_owned(aggregate: A) -> Self::Element;
}

/// The default extraction policy: the aggregate's own [`Get`] impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Member;

impl<A: Get<I>, const I: usize> Extract<A, I> for Member {
    type Element = A::Element;

    #[inline]
    fn extract(aggregate: &A) -> &A::Element {
        aggregate.get()
    }

    #[inline]
    fn extract_mut(aggregate: &mut A) -> &mut A::Element {
        aggregate.get_mut()
    }

    #[inline]
    fn extract_owned(aggregate: A) -> A::Element {
        aggregate.into_element()
    }
}

hetview_macro::impl_tuples!(32);

impl<T, const N: usize> TupleLike for [T; N]
where
    Number<N>: Least,
{
    type Length = Number<N>;
}

/// Rejects, when instantiated, any array position which is not strictly less than its length.
struct InBounds<const I: usize, const N: usize>;

impl<const I: usize, const N: usize> InBounds<I, N> {
    const OK: () = assert!(I < N, "array position is out of bounds");
}

impl<T, const N: usize, const I: usize> Get<I> for [T; N]
where
    Number<N>: Least,
{
    type Element = T;

    #[inline]
    fn get(&self) -> &T {
        #[allow(clippy::let_unit_value)]
        let () = InBounds::<I, N>::OK;
        &self[I]
    }

    #[inline]
    fn get_mut(&mut self) -> &mut T {
        #[allow(clippy::let_unit_value)]
        let () = InBounds::<I, N>::OK;
        &mut self[I]
    }

    fn into_element(self) -> T {
        #[allow(clippy::let_unit_value)]
        let () = InBounds::<I, N>::OK;
        IntoIterator::into_iter(self)
            .nth(I)
            .expect("array position was checked against the length at build time")
    }
}

/// Assert at build time that every listed type is [`TupleLike`].
#[macro_export]
macro_rules! assert_tuple_like {
    ($($ty:ty),+ $(,)?) => {
        const _: fn() = || {
            fn assert_tuple_like<T: ?Sized + $crate::tuple::TupleLike>() {}
            $(assert_tuple_like::<$ty>();)+
        };
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::{assert_impl_all, assert_not_impl_any, assert_type_eq_all};

    assert_impl_all!((): TupleLike);
    assert_impl_all!((u8, String, f64): TupleLike, Get<0>, Get<1>, Get<2>);
    assert_not_impl_any!((u8, String): Get<2>);
    assert_not_impl_any!(u32: TupleLike);
    assert_type_eq_all!(Element<(u8, String, f64), 1>, String);
    assert_type_eq_all!(<[u16; 7] as TupleLike>::Length, Number<7>);

    crate::assert_tuple_like!((i32,), [char; 0]);

    #[test]
    fn lengths() {
        assert_eq!(<() as TupleLike>::LENGTH, 0);
        assert_eq!(<(u8, u8, u8, u8) as TupleLike>::LENGTH, 4);
        assert_eq!(<[(); 128] as TupleLike>::LENGTH, 128);
    }

    #[test]
    fn tuple_access() {
        let mut triple = (1_u8, String::from("two"), 3.0_f64);
        assert_eq!(Get::<1>::get(&triple), "two");
        *Get::<0>::get_mut(&mut triple) = 9;
        assert_eq!(triple.0, 9);
        assert_eq!(<Member as Extract<_, 2>>::extract(&triple), &3.0);
        assert_eq!(Get::<1>::into_element(triple), "two");
    }

    #[test]
    fn array_access() {
        let mut array = [String::from("a"), String::from("b"), String::from("c")];
        Get::<2>::get_mut(&mut array).push('!');
        assert_eq!(Get::<2>::get(&array), "c!");
        assert_eq!(Get::<1>::into_element(array), "b");
    }
}
