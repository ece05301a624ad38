//! The unary numbers, represented by zero [`Z`] and successor [`S`], and the [`Number`] wrapper
//! which lets traits be implemented on type-level `usize` constants.
//!
//! Counts and positions in this crate are written as const generics (`Number<3>`), but
//! relationships between them, like "position `I` is strictly inside a count of `N`", are checked
//! on their unary equivalents, where the trait system can do induction.

/// The number zero.
///
/// # Examples
///
/// ```
/// use hetview::unary::Z;
///
/// let zero: Z = Z;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Z;

/// The successor of `N` (i.e. `N + 1`).
///
/// # Examples
///
/// ```
/// use hetview::unary::{S, Z};
///
/// let one: S<Z> = S(Z);
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct S<N>(pub N);

/// A convenient type synonym for writing out unary types using constants.
pub type UnaryOf<const N: usize> = <Number<N> as ToUnary>::AsUnary;

/// All unary numbers can be converted to their value-level equivalent `usize`.
///
/// # Examples
///
/// ```
/// # #![recursion_limit = "256"]
/// use hetview::unary::*;
///
/// assert_eq!(<UnaryOf<0>>::VALUE, 0);
/// assert_eq!(<UnaryOf<3>>::VALUE, 3);
/// assert_eq!(<UnaryOf<128>>::VALUE, 128);
/// ```
pub trait Unary: sealed::Unary + Sized + Sync + Send + 'static {
    /// The runtime value of this type-level number, as a `usize`.
    const VALUE: usize;
}

impl Unary for Z {
    const VALUE: usize = 0;
}

impl<N: Unary> Unary for S<N> {
    const VALUE: usize = N::VALUE + 1;
}

/// Ensure that a unary number is strictly less than some other number.
///
/// This is how a statically chosen position is proven to lie inside a count.
///
/// # Examples
///
/// This compiles, because `1 < 2`:
///
/// ```
/// use hetview::unary::*;
///
/// fn ok() where UnaryOf<1>: LessThan<UnaryOf<2>> {}
/// ```
///
/// But this does not, because `LessThan` is strict:
///
/// ```compile_fail
/// use hetview::unary::*;
///
/// fn bad() where UnaryOf<2>: LessThan<UnaryOf<2>> {}
/// ```
pub trait LessThan<N: Unary>
where
    Self: Unary,
{
}

impl<N: Unary> LessThan<S<N>> for Z {}

impl<N: Unary, M: LessThan<N>> LessThan<S<N>> for S<M> {}

/// A trait marking wrapped type-level constants, exposing their value.
pub trait Constant: sealed::Constant {
    /// The wrapped value.
    const VALUE: usize;
}

/// A wrapper for type-level `usize` values to allow implementing traits on them.
///
/// Counts in this crate are `Number`s: a [`MetaIota<Number<3>>`](crate::meta_iota::MetaIota) has
/// three positions, and a three-element tuple reports its length as `Number<3>`.
#[allow(missing_debug_implementations)]
pub struct Number<const N: usize>;

impl<const N: usize> Constant for Number<N> {
    const VALUE: usize = N;
}

/// A trait which allows conversion from a wrapper type over a type-level `usize` to a unary
/// type-level number representation.
pub trait ToUnary {
    /// The result of conversion.
    type AsUnary: Unary + ToConstant<AsConstant = Self>;
}

/// A trait which allows conversion from a unary type-level representation to a wrapper over a
/// type-level `usize`.
pub trait ToConstant: Unary {
    /// The result of conversion.
    type AsConstant: Constant + ToUnary<AsUnary = Self>;
}

hetview_macro::generate_unary_conversion_impls!(256);

mod sealed {
    use super::*;
    pub trait Unary: 'static {}
    impl Unary for Z {}
    impl<N: Unary> Unary for S<N> {}

    pub trait Constant: 'static {}
    impl<const N: usize> Constant for Number<N> {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::{assert_impl_all, assert_not_impl_any, assert_type_eq_all};

    assert_type_eq_all!(UnaryOf<0>, Z);
    assert_type_eq_all!(UnaryOf<2>, S<S<Z>>);
    assert_type_eq_all!(<S<S<S<Z>>> as ToConstant>::AsConstant, Number<3>);

    assert_impl_all!(UnaryOf<0>: LessThan<UnaryOf<1>>);
    assert_impl_all!(UnaryOf<127>: LessThan<UnaryOf<128>>);
    assert_not_impl_any!(UnaryOf<3>: LessThan<UnaryOf<3>>);
    assert_not_impl_any!(UnaryOf<4>: LessThan<UnaryOf<3>>);

    #[test]
    fn constants_round_trip_through_unary() {
        assert_eq!(<Number<7> as Constant>::VALUE, 7);
        assert_eq!(<<Number<7> as ToUnary>::AsUnary as Unary>::VALUE, 7);
        assert_eq!(
            <<UnaryOf<200> as ToConstant>::AsConstant as Constant>::VALUE,
            200
        );
    }
}
