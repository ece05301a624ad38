//! Visitors: callables that accept every element type of a heterogeneous sequence.
//!
//! A closure can only take one argument type, so visiting a `(u8, String, f64)` needs something
//! that is generic over its argument. That is what [`Visit<T>`] is: implement it once generically,
//! or once per element type, and hand the visitor to an accessor or a token.
//!
//! ```
//! use hetview::prelude::*;
//! use std::fmt::Debug;
//!
//! struct Describe;
//!
//! impl<T: Debug> Visit<&T> for Describe {
//!     type Output = String;
//!
//!     fn visit(&mut self, value: &T) -> String {
//!         format!("{:?}", value)
//!     }
//! }
//!
//! let triple = (1, "two", 3.5);
//! let described: Vec<String> = view(&triple).iter().map(|a| a.apply(Describe)).collect();
//! assert_eq!(described, ["1", "\"two\"", "3.5"]);
//! ```
//!
//! Tokens of a [`MetaIota`](crate::meta_iota::MetaIota) are visited the same way, with the
//! compile-time position [`Index<I>`] as the argument.

use std::convert::Infallible;

/// The compile-time position `I`, handed to a visitor by a
/// [`Token`](crate::meta_iota::Token) pointing at `I`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Index<const I: usize>;

impl<const I: usize> Index<I> {
    /// The position, as a constant.
    pub const VALUE: usize = I;

    /// The position.
    pub const fn value(self) -> usize {
        I
    }
}

/// A visitor accepting a `T`.
///
/// A visitor that never fails or panics may say so by setting [`INFALLIBLE`](Visit::INFALLIBLE),
/// which accessors and tokens report onward through
/// [`FuncOnce::INFALLIBLE`](crate::compose::FuncOnce::INFALLIBLE). The flag is advisory and never
/// changes behavior.
pub trait Visit<T> {
    /// The result of a visit.
    type Output;

    /// Whether a visit is declared never to fail or panic.
    const INFALLIBLE: bool = false;

    /// Visit a value.
    fn visit(&mut self, value: T) -> Self::Output;
}

impl<T, V: Visit<T> + ?Sized> Visit<T> for &mut V {
    type Output = V::Output;
    const INFALLIBLE: bool = V::INFALLIBLE;

    fn visit(&mut self, value: T) -> V::Output {
        (**self).visit(value)
    }
}

/// A visitor accepting a `T`, consumed by the visit.
///
/// Every [`Visit<T>`] is a `VisitOnce<T>`; the bridge is what lets a visitor be passed either by
/// value (used once) or as `&mut visitor` (reused).
pub trait VisitOnce<T> {
    /// The result of a visit.
    type Output;

    /// Whether a visit is declared never to fail or panic.
    const INFALLIBLE: bool = false;

    /// Visit a value, consuming the visitor.
    fn visit_once(self, value: T) -> Self::Output;
}

impl<T, V: Visit<T>> VisitOnce<T> for V {
    type Output = V::Output;
    const INFALLIBLE: bool = <V as Visit<T>>::INFALLIBLE;

    #[inline]
    fn visit_once(mut self, value: T) -> V::Output {
        self.visit(value)
    }
}

/// A visitor accepting [`Index<I>`] for every `I` strictly less than the count `N`, with one common
/// output type.
///
/// This is implemented automatically for every `N` up to [`MAX_COUNT`]: there is nothing to
/// implement by hand. A count of zero has no positions, so its output is uninhabited.
///
/// [`MAX_COUNT`]: crate::meta_iota::MAX_COUNT
pub trait VisitEach<N> {
    /// The output shared by every position.
    type Output;

    /// Whether every position's visit is declared never to fail or panic.
    const INFALLIBLE: bool = false;

    /// Visit the position given at run time.
    ///
    /// # Panics
    ///
    /// If `position` is not strictly less than `N`. Tokens never pass such a position.
    fn visit_at(self, position: usize) -> Self::Output;
}

hetview_macro::impl_visit_each!(128);

/// Make a visitor from a closure.
///
/// Since a closure takes one argument type, this only suits sequences whose elements share a type,
/// such as arrays, or tuples of one repeated type.
///
/// # Examples
///
/// ```
/// use hetview::prelude::*;
///
/// let mut total = 0;
/// view(&[1, 2, 3]).for_each(from_fn(|x: &i32| total += x));
/// assert_eq!(total, 6);
/// ```
pub fn from_fn<F>(function: F) -> FromFn<F> {
    FromFn(function)
}

/// A visitor made from a closure by [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(F);

impl<T, R, F: FnMut(T) -> R> Visit<T> for FromFn<F> {
    type Output = R;

    fn visit(&mut self, value: T) -> R {
        (self.0)(value)
    }
}

/// The output of one visit during a whole-view traversal, which either lets the traversal go on
/// or stops it with an error.
///
/// Implemented for `()`, for `Result<(), E>`, and for the uninhabited output of an empty view.
/// [`TupleView::try_for_each`](crate::TupleView::try_for_each) stops at the first error and
/// returns it; [`TupleView::for_each`](crate::TupleView::for_each) only accepts outputs which
/// cannot fail.
pub trait Flow {
    /// The error which stops a traversal.
    type Error;

    /// Whether to go on, or the error to stop with.
    fn into_result(self) -> Result<(), Self::Error>;
}

impl Flow for () {
    type Error = Infallible;

    fn into_result(self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl<E> Flow for Result<(), E> {
    type Error = E;

    fn into_result(self) -> Result<(), E> {
        self
    }
}

impl Flow for Infallible {
    type Error = Infallible;

    fn into_result(self) -> Result<(), Infallible> {
        match self {}
    }
}
