//! Function composition, and the callable traits it composes.
//!
//! [`compose(f, g)`](compose()) is the callable `x ↦ f(g(x))`. The [`compose!`](crate::compose!)
//! macro folds any number of callables from the right, so `compose!(f, g, h)` is `x ↦ f(g(h(x)))`
//! and `compose!(f)` is just `f`.
//!
//! ```
//! use hetview::prelude::*;
//!
//! let negate = |x: i32| -x;
//! let square = |x: i32| x * x;
//! assert_eq!(compose!(negate, square).call(3), -9);
//! assert_eq!(compose!(square, negate, |x: i32| x + 1).call(2), 9);
//! ```
//!
//! Links whose types do not line up are rejected at build time:
//!
//! ```compile_fail
//! use hetview::prelude::*;
//!
//! let len = |s: &str| s.len();
//! let negate = |x: i32| -x;
//! let _ = compose!(len, negate).call(3);
//! ```
//!
//! Closures implement [`FuncOnce`] and [`Func`] automatically. The traits exist, rather than the
//! standard `Fn*` family, so that callables defined in this crate can be generic over their
//! argument: a [`Token`](crate::meta_iota::Token) accepts any visitor, and so does every composite
//! containing one.

/// A callable taking an `A`, consumed by the call.
pub trait FuncOnce<A> {
    /// The result of a call.
    type Output;

    /// Whether a call is declared never to fail or panic. Advisory only: nothing in this crate
    /// behaves differently depending on it.
    const INFALLIBLE: bool = false;

    /// Call, consuming the callable.
    fn call_once(self, arg: A) -> Self::Output;
}

/// A callable taking an `A`, callable any number of times.
pub trait Func<A>: FuncOnce<A> {
    /// Call by reference.
    fn call(&self, arg: A) -> Self::Output;
}

impl<A, R, F: FnOnce(A) -> R> FuncOnce<A> for F {
    type Output = R;

    #[inline]
    fn call_once(self, arg: A) -> R {
        self(arg)
    }
}

impl<A, R, F: Fn(A) -> R> Func<A> for F {
    #[inline]
    fn call(&self, arg: A) -> R {
        self(arg)
    }
}

/// The composition of `outer` after `inner`.
///
/// Composing is cheap: it stores both callables and nothing else.
pub fn compose<Outer, Inner>(outer: Outer, inner: Inner) -> Compose<Outer, Inner> {
    Compose { outer, inner }
}

/// Compose any number of callables, right to left.
///
/// `compose!(f)` is `f` itself; `compose!(f, g, ...)` is `compose(f, compose!(g, ...))`.
#[macro_export]
macro_rules! compose {
    ($f:expr $(,)?) => {
        $f
    };
    ($outer:expr, $($rest:expr),+ $(,)?) => {
        $crate::compose::compose($outer, $crate::compose!($($rest),+))
    };
}

/// The callable made by [`compose()`]: calls `Inner`, then `Outer` on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Compose<Outer, Inner> {
    outer: Outer,
    inner: Inner,
}

impl<Outer, Inner> Compose<Outer, Inner> {
    /// The callable applied last.
    pub fn outer(&self) -> &Outer {
        &self.outer
    }

    /// The callable applied first.
    pub fn inner(&self) -> &Inner {
        &self.inner
    }

    /// Take apart the composition.
    pub fn into_parts(self) -> (Outer, Inner) {
        (self.outer, self.inner)
    }
}

impl<A, Outer, Inner> FuncOnce<A> for Compose<Outer, Inner>
where
    Inner: FuncOnce<A>,
    Outer: FuncOnce<Inner::Output>,
{
    type Output = Outer::Output;
    const INFALLIBLE: bool = Inner::INFALLIBLE && <Outer as FuncOnce<Inner::Output>>::INFALLIBLE;

    #[inline]
    fn call_once(self, arg: A) -> Self::Output {
        self.outer.call_once(self.inner.call_once(arg))
    }
}

impl<A, Outer, Inner> Func<A> for Compose<Outer, Inner>
where
    Inner: Func<A>,
    Outer: Func<Inner::Output>,
{
    #[inline]
    fn call(&self, arg: A) -> Self::Output {
        self.outer.call(self.inner.call(arg))
    }
}

/// Declare a closure to never fail or panic.
///
/// The wrapped closure behaves exactly as before; only its
/// [`INFALLIBLE`](FuncOnce::INFALLIBLE) flag changes.
///
/// ```
/// use hetview::prelude::*;
///
/// fn infallible<A, F: FuncOnce<A>>(_: &F) -> bool {
///     F::INFALLIBLE
/// }
///
/// let square = pure(|x: u32| x * x);
/// let checked_half = |x: u32| if x % 2 == 0 { Ok(x / 2) } else { Err(x) };
/// assert!(infallible::<u32, _>(&square));
/// assert!(infallible::<u32, _>(&compose(square, pure(|x: u32| x + 1))));
/// assert!(!infallible::<u32, _>(&compose(|r: Result<u32, u32>| r.is_ok(), checked_half)));
/// ```
pub fn pure<F>(function: F) -> Pure<F> {
    Pure(function)
}

/// A closure declared infallible by [`pure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pure<F>(F);

impl<A, R, F: FnOnce(A) -> R> FuncOnce<A> for Pure<F> {
    type Output = R;
    const INFALLIBLE: bool = true;

    #[inline]
    fn call_once(self, arg: A) -> R {
        (self.0)(arg)
    }
}

impl<A, R, F: Fn(A) -> R> Func<A> for Pure<F> {
    #[inline]
    fn call(&self, arg: A) -> R {
        (self.0)(arg)
    }
}

/// Turn `function` into the callable `v ↦ v(function)`.
///
/// This flips the roles of callable and argument: mapping a projection over tokens or accessors
/// applies the same visitor at every position.
///
/// ```
/// use hetview::prelude::*;
///
/// #[derive(Clone, Copy)]
/// struct Double;
///
/// impl<const I: usize> Visit<Index<I>> for Double {
///     type Output = usize;
///     fn visit(&mut self, _: Index<I>) -> usize {
///         2 * I
///     }
/// }
///
/// let doubled = project(Double);
/// let evens: Vec<usize> = meta_iota::<4>().iter().map(doubled.as_fn()).collect();
/// assert_eq!(evens, [0, 2, 4, 6]);
/// ```
pub fn project<F>(function: F) -> Projection<F> {
    Projection { function }
}

/// The callable made by [`project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Projection<F> {
    function: F,
}

impl<F> Projection<F> {
    /// The projected callable.
    pub fn function(&self) -> &F {
        &self.function
    }

    /// Borrow this projection as a closure over values of one type `V`, for use with iterator
    /// adapters.
    pub fn as_fn<V>(&self) -> impl Fn(V) -> <Self as FuncOnce<V>>::Output + '_
    where
        Self: Func<V>,
    {
        move |value| self.call(value)
    }
}

impl<F, V: FuncOnce<F>> FuncOnce<V> for Projection<F> {
    type Output = V::Output;
    const INFALLIBLE: bool = V::INFALLIBLE;

    #[inline]
    fn call_once(self, value: V) -> V::Output {
        value.call_once(self.function)
    }
}

impl<F: Clone, V: FuncOnce<F>> Func<V> for Projection<F> {
    #[inline]
    fn call(&self, value: V) -> V::Output {
        value.call_once(self.function.clone())
    }
}
