//! Random-access views over heterogeneous aggregates.
//!
//! A [`TupleView`] presents a tuple (or any [`TupleLike`] aggregate) as a sequence whose elements
//! are [`Accessor`]s. An accessor does not hold an element: it is the composition of a dispatch
//! [`Token`] with a binding to the view's storage, and only when it is applied to a visitor is the
//! element at its position extracted and handed over.
//!
//! ```
//! use hetview::prelude::*;
//! use std::fmt::Display;
//!
//! struct Stringify;
//!
//! impl<T: Display> Visit<&T> for Stringify {
//!     type Output = String;
//!
//!     fn visit(&mut self, value: &T) -> String {
//!         value.to_string()
//!     }
//! }
//!
//! let record = (1, "two", 3.5);
//! let fields = view(&record);
//! assert_eq!(fields.len(), 3);
//!
//! let strings: Vec<String> = fields.iter().map(|field| field.apply(Stringify)).collect();
//! assert_eq!(strings, ["1", "two", "3.5"]);
//!
//! // Cursors are random access.
//! let last = fields.begin() + 2;
//! assert_eq!(last.get().apply(Stringify), "3.5");
//! assert_eq!(fields.end() - fields.begin(), 3);
//! ```
//!
//! Elements are read by shared reference through [`view`], by unique reference through
//! [`view_mut`] and a [`CursorMut`], and by value from a view that owns its aggregate, through
//! [`TupleView::into_accessor`]. A view made by [`view_owned`] or [`view_owned_in_place`] owns its
//! aggregate; see [`storage`](crate::storage) for how the two differ when reassigned.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr;

use call_by::{By, Convention, Mut, Ref, Val};
use derivative::Derivative;

use crate::compose::{compose, Compose, Func, FuncOnce};
use crate::cursor::{End, RandomAccess, Readable, Sequence};
use crate::error::{OutOfBounds, Vacant};
use crate::meta_iota::{self, MetaIota, Token};
use crate::storage::{
    Borrowed, BorrowedMut, InPlace, Owned, Rebuild, Storage, StorageMut, StorageOwned, Strategy,
};
use crate::tuple::{Extract, Member, TupleLike};
use crate::visit::{Flow, Index, VisitEach, VisitOnce};

/// The type-level length of the aggregate stored in `S`.
pub type Length<S> = <<S as Storage>::Aggregate as TupleLike>::Length;

/// View `aggregate` through a shared reference.
pub fn view<A: TupleLike>(aggregate: &A) -> TupleView<Borrowed<'_, A>> {
    TupleView::new(Borrowed::new(aggregate))
}

/// View `aggregate` through a unique reference, allowing its elements to be modified.
///
/// ```
/// use hetview::prelude::*;
/// use std::ops::AddAssign;
///
/// struct Increment;
///
/// impl<'e, T: AddAssign + From<u8>> Visit<&'e mut T> for Increment {
///     type Output = ();
///     fn visit(&mut self, value: &'e mut T) {
///         *value += T::from(1);
///     }
/// }
///
/// let mut counters = (1_u8, 10_u32, 100_u64);
/// view_mut(&mut counters).for_each_mut(Increment);
/// assert_eq!(counters, (2, 11, 101));
/// ```
pub fn view_mut<A: TupleLike>(aggregate: &mut A) -> TupleView<BorrowedMut<'_, A>> {
    TupleView::new(BorrowedMut::new(aggregate))
}

/// View `aggregate`, taking ownership of it, with the [`Rebuild`] reassignment strategy.
pub fn view_owned<A: TupleLike>(aggregate: A) -> TupleView<Owned<A, Rebuild>> {
    TupleView::new(Owned::new(aggregate))
}

/// View `aggregate`, taking ownership of it, with the [`InPlace`] reassignment strategy.
pub fn view_owned_in_place<A: TupleLike>(aggregate: A) -> TupleView<Owned<A, InPlace>> {
    TupleView::new(Owned::new(aggregate))
}

/// A random-access view over the aggregate held in the storage `S`, reaching elements through the
/// extraction policy `X`.
#[derive(Derivative)]
#[derivative(
    Debug(bound = "S: Debug"),
    Clone(bound = "S: Clone"),
    Copy(bound = "S: Copy")
)]
pub struct TupleView<S, X = Member> {
    storage: S,
    #[derivative(Debug = "ignore")]
    extractor: PhantomData<fn() -> X>,
}

impl<S: Storage, X> TupleView<S, X>
where
    S::Aggregate: TupleLike,
{
    /// View the aggregate in `storage`.
    pub fn new(storage: S) -> Self {
        TupleView {
            storage,
            extractor: PhantomData,
        }
    }

    /// The same view, reaching elements through the extraction policy `Y` instead.
    pub fn with_extractor<Y>(self) -> TupleView<S, Y> {
        TupleView {
            storage: self.storage,
            extractor: PhantomData,
        }
    }

    /// The storage of this view.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give up the view, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        <S::Aggregate as TupleLike>::LENGTH
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The positions of this view, as an index-dispatch sequence.
    pub fn positions(&self) -> MetaIota<Length<S>> {
        MetaIota::new()
    }

    /// A cursor at the first element.
    pub fn begin(&self) -> Cursor<'_, S, X> {
        Cursor {
            storage: &self.storage,
            position: self.positions().begin(),
            extractor: PhantomData,
        }
    }

    /// The end sentinel.
    pub fn end(&self) -> End {
        End
    }

    /// The accessor for the element at `position`, if there is one.
    pub fn get(&self, position: usize) -> Option<Accessor<'_, S, X>> {
        Token::new(position)
            .ok()
            .map(|token| Accessor::new(token, &self.storage))
    }

    /// Iterate over the accessors of every element, in order.
    pub fn iter(&self) -> Iter<'_, S, X> {
        Iter {
            storage: &self.storage,
            positions: self.positions().iter(),
            extractor: PhantomData,
        }
    }

    /// Visit every element, in order, by shared reference.
    ///
    /// The visitor's output must be `()`: a visitor which can fail goes through
    /// [`try_for_each`](TupleView::try_for_each) instead.
    ///
    /// # Panics
    ///
    /// If the storage is vacant and there is at least one element.
    pub fn for_each<'a, V, F>(&'a self, visitor: V)
    where
        for<'v> Caller<&'a S, X, &'v mut V, Ref>: VisitEach<Length<S>, Output = F>,
        F: Flow<Error = Infallible>,
    {
        if let Err(never) = self.try_for_each(visitor) {
            match never {}
        }
    }

    /// Visit every element, in order, by shared reference, stopping at the first error the visitor
    /// returns.
    ///
    /// ```
    /// use hetview::prelude::*;
    ///
    /// struct Positive(Vec<i64>);
    ///
    /// impl<T: Copy + Into<i64>> Visit<&T> for Positive {
    ///     type Output = Result<(), String>;
    ///
    ///     fn visit(&mut self, value: &T) -> Result<(), String> {
    ///         let value = (*value).into();
    ///         if value <= 0 {
    ///             return Err(format!("{} is not positive", value));
    ///         }
    ///         self.0.push(value);
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let mut seen = Positive(Vec::new());
    /// let result = view(&(3_u8, -1_i32, 5_i64)).try_for_each(&mut seen);
    /// assert_eq!(result, Err(String::from("-1 is not positive")));
    /// assert_eq!(seen.0, [3]);
    /// ```
    ///
    /// # Panics
    ///
    /// If the storage is vacant and there is at least one element.
    pub fn try_for_each<'a, V, F>(&'a self, mut visitor: V) -> Result<(), F::Error>
    where
        for<'v> Caller<&'a S, X, &'v mut V, Ref>: VisitEach<Length<S>, Output = F>,
        F: Flow,
    {
        for accessor in self.iter() {
            accessor.apply(&mut visitor).into_result()?;
        }
        Ok(())
    }
}

impl<S: StorageMut, X> TupleView<S, X>
where
    S::Aggregate: TupleLike,
{
    /// A mutable cursor at the first element.
    pub fn begin_mut(&mut self) -> CursorMut<'_, S, X> {
        CursorMut {
            position: self.positions().begin(),
            storage: &mut self.storage,
            extractor: PhantomData,
        }
    }

    /// The mutable accessor for the element at `position`, if there is one.
    pub fn get_mut(&mut self, position: usize) -> Option<AccessorMut<'_, S, X>> {
        match Token::new(position) {
            Ok(token) => Some(AccessorMut {
                token,
                storage: &mut self.storage,
                extractor: PhantomData,
            }),
            Err(_) => None,
        }
    }

    /// Visit every element, in order, by unique reference.
    ///
    /// The visitor's output must be `()`: a visitor which can fail goes through
    /// [`try_for_each_mut`](TupleView::try_for_each_mut) instead.
    ///
    /// # Panics
    ///
    /// If the storage is vacant and there is at least one element.
    pub fn for_each_mut<V, F>(&mut self, visitor: V)
    where
        for<'c, 'v> Caller<&'c mut S, X, &'v mut V, Mut>: VisitEach<Length<S>, Output = F>,
        F: Flow<Error = Infallible>,
    {
        if let Err(never) = self.try_for_each_mut(visitor) {
            match never {}
        }
    }

    /// Visit every element, in order, by unique reference, stopping at the first error the visitor
    /// returns. Elements after the failing one are left untouched.
    ///
    /// # Panics
    ///
    /// If the storage is vacant and there is at least one element.
    pub fn try_for_each_mut<V, F>(&mut self, mut visitor: V) -> Result<(), F::Error>
    where
        for<'c, 'v> Caller<&'c mut S, X, &'v mut V, Mut>: VisitEach<Length<S>, Output = F>,
        F: Flow,
    {
        let mut cursor = self.begin_mut();
        while cursor != End {
            cursor.get().apply(&mut visitor).into_result()?;
            cursor += 1;
        }
        Ok(())
    }
}

impl<S: StorageOwned, X> TupleView<S, X>
where
    S::Aggregate: TupleLike,
{
    /// Give up the view for an accessor which moves the element at `position` out of the
    /// aggregate, dropping the rest.
    ///
    /// ```
    /// use hetview::prelude::*;
    ///
    /// struct Keep;
    ///
    /// impl Visit<String> for Keep {
    ///     type Output = Option<String>;
    ///     fn visit(&mut self, value: String) -> Option<String> {
    ///         Some(value)
    ///     }
    /// }
    ///
    /// impl Visit<Vec<u8>> for Keep {
    ///     type Output = Option<String>;
    ///     fn visit(&mut self, _: Vec<u8>) -> Option<String> {
    ///         None
    ///     }
    /// }
    ///
    /// let owned = view_owned((String::from("kept"), vec![1_u8, 2]));
    /// assert_eq!(owned.into_accessor(0).unwrap().apply(Keep), Some(String::from("kept")));
    /// ```
    pub fn into_accessor(self, position: usize) -> Result<IntoAccessor<S, X>, OutOfBounds> {
        let token = Token::new(position)?;
        Ok(IntoAccessor {
            token,
            storage: self.storage,
            extractor: PhantomData,
        })
    }

    /// Give up the view, returning its aggregate, or [`Vacant`] if it was moved out.
    pub fn try_into_inner(self) -> Result<S::Aggregate, Vacant> {
        self.storage.try_into_aggregate()
    }
}

impl<A: TupleLike, P: Strategy<A>, X> TupleView<Owned<A, P>, X> {
    /// Replace the owned aggregate with the result of `rebuild`.
    ///
    /// See [`Owned::rebuild_with`] for what happens if `rebuild` panics.
    pub fn rebuild_with<F: FnOnce() -> A>(&mut self, rebuild: F) {
        self.storage.rebuild_with(rebuild);
    }

    /// Replace the owned aggregate with `aggregate`.
    pub fn replace(&mut self, aggregate: A) {
        self.storage.replace(aggregate);
    }
}

impl<A: TupleLike, X> TupleView<Owned<A, Rebuild>, X> {
    /// Move the aggregate of `source` into this view, leaving `source` vacant.
    ///
    /// ```
    /// use hetview::prelude::*;
    ///
    /// let mut target = view_owned((1, 'a'));
    /// let mut source = view_owned((2, 'b'));
    /// target.assign_from(&mut source);
    /// assert!(source.is_vacant());
    /// assert_eq!(target.try_into_inner(), Ok((2, 'b')));
    /// ```
    pub fn assign_from(&mut self, source: &mut Self) {
        self.storage.assign_from(&mut source.storage);
    }

    /// Whether the aggregate has been moved out.
    pub fn is_vacant(&self) -> bool {
        self.storage.is_vacant()
    }

    /// Move the aggregate out, leaving this view vacant.
    pub fn take(&mut self) -> Option<A> {
        self.storage.take()
    }
}

impl<A: TupleLike + Default, X> TupleView<Owned<A, InPlace>, X> {
    /// Move the aggregate of `source` into this view, leaving `A::default()` in `source`.
    pub fn assign_from(&mut self, source: &mut Self) {
        self.storage.assign_from(&mut source.storage);
    }
}

impl<'a, S: Storage, X> IntoIterator for &'a TupleView<S, X>
where
    S::Aggregate: TupleLike,
{
    type Item = Accessor<'a, S, X>;
    type IntoIter = Iter<'a, S, X>;

    fn into_iter(self) -> Iter<'a, S, X> {
        self.iter()
    }
}

impl<'a, S: Storage, X> Sequence for &'a TupleView<S, X>
where
    S::Aggregate: TupleLike,
{
    type Cursor = Cursor<'a, S, X>;

    fn begin(&self) -> Cursor<'a, S, X> {
        TupleView::begin(*self)
    }

    fn len(&self) -> usize {
        TupleView::len(*self)
    }
}

/// Storage bound to one value category, `C`, waiting for a visitor.
///
/// Calling a `Bind` with a visitor pairs the two into a [`Caller`], which a [`Token`] then
/// dispatches to the right position. Accessors are the composition of the two steps.
pub struct Bind<'a, S, X, C: Convention>
where
    S: By<'a, C>,
{
    storage: <S as By<'a, C>>::Type,
    extractor: PhantomData<fn() -> X>,
}

impl<'a, S, X, C: Convention> Debug for Bind<'a, S, X, C>
where
    S: By<'a, C>,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Bind").finish_non_exhaustive()
    }
}

impl<'a, S, X, C: Convention, V> FuncOnce<V> for Bind<'a, S, X, C>
where
    S: By<'a, C>,
{
    type Output = Caller<<S as By<'a, C>>::Type, X, V, C>;
    const INFALLIBLE: bool = true;

    #[inline]
    fn call_once(self, visitor: V) -> Self::Output {
        Caller {
            storage: self.storage,
            visitor,
            marker: PhantomData,
        }
    }
}

impl<'a, S: 'a, X, V> Func<V> for Bind<'a, S, X, Ref> {
    #[inline]
    fn call(&self, visitor: V) -> Self::Output {
        Caller {
            storage: self.storage,
            visitor,
            marker: PhantomData,
        }
    }
}

/// A visitor paired with a storage handle `H`, ready to visit the element at any position.
///
/// The handle is `&S`, `&mut S`, or `S` itself, according to the value category `C`, and the
/// element is passed to the visitor as `&E`, `&mut E`, or `E` respectively.
pub struct Caller<H, X, V, C> {
    storage: H,
    visitor: V,
    marker: PhantomData<fn() -> (X, C)>,
}

impl<H, X, V: Debug, C> Debug for Caller<H, X, V, C> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Caller")
            .field("visitor", &self.visitor)
            .finish_non_exhaustive()
    }
}

impl<'a, S, X, V, const I: usize> VisitOnce<Index<I>> for Caller<&'a S, X, V, Ref>
where
    S: Storage,
    X: Extract<S::Aggregate, I> + 'a,
    V: VisitOnce<&'a <X as Extract<S::Aggregate, I>>::Element>,
{
    type Output = V::Output;
    const INFALLIBLE: bool = V::INFALLIBLE;

    #[inline]
    fn visit_once(self, _: Index<I>) -> V::Output {
        self.visitor.visit_once(X::extract(self.storage.aggregate()))
    }
}

impl<'a, S, X, V, const I: usize> VisitOnce<Index<I>> for Caller<&'a mut S, X, V, Mut>
where
    S: StorageMut,
    X: Extract<S::Aggregate, I> + 'a,
    V: VisitOnce<&'a mut <X as Extract<S::Aggregate, I>>::Element>,
{
    type Output = V::Output;
    const INFALLIBLE: bool = V::INFALLIBLE;

    #[inline]
    fn visit_once(self, _: Index<I>) -> V::Output {
        let storage: &'a mut S = self.storage;
        self.visitor.visit_once(X::extract_mut(storage.aggregate_mut()))
    }
}

impl<S, X, V, const I: usize> VisitOnce<Index<I>> for Caller<S, X, V, Val>
where
    S: StorageOwned,
    X: Extract<S::Aggregate, I>,
    V: VisitOnce<<X as Extract<S::Aggregate, I>>::Element>,
{
    type Output = V::Output;
    const INFALLIBLE: bool = V::INFALLIBLE;

    #[inline]
    fn visit_once(self, _: Index<I>) -> V::Output {
        let storage: S = self.storage;
        self.visitor
            .visit_once(X::extract_owned(storage.into_aggregate()))
    }
}

/// The element at one position of a view, read by shared reference when applied to a visitor.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct Accessor<'a, S: Storage, X>
where
    S::Aggregate: TupleLike,
{
    token: Token<Length<S>>,
    #[derivative(Debug = "ignore")]
    storage: &'a S,
    #[derivative(Debug = "ignore")]
    extractor: PhantomData<fn() -> X>,
}

impl<'a, S: Storage, X> Accessor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn new(token: Token<Length<S>>, storage: &'a S) -> Self {
        Accessor {
            token,
            storage,
            extractor: PhantomData,
        }
    }

    /// The dispatch token composed with the storage binding.
    fn dispatcher(self) -> Compose<Token<Length<S>>, Bind<'a, S, X, Ref>> {
        let bind: Bind<'a, S, X, Ref> = Bind {
            storage: self.storage,
            extractor: PhantomData,
        };
        compose(self.token, bind)
    }

    /// The position of the element.
    pub fn position(&self) -> usize {
        self.token.position()
    }

    /// The dispatch token of the element's position.
    pub fn token(&self) -> Token<Length<S>> {
        self.token
    }

    /// Pass the element to `visitor`, returning its result.
    ///
    /// # Panics
    ///
    /// If the view's storage is vacant.
    #[inline]
    pub fn apply<V>(self, visitor: V) -> <Self as FuncOnce<V>>::Output
    where
        Self: FuncOnce<V>,
    {
        self.call_once(visitor)
    }

    /// Pass the element to `visitor`, or fail without calling it if the view's storage is vacant.
    pub fn try_apply<V>(self, visitor: V) -> Result<<Self as FuncOnce<V>>::Output, Vacant>
    where
        Self: FuncOnce<V>,
    {
        let _ = self.storage.try_aggregate()?;
        Ok(self.call_once(visitor))
    }
}

impl<'a, S: Storage, X, V> FuncOnce<V> for Accessor<'a, S, X>
where
    S::Aggregate: TupleLike,
    Caller<&'a S, X, V, Ref>: VisitEach<Length<S>>,
{
    type Output = <Caller<&'a S, X, V, Ref> as VisitEach<Length<S>>>::Output;
    const INFALLIBLE: bool = <Caller<&'a S, X, V, Ref> as VisitEach<Length<S>>>::INFALLIBLE;

    #[inline]
    fn call_once(self, visitor: V) -> Self::Output {
        self.dispatcher().call_once(visitor)
    }
}

impl<'a, S: Storage, X, V> Func<V> for Accessor<'a, S, X>
where
    S::Aggregate: TupleLike,
    Caller<&'a S, X, V, Ref>: VisitEach<Length<S>>,
{
    #[inline]
    fn call(&self, visitor: V) -> Self::Output {
        self.dispatcher().call(visitor)
    }
}

/// The element at one position of a view, read by unique reference when applied to a visitor.
///
/// Borrows the [`CursorMut`] or view it came from, so only one exists at a time.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct AccessorMut<'a, S: Storage, X>
where
    S::Aggregate: TupleLike,
{
    token: Token<Length<S>>,
    #[derivative(Debug = "ignore")]
    storage: &'a mut S,
    #[derivative(Debug = "ignore")]
    extractor: PhantomData<fn() -> X>,
}

impl<'a, S: StorageMut, X> AccessorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn dispatcher(self) -> Compose<Token<Length<S>>, Bind<'a, S, X, Mut>> {
        let bind: Bind<'a, S, X, Mut> = Bind {
            storage: self.storage,
            extractor: PhantomData,
        };
        compose(self.token, bind)
    }

    /// The position of the element.
    pub fn position(&self) -> usize {
        self.token.position()
    }

    /// Pass the element to `visitor` by unique reference, returning its result.
    ///
    /// # Panics
    ///
    /// If the view's storage is vacant.
    #[inline]
    pub fn apply<V>(self, visitor: V) -> <Self as FuncOnce<V>>::Output
    where
        Self: FuncOnce<V>,
    {
        self.call_once(visitor)
    }

    /// Pass the element to `visitor`, or fail without calling it if the view's storage is vacant.
    pub fn try_apply<V>(self, visitor: V) -> Result<<Self as FuncOnce<V>>::Output, Vacant>
    where
        Self: FuncOnce<V>,
    {
        let _ = self.storage.try_aggregate()?;
        Ok(self.call_once(visitor))
    }
}

impl<'a, S: StorageMut, X, V> FuncOnce<V> for AccessorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
    Caller<&'a mut S, X, V, Mut>: VisitEach<Length<S>>,
{
    type Output = <Caller<&'a mut S, X, V, Mut> as VisitEach<Length<S>>>::Output;
    const INFALLIBLE: bool = <Caller<&'a mut S, X, V, Mut> as VisitEach<Length<S>>>::INFALLIBLE;

    #[inline]
    fn call_once(self, visitor: V) -> Self::Output {
        self.dispatcher().call_once(visitor)
    }
}

/// The element at one position of an owned view, moved out of the aggregate when applied to a
/// visitor. Made by [`TupleView::into_accessor`].
#[derive(Derivative)]
#[derivative(Debug(bound = "S: Debug"))]
pub struct IntoAccessor<S: Storage, X>
where
    S::Aggregate: TupleLike,
{
    token: Token<Length<S>>,
    storage: S,
    #[derivative(Debug = "ignore")]
    extractor: PhantomData<fn() -> X>,
}

impl<S: StorageOwned, X> IntoAccessor<S, X>
where
    S::Aggregate: TupleLike,
{
    fn dispatcher(self) -> Compose<Token<Length<S>>, Bind<'static, S, X, Val>> {
        let bind: Bind<'static, S, X, Val> = Bind {
            storage: self.storage,
            extractor: PhantomData,
        };
        compose(self.token, bind)
    }

    /// The position of the element.
    pub fn position(&self) -> usize {
        self.token.position()
    }

    /// Pass the element to `visitor` by value, returning its result.
    ///
    /// # Panics
    ///
    /// If the view's storage is vacant.
    #[inline]
    pub fn apply<V>(self, visitor: V) -> <Self as FuncOnce<V>>::Output
    where
        Self: FuncOnce<V>,
    {
        self.call_once(visitor)
    }

    /// Pass the element to `visitor`, or fail without calling it if the view's storage is vacant.
    pub fn try_apply<V>(self, visitor: V) -> Result<<Self as FuncOnce<V>>::Output, Vacant>
    where
        Self: FuncOnce<V>,
    {
        let _ = self.storage.try_aggregate()?;
        Ok(self.call_once(visitor))
    }
}

impl<S: StorageOwned, X, V> FuncOnce<V> for IntoAccessor<S, X>
where
    S::Aggregate: TupleLike,
    Caller<S, X, V, Val>: VisitEach<Length<S>>,
{
    type Output = <Caller<S, X, V, Val> as VisitEach<Length<S>>>::Output;
    const INFALLIBLE: bool = <Caller<S, X, V, Val> as VisitEach<Length<S>>>::INFALLIBLE;

    #[inline]
    fn call_once(self, visitor: V) -> Self::Output {
        self.dispatcher().call_once(visitor)
    }
}

/// A random-access cursor over a view, yielding [`Accessor`]s.
///
/// Two cursors are equal when they point into the same storage at the same position. Cursors
/// into different storages are unordered.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct Cursor<'a, S: Storage, X>
where
    S::Aggregate: TupleLike,
{
    #[derivative(Debug = "ignore")]
    storage: &'a S,
    position: meta_iota::Cursor<Length<S>>,
    #[derivative(Debug = "ignore")]
    extractor: PhantomData<fn() -> X>,
}

impl<'a, S: Storage, X> Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    /// The position of this cursor.
    pub fn position(&self) -> usize {
        self.position.position()
    }

    /// The accessor for the element at this cursor.
    ///
    /// # Panics
    ///
    /// If the cursor is not at an element.
    #[track_caller]
    pub fn get(&self) -> Accessor<'a, S, X> {
        Accessor::new(self.position.get(), self.storage)
    }

    /// The accessor for the element `offset` positions away.
    ///
    /// # Panics
    ///
    /// If the resulting position is not at an element.
    #[track_caller]
    pub fn at(&self, offset: isize) -> Accessor<'a, S, X> {
        (*self + offset).get()
    }

    fn same_storage(&self, other: &Self) -> bool {
        ptr::eq(self.storage, other.storage)
    }
}

impl<'a, S: Storage, X> AddAssign<isize> for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn add_assign(&mut self, offset: isize) {
        self.position += offset;
    }
}

impl<'a, S: Storage, X> SubAssign<isize> for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn sub_assign(&mut self, offset: isize) {
        self.position -= offset;
    }
}

impl<'a, S: Storage, X> Add<isize> for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Output = Self;

    fn add(mut self, offset: isize) -> Self {
        self += offset;
        self
    }
}

impl<'a, S: Storage, X> Add<Cursor<'a, S, X>> for isize
where
    S::Aggregate: TupleLike,
{
    type Output = Cursor<'a, S, X>;

    fn add(self, cursor: Cursor<'a, S, X>) -> Cursor<'a, S, X> {
        cursor + self
    }
}

impl<'a, S: Storage, X> Sub<isize> for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Output = Self;

    fn sub(mut self, offset: isize) -> Self {
        self -= offset;
        self
    }
}

impl<'a, S: Storage, X> Sub for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        debug_assert!(
            self.same_storage(&other),
            "distance between cursors into different storages"
        );
        self.position - other.position
    }
}

impl<'a, S: Storage, X> Sub<End> for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Output = isize;

    fn sub(self, end: End) -> isize {
        self.position - end
    }
}

impl<'a, S: Storage, X> Sub<Cursor<'a, S, X>> for End
where
    S::Aggregate: TupleLike,
{
    type Output = isize;

    fn sub(self, cursor: Cursor<'a, S, X>) -> isize {
        self - cursor.position
    }
}

impl<'a, S: Storage, X> PartialEq for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn eq(&self, other: &Self) -> bool {
        self.same_storage(other) && self.position == other.position
    }
}

impl<'a, S: Storage, X> Eq for Cursor<'a, S, X> where S::Aggregate: TupleLike {}

impl<'a, S: Storage, X> PartialOrd for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_storage(other) {
            self.position.partial_cmp(&other.position)
        } else {
            None
        }
    }
}

impl<'a, S: Storage, X> PartialEq<End> for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn eq(&self, end: &End) -> bool {
        self.position == *end
    }
}

impl<'a, S: Storage, X> PartialEq<Cursor<'a, S, X>> for End
where
    S::Aggregate: TupleLike,
{
    fn eq(&self, cursor: &Cursor<'a, S, X>) -> bool {
        cursor == self
    }
}

impl<'a, S: Storage, X> RandomAccess for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn advance(&mut self, offset: isize) {
        *self += offset;
    }

    fn distance_to(&self, other: &Self) -> isize {
        *other - *self
    }

    fn distance_to_end(&self) -> isize {
        End - *self
    }
}

impl<'a, S: Storage, X> Readable for Cursor<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Item = Accessor<'a, S, X>;

    fn read(&self) -> Accessor<'a, S, X> {
        self.get()
    }
}

/// A random-access cursor over a view, yielding [`AccessorMut`]s.
///
/// Holds the view's storage uniquely, so unlike [`Cursor`] it cannot be copied.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct CursorMut<'a, S: Storage, X>
where
    S::Aggregate: TupleLike,
{
    #[derivative(Debug = "ignore")]
    storage: &'a mut S,
    position: meta_iota::Cursor<Length<S>>,
    #[derivative(Debug = "ignore")]
    extractor: PhantomData<fn() -> X>,
}

impl<'a, S: StorageMut, X> CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    /// The position of this cursor.
    pub fn position(&self) -> usize {
        self.position.position()
    }

    /// The accessor for the element at this cursor, borrowing the cursor.
    ///
    /// # Panics
    ///
    /// If the cursor is not at an element.
    #[track_caller]
    pub fn get(&mut self) -> AccessorMut<'_, S, X> {
        AccessorMut {
            token: self.position.get(),
            storage: &mut *self.storage,
            extractor: PhantomData,
        }
    }

    /// The accessor for the element `offset` positions away, borrowing the cursor.
    ///
    /// # Panics
    ///
    /// If the resulting position is not at an element.
    #[track_caller]
    pub fn at(&mut self, offset: isize) -> AccessorMut<'_, S, X> {
        AccessorMut {
            token: self.position.at(offset),
            storage: &mut *self.storage,
            extractor: PhantomData,
        }
    }
}

impl<'a, S: Storage, X> AddAssign<isize> for CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn add_assign(&mut self, offset: isize) {
        self.position += offset;
    }
}

impl<'a, S: Storage, X> SubAssign<isize> for CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn sub_assign(&mut self, offset: isize) {
        self.position -= offset;
    }
}

impl<'a, S: Storage, X> Add<isize> for CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Output = Self;

    fn add(mut self, offset: isize) -> Self {
        self += offset;
        self
    }
}

impl<'a, S: Storage, X> Sub<isize> for CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Output = Self;

    fn sub(mut self, offset: isize) -> Self {
        self -= offset;
        self
    }
}

impl<'a, S: Storage, X> Sub<End> for &CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Output = isize;

    fn sub(self, end: End) -> isize {
        self.position - end
    }
}

impl<'a, S: Storage, X> Sub<&CursorMut<'a, S, X>> for End
where
    S::Aggregate: TupleLike,
{
    type Output = isize;

    fn sub(self, cursor: &CursorMut<'a, S, X>) -> isize {
        self - cursor.position
    }
}

impl<'a, S: Storage, X> PartialEq for CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(&*self.storage, &*other.storage) && self.position == other.position
    }
}

impl<'a, S: Storage, X> PartialEq<End> for CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn eq(&self, end: &End) -> bool {
        self.position == *end
    }
}

impl<'a, S: Storage, X> RandomAccess for CursorMut<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn advance(&mut self, offset: isize) {
        *self += offset;
    }

    fn distance_to(&self, other: &Self) -> isize {
        other.position - self.position
    }

    fn distance_to_end(&self) -> isize {
        End - self.position
    }
}

/// An iterator over the [`Accessor`]s of a view.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct Iter<'a, S: Storage, X>
where
    S::Aggregate: TupleLike,
{
    #[derivative(Debug = "ignore")]
    storage: &'a S,
    positions: meta_iota::Iter<Length<S>>,
    #[derivative(Debug = "ignore")]
    extractor: PhantomData<fn() -> X>,
}

impl<'a, S: Storage, X> Iterator for Iter<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    type Item = Accessor<'a, S, X>;

    fn next(&mut self) -> Option<Accessor<'a, S, X>> {
        let storage = self.storage;
        self.positions
            .next()
            .map(|token| Accessor::new(token, storage))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Accessor<'a, S, X>> {
        let storage = self.storage;
        self.positions
            .nth(n)
            .map(|token| Accessor::new(token, storage))
    }
}

impl<'a, S: Storage, X> DoubleEndedIterator for Iter<'a, S, X>
where
    S::Aggregate: TupleLike,
{
    fn next_back(&mut self) -> Option<Accessor<'a, S, X>> {
        let storage = self.storage;
        self.positions
            .next_back()
            .map(|token| Accessor::new(token, storage))
    }
}

impl<'a, S: Storage, X> ExactSizeIterator for Iter<'a, S, X> where S::Aggregate: TupleLike {}

impl<'a, S: Storage, X> FusedIterator for Iter<'a, S, X> where S::Aggregate: TupleLike {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visit::{from_fn, Visit};
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    assert_impl_all!(Cursor<'static, Borrowed<'static, (u8, char)>, Member>: Copy, RandomAccess);
    assert_not_impl_any!(CursorMut<'static, BorrowedMut<'static, (u8, char)>, Member>: Clone);
    assert_impl_all!(Iter<'static, Borrowed<'static, (u8,)>, Member>: ExactSizeIterator, DoubleEndedIterator);

    struct Show;

    impl<T: ToString> Visit<&T> for Show {
        type Output = String;
        const INFALLIBLE: bool = true;

        fn visit(&mut self, value: &T) -> String {
            value.to_string()
        }
    }

    struct Double;

    impl<'e, T: Clone + std::ops::Add<Output = T>> Visit<&'e mut T> for Double {
        type Output = ();

        fn visit(&mut self, value: &'e mut T) {
            *value = value.clone() + value.clone();
        }
    }

    #[derive(Default)]
    struct Sizes(Vec<usize>);

    impl<T> Visit<&T> for Sizes {
        type Output = ();

        fn visit(&mut self, _: &T) {
            self.0.push(std::mem::size_of::<T>());
        }
    }

    #[test]
    fn cursors_compare_by_storage_and_position() {
        let a = (1_u8, 'a');
        let b = (1_u8, 'a');
        let view_a = view(&a);
        let view_b = view(&b);
        assert!(view_a.begin() == view_a.begin());
        assert!(view_a.begin() != view_b.begin());
        assert_eq!(view_a.begin().partial_cmp(&view_b.begin()), None);
        assert_eq!(
            view_a.begin().partial_cmp(&(view_a.begin() + 1)),
            Some(Ordering::Less)
        );
        assert!(view_a.begin() + 2 == view_a.end());
        assert!(view_a.end() == 2_isize + view_a.begin());
    }

    #[test]
    fn cursor_arithmetic_and_access() {
        let triple = (7_i32, String::from("seven"), 7.5_f32);
        let fields = view(&triple);
        let mut cursor = fields.begin();
        cursor += 2;
        assert_eq!(cursor.get().apply(Show), "7.5");
        cursor -= 1;
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.at(-1).apply(Show), "7");
        assert_eq!(fields.end() - cursor, 2);
        assert_eq!(cursor - fields.end(), -2);
        assert_eq!((cursor - 1) - fields.begin(), 0);
        assert_eq!(crate::cursor::distance(&fields.begin(), &cursor), 1);
    }

    #[test]
    fn accessors_are_lazy_and_reusable() {
        let pair = (3_u16, 'q');
        let fields = view(&pair);
        let first = fields.get(0).map(|a| a.token());
        assert_eq!(first.map(|t| t.position()), Some(0));
        let accessor = fields.begin().get();
        assert_eq!(accessor.call(Show), "3");
        assert_eq!(accessor.call(Show), "3");
        assert!(fields.get(2).is_none());
        assert!(<Accessor<'static, Borrowed<'static, (u16, char)>, Member> as FuncOnce<Show>>::INFALLIBLE);
    }

    #[test]
    fn shared_visitor_state() {
        let mixed = (0_u8, 0_u32, 0_u64, ());
        let mut sizes = Sizes::default();
        view(&mixed).for_each(&mut sizes);
        assert_eq!(sizes.0, [1, 4, 8, 0]);
    }

    struct FailAt {
        position: usize,
        visited: Vec<usize>,
    }

    impl<T> Visit<&T> for FailAt {
        type Output = Result<(), String>;

        fn visit(&mut self, _: &T) -> Result<(), String> {
            let position = self.visited.len();
            self.visited.push(position);
            if position == self.position {
                Err(format!("failed at {}", position))
            } else {
                Ok(())
            }
        }
    }

    struct ClearUntil(usize);

    impl<'e, T: Default> Visit<&'e mut T> for ClearUntil {
        type Output = Result<(), usize>;

        fn visit(&mut self, value: &'e mut T) -> Result<(), usize> {
            if self.0 == 0 {
                return Err(0);
            }
            self.0 -= 1;
            *value = T::default();
            Ok(())
        }
    }

    #[test]
    fn traversal_stops_at_the_first_error() {
        let triple = (1_u8, 'x', 2.0_f32);
        let mut visitor = FailAt {
            position: 0,
            visited: Vec::new(),
        };
        let result = view(&triple).try_for_each(&mut visitor);
        assert_eq!(result, Err(String::from("failed at 0")));
        assert_eq!(visitor.visited, [0]);

        let mut visitor = FailAt {
            position: 3,
            visited: Vec::new(),
        };
        assert_eq!(view(&triple).try_for_each(&mut visitor), Ok(()));
        assert_eq!(visitor.visited, [0, 1, 2]);

        let mut numbers = (1_u8, String::from("kept"), 3_u64);
        let result = view_mut(&mut numbers).try_for_each_mut(ClearUntil(1));
        assert_eq!(result, Err(0));
        assert_eq!(numbers, (0, String::from("kept"), 3));
    }

    #[test]
    fn mutation_through_cursor() {
        let mut pair = (21_i64, 4_u8);
        {
            let mut fields = view_mut(&mut pair);
            let mut cursor = fields.begin_mut();
            cursor.get().apply(Double);
            cursor += 1;
            assert_eq!(cursor.position(), 1);
            cursor.at(0).apply(Double);
            assert_eq!(End - &cursor, 1);
            cursor += 1;
            assert!(cursor == End);
        }
        assert_eq!(pair, (42, 8));

        let mut words = (String::from("ab"), String::from("cd"));
        let mut fields = view_mut(&mut words);
        if let Some(accessor) = fields.get_mut(1) {
            accessor.apply(from_fn(|s: &mut String| s.push('!')));
        }
        assert!(fields.get_mut(2).is_none());
        assert_eq!(words.1, "cd!");
    }

    #[test]
    fn mutation_of_all_elements() {
        let mut numbers = [1, 2, 3];
        view_mut(&mut numbers).for_each_mut(Double);
        assert_eq!(numbers, [2, 4, 6]);

        let mut empty = ();
        view_mut(&mut empty).for_each_mut(Double);
    }

    #[test]
    fn iteration_both_ways() {
        let triple = ('x', 2_u8, "z");
        let fields = view(&triple);
        let forward: Vec<String> = fields.iter().map(|a| a.apply(Show)).collect();
        let backward: Vec<String> = (&fields).into_iter().rev().map(|a| a.apply(Show)).collect();
        assert_eq!(forward, ["x", "2", "z"]);
        assert_eq!(backward, ["z", "2", "x"]);
        assert_eq!(fields.iter().len(), 3);
        assert_eq!(fields.iter().nth(1).map(|a| a.position()), Some(1));
    }

    #[test]
    fn empty_view() {
        let unit = ();
        let fields = view(&unit);
        assert!(fields.is_empty());
        assert!(fields.begin() == fields.end());
        assert_eq!(fields.iter().count(), 0);
        fields.for_each(Show);
    }

    #[test]
    fn owned_views_move_elements_out() {
        let owned = view_owned((String::from("left"), String::from("right")));
        let right = owned
            .into_accessor(1)
            .map(|a| a.apply(from_fn(|s: String| s)));
        assert_eq!(right.as_deref(), Ok("right"));

        let owned = view_owned((1_u8,));
        let err = owned.into_accessor(1).map(|_| ()).unwrap_err();
        assert_eq!(err.bound(), 1);
    }

    #[test]
    fn vacant_views() {
        let mut target = view_owned((1_u8, 2_u8));
        let mut source = view_owned((3_u8, 4_u8));
        target.assign_from(&mut source);
        assert!(source.is_vacant());
        assert_eq!(source.get(0).map(|a| a.try_apply(Show)), Some(Err(Vacant::new())));
        assert_eq!(target.get(1).map(|a| a.apply(Show)).as_deref(), Some("4"));
        assert_eq!(source.try_into_inner(), Err(Vacant::new()));
    }

    #[test]
    #[should_panic(expected = "moved out")]
    fn applying_to_a_vacant_view_panics() {
        let mut vacant = view_owned((1_u8,));
        let _ = vacant.take();
        let _ = vacant.begin().get().apply(Show);
    }

    #[test]
    fn in_place_views() {
        let mut target = view_owned_in_place((1_u8, String::from("a")));
        let mut source = view_owned_in_place((2_u8, String::from("b")));
        target.assign_from(&mut source);
        let shown: Vec<String> = target.iter().map(|a| a.apply(Show)).collect();
        assert_eq!(shown, ["2", "b"]);
        assert_eq!(source.try_into_inner(), Ok((0, String::new())));

        target.replace((9, String::from("z")));
        assert_eq!(target.get(1).map(|a| a.apply(Show)).as_deref(), Some("z"));
    }
}
