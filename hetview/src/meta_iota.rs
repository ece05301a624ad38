//! The index-dispatch sequence: a lazily generated, random-access sequence of the positions
//! `0..N`, where each element is a [`Token`] able to call a visitor with the position as a
//! compile-time constant.
//!
//! A `usize` read at run time cannot be used as a const generic argument. A token bridges the gap:
//! [`Token::invoke`] matches on its position and calls the visitor with the corresponding
//! [`Index<I>`](crate::visit::Index), so the visitor can use `I` in types.
//!
//! ```
//! use hetview::prelude::*;
//!
//! // Looks up the element at a compile-time position.
//! struct Nth<'a>(&'a (u8, &'static str, char));
//!
//! impl<'a, const I: usize> Visit<Index<I>> for Nth<'a>
//! where
//!     (u8, &'static str, char): Get<I>,
//!     Element<(u8, &'static str, char), I>: ToString,
//! {
//!     type Output = String;
//!
//!     fn visit(&mut self, _: Index<I>) -> String {
//!         Get::<I>::get(self.0).to_string()
//!     }
//! }
//!
//! let triple = (7, "seven", '7');
//! let rendered: Vec<String> = meta_iota::<3>().iter().map(|token| token.invoke(Nth(&triple))).collect();
//! assert_eq!(rendered, ["7", "seven", "7"]);
//! ```
//!
//! Nothing is stored: a [`MetaIota`] is zero-sized, and cursors and tokens are a single integer of
//! the narrowest type able to count to `N` (see [`Least`]).

use std::cmp::Ordering;
use std::convert::TryFrom;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use derivative::Derivative;
use num_traits::{WrappingAdd, WrappingSub};

use crate::compose::{Func, FuncOnce};
use crate::cursor::{End, RandomAccess, Readable, Sequence};
use crate::error::OutOfBounds;
use crate::least::{Counter, Least};
use crate::unary::{LessThan, Number, ToUnary};
use crate::visit::VisitEach;

/// The largest count for which index-dispatch sequences, and arrays as aggregates, are supported.
pub const MAX_COUNT: usize = 128;

/// Generate the index-dispatch sequence over the positions `0..N`.
///
/// Counts above [`MAX_COUNT`] are rejected at build time:
///
/// ```compile_fail
/// let _ = hetview::meta_iota::meta_iota::<129>();
/// ```
pub fn meta_iota<const N: usize>() -> MetaIota<Number<N>>
where
    Number<N>: Least,
{
    MetaIota::new()
}

/// The sequence of [`Token`]s for the positions `0..N`, where `N` is a type-level
/// [`Number`].
///
/// A `MetaIota` owns nothing and can be traversed any number of times.
#[derive(Derivative)]
#[derivative(
    Debug(bound = ""),
    Clone(bound = ""),
    Copy(bound = ""),
    Default(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = ""),
    Hash(bound = "")
)]
pub struct MetaIota<N: Least> {
    count: PhantomData<fn() -> N>,
}

impl<N: Least> MetaIota<N> {
    /// The sequence of positions `0..N`.
    pub const fn new() -> Self {
        MetaIota { count: PhantomData }
    }

    /// A cursor at the first position.
    pub fn begin(&self) -> Cursor<N> {
        Cursor::at_position(0)
    }

    /// The end sentinel, which compares equal to a cursor exactly when the cursor is at `N`.
    pub fn end(&self) -> End {
        End
    }

    /// The number of positions, `N`.
    pub fn len(&self) -> usize {
        N::VALUE
    }

    /// Whether `N` is zero.
    pub fn is_empty(&self) -> bool {
        N::VALUE == 0
    }

    /// The token at `position`, if `position < N`.
    pub fn get(&self, position: usize) -> Option<Token<N>> {
        Token::new(position).ok()
    }

    /// Iterate over every token in order.
    pub fn iter(&self) -> Iter<N> {
        Iter {
            front: self.begin(),
            back: Cursor::at_position(N::VALUE),
        }
    }
}

impl<N: Least> IntoIterator for MetaIota<N> {
    type Item = Token<N>;
    type IntoIter = Iter<N>;

    fn into_iter(self) -> Iter<N> {
        self.iter()
    }
}

impl<N: Least> Sequence for MetaIota<N> {
    type Cursor = Cursor<N>;

    fn begin(&self) -> Cursor<N> {
        MetaIota::begin(self)
    }

    fn len(&self) -> usize {
        MetaIota::len(self)
    }
}

/// A dispatch token: the position `i` of a sequence over `0..N`.
///
/// A token can only be made for a position strictly less than `N`, so a `Token<Number<0>>` never
/// exists.
///
/// # Examples
///
/// ```
/// use hetview::meta_iota::Token;
/// use hetview::unary::Number;
///
/// let two = Token::<Number<3>>::at::<2>();
/// assert_eq!(two.position(), 2);
/// assert_eq!(Token::<Number<3>>::new(2), Ok(two));
/// assert!(Token::<Number<3>>::new(3).is_err());
/// ```
///
/// A position outside the count is rejected at build time when it is statically known:
///
/// ```compile_fail
/// use hetview::meta_iota::Token;
/// use hetview::unary::Number;
///
/// let three = Token::<Number<3>>::at::<3>();
/// ```
#[derive(Derivative)]
#[derivative(
    Debug(bound = ""),
    Clone(bound = ""),
    Copy(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = ""),
    PartialOrd(bound = ""),
    Ord(bound = ""),
    Hash(bound = "")
)]
pub struct Token<N: Least> {
    position: N::Unsigned,
}

impl<N: Least> Token<N> {
    /// Make the token for the runtime `position`, if `position < N`.
    pub fn new(position: usize) -> Result<Self, OutOfBounds> {
        if position < N::VALUE {
            Ok(Token {
                position: N::Unsigned::wrap_offset(position as isize),
            })
        } else {
            Err(OutOfBounds::new(position, N::VALUE))
        }
    }

    /// Make the token for the compile-time position `I`, which must be strictly less than `N`.
    pub fn at<const I: usize>() -> Self
    where
        N: ToUnary,
        Number<I>: ToUnary,
        <Number<I> as ToUnary>::AsUnary: LessThan<N::AsUnary>,
    {
        Token {
            position: N::Unsigned::wrap_offset(I as isize),
        }
    }

    /// The position of this token.
    pub fn position(self) -> usize {
        self.position.as_position()
    }

    /// Call `visitor` with [`Index<i>`](crate::visit::Index), where `i` is this token's position,
    /// and return its result unchanged.
    #[inline]
    pub fn invoke<V: VisitEach<N>>(self, visitor: V) -> V::Output {
        visitor.visit_at(self.position())
    }
}

impl<N: Least> TryFrom<usize> for Token<N> {
    type Error = OutOfBounds;

    fn try_from(position: usize) -> Result<Self, OutOfBounds> {
        Token::new(position)
    }
}

impl<N: Least> From<Token<N>> for usize {
    fn from(token: Token<N>) -> usize {
        token.position()
    }
}

impl<N: Least> PartialEq<usize> for Token<N> {
    fn eq(&self, other: &usize) -> bool {
        self.position() == *other
    }
}

impl<N: Least, V: VisitEach<N>> FuncOnce<V> for Token<N> {
    type Output = V::Output;
    const INFALLIBLE: bool = V::INFALLIBLE;

    #[inline]
    fn call_once(self, visitor: V) -> V::Output {
        self.invoke(visitor)
    }
}

impl<N: Least, V: VisitEach<N>> Func<V> for Token<N> {
    #[inline]
    fn call(&self, visitor: V) -> V::Output {
        self.invoke(visitor)
    }
}

/// A random-access position in a [`MetaIota`].
///
/// Cursors move freely: arithmetic wraps in the counter type and never fails. Only
/// [`get`](Cursor::get) requires the cursor to be at a position strictly less than `N`.
///
/// # Examples
///
/// ```
/// use hetview::prelude::*;
///
/// let positions = meta_iota::<5>();
/// let mut cursor = positions.begin() + 4;
/// assert_eq!(cursor.get().position(), 4);
/// cursor -= 3;
/// assert_eq!(cursor.at(2).position(), 3);
/// assert_eq!(positions.end() - cursor, 4);
/// assert!(cursor + 4 == positions.end());
/// ```
///
/// Distances are the wrapping difference of the two counters read as a signed integer of the same
/// width, and cursors are ordered by the sign of their distance. A cursor moved before the first
/// position therefore stays before it:
///
/// ```
/// use hetview::prelude::*;
///
/// let positions = meta_iota::<3>();
/// let before = positions.begin() - 1;
/// assert_eq!(before - positions.begin(), -1);
/// assert_eq!(positions.end() - before, 4);
/// assert!(before < positions.begin());
/// ```
#[derive(Derivative)]
#[derivative(
    Debug(bound = ""),
    Clone(bound = ""),
    Copy(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = ""),
    Hash(bound = "")
)]
pub struct Cursor<N: Least> {
    index: N::Unsigned,
}

impl<N: Least> Cursor<N> {
    fn at_position(position: usize) -> Self {
        Cursor {
            index: N::Unsigned::wrap_offset(position as isize),
        }
    }

    /// The position of this cursor.
    pub fn position(&self) -> usize {
        self.index.as_position()
    }

    fn end_index() -> N::Unsigned {
        N::Unsigned::wrap_offset(N::VALUE as isize)
    }

    /// The token at this cursor.
    ///
    /// # Panics
    ///
    /// If the cursor is not at a position strictly less than `N`.
    #[track_caller]
    pub fn get(&self) -> Token<N> {
        assert!(
            self.position() < N::VALUE,
            "cursor at position {} dereferenced outside a count of {}",
            self.position(),
            N::VALUE,
        );
        Token {
            position: self.index,
        }
    }

    /// The token `offset` positions away from this cursor.
    ///
    /// # Panics
    ///
    /// If the resulting position is not strictly less than `N`.
    #[track_caller]
    pub fn at(&self, offset: isize) -> Token<N> {
        (*self + offset).get()
    }
}

impl<N: Least> AddAssign<isize> for Cursor<N> {
    fn add_assign(&mut self, offset: isize) {
        self.index = WrappingAdd::wrapping_add(&self.index, &N::Unsigned::wrap_offset(offset));
    }
}

impl<N: Least> SubAssign<isize> for Cursor<N> {
    fn sub_assign(&mut self, offset: isize) {
        self.index = WrappingSub::wrapping_sub(&self.index, &N::Unsigned::wrap_offset(offset));
    }
}

impl<N: Least> Add<isize> for Cursor<N> {
    type Output = Cursor<N>;

    fn add(mut self, offset: isize) -> Cursor<N> {
        self += offset;
        self
    }
}

impl<N: Least> Add<Cursor<N>> for isize {
    type Output = Cursor<N>;

    fn add(self, cursor: Cursor<N>) -> Cursor<N> {
        cursor + self
    }
}

impl<N: Least> Sub<isize> for Cursor<N> {
    type Output = Cursor<N>;

    fn sub(mut self, offset: isize) -> Cursor<N> {
        self -= offset;
        self
    }
}

impl<N: Least> Sub for Cursor<N> {
    type Output = isize;

    fn sub(self, other: Cursor<N>) -> isize {
        self.index.wrapping_distance(other.index)
    }
}

impl<N: Least> Sub<End> for Cursor<N> {
    type Output = isize;

    fn sub(self, _: End) -> isize {
        self.index.wrapping_distance(Cursor::<N>::end_index())
    }
}

impl<N: Least> Sub<Cursor<N>> for End {
    type Output = isize;

    fn sub(self, cursor: Cursor<N>) -> isize {
        Cursor::<N>::end_index().wrapping_distance(cursor.index)
    }
}

impl<N: Least> PartialOrd for Cursor<N> {
    fn partial_cmp(&self, other: &Cursor<N>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// A total order only among cursors whose distance fits the signed counter, which includes every
// cursor in `0..=N`.
impl<N: Least> Ord for Cursor<N> {
    fn cmp(&self, other: &Cursor<N>) -> Ordering {
        (*self - *other).cmp(&0)
    }
}

impl<N: Least> PartialEq<End> for Cursor<N> {
    fn eq(&self, _: &End) -> bool {
        self.position() == N::VALUE
    }
}

impl<N: Least> PartialEq<Cursor<N>> for End {
    fn eq(&self, cursor: &Cursor<N>) -> bool {
        cursor == self
    }
}

impl<N: Least> PartialOrd<End> for Cursor<N> {
    fn partial_cmp(&self, end: &End) -> Option<Ordering> {
        Some((*self - *end).cmp(&0))
    }
}

impl<N: Least> RandomAccess for Cursor<N> {
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

impl<N: Least> Readable for Cursor<N> {
    type Item = Token<N>;

    fn read(&self) -> Token<N> {
        self.get()
    }
}

/// An iterator over the tokens of a [`MetaIota`].
#[derive(Derivative)]
#[derivative(Debug(bound = ""), Clone(bound = ""))]
pub struct Iter<N: Least> {
    front: Cursor<N>,
    back: Cursor<N>,
}

impl<N: Least> Iterator for Iter<N> {
    type Item = Token<N>;

    fn next(&mut self) -> Option<Token<N>> {
        if self.front == self.back {
            return None;
        }
        let token = self.front.get();
        self.front += 1;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = (self.back - self.front) as usize;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Token<N>> {
        if n >= self.len() {
            self.front = self.back;
            return None;
        }
        self.front += n as isize;
        self.next()
    }
}

impl<N: Least> DoubleEndedIterator for Iter<N> {
    fn next_back(&mut self) -> Option<Token<N>> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.back.get())
    }
}

impl<N: Least> ExactSizeIterator for Iter<N> {}

impl<N: Least> FusedIterator for Iter<N> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visit::{Index, Visit};

    struct Position;

    impl<const I: usize> Visit<Index<I>> for Position {
        type Output = usize;

        fn visit(&mut self, _: Index<I>) -> usize {
            I
        }
    }

    struct Fails;

    impl<const I: usize> Visit<Index<I>> for Fails {
        type Output = Result<(), String>;

        fn visit(&mut self, _: Index<I>) -> Result<(), String> {
            if I == 1 {
                Err(format!("rejected {}", I))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn empty_sequence() {
        let empty = meta_iota::<0>();
        assert!(empty.begin() == empty.end());
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
        assert_eq!(empty.iter().count(), 0);
        assert_eq!(empty.get(0), None);
    }

    #[test]
    fn tokens_dispatch_to_their_position() {
        let positions: Vec<usize> = meta_iota::<4>().iter().map(|t| t.invoke(Position)).collect();
        assert_eq!(positions, [0, 1, 2, 3]);
        let backwards: Vec<usize> = meta_iota::<4>().iter().rev().map(|t| t.call(Position)).collect();
        assert_eq!(backwards, [3, 2, 1, 0]);
    }

    #[test]
    fn visitor_results_pass_through_unchanged() {
        let results: Vec<_> = meta_iota::<3>().into_iter().map(|t| t.invoke(Fails)).collect();
        assert_eq!(results, [Ok(()), Err("rejected 1".to_string()), Ok(())]);
    }

    #[test]
    fn cursor_arithmetic() {
        let seq = meta_iota::<4>();
        let begin = seq.begin();
        assert_eq!(seq.end() - begin, 4);
        assert_eq!(begin - seq.end(), -4);
        assert_eq!((begin + 3) - begin, 3);
        assert_eq!(begin - (begin + 3), -3);
        assert_eq!(2_isize + begin, begin + 2);
        assert!(begin < begin + 1);
        assert!(begin + 1 > begin);
        assert!(begin + 4 == seq.end());
        assert!(begin + 3 != seq.end());
        assert_eq!((begin + 3 - 1).get().position(), 2);
        assert_eq!(begin.at(3), Token::at::<3>());
    }

    #[test]
    fn counters_wrap_but_stay_reversible() {
        let seq = meta_iota::<3>();
        let before = seq.begin() - 1;
        assert_eq!((before + 1).get().position(), 0);
        assert_eq!(before - seq.begin(), -1);
        assert_eq!(seq.begin() - before, 1);
        assert_eq!(seq.end() - before, 4);
        assert_eq!(before - seq.end(), -4);
        assert!(before < seq.begin());
        assert!(before < seq.end());
        assert_eq!(before.partial_cmp(&End), Some(Ordering::Less));
        assert_eq!(before.distance_to_end(), 4);

        let past = seq.begin() + 5;
        assert_eq!(past - seq.end(), 2);
        assert!(past > seq.begin() + 2);
    }

    #[test]
    #[should_panic(expected = "dereferenced outside a count of 3")]
    fn dereferencing_the_end_panics() {
        let seq = meta_iota::<3>();
        let _ = (seq.begin() + 3).get();
    }

    #[test]
    fn largest_count() {
        let seq = meta_iota::<MAX_COUNT>();
        assert_eq!(seq.iter().len(), MAX_COUNT);
        assert_eq!(seq.iter().last().map(|t| t.invoke(Position)), Some(MAX_COUNT - 1));
        assert_eq!(seq.iter().nth(100).map(Token::position), Some(100));
        assert_eq!(std::mem::size_of::<Cursor<Number<MAX_COUNT>>>(), 2);
        assert_eq!(std::mem::size_of::<Cursor<Number<127>>>(), 1);
        assert_eq!(std::mem::size_of::<MetaIota<Number<MAX_COUNT>>>(), 0);
    }

    #[test]
    fn restartable() {
        let seq = meta_iota::<2>();
        let first: Vec<usize> = seq.iter().map(usize::from).collect();
        let second: Vec<usize> = seq.iter().map(usize::from).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn runtime_tokens() {
        assert_eq!(Token::<Number<2>>::try_from(1).map(Token::position), Ok(1));
        let err = Token::<Number<2>>::try_from(2).unwrap_err();
        assert_eq!((err.position(), err.bound()), (2, 2));
        assert!(Token::<Number<2>>::at::<1>() == 1_usize);
    }
}
