//! The random-access surface shared by [`MetaIota`](crate::meta_iota::MetaIota) and
//! [`TupleView`](crate::view::TupleView), and algorithms written once against it.
//!
//! ```
//! use hetview::prelude::*;
//! use hetview::cursor;
//!
//! #[derive(Clone)]
//! struct Width;
//!
//! impl<T: ToString> Visit<&T> for Width {
//!     type Output = usize;
//!     fn visit(&mut self, value: &T) -> usize {
//!         value.to_string().len()
//!     }
//! }
//!
//! let row = (10, "three", 0.5);
//! let widths = cursor::collect_with(&view(&row), project(Width));
//! assert_eq!(widths, [2, 5, 3]);
//! assert_eq!(cursor::len(meta_iota::<6>()), 6);
//! ```

use crate::compose::Func;

/// The past-the-end sentinel.
///
/// Every sequence in this crate ends in the same stateless sentinel: a cursor equals `End` when it
/// is exactly one past its last position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct End;

/// A cursor supporting constant-time movement and distance.
pub trait RandomAccess {
    /// Move by `offset` positions, which may be negative.
    fn advance(&mut self, offset: isize);

    /// The signed number of positions from `self` to `other`.
    fn distance_to(&self, other: &Self) -> isize;

    /// The signed number of positions from `self` to the end.
    fn distance_to_end(&self) -> isize;

    /// Whether `self` is at the end.
    fn is_end(&self) -> bool {
        self.distance_to_end() == 0
    }
}

/// A cursor that can be read without being consumed.
pub trait Readable {
    /// The element at the cursor.
    type Item;

    /// Read the element at the cursor.
    ///
    /// # Panics
    ///
    /// If the cursor is not at a valid position.
    fn read(&self) -> Self::Item;
}

/// A restartable sequence with random-access cursors.
///
/// Sequences are taken by value: [`MetaIota`](crate::meta_iota::MetaIota) is `Copy`, and a view is
/// a sequence through a shared reference to it.
pub trait Sequence {
    /// The cursor of this sequence.
    type Cursor: RandomAccess;

    /// A cursor at the first position.
    fn begin(&self) -> Self::Cursor;

    /// The end sentinel.
    fn end(&self) -> End {
        End
    }

    /// The number of positions.
    fn len(&self) -> usize;

    /// Whether there are no positions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The signed distance from `first` to `last`.
pub fn distance<C: RandomAccess>(first: &C, last: &C) -> isize {
    first.distance_to(last)
}

/// `cursor` moved forward by `offset`.
pub fn next<C: RandomAccess>(mut cursor: C, offset: isize) -> C {
    cursor.advance(offset);
    cursor
}

/// `cursor` moved backward by `offset`.
pub fn prev<C: RandomAccess>(mut cursor: C, offset: isize) -> C {
    cursor.advance(-offset);
    cursor
}

/// The number of positions in `sequence`, measured by walking its cursor to the end.
pub fn len<S: Sequence>(sequence: S) -> usize {
    sequence.begin().distance_to_end() as usize
}

/// Call `function` with every element of `sequence`, in order, collecting the results.
pub fn collect_with<S, F>(sequence: S, function: F) -> Vec<F::Output>
where
    S: Sequence,
    S::Cursor: Readable,
    F: Func<<S::Cursor as Readable>::Item>,
{
    let mut cursor = sequence.begin();
    let mut results = Vec::with_capacity(sequence.len());
    while !cursor.is_end() {
        results.push(function.call(cursor.read()));
        cursor.advance(1);
    }
    results
}
