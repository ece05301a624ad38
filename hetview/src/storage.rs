//! Where a view's aggregate lives: borrowed from the caller, or owned by the view.
//!
//! Borrowed storage is a plain reference, so the borrow checker guarantees the aggregate outlives
//! the view. Owned storage holds the aggregate in a slot, managed by one of two strategies which
//! differ in what reassignment does:
//!
//! - [`Rebuild`] keeps an `Option<A>`. The old occupant is dropped and the slot emptied before the
//!   new one is produced, so a panic while producing it leaves the slot empty, never half-built.
//!   Moving out of a `Rebuild` slot leaves it empty too, and reading an empty slot is an error.
//! - [`InPlace`] keeps a bare `A`, dropped and rewritten at the same address. A panic between the
//!   two would leave a dropped value in place, so the process aborts instead.

use std::fmt::{self, Debug, Formatter};
use std::{mem, ptr};

use tracing::trace;

use crate::error::Vacant;

/// Read access to a stored aggregate.
pub trait Storage: sealed::Storage {
    /// The stored aggregate.
    type Aggregate;

    /// Borrow the aggregate, or fail if the storage is vacant.
    fn try_aggregate(&self) -> Result<&Self::Aggregate, Vacant>;

    /// Borrow the aggregate.
    ///
    /// # Panics
    ///
    /// If the storage is vacant.
    #[track_caller]
    fn aggregate(&self) -> &Self::Aggregate {
        match self.try_aggregate() {
            Ok(aggregate) => aggregate,
            Err(vacant) => panic!("{}", vacant),
        }
    }
}

/// Write access to a stored aggregate.
pub trait StorageMut: Storage {
    /// Mutably borrow the aggregate, or fail if the storage is vacant.
    fn try_aggregate_mut(&mut self) -> Result<&mut Self::Aggregate, Vacant>;

    /// Mutably borrow the aggregate.
    ///
    /// # Panics
    ///
    /// If the storage is vacant.
    #[track_caller]
    fn aggregate_mut(&mut self) -> &mut Self::Aggregate {
        match self.try_aggregate_mut() {
            Ok(aggregate) => aggregate,
            Err(vacant) => panic!("{}", vacant),
        }
    }
}

/// Storage which can give up its aggregate by value.
pub trait StorageOwned: StorageMut + Sized {
    /// Move the aggregate out, or fail if the storage is vacant.
    fn try_into_aggregate(self) -> Result<Self::Aggregate, Vacant>;

    /// Move the aggregate out.
    ///
    /// # Panics
    ///
    /// If the storage is vacant.
    #[track_caller]
    fn into_aggregate(self) -> Self::Aggregate {
        match self.try_into_aggregate() {
            Ok(aggregate) => aggregate,
            Err(vacant) => panic!("{}", vacant),
        }
    }
}

/// A shared borrow of an aggregate owned elsewhere.
#[derive(Debug)]
pub struct Borrowed<'a, A> {
    aggregate: &'a A,
}

impl<'a, A> Borrowed<'a, A> {
    /// Borrow `aggregate`.
    pub fn new(aggregate: &'a A) -> Self {
        Borrowed { aggregate }
    }

    /// The borrowed aggregate, for the whole of `'a`.
    pub fn get(&self) -> &'a A {
        self.aggregate
    }
}

impl<'a, A> Clone for Borrowed<'a, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A> Copy for Borrowed<'a, A> {}

impl<'a, A> Storage for Borrowed<'a, A> {
    type Aggregate = A;

    fn try_aggregate(&self) -> Result<&A, Vacant> {
        Ok(self.aggregate)
    }
}

/// A unique borrow of an aggregate owned elsewhere.
#[derive(Debug)]
pub struct BorrowedMut<'a, A> {
    aggregate: &'a mut A,
}

impl<'a, A> BorrowedMut<'a, A> {
    /// Mutably borrow `aggregate`.
    pub fn new(aggregate: &'a mut A) -> Self {
        BorrowedMut { aggregate }
    }
}

impl<'a, A> Storage for BorrowedMut<'a, A> {
    type Aggregate = A;

    fn try_aggregate(&self) -> Result<&A, Vacant> {
        Ok(self.aggregate)
    }
}

impl<'a, A> StorageMut for BorrowedMut<'a, A> {
    fn try_aggregate_mut(&mut self) -> Result<&mut A, Vacant> {
        Ok(self.aggregate)
    }
}

/// The slot management of an [`Owned`] storage.
pub trait Strategy<A>: sealed::Strategy {
    /// What actually holds the aggregate.
    type Slot;

    /// A short name for log output.
    const NAME: &'static str;

    #[doc(hidden)]
    fn fill(aggregate: A) -> Self::Slot;

    #[doc(hidden)]
    fn get(slot: &Self::Slot) -> Result<&A, Vacant>;

    #[doc(hidden)]
    fn get_mut(slot: &mut Self::Slot) -> Result<&mut A, Vacant>;

    #[doc(hidden)]
    fn take(slot: Self::Slot) -> Result<A, Vacant>;

    #[doc(hidden)]
    fn rebuild_with<F: FnOnce() -> A>(slot: &mut Self::Slot, rebuild: F);
}

/// The reconstructible strategy: the slot can be empty, and is emptied before it is refilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Rebuild;

impl<A> Strategy<A> for Rebuild {
    type Slot = Option<A>;
    const NAME: &'static str = "rebuild";

    fn fill(aggregate: A) -> Option<A> {
        Some(aggregate)
    }

    fn get(slot: &Option<A>) -> Result<&A, Vacant> {
        slot.as_ref().ok_or_else(Vacant::new)
    }

    fn get_mut(slot: &mut Option<A>) -> Result<&mut A, Vacant> {
        slot.as_mut().ok_or_else(Vacant::new)
    }

    fn take(slot: Option<A>) -> Result<A, Vacant> {
        slot.ok_or_else(Vacant::new)
    }

    fn rebuild_with<F: FnOnce() -> A>(slot: &mut Option<A>, rebuild: F) {
        *slot = None;
        *slot = Some(rebuild());
    }
}

/// The placement strategy: the slot always holds an aggregate, replaced at the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct InPlace;

/// Aborts the process if dropped, which only happens while unwinding past it.
struct AbortOnUnwind;

impl Drop for AbortOnUnwind {
    fn drop(&mut self) {
        std::process::abort();
    }
}

impl<A> Strategy<A> for InPlace {
    type Slot = A;
    const NAME: &'static str = "in-place";

    fn fill(aggregate: A) -> A {
        aggregate
    }

    fn get(slot: &A) -> Result<&A, Vacant> {
        Ok(slot)
    }

    fn get_mut(slot: &mut A) -> Result<&mut A, Vacant> {
        Ok(slot)
    }

    fn take(slot: A) -> Result<A, Vacant> {
        Ok(slot)
    }

    fn rebuild_with<F: FnOnce() -> A>(slot: &mut A, rebuild: F) {
        let slot: *mut A = slot;
        let guard = AbortOnUnwind;
        // SAFETY: `slot` is valid for reads and writes and holds an initialized `A`. Once it is
        // dropped in place, nothing observes it until it is written again: if either the drop or
        // `rebuild` unwinds, the guard aborts the process before anyone can.
        unsafe {
            ptr::drop_in_place(slot);
            ptr::write(slot, rebuild());
        }
        mem::forget(guard);
    }
}

/// An aggregate owned by the view that reads it.
pub struct Owned<A, P: Strategy<A> = Rebuild> {
    slot: P::Slot,
}

impl<A, P: Strategy<A>> Owned<A, P> {
    /// Take ownership of `aggregate`.
    pub fn new(aggregate: A) -> Self {
        Owned {
            slot: P::fill(aggregate),
        }
    }

    /// Replace the aggregate with the result of `rebuild`.
    ///
    /// The current aggregate is dropped before `rebuild` runs. If `rebuild` panics, a [`Rebuild`]
    /// slot is left empty, and an [`InPlace`] slot aborts the process.
    pub fn rebuild_with<F: FnOnce() -> A>(&mut self, rebuild: F) {
        trace!(strategy = P::NAME, "rebuilding owned aggregate");
        P::rebuild_with(&mut self.slot, rebuild);
    }

    /// Replace the aggregate with `aggregate`.
    pub fn replace(&mut self, aggregate: A) {
        self.rebuild_with(move || aggregate);
    }
}

impl<A> Owned<A, Rebuild> {
    /// Move the aggregate of `source` into `self`, leaving `source` empty.
    ///
    /// If `source` is already empty, `self` becomes empty.
    pub fn assign_from(&mut self, source: &mut Self) {
        match source.slot.take() {
            Some(aggregate) => {
                trace!(strategy = "rebuild", "moving owned aggregate between views");
                self.rebuild_with(move || aggregate);
            }
            None => {
                trace!(strategy = "rebuild", "assigned from a vacant view");
                self.slot = None;
            }
        }
    }

    /// Whether the aggregate has been moved out.
    pub fn is_vacant(&self) -> bool {
        self.slot.is_none()
    }

    /// Move the aggregate out, leaving the storage empty.
    pub fn take(&mut self) -> Option<A> {
        self.slot.take()
    }
}

impl<A: Default> Owned<A, InPlace> {
    /// Move the aggregate of `source` into `self`, leaving `A::default()` in `source`.
    pub fn assign_from(&mut self, source: &mut Self) {
        let aggregate = mem::take(&mut source.slot);
        trace!(strategy = "in-place", "moving owned aggregate between views");
        self.rebuild_with(move || aggregate);
    }
}

impl<A, P: Strategy<A>> Storage for Owned<A, P> {
    type Aggregate = A;

    fn try_aggregate(&self) -> Result<&A, Vacant> {
        P::get(&self.slot)
    }
}

impl<A, P: Strategy<A>> StorageMut for Owned<A, P> {
    fn try_aggregate_mut(&mut self) -> Result<&mut A, Vacant> {
        P::get_mut(&mut self.slot)
    }
}

impl<A, P: Strategy<A>> StorageOwned for Owned<A, P> {
    fn try_into_aggregate(self) -> Result<A, Vacant> {
        P::take(self.slot)
    }
}

impl<A: Clone, P: Strategy<A>> Clone for Owned<A, P>
where
    P::Slot: Clone,
{
    fn clone(&self) -> Self {
        Owned {
            slot: self.slot.clone(),
        }
    }
}

impl<A: Debug, P: Strategy<A>> Debug for Owned<A, P> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut debug = f.debug_struct("Owned");
        match self.try_aggregate() {
            Ok(aggregate) => debug
                .field("aggregate", aggregate)
                .field("strategy", &P::NAME)
                .finish(),
            Err(_) => debug
                .field("aggregate", &format_args!("<vacant>"))
                .field("strategy", &P::NAME)
                .finish(),
        }
    }
}

mod sealed {
    pub trait Storage {}
    impl<'a, A> Storage for super::Borrowed<'a, A> {}
    impl<'a, A> Storage for super::BorrowedMut<'a, A> {}
    impl<A, P: super::Strategy<A>> Storage for super::Owned<A, P> {}

    pub trait Strategy {}
    impl Strategy for super::Rebuild {}
    impl Strategy for super::InPlace {}
}
