/*!
![license: MIT](https://img.shields.io/badge/license-MIT-blue)

> **hetview (noun):** A sequence you can walk with an ordinary loop whose elements nonetheless
> all have different types.

A tuple is the most natural way in Rust to hold a fixed number of values of different types, and
the least natural thing to iterate over. This crate provides random-access *views* over tuples
(and anything else [`TupleLike`]), which present the aggregate as a sequence whose elements are
*accessors*: small, `Copy` handles that know a position and a storage, but hold no element.
Applying an accessor to a *visitor* extracts the element at its position and hands it over with
its true static type. Such a view:

- costs **nothing at rest**: building a view, moving its cursors and collecting accessors never
  touches the elements;
- dispatches each runtime position to **statically typed code** through a jump table generated
  once per tuple length;
- reads elements **by shared reference, by unique reference, or by value**, depending on how the
  view holds its aggregate; and
- works with **ordinary iterators**, because every accessor of a view has the same type.

## What now?

- If you are **new to this crate** you might start with the **[tutorial-style tour]**.
- If you just want to **visit every element of a tuple**, look at [`view`](view()) and
  [`TupleView::for_each`].
- If you want to **build your own dispatch**, read about [`meta_iota`](meta_iota()) and
  [`Token`], then about [`compose`](compose()) for chaining callables onto tokens.
- If you want a view to **own its tuple**, read about [`view_owned`], and about the two
  [`storage`] strategies for reassigning an owned view.

<!-- links to self docs -->
[tutorial-style tour]: tutorial

## Quick reference

The **[`prelude`]** module exports everything most programs need; most programs should
`use hetview::prelude::*;`.

| Operation | Type | Notes |
| :-------- | :--- | :---- |
| [`meta_iota::<N>()`](meta_iota()) | [`MetaIota<Number<N>>`](MetaIota) | The positions `0..N`, each as a [`Token`] |
| [`token.invoke(visitor)`](Token::invoke) | `V::Output` | Calls `visitor` with [`Index<i>`](Index) for the token's position `i` |
| [`compose(f, g)`](compose()) / [`compose!(f, g, ...)`](compose!) | [`Compose`](compose::Compose) | `x ↦ f(g(x))`, folded from the right |
| [`project(f)`](project) | [`Projection`](compose::Projection) | `v ↦ v(f)` |
| [`view(&t)`](view()) | [`TupleView<Borrowed<_>>`](TupleView) | Elements read as `&E` |
| [`view_mut(&mut t)`](view_mut) | [`TupleView<BorrowedMut<_>>`](TupleView) | Elements also read as `&mut E` |
| [`view_owned(t)`](view_owned) | [`TupleView<Owned<_, Rebuild>>`](TupleView) | Elements also read as `E`; reassignment may leave a view vacant |
| [`view_owned_in_place(t)`](view_owned_in_place) | [`TupleView<Owned<_, InPlace>>`](TupleView) | Reassignment never leaves a view vacant |
| [`accessor.apply(visitor)`](view::Accessor::apply) | `V::Output` | Calls `visitor` with the element |

*/

#![recursion_limit = "256"]
#![allow(clippy::type_complexity)]
#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
// Documentation configuration
#![forbid(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod compose;
pub mod cursor;
pub mod least;
pub mod meta_iota;
pub mod predicate;
pub mod storage;
pub mod tuple;
pub mod tutorial;
pub mod unary;
pub mod view;
pub mod visit;

mod error;

pub use compose::{compose, project, pure};
pub use error::{OutOfBounds, Vacant};
pub use meta_iota::{meta_iota, MetaIota, Token};
pub use view::{view, view_mut, view_owned, view_owned_in_place, TupleView};

#[allow(unused_imports)] // For documentation linking
use prelude::*;

/// The prelude module for quickly getting started with hetview.
///
/// This module is designed to be imported as `use hetview::prelude::*;`, which brings into scope
/// the constructors, the callable and visitor traits, and the cursor vocabulary.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::compose::{project, pure, Func, FuncOnce};
    #[doc(no_inline)]
    pub use crate::cursor::{End, RandomAccess, Readable, Sequence};
    #[doc(no_inline)]
    pub use crate::meta_iota::{meta_iota, MetaIota, Token};
    #[doc(no_inline)]
    pub use crate::tuple::{Element, Get, TupleLike};
    #[doc(no_inline)]
    pub use crate::unary::Number;
    #[doc(no_inline)]
    pub use crate::view::{view, view_mut, view_owned, view_owned_in_place, TupleView};
    #[doc(no_inline)]
    pub use crate::visit::{from_fn, Index, Visit, VisitEach, VisitOnce};
    #[doc(no_inline)]
    pub use crate::{compose, OutOfBounds, Vacant};
    #[doc(no_inline)]
    pub use call_by::{Mut, Ref, Val};
}

#[cfg(test)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/counts.rs"));
}
