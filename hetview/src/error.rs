//! Errors raised by runtime construction of positions and by access to vacated owned storage.

use thiserror::Error;

/// When attempting to construct a [`Token`](crate::meta_iota::Token) or an owned accessor from a
/// runtime position, this error is returned when the position is not strictly less than the count.
///
/// # Examples
///
/// ```
/// use hetview::meta_iota::Token;
/// use hetview::unary::Number;
///
/// let err = Token::<Number<3>>::new(5).unwrap_err();
/// assert_eq!(err.position(), 5);
/// assert_eq!(err.bound(), 3);
/// assert_eq!(err.to_string(), "position 5 is invalid for exclusive upper bound 3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub struct OutOfBounds {
    position: usize,
    bound: usize,
}

impl OutOfBounds {
    pub(crate) fn new(position: usize, bound: usize) -> Self {
        OutOfBounds { position, bound }
    }

    /// The rejected position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The exclusive upper bound the position was checked against.
    pub fn bound(&self) -> usize {
        self.bound
    }
}

impl std::fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "position {} is invalid for exclusive upper bound {}",
            self.position, self.bound
        )
    }
}

/// An owned view was read after its aggregate had been moved out of it.
///
/// Only views using the [`Rebuild`](crate::storage::Rebuild) strategy can be vacated: moving from
/// one leaves it empty, as does a panic while rebuilding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("the owned aggregate was moved out of this view")]
pub struct Vacant {
    _priv: (),
}

impl Vacant {
    pub(crate) fn new() -> Self {
        Vacant { _priv: () }
    }
}
