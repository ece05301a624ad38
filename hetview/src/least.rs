//! Selection of the narrowest primitive integer able to represent a count.
//!
//! The search order is fixed: `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64`, `u64`, `i128`, `u128`.
//! The type-level answer is the [`Least`] trait, implemented on every [`Number<N>`] with
//! `N <= MAX_COUNT`; the value-level answer is the [`least`] family of `const fn`s. The two always
//! agree.
//!
//! [`Number<N>`]: crate::unary::Number
//! [`MAX_COUNT`]: crate::meta_iota::MAX_COUNT

use std::fmt::Debug;
use std::hash::Hash;

use num_traits::{AsPrimitive, PrimInt, Signed, Unsigned, WrappingAdd, WrappingSub, Zero};

use crate::unary::Constant;

/// The narrowest integer types able to represent the count wrapped by `Self`.
///
/// # Examples
///
/// ```
/// use hetview::least::Least;
/// use hetview::unary::Number;
/// use static_assertions::assert_type_eq_all;
///
/// assert_type_eq_all!(<Number<100> as Least>::Type, i8);
/// assert_type_eq_all!(<Number<128> as Least>::Type, u8);
/// assert_type_eq_all!(<Number<127> as Least>::Unsigned, u8);
/// assert_type_eq_all!(<Number<128> as Least>::Unsigned, u16);
/// ```
///
/// Only counts up to [`MAX_COUNT`] implement `Least`:
///
/// ```compile_fail
/// use hetview::least::Least;
/// use hetview::unary::Number;
///
/// let _: <Number<200> as Least>::Type = 0;
/// ```
///
/// [`MAX_COUNT`]: crate::meta_iota::MAX_COUNT
pub trait Least: Constant + 'static {
    /// The first type, signed or not, in the search order that can represent the count.
    type Type: Primitive;
    /// The narrowest signed type that can represent the count.
    type Signed: Primitive + Signed;
    /// The unsigned counterpart of [`Signed`](Least::Signed).
    type Unsigned: Primitive + Counter;
}

hetview_macro::impl_least!(128);

/// An unsigned primitive usable as the position counter of a cursor.
///
/// Arithmetic on counters wraps, so moving a cursor before the first position or past the last one
/// is well defined; only dereferencing it is not.
pub trait Counter:
    PrimInt
    + Unsigned
    + WrappingAdd
    + WrappingSub
    + AsPrimitive<isize>
    + AsPrimitive<usize>
    + AsPrimitive<u128>
    + Hash
    + Debug
    + Default
    + Send
    + Sync
    + 'static
{
    /// Convert a signed offset into a counter, wrapping modulo the counter's width.
    fn wrap_offset(offset: isize) -> Self;

    /// The counter read as a signed offset from zero.
    fn as_offset(self) -> isize {
        AsPrimitive::<isize>::as_(self)
    }

    /// The counter read as a position.
    fn as_position(self) -> usize {
        AsPrimitive::<usize>::as_(self)
    }

    /// The wrapping difference `self - other`, read as a signed integer of the counter's width.
    fn wrapping_distance(self, other: Self) -> isize {
        let bits = PrimInt::count_zeros(<Self as Zero>::zero());
        let raw: u128 = AsPrimitive::<u128>::as_(WrappingSub::wrapping_sub(&self, &other));
        let shift = 128 - bits;
        ((raw << shift) as i128 >> shift) as isize
    }
}

impl<T> Counter for T
where
    T: PrimInt
        + Unsigned
        + WrappingAdd
        + WrappingSub
        + AsPrimitive<isize>
        + AsPrimitive<usize>
        + AsPrimitive<u128>
        + Hash
        + Debug
        + Default
        + Send
        + Sync
        + 'static,
    isize: AsPrimitive<T>,
{
    fn wrap_offset(offset: isize) -> Self {
        <isize as AsPrimitive<T>>::as_(offset)
    }
}

/// A primitive integer type, tagged with its [`Width`].
pub trait Primitive: PrimInt + Debug + 'static {
    /// The category of this type.
    const WIDTH: Width;
}

macro_rules! impl_primitive {
    ($($ty:ident => $width:ident),* $(,)?) => {
        $(impl Primitive for $ty {
            const WIDTH: Width = Width::$width;
        })*
    };
}

impl_primitive! {
    i8 => I8, u8 => U8, i16 => I16, u16 => U16, i32 => I32,
    u32 => U32, i64 => I64, u64 => U64, i128 => I128, u128 => U128,
}

/// One of the ten primitive integer categories, in search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Width {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    I128,
    U128,
}

impl Width {
    /// Every category, in search order.
    pub const ALL: [Width; 10] = [
        Width::I8,
        Width::U8,
        Width::I16,
        Width::U16,
        Width::I32,
        Width::U32,
        Width::I64,
        Width::U64,
        Width::I128,
        Width::U128,
    ];

    /// The number of bits in this category.
    pub const fn bits(self) -> u32 {
        match self {
            Width::I8 | Width::U8 => 8,
            Width::I16 | Width::U16 => 16,
            Width::I32 | Width::U32 => 32,
            Width::I64 | Width::U64 => 64,
            Width::I128 | Width::U128 => 128,
        }
    }

    /// Whether this category is signed.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Width::I8 | Width::I16 | Width::I32 | Width::I64 | Width::I128
        )
    }

    /// The largest value representable in this category.
    pub const fn max(self) -> u128 {
        if self.is_signed() {
            (1 << (self.bits() - 1)) - 1
        } else {
            u128::MAX >> (128 - self.bits())
        }
    }

    /// The unsigned category of the same width.
    pub const fn to_unsigned(self) -> Width {
        match self {
            Width::I8 | Width::U8 => Width::U8,
            Width::I16 | Width::U16 => Width::U16,
            Width::I32 | Width::U32 => Width::U32,
            Width::I64 | Width::U64 => Width::U64,
            Width::I128 | Width::U128 => Width::U128,
        }
    }
}

/// Which categories a search may select.
#[derive(Clone, Copy)]
enum Sign {
    Any,
    Signed,
    Unsigned,
}

const fn search(bound: u128, sign: Sign) -> Width {
    let mut i = 0;
    let mut last = Width::U128;
    while i < Width::ALL.len() {
        let width = Width::ALL[i];
        let allowed = match sign {
            Sign::Any => true,
            Sign::Signed => width.is_signed(),
            Sign::Unsigned => !width.is_signed(),
        };
        if allowed {
            last = width;
            if bound <= width.max() {
                return width;
            }
        }
        i += 1;
    }
    last
}

/// The first category, signed or unsigned, able to represent `bound`.
///
/// # Examples
///
/// ```
/// use hetview::least::{least, Width};
///
/// assert_eq!(least(0), Width::I8);
/// assert_eq!(least(127), Width::I8);
/// assert_eq!(least(128), Width::U8);
/// assert_eq!(least(300), Width::I16);
/// ```
pub const fn least(bound: u128) -> Width {
    search(bound, Sign::Any)
}

/// The narrowest signed category able to represent `bound`; `i128` if none can.
pub const fn least_signed(bound: u128) -> Width {
    search(bound, Sign::Signed)
}

/// The narrowest unsigned category able to represent `bound`.
pub const fn least_unsigned(bound: u128) -> Width {
    search(bound, Sign::Unsigned)
}
