use std::fmt::Debug;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use num::{
    traits::{WrappingAdd, WrappingMul, WrappingSub},
    PrimInt, Unsigned,
};

/// An unsigned primitive usable as the backing word of a [`RankVec`].
///
/// All slots of a rank vector live inside a single value of this type, so the
/// choice of word determines the capacity ceiling `n * (b + 1) <= Word::bits()`.
/// The rank query is defined over modular unsigned arithmetic, hence the
/// wrapping bounds.
///
/// [`RankVec`]: crate::rank_vec::RankVec
pub trait Word:
    PrimInt
    + Unsigned
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + BitOr
    + BitAnd
    + BitXor
    + BitOrAssign
    + BitAndAssign
    + BitXorAssign
    + Not<Output = Self>
    + Debug
{
    /// The width of this word in bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranksort::Word;
    ///
    /// assert_eq!(64, u64::bits());
    /// assert_eq!(16, u16::bits());
    /// ```
    #[inline]
    fn bits() -> usize {
        Self::zero().count_zeros() as usize
    }
}

impl Word for usize {}
impl Word for u128 {}
impl Word for u64 {}
impl Word for u32 {}
impl Word for u16 {}
impl Word for u8 {}
