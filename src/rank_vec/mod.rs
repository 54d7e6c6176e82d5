use std::fmt::Debug;
use std::mem;

use thiserror::Error;

use crate::traits::Word;

/// The element count and value range ask for more bits than the storage word has.
///
/// Raised by [`RankVec::new`] and [`RankVec::from_keys`] before any packing
/// occurs. The caller can reduce the input size, narrow the value range, or
/// switch to a wider [`Word`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot pack {len} fields of {field_bits} bits each into a {word_bits}-bit word")]
pub struct CapacityError {
    /// Number of slots requested.
    pub len: usize,
    /// Bits per slot, including the guard bit.
    pub field_bits: usize,
    /// Width of the chosen storage word.
    pub word_bits: usize,
}

/// `ceil(log2(x))` for `x >= 1`.
#[inline]
fn ceil_log2(x: usize) -> usize {
    match x.checked_next_power_of_two() {
        Some(p) => p.trailing_zeros() as usize,
        None => usize::BITS as usize,
    }
}

/// A container of up to `k` distinct small integers packed into a single
/// machine word, answering rank queries in constant time.
///
/// Each slot occupies `b + 1` bits: `b` value bits and one guard bit keeping
/// the slots apart during the carry-based rank arithmetic. Everything lives in
/// one value of the word type `W`, so `k * (b + 1)` must not exceed the word
/// width; [`RankVec::new`] reports a [`CapacityError`] otherwise. For a 64-bit
/// word holding a dense range (`k` values out of `k`), this caps `k` at 12.
///
/// [`RankVec::rank`] returns how many stored values are strictly smaller than
/// the value in a given slot, which for pairwise-distinct values is the slot
/// value's 0-based position in sorted order. The query is a handful of word
/// operations regardless of `k`.
///
/// The stored values must be pairwise distinct and below `2^b`; duplicates
/// make the rank results collide and are not detected.
///
/// # Examples
///
/// ```
/// use ranksort::rank_vec::RankVec;
///
/// // Four slots over the value universe 0..8.
/// let rv = RankVec::<u64>::from_keys([5usize, 0, 7, 2], 4, |v| v).unwrap();
///
/// assert_eq!(2, rv.rank(0)); // two stored values are smaller than 5
/// assert_eq!(0, rv.rank(1));
/// assert_eq!(3, rv.rank(2));
/// assert_eq!(1, rv.rank(3));
/// ```
pub struct RankVec<W> {
    /// Number of slots.
    len: usize,
    /// Value bits per slot; a slot occupies `bits + 1` including the guard bit.
    bits: usize,
    /// One in the lowest value bit of every slot. Multiplying a field by this
    /// broadcasts it into all slots at once.
    mul: W,
    /// Mask covering a single `bits + 1` wide field.
    field_mask: W,
    /// All slots, packed at offset `index * (bits + 1)`.
    data: W,
}

impl<W: Word> RankVec<W> {
    /// Creates a rank vector with `len` empty slots over a universe of
    /// `len + extra` values.
    ///
    /// The per-slot width is derived as `b = ceil(log2(len + extra))`, so
    /// every value in `[0, len + extra)` fits into a slot. Construction first
    /// builds the all-slots-one pattern and captures it as the broadcast
    /// multiplier, then starts over with a zeroed payload word.
    ///
    /// # Arguments
    ///
    /// * `len` - The number of slots.
    /// * `extra` - How many values beyond `len` the universe contains.
    ///
    /// # Errors
    ///
    /// Returns a [`CapacityError`] if `len * (b + 1)` exceeds the word width.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranksort::rank_vec::RankVec;
    ///
    /// // 12 slots of dense values need 12 * 5 = 60 bits: fits.
    /// assert!(RankVec::<u64>::new(12, 0).is_ok());
    /// // 13 slots need 65 bits: one over.
    /// assert!(RankVec::<u64>::new(13, 0).is_err());
    /// ```
    pub fn new(len: usize, extra: usize) -> Result<Self, CapacityError> {
        // A one-value universe would give b = 0 and collapse the field
        // arithmetic, so a slot always has at least one value bit.
        let bits = if len == 0 {
            1
        } else {
            ceil_log2(len.saturating_add(extra)).max(1)
        };
        let field_bits = bits + 1;

        match len.checked_mul(field_bits) {
            Some(needed) if needed <= W::bits() => {}
            _ => {
                return Err(CapacityError {
                    len,
                    field_bits,
                    word_bits: W::bits(),
                })
            }
        }

        let mut vec = Self {
            len,
            bits,
            mul: W::zero(),
            field_mask: W::max_value() >> (W::bits() - field_bits),
            data: W::zero(),
        };

        for index in 0..len {
            vec.set(index, 1);
        }
        vec.mul = mem::replace(&mut vec.data, W::zero());

        Ok(vec)
    }

    /// Creates a rank vector over the keys of a sequence of items.
    ///
    /// The projected keys are written into the slots in sequence order. They
    /// must be pairwise distinct and below `2^b` for the universe implied by
    /// `items.len() + extra`.
    ///
    /// # Arguments
    ///
    /// * `items` - The items to fill the slots from.
    /// * `extra` - How many values beyond the item count the universe contains.
    /// * `to_key` - Projection from an item to its integral key.
    ///
    /// # Errors
    ///
    /// Returns a [`CapacityError`] if the slots do not fit the word.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranksort::rank_vec::RankVec;
    ///
    /// let entries = [(3usize, 'd'), (0, 'a'), (2, 'c')];
    /// let rv = RankVec::<u64>::from_keys(entries, 1, |(key, _)| key).unwrap();
    ///
    /// assert_eq!(2, rv.rank(0));
    /// assert_eq!(0, rv.rank(1));
    /// assert_eq!(1, rv.rank(2));
    /// ```
    pub fn from_keys<I, F>(items: I, extra: usize, mut to_key: F) -> Result<Self, CapacityError>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(I::Item) -> usize,
    {
        let items = items.into_iter();
        let mut vec = Self::new(items.len(), extra)?;
        for (index, item) in items.enumerate() {
            vec.set(index, to_key(item));
        }
        Ok(vec)
    }

    /// The number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector has no slots.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of bits a slot occupies, guard bit included.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranksort::rank_vec::RankVec;
    ///
    /// // A universe of 12 values needs 4 value bits, plus the guard bit.
    /// let rv = RankVec::<u64>::new(12, 0).unwrap();
    /// assert_eq!(5, rv.bit_width());
    /// ```
    #[inline]
    pub fn bit_width(&self) -> usize {
        self.bits + 1
    }

    /// Grants access to the packed word holding all slots.
    #[inline]
    pub fn raw_data(&self) -> W {
        self.data
    }

    /// The bit offset of a slot inside the word.
    #[inline]
    fn field_shift(&self, index: usize) -> usize {
        index * (self.bits + 1)
    }

    /// XOR-combines `value` into the slot at `index`.
    ///
    /// A slot that is currently zero ends up holding `value`; a non-zero slot
    /// ends up holding the XOR of both. [`RankVec::swap`] relies on this to
    /// exchange two slots without a temporary.
    pub fn set(&mut self, index: usize, value: usize) {
        assert!(
            index < self.len,
            "length is {} but index is {index}",
            self.len
        );
        debug_assert!(
            self.field_mask.to_usize().map_or(true, |mask| value <= mask),
            "value {value} too large for a {}-bit field",
            self.bits + 1
        );
        let mask = self.field_mask.to_usize().unwrap_or(usize::MAX);
        let value = W::from(value & mask).unwrap();
        self.data ^= value << self.field_shift(index);
    }

    /// Gets the value in the slot at `index`.
    pub fn get(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "length is {} but index is {index}",
            self.len
        );
        ((self.data >> self.field_shift(index)) & self.field_mask)
            .to_usize()
            .unwrap()
    }

    /// Exchanges the values of two slots.
    ///
    /// Applies the same XOR delta to both slots, so no second word is needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranksort::rank_vec::RankVec;
    ///
    /// let mut rv = RankVec::<u64>::from_keys([3usize, 1, 4], 2, |v| v).unwrap();
    /// rv.swap(0, 2);
    ///
    /// assert_eq!(4, rv.get(0));
    /// assert_eq!(1, rv.get(1));
    /// assert_eq!(3, rv.get(2));
    /// ```
    pub fn swap(&mut self, lhs: usize, rhs: usize) {
        let delta = self.get(lhs) ^ self.get(rhs);
        self.set(lhs, delta);
        self.set(rhs, delta);
    }

    /// Clears the slot at `index` to zero.
    pub fn erase(&mut self, index: usize) {
        assert!(
            index < self.len,
            "length is {} but index is {index}",
            self.len
        );
        self.data &= !(self.field_mask << self.field_shift(index));
    }

    /// The per-slot carry word for the value at `index`.
    ///
    /// Adding `2^b` to the target value and subtracting every slot from the
    /// broadcast product leaves, at bit `b` of each field, a one exactly if
    /// that field's value is less than or equal to the target. The guard bit
    /// keeps the per-field differences from borrowing into their neighbors.
    #[inline]
    fn carries(&self, index: usize) -> W {
        let target = ((self.data >> self.field_shift(index)) & self.field_mask)
            .wrapping_add(&(W::one() << self.bits));
        target.wrapping_mul(&self.mul).wrapping_sub(&self.data) >> self.bits
    }

    /// Sums a masked carry word into a single count.
    #[inline]
    fn fold_carries(&self, carries: W) -> usize {
        // 2^(j*(b+1)) = 1 mod (2^(b+1) - 1), so the modulo adds up the
        // per-field carries. The target's comparison against itself always
        // contributes one.
        (carries % self.field_mask).to_usize().unwrap() - 1
    }

    /// Returns how many slots hold a value strictly smaller than the value at
    /// `index`, in constant time.
    ///
    /// For pairwise-distinct values this is the value's final position in
    /// sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranksort::rank_vec::RankVec;
    ///
    /// let rv = RankVec::<u64>::from_keys([9usize, 4, 11, 0, 7], 7, |v| v).unwrap();
    ///
    /// assert_eq!(3, rv.rank(0));
    /// assert_eq!(1, rv.rank(1));
    /// assert_eq!(4, rv.rank(2));
    /// assert_eq!(0, rv.rank(3));
    /// assert_eq!(2, rv.rank(4));
    /// ```
    pub fn rank(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "length is {} but index is {index}",
            self.len
        );
        self.fold_carries(self.carries(index) & self.mul)
    }

    /// Returns how many slots before `index` hold a smaller value.
    ///
    /// Same carry trick as [`RankVec::rank`], with the summation window masked
    /// to the fields up to and including `index`. Together with
    /// [`RankVec::rank_bigger`] this partitions the full rank:
    /// `rank(i) == rank_lower(i) + rank_bigger(i)`.
    pub fn rank_lower(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "length is {} but index is {index}",
            self.len
        );
        let window = self.mul >> self.field_shift(self.len - 1 - index);
        self.fold_carries(self.carries(index) & window)
    }

    /// Returns how many slots after `index` hold a smaller value.
    ///
    /// The carry word is shifted down by `index` fields before summing, so
    /// only the fields from `index` on contribute.
    pub fn rank_bigger(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "length is {} but index is {index}",
            self.len
        );
        self.fold_carries((self.carries(index) >> self.field_shift(index)) & self.mul)
    }

    /// An iterator over the stored slot values.
    #[inline]
    pub fn iter(&self) -> Iter<'_, W> {
        Iter { i: 0, v: self }
    }
}

impl<'a, W: Word> IntoIterator for &'a RankVec<W> {
    type Item = usize;

    type IntoIter = Iter<'a, W>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, W> {
    i: usize,
    v: &'a RankVec<W>,
}

impl<W: Word> Iterator for Iter<'_, W> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i == self.v.len() {
            return None;
        }

        let res = self.v.get(self.i);
        self.i += 1;
        Some(res)
    }
}

impl<W: Word> ExactSizeIterator for Iter<'_, W> {
    fn len(&self) -> usize {
        self.v.len() - self.i
    }
}

impl<W: Word> Debug for RankVec<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")
            .and_then(|_| {
                let mut iter = self.iter().peekable();
                while let Some(v) = iter.next() {
                    write!(f, "{v}")?;
                    if iter.peek().is_some() {
                        write!(f, ", ")?;
                    }
                }
                Ok(())
            })
            .and_then(|_| write!(f, "}}"))
    }
}
