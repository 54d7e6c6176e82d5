//! The sorting front end: range scan, key shifting, and the placement loop
//! driving a [`RankVec`].

use itertools::{Itertools, MinMaxResult};
use num::{PrimInt, ToPrimitive};

use crate::rank_vec::{CapacityError, RankVec};
use crate::traits::Word;

// The capacity figures quoted in the docs assume the default word is 64 bits.
static_assertions::assert_eq_size!(usize, u64);

/// The unsigned distance from `from` up to `to`, for any primitive key type.
///
/// Signed keys at opposite ends of their type overflow a plain subtraction,
/// so the distance is taken in 128-bit space.
fn key_distance<K: PrimInt>(from: K, to: K) -> u128 {
    match (to.to_u128(), from.to_u128()) {
        (Some(to), Some(from)) => to - from,
        _ => {
            // Not representable unsigned means the key type is signed, and
            // every signed primitive fits i128.
            let to = to.to_i128().unwrap();
            let from = from.to_i128().unwrap();
            (to as u128).wrapping_sub(from as u128)
        }
    }
}

/// Moves every element to the slot its rank names, swapping the backing slice
/// and the rank vector in lockstep. Returns the number of swaps performed.
///
/// Each swap puts at least one element into its final position, so the loop
/// finishes after at most `len - 1` swaps.
fn place<W: Word, T>(data: &mut [T], keys: &mut RankVec<W>) -> usize {
    let mut swaps = 0;
    let mut i = 0;
    while i < keys.len() {
        let rank = keys.rank(i);
        if rank == i {
            i += 1;
        } else {
            data.swap(i, rank);
            keys.swap(i, rank);
            swaps += 1;
        }
    }
    swaps
}

/// Sorts a slice of pairwise-distinct integers in place, ascending.
///
/// Runs in linear time: every element's final position is read off a packed
/// [`RankVec`] in constant time, and at most `data.len() - 1` swaps realize
/// the permutation. The element values may occupy any contiguous range; their
/// minimum and maximum are determined in one pass.
///
/// Uses the native machine word as backing storage, which bounds the input:
/// `n` elements spanning a value range of size `r` need
/// `n * (ceil(log2(r)) + 1)` bits out of 64. See [`sort_with`] to pick a
/// wider word.
///
/// Distinctness is not checked. A slice holding duplicate values may be left
/// in any order, and the call may not return.
///
/// # Errors
///
/// Returns a [`CapacityError`] if the elements do not fit the word. The slice
/// is left unchanged in that case.
///
/// # Examples
///
/// ```
/// let mut data = [31, 7, 19, 3, 11];
/// ranksort::sort(&mut data).unwrap();
///
/// assert_eq!([3, 7, 11, 19, 31], data);
/// ```
///
/// Negative values order the way integers do:
///
/// ```
/// let mut data = [4i32, -9, 2, -3, 0];
/// ranksort::sort(&mut data).unwrap();
///
/// assert_eq!([-9, -3, 0, 2, 4], data);
/// ```
pub fn sort<T: PrimInt>(data: &mut [T]) -> Result<(), CapacityError> {
    sort_with::<usize, T>(data)
}

/// Sorts a slice of pairwise-distinct integers in place, using `W` as the
/// packed storage word.
///
/// Same algorithm as [`sort`]; the word width sets the capacity ceiling
/// `n * (ceil(log2(r)) + 1) <= W::bits()`.
///
/// # Errors
///
/// Returns a [`CapacityError`] if the elements do not fit `W`.
///
/// # Examples
///
/// ```
/// // 13 elements over a dense range need 65 bits: too much for u64,
/// // comfortable in u128.
/// let mut data: Vec<u32> = (0..13).rev().collect();
///
/// assert!(ranksort::sort_with::<u64, _>(&mut data).is_err());
/// ranksort::sort_with::<u128, _>(&mut data).unwrap();
///
/// assert_eq!((0..13).collect::<Vec<_>>(), data);
/// ```
pub fn sort_with<W: Word, T: PrimInt>(data: &mut [T]) -> Result<(), CapacityError> {
    sort_by_key_with::<W, T, T, _>(data, |&v| v)
}

/// Sorts a slice of pairwise-distinct integers already occupying the range
/// `[0, data.len())`, skipping the min/max scan.
///
/// # Examples
///
/// ```
/// let mut data = [3usize, 0, 4, 1, 2];
/// ranksort::sort_zero_based(&mut data).unwrap();
///
/// assert_eq!([0, 1, 2, 3, 4], data);
/// ```
pub fn sort_zero_based<T: PrimInt>(data: &mut [T]) -> Result<(), CapacityError> {
    sort_zero_based_with::<usize, T>(data)
}

/// Sorts a slice of pairwise-distinct integers in `[0, data.len())` in place,
/// using `W` as the packed storage word.
///
/// The caller guarantees the value range; nothing is scanned or shifted.
pub fn sort_zero_based_with<W: Word, T: PrimInt>(data: &mut [T]) -> Result<(), CapacityError> {
    if data.len() < 2 {
        return Ok(());
    }

    let mut keys = RankVec::<W>::from_keys(data.iter(), 0, |item| item.to_usize().unwrap())?;
    place(data, &mut keys);
    Ok(())
}

/// Sorts a slice of records in place by a pairwise-distinct integral key.
///
/// # Examples
///
/// ```
/// struct Station {
///     id: u16,
///     name: &'static str,
/// }
///
/// let mut stations = [
///     Station { id: 207, name: "north" },
///     Station { id: 3, name: "dock" },
///     Station { id: 41, name: "mill" },
/// ];
/// ranksort::sort_by_key(&mut stations, |s| s.id).unwrap();
///
/// assert_eq!(["dock", "mill", "north"], stations.map(|s| s.name));
/// ```
pub fn sort_by_key<T, K, F>(data: &mut [T], to_key: F) -> Result<(), CapacityError>
where
    K: PrimInt,
    F: FnMut(&T) -> K,
{
    sort_by_key_with::<usize, T, K, F>(data, to_key)
}

/// Sorts a slice of records in place by a pairwise-distinct integral key,
/// using `W` as the packed storage word.
///
/// This is the most general entry point; all other sort functions forward to
/// it. The key of every record is projected once for the min/max scan and
/// once to fill the rank vector. The keys must be pairwise distinct; this is
/// not checked, and duplicate keys may leave the slice in any order or keep
/// the call from returning.
///
/// # Errors
///
/// Returns a [`CapacityError`] if the keys do not fit `W`. The slice is left
/// unchanged in that case.
pub fn sort_by_key_with<W, T, K, F>(data: &mut [T], mut to_key: F) -> Result<(), CapacityError>
where
    W: Word,
    K: PrimInt,
    F: FnMut(&T) -> K,
{
    let n = data.len();
    if n < 2 {
        return Ok(());
    }

    let (min, max) = match data.iter().map(|item| to_key(item)).minmax() {
        MinMaxResult::MinMax(min, max) => (min, max),
        _ => return Ok(()),
    };

    let wide_span = key_distance(min, max);
    let span = match wide_span.to_usize() {
        Some(span) => span,
        None => {
            return Err(CapacityError {
                len: n,
                field_bits: 129 - wide_span.leading_zeros() as usize,
                word_bits: W::bits(),
            })
        }
    };

    // Universe size is span + 1 values, of which n are present.
    let extra = span.saturating_sub(n - 1);
    let mut keys = RankVec::<W>::from_keys(data.iter(), extra, |item| {
        // Bounded by span, so the cast cannot fail.
        key_distance(min, to_key(item)).to_usize().unwrap()
    })?;

    place(data, &mut keys);
    Ok(())
}

#[cfg(test)]
mod test {
    use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

    use super::{key_distance, place, sort, sort_by_key, sort_with, sort_zero_based};
    use crate::rank_vec::RankVec;

    #[test]
    fn key_distance_test() {
        assert_eq!(0, key_distance(7u32, 7u32));
        assert_eq!(22, key_distance(98u8, 120u8));
        assert_eq!(8, key_distance(-5i32, 3i32));
        assert_eq!(u64::MAX as u128, key_distance(u64::MIN, u64::MAX));
        assert_eq!(u64::MAX as u128, key_distance(i64::MIN, i64::MAX));
        assert_eq!(u128::MAX, key_distance(i128::MIN, i128::MAX));
    }

    #[test]
    fn empty_test() {
        let mut data: [u64; 0] = [];
        sort(&mut data).unwrap();
        assert_eq!([0u64; 0], data);
    }

    #[test]
    fn single_test() {
        let mut data = [42u64];
        sort(&mut data).unwrap();
        assert_eq!([42], data);
    }

    #[test]
    fn two_elements_test() {
        let mut data = [9u8, 2];
        sort(&mut data).unwrap();
        assert_eq!([2, 9], data);
    }

    #[test]
    fn reverse_order_test() {
        let mut data: Vec<i64> = (0..12).rev().collect();
        sort(&mut data).unwrap();
        assert_eq!((0..12).collect::<Vec<_>>(), data);
    }

    #[test]
    fn negative_values_test() {
        let mut data = [-5i32, 3, -1, 0, 2, -17];
        sort(&mut data).unwrap();
        assert_eq!([-17, -5, -1, 0, 2, 3], data);
    }

    #[test]
    fn extreme_signed_range_test() {
        let mut data = [i64::MAX, i64::MIN];
        // Distance of nearly 2^64 needs 65-bit fields.
        assert!(sort(&mut data).is_err());
        assert_eq!([i64::MAX, i64::MIN], data, "failed sort must not reorder");
    }

    #[test]
    fn capacity_propagation_test() {
        let mut data: Vec<u16> = (100..113).rev().collect();
        assert!(sort(&mut data).is_err(), "13 dense values exceed 64 bits");
        sort_with::<u128, _>(&mut data).unwrap();
        assert_eq!((100..113).collect::<Vec<_>>(), data);
    }

    #[test]
    fn already_sorted_swaps_nothing_test() {
        let data_ref: Vec<usize> = (0..10).collect();
        let mut data = data_ref.clone();
        let mut keys = RankVec::<u64>::from_keys(data.iter(), 0, |&v| v).unwrap();

        assert_eq!(0, place(&mut data, &mut keys), "sorted input must not swap");
        assert_eq!(data_ref, data);
    }

    #[test]
    fn swap_bound_test() {
        let mut rng = SmallRng::seed_from_u64(0xAB);
        for _ in 0..50 {
            let mut data: Vec<usize> = (0..12).collect();
            data.shuffle(&mut rng);
            let mut keys = RankVec::<u64>::from_keys(data.iter(), 0, |&v| v).unwrap();

            let swaps = place(&mut data, &mut keys);
            assert!(swaps <= 11, "{swaps} swaps for 12 elements");
            assert_eq!((0..12).collect::<Vec<_>>(), data);
        }
    }

    #[test]
    fn sort_idempotent_test() {
        let mut data = [5u32, 30, 11, 8, 21];
        sort(&mut data).unwrap();
        let once = data;
        sort(&mut data).unwrap();
        assert_eq!(once, data);
    }

    #[test]
    fn matches_reference_sort_test() {
        for seed in 0..50 {
            let mut universe: Vec<u64> = (500..532).collect();
            universe.shuffle(&mut SmallRng::seed_from_u64(seed));
            universe.truncate(10);

            let mut expected = universe.clone();
            expected.sort_unstable();

            sort(&mut universe).unwrap();
            assert_eq!(expected, universe, "mismatch for seed {seed}");
        }
    }

    #[test]
    fn zero_based_matches_reference_test() {
        for seed in 0..50 {
            let mut data: Vec<u32> = (0..12).collect();
            data.shuffle(&mut SmallRng::seed_from_u64(seed));

            sort_zero_based(&mut data).unwrap();
            assert_eq!((0..12).collect::<Vec<_>>(), data);
        }
    }

    #[test]
    fn eight_distinct_letters_test() {
        let mut letters = *b"Tehqikcb";
        sort(&mut letters).unwrap();
        assert_eq!(*b"Tbcehikq", letters);
    }

    #[test]
    fn disjoint_subranges_test() {
        // Three independent sorts over one buffer, back to back.
        let mut text = *b"The quickbrownfxjmpsvtlazydg";

        sort(&mut text[..8]).unwrap();
        sort(&mut text[8..18]).unwrap();
        sort(&mut text[18..28]).unwrap();

        for range in [0..8, 8..18, 18..28] {
            let mut expected = text[range.clone()].to_vec();
            expected.sort_unstable();
            assert_eq!(expected, &text[range.clone()], "subrange {range:?} unsorted");
        }
    }

    #[test]
    fn sort_by_key_test() {
        struct Reading {
            tick: i32,
            label: &'static str,
        }

        let mut readings = [
            Reading { tick: 12, label: "d" },
            Reading { tick: -3, label: "a" },
            Reading { tick: 7, label: "c" },
            Reading { tick: 0, label: "b" },
        ];
        sort_by_key(&mut readings, |r| r.tick).unwrap();

        assert_eq!(["a", "b", "c", "d"], readings.map(|r| r.label));
    }
}
