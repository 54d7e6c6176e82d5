#![deny(rustdoc::broken_intra_doc_links)] // error if there are broken intra-doc links
#![deny(rustdoc::invalid_html_tags)] // no broken html in docs
#![deny(rustdoc::invalid_rust_codeblocks)] // code blocks should not be broken

//! Linear-time in-place sorting for small sets of pairwise-distinct integers.
//!
//! All comparison information is packed into a single machine word: each
//! element gets a small bit field, and a carry-propagation trick answers
//! "how many stored values are smaller than this one" — an element's final
//! sorted position — in a constant number of word operations. A cycle
//! placement loop then realizes the permutation with at most `n - 1` swaps.
//!
//! The price is a hard capacity ceiling. For `n` elements covering a value
//! range of size `r`, the packing needs `n * (ceil(log2(r)) + 1)` bits of one
//! word. With the default 64-bit word:
//!
//! | `n` | largest `r` |
//! |-----|-------------|
//! | 2   | 2^31        |
//! | 3   | 2^20        |
//! | 4   | 2^15        |
//! | 5   | 2^11        |
//! | 6   | 2^9         |
//! | 7   | 2^8         |
//! | 8   | 2^7         |
//! | 9   | 2^6         |
//! | 10  | 2^5         |
//! | 11  | 2^4         |
//! | 12  | 2^4         |
//!
//! so at `r == n` (a dense range) at most 12 elements fit. Inputs beyond the
//! ceiling are rejected with a [`CapacityError`], never truncated; a wider
//! [`Word`] such as `u128` raises the ceiling.
//!
//! # Examples
//!
//! ```
//! let mut data = [23i32, -4, 17, 0, 9];
//! ranksort::sort(&mut data).unwrap();
//!
//! assert_eq!([-4, 0, 9, 17, 23], data);
//! ```
//!
//! The packed rank structure is exposed as [`RankVec`] for callers who want
//! the constant-time rank queries themselves.

pub mod rank_vec;
pub mod sort;
pub mod traits;

pub use rank_vec::{CapacityError, RankVec};
pub use sort::{sort, sort_by_key, sort_by_key_with, sort_with, sort_zero_based, sort_zero_based_with};
pub use traits::Word;
