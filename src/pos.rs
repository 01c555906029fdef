// SPDX-License-Identifier: Apache-2.0

//! Modular position arithmetic over the physical slot array.
//!
//! All functions take the physical slot count `n`, which is one more than the
//! logical capacity. Positions are raw indices in `0..n`; the spare slot keeps
//! the empty state (`first == last`) and the full state (`next(last) == first`)
//! distinguishable without a length counter.

/// Returns the slot after `p`, wrapping to slot zero past the end.
pub(crate) const fn next(p: usize, n: usize) -> usize {
	if p + 1 == n { 0 } else { p + 1 }
}

/// Returns the slot before `p`, wrapping to the last slot before zero.
pub(crate) const fn prev(p: usize, n: usize) -> usize {
	if p == 0 { n - 1 } else { p - 1 }
}

/// Moves `p` by a signed offset `by`, where `|by| < n`, in a single modular
/// step rather than repeated `next`/`prev`.
pub(crate) fn advance(p: usize, by: isize, n: usize) -> usize {
	debug_assert!(p < n);
	debug_assert!(by.unsigned_abs() < n);
	let mut q = p as isize + by;
	if q < 0 {
		q += n as isize;
	} else if q >= n as isize {
		q -= n as isize;
	}
	q as usize
}

/// Returns `(b - a) mod n`, always non-negative. With `a` as a buffer's first
/// position this is the logical rank of `b`; with `a..b` as the window bounds
/// it is the window length.
pub(crate) const fn distance(a: usize, b: usize, n: usize) -> usize {
	if b >= a { b - a } else { n - a + b }
}
