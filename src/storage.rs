// SPDX-License-Identifier: Apache-2.0

//! Backing-storage strategies for [`RingDeque`].
//!
//! The strategy is a generic parameter, fixed per instantiation; there is no
//! runtime dispatch. All three strategies present the same slot slice to the
//! container:
//!
//! - [`Inline`] embeds the slots in the container itself.
//! - [`Heap`] owns a boxed slice sized at construction.
//! - [`External`] borrows a caller-owned block and never frees it.
//!
//! [`RingDeque`]: crate::RingDeque

use std::mem::MaybeUninit;

/// Creates an uninitialized `[MaybeUninit<T>; N]` without running any
/// constructors.
fn uninit_array<T, const N: usize>() -> [MaybeUninit<T>; N] {
	// SAFETY: an uninitialized MaybeUninit<T> is valid by definition.
	unsafe { MaybeUninit::<[MaybeUninit<T>; N]>::uninit().assume_init() }
}

/// A backing block of physical slots. The slot count is fixed for the life of
/// the storage; the container tracks which slots hold live elements and never
/// reads one it has not written.
pub trait Storage<T> {
	/// Returns the physical slots, one more than the logical capacity.
	fn slots(&self) -> &[MaybeUninit<T>];
	/// Returns the physical slots mutably.
	fn slots_mut(&mut self) -> &mut [MaybeUninit<T>];
}

/// A storage strategy that owns its block, allowing a fresh block of the same
/// size to be created for clones.
pub trait OwnedStorage<T>: Storage<T> {
	/// Creates fresh, uninitialized storage with `slots` physical slots.
	fn fresh(slots: usize) -> Self;
}

/// Slots embedded inline in the container. `N` is the physical slot count;
/// the logical capacity is `N - 1`.
pub struct Inline<T, const N: usize> {
	slots: [MaybeUninit<T>; N],
}

/// Heap-allocated slots, owned and freed by the container.
pub struct Heap<T> {
	slots: Box<[MaybeUninit<T>]>,
}

/// A caller-owned block the container writes into but never frees.
pub struct External<'a, T> {
	slots: &'a mut [MaybeUninit<T>],
}

impl<T, const N: usize> Inline<T, N> {
	// Rejects N < 2 at monomorphization time; referenced from `fresh`.
	const VALID: () = assert!(N > 1, "an inline ring needs at least two slots");
}

impl<T, const N: usize> Storage<T> for Inline<T, N> {
	fn slots(&self) -> &[MaybeUninit<T>] { &self.slots }
	fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] { &mut self.slots }
}

impl<T, const N: usize> OwnedStorage<T> for Inline<T, N> {
	fn fresh(slots: usize) -> Self {
		// Force compile-time validation of the slot count.
		let () = Self::VALID;
		debug_assert_eq!(slots, N);
		Self { slots: uninit_array() }
	}
}

impl<T> Storage<T> for Heap<T> {
	fn slots(&self) -> &[MaybeUninit<T>] { &self.slots }
	fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] { &mut self.slots }
}

impl<T> OwnedStorage<T> for Heap<T> {
	fn fresh(slots: usize) -> Self {
		assert!(slots > 1, "a heap ring needs at least two slots");
		let slots = (0..slots).map(|_| MaybeUninit::uninit()).collect();
		Self { slots }
	}
}

impl<'a, T> External<'a, T> {
	/// Wraps a caller-owned block. The block must hold at least two slots; its
	/// length, less the spare slot, becomes the capacity.
	pub fn new(block: &'a mut [MaybeUninit<T>]) -> Self {
		assert!(block.len() > 1, "an external ring needs at least two slots");
		Self { slots: block }
	}
}

impl<T> Storage<T> for External<'_, T> {
	fn slots(&self) -> &[MaybeUninit<T>] { self.slots }
	fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] { self.slots }
}
