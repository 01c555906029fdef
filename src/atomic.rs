// SPDX-License-Identifier: Apache-2.0

//! A lock-free bounded concurrent ring with eviction-on-full.
//!
//! [`AtomicRing`] keeps the single-threaded ring's data model — `head`/`tail`
//! positions over `capacity + 1` slots — but packs both positions into one
//! atomic word. Every transition (push, pop, and the eviction a full push
//! performs) is a single compare-and-swap on that word, so each claim
//! revalidates both boundaries at once: a push that wraps onto a full buffer
//! claims the opposite-end eviction in the same exchange, and the window can
//! never overrun itself.
//!
//! Claiming a transition and moving its element are still separate events, so
//! each slot carries a state word advanced by its own compare-and-swap:
//! vacant → writing → occupied → reading → vacant. A slot enters the window
//! exactly when a push claims it and leaves exactly when a pop or eviction
//! claims it, so writers and readers of a slot alternate strictly; every
//! state wait has exactly one already-claimed counterpart and completes once
//! that counterpart runs.
//!
//! No operation blocks on an absent peer: pushes retry the boundary exchange
//! until they win, and pops return `None` on an observed-empty snapshot.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use cfg_if::cfg_if;
use crossbeam_utils::CachePadded;
use crate::pos;

cfg_if! {
	if #[cfg(loom)] {
		use loom::sync::atomic::{AtomicUsize, Ordering};

		fn wait_hint() {
			loom::thread::yield_now();
		}
	} else {
		use std::sync::atomic::{AtomicUsize, Ordering};

		fn wait_hint() {
			std::hint::spin_loop();
		}
	}
}

const HALF: u32 = usize::BITS / 2;
const LOW_MASK: usize = (1 << HALF) - 1;

fn pack(head: usize, tail: usize) -> usize {
	head << HALF | tail
}

fn unpack(bounds: usize) -> (usize, usize) {
	(bounds >> HALF, bounds & LOW_MASK)
}

const VACANT: usize = 0;
const WRITING: usize = 1;
const OCCUPIED: usize = 2;
const READING: usize = 3;

struct Slot<T> {
	/// One of [`VACANT`], [`WRITING`], [`OCCUPIED`], [`READING`].
	state: AtomicUsize,
	value: UnsafeCell<MaybeUninit<T>>,
}

/// A lock-free, fixed-capacity concurrent ring. Pushes always succeed,
/// evicting the oldest element at the opposite end when full; pops return
/// `None` when an empty snapshot is observed.
pub struct AtomicRing<T> {
	slots: Box<[Slot<T>]>,
	/// Both boundary positions, `head` in the high half and `tail` in the
	/// low half.
	bounds: CachePadded<AtomicUsize>,
}

unsafe impl<T: Send> Send for AtomicRing<T> { }
unsafe impl<T: Send> Sync for AtomicRing<T> { }

impl<T> AtomicRing<T> {
	/// Creates an empty ring holding up to `capacity` elements.
	pub fn new(capacity: usize) -> Self {
		assert!(capacity > 0, "capacity must be non-zero");
		assert!(capacity < LOW_MASK, "capacity must fit a half-word position");
		let slots = (0..capacity + 1)
			.map(|_| Slot {
				state: AtomicUsize::new(VACANT),
				value: UnsafeCell::new(MaybeUninit::uninit()),
			})
			.collect();
		Self {
			slots,
			bounds: CachePadded::new(AtomicUsize::new(pack(0, 0))),
		}
	}

	fn n(&self) -> usize { self.slots.len() }

	/// Returns the number of elements the ring can hold.
	pub fn capacity(&self) -> usize { self.n() - 1 }

	/// Returns a snapshot of the element count. The boundaries are read as
	/// one word, so the snapshot is internally consistent, but it is already
	/// stale under concurrent mutation.
	pub fn len(&self) -> usize {
		let (head, tail) = unpack(self.bounds.load(Ordering::Acquire));
		pos::distance(head, tail, self.n())
	}

	/// Returns `true` if an empty snapshot was observed.
	pub fn is_empty(&self) -> bool {
		let (head, tail) = unpack(self.bounds.load(Ordering::Acquire));
		head == tail
	}

	/// Returns `true` if a full snapshot was observed.
	pub fn is_full(&self) -> bool {
		let (head, tail) = unpack(self.bounds.load(Ordering::Acquire));
		pos::next(tail, self.n()) == head
	}

	/// Appends `value` to the back. If the buffer was full, the same claim
	/// advances the head and the front element is dropped.
	pub fn push_back(&self, value: T) {
		let n = self.n();
		let mut bounds = self.bounds.load(Ordering::Acquire);
		loop {
			let (head, tail) = unpack(bounds);
			let next = pos::next(tail, n);
			let (claim, evict) = if next == head {
				(pack(pos::next(head, n), next), true)
			} else {
				(pack(head, next), false)
			};
			match self.bounds.compare_exchange_weak(bounds, claim, Ordering::AcqRel, Ordering::Acquire) {
				Ok(_) => {
					if evict {
						drop(unsafe { self.read_slot(head) });
					}
					unsafe { self.write_slot(tail, value) };
					return;
				}
				Err(b) => bounds = b,
			}
		}
	}

	/// Prepends `value` to the front. If the buffer was full, the same claim
	/// retracts the tail and the back element is dropped.
	pub fn push_front(&self, value: T) {
		let n = self.n();
		let mut bounds = self.bounds.load(Ordering::Acquire);
		loop {
			let (head, tail) = unpack(bounds);
			let front = pos::prev(head, n);
			let back = pos::prev(tail, n);
			let (claim, evict) = if pos::next(tail, n) == head {
				(pack(front, back), true)
			} else {
				(pack(front, tail), false)
			};
			match self.bounds.compare_exchange_weak(bounds, claim, Ordering::AcqRel, Ordering::Acquire) {
				Ok(_) => {
					if evict {
						drop(unsafe { self.read_slot(back) });
					}
					unsafe { self.write_slot(front, value) };
					return;
				}
				Err(b) => bounds = b,
			}
		}
	}

	/// Removes and returns the front element, or `None` on an observed-empty
	/// snapshot.
	pub fn pop_front(&self) -> Option<T> {
		let n = self.n();
		let mut bounds = self.bounds.load(Ordering::Acquire);
		loop {
			let (head, tail) = unpack(bounds);
			if head == tail {
				return None;
			}
			let claim = pack(pos::next(head, n), tail);
			match self.bounds.compare_exchange_weak(bounds, claim, Ordering::AcqRel, Ordering::Acquire) {
				Ok(_) => return Some(unsafe { self.read_slot(head) }),
				Err(b) => bounds = b,
			}
		}
	}

	/// Removes and returns the back element, or `None` on an observed-empty
	/// snapshot.
	pub fn pop_back(&self) -> Option<T> {
		let n = self.n();
		let mut bounds = self.bounds.load(Ordering::Acquire);
		loop {
			let (head, tail) = unpack(bounds);
			if head == tail {
				return None;
			}
			let back = pos::prev(tail, n);
			let claim = pack(head, back);
			match self.bounds.compare_exchange_weak(bounds, claim, Ordering::AcqRel, Ordering::Acquire) {
				Ok(_) => return Some(unsafe { self.read_slot(back) }),
				Err(b) => bounds = b,
			}
		}
	}

	/// Empties the ring. Exclusive access makes this a simple drain.
	pub fn clear(&mut self) {
		while self.pop_front().is_some() { }
	}

	/// Moves `value` into a slot claimed through the boundary word.
	///
	/// # Safety
	///
	/// The caller must own the slot's enter-window transition. The state
	/// loop only yields to an earlier occupant whose reader has not yet
	/// finished.
	unsafe fn write_slot(&self, p: usize, value: T) {
		let slot = &self.slots[p];
		while slot.state
			.compare_exchange_weak(VACANT, WRITING, Ordering::Acquire, Ordering::Relaxed)
			.is_err()
		{
			wait_hint();
		}
		(*slot.value.get()).write(value);
		slot.state.store(OCCUPIED, Ordering::Release);
	}

	/// Moves a value out of a slot claimed through the boundary word.
	///
	/// # Safety
	///
	/// The caller must own the slot's leave-window transition. The state
	/// loop orders this read after the writer's publication.
	unsafe fn read_slot(&self, p: usize) -> T {
		let slot = &self.slots[p];
		while slot.state
			.compare_exchange_weak(OCCUPIED, READING, Ordering::Acquire, Ordering::Relaxed)
			.is_err()
		{
			wait_hint();
		}
		let value = (*slot.value.get()).as_ptr().read();
		slot.state.store(VACANT, Ordering::Release);
		value
	}
}

impl<T> Drop for AtomicRing<T> {
	fn drop(&mut self) {
		self.clear();
	}
}
