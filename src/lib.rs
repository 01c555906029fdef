// SPDX-License-Identifier: Apache-2.0

//! Fixed-capacity ring deques: deque semantics over a single pre-allocated
//! block, with an optional lock-free concurrent variant.
//!
//! ## How it works
//!
//! A ring keeps one spare slot beyond its capacity, so the backing block has
//! `capacity + 1` physical slots. The logical content is the window from the
//! `first` position up to the `last` position, read modulo the slot count;
//! it wraps past the end of the block back to slot zero. The spare slot makes
//! the empty state (`first == last`) and the full state (`next(last) ==
//! first`) distinguishable by position alone, with no separate counter and no
//! off-by-one ambiguity between them.
//!
//! Pushing into a full ring never fails: the oldest element at the opposite
//! end is evicted to make room. That overwrite-oldest behavior is what turns
//! the structure from a plain deque into a bounded cache or telemetry ring.
//!
//! ### Storage
//!
//! The backing block is a construction-time strategy, not a runtime choice:
//! [`ArrayRing`] embeds the slots inline, [`HeapRing`] owns a heap block
//! sized at construction, and [`SliceRing`] borrows a caller-owned block it
//! never frees. All three share every operation through the same generic
//! container, [`RingDeque`].
//!
//! ### Traversal and bulk transfer
//!
//! The window is at most two contiguous spans, exposed by
//! [`as_slices`](RingDeque::as_slices) and [`split`](RingDeque::split).
//! Iteration walks the spans with plain slice iterators, and the bulk entry
//! points [`append`](RingDeque::append) and [`copy_to`](RingDeque::copy_to)
//! move data to and from flat memory one span at a time instead of stepping
//! element-wise across the wrap point. [`Cursor`] adds random access with
//! ordering and subtraction that stay correct across the wrap.
//!
//! Mid-buffer [`insert`](RingDeque::insert) and [`remove`](RingDeque::remove)
//! shift whichever side of the target holds fewer elements, extending or
//! retracting the nearer boundary, so the cost is the shorter shift distance
//! rather than the full length.
//!
//! ### Concurrency
//!
//! [`RingDeque`] has no internal synchronization. [`AtomicRing`] is the
//! concurrent sibling: the same window invariants, but with both boundary
//! positions packed into one atomic word so every transition is a single
//! compare-and-swap validating both boundaries, and per-slot state words
//! ordering each element write before the matching read. Pushes there retry
//! until they win, evicting the oldest element as part of the same claim
//! when full; pops return `None` on an observed-empty snapshot.
//!
//! ```
//! use ring_deque::ArrayRing;
//!
//! let mut ring = ArrayRing::<u32, 5>::new();
//! ring.extend([0, 1, 2, 3]);
//! assert!(ring.is_full());
//!
//! ring.push_back(42);
//! assert_eq!(ring, [1, 2, 3, 42]);
//!
//! ring.push_front(99);
//! assert_eq!(ring, [99, 1, 2, 3]);
//! ```

mod atomic;
mod iter;
mod pos;
mod ring;
mod storage;

pub use atomic::AtomicRing;
pub use iter::{Cursor, IntoIter, Iter, IterMut};
pub use ring::{ArrayRing, HeapRing, RingDeque, SliceRing};
pub use storage::{External, Heap, Inline, OwnedStorage, Storage};
