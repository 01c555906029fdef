// SPDX-License-Identifier: Apache-2.0

use std::cmp::{min, Ordering};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ops::{Bound, Index, IndexMut, Range, RangeBounds};
use all_asserts::assert_le;
use crate::iter::{Cursor, IntoIter, Iter, IterMut};
use crate::pos;
use crate::storage::{External, Heap, Inline, OwnedStorage, Storage};

/// A fixed-capacity deque over a pre-allocated ring of slots.
///
/// The logical window runs from `head` up to (but excluding) `tail`, read
/// modulo the slot count. One spare slot keeps empty and full apart without a
/// length counter: `head == tail` is empty, `next(tail) == head` is full.
///
/// Pushing into a full ring always succeeds by evicting the oldest element at
/// the opposite end, which is what makes this usable as a bounded cache or
/// telemetry ring rather than a plain deque.
///
/// The backing block is selected by the [`Storage`] parameter; see
/// [`ArrayRing`], [`HeapRing`] and [`SliceRing`].
pub struct RingDeque<T, S: Storage<T>> {
	storage: S,
	head: usize,
	tail: usize,
	_values: PhantomData<T>,
}

/// A ring deque with inline storage. `N` is the physical slot count, so the
/// capacity is `N - 1`.
pub type ArrayRing<T, const N: usize> = RingDeque<T, Inline<T, N>>;

/// A ring deque with heap storage, capacity chosen at construction.
pub type HeapRing<T> = RingDeque<T, Heap<T>>;

/// A ring deque over a caller-owned block.
pub type SliceRing<'a, T> = RingDeque<T, External<'a, T>>;

unsafe fn assume_init_slice<T>(slice: &[MaybeUninit<T>]) -> &[T] {
	&*(slice as *const [MaybeUninit<T>] as *const [T])
}

unsafe fn assume_init_slice_mut<T>(slice: &mut [MaybeUninit<T>]) -> &mut [T] {
	&mut *(slice as *mut [MaybeUninit<T>] as *mut [T])
}

fn split_range_mut<T>(slice: &mut [T], mut a: Range<usize>, mut b: Range<usize>) -> (&mut [T], &mut [T]) {
	let is_overlapping = b.contains(&a.start) || (!a.is_empty() && b.contains(&(a.end - 1)));
	assert!(!is_overlapping);

	if a.end <= b.start {
		let (slice_a, slice_b) = slice.split_at_mut(a.end);
		b.start -= slice_a.len();
		b.end   -= slice_a.len();
		(&mut slice_a[a], &mut slice_b[b])
	} else {
		let (slice_b, slice_a) = slice.split_at_mut(b.end);
		a.start -= slice_b.len();
		a.end   -= slice_b.len();
		(&mut slice_a[a], &mut slice_b[b])
	}
}

fn normalize<R: RangeBounds<usize>>(range: R, len: usize) -> Range<usize> {
	let start = match range.start_bound() {
		Bound::Included(&s) => s,
		Bound::Excluded(&s) => s + 1,
		Bound::Unbounded    => 0,
	};
	let end = match range.end_bound() {
		Bound::Included(&e) => e + 1,
		Bound::Excluded(&e) => e,
		Bound::Unbounded    => len,
	};
	assert!(start <= end && end <= len, "range out of bounds");
	start..end
}

impl<T, const N: usize> ArrayRing<T, N> {
	/// Creates an empty ring with `N` inline slots, holding up to `N - 1`
	/// elements.
	pub fn new() -> Self {
		Self::with_storage(Inline::fresh(N))
	}
}

impl<T, const N: usize> Default for ArrayRing<T, N> {
	fn default() -> Self { Self::new() }
}

impl<T> HeapRing<T> {
	/// Creates an empty ring holding up to `capacity` elements on the heap.
	pub fn with_capacity(capacity: usize) -> Self {
		assert!(capacity > 0, "capacity must be non-zero");
		Self::with_storage(Heap::fresh(capacity + 1))
	}
}

impl<'a, T> SliceRing<'a, T> {
	/// Creates an empty ring over a caller-owned block. The block must hold at
	/// least two slots; its length, less one spare slot, is the capacity.
	pub fn new_in(block: &'a mut [MaybeUninit<T>]) -> Self {
		Self::with_storage(External::new(block))
	}
}

impl<T, S: Storage<T>> RingDeque<T, S> {
	fn with_storage(storage: S) -> Self {
		Self {
			storage,
			head: 0,
			tail: 0,
			_values: PhantomData,
		}
	}

	fn n(&self) -> usize { self.storage.slots().len() }

	// Narrow position interface for Cursor; nothing else sees the boundaries.
	pub(crate) fn first_pos(&self) -> usize { self.head }
	pub(crate) fn slot_count(&self) -> usize { self.n() }

	fn physical(&self, index: usize) -> usize {
		pos::advance(self.head, index as isize, self.n())
	}

	pub(crate) unsafe fn slot_ref(&self, p: usize) -> &T {
		self.storage.slots()[p].assume_init_ref()
	}

	unsafe fn read(&self, p: usize) -> T {
		self.storage.slots()[p].as_ptr().read()
	}

	fn write(&mut self, p: usize, value: T) {
		self.storage.slots_mut()[p].write(value);
	}

	/// Moves the element in slot `src` to slot `dst`. The source slot must be
	/// initialized and the destination vacant.
	unsafe fn shift(&mut self, src: usize, dst: usize) {
		let slots = self.storage.slots_mut();
		let value = slots[src].as_ptr().read();
		slots[dst].write(value);
	}

	/// Maps a logical sub-range of the window to at most two physical ranges.
	fn span_ranges(&self, logical: Range<usize>) -> (Range<usize>, Range<usize>) {
		let len = logical.len();
		if len == 0 {
			return (0..0, 0..0);
		}
		let n = self.n();
		let start = self.physical(logical.start);
		let until_edge = n - start;
		if until_edge >= len {
			(start..start + len, 0..0)
		} else {
			(start..n, 0..len - until_edge)
		}
	}

	/// Returns the number of elements the ring can hold.
	pub fn capacity(&self) -> usize { self.n() - 1 }

	/// Returns the number of elements in the ring.
	pub fn len(&self) -> usize {
		pos::distance(self.head, self.tail, self.n())
	}

	/// Returns `true` if the ring is empty.
	pub fn is_empty(&self) -> bool { self.head == self.tail }

	/// Returns `true` if the ring is full.
	pub fn is_full(&self) -> bool {
		pos::next(self.tail, self.n()) == self.head
	}

	/// Returns a reference to the element at `index`.
	pub fn get(&self, index: usize) -> Option<&T> {
		(index < self.len()).then(|| unsafe {
			self.slot_ref(self.physical(index))
		})
	}

	/// Returns a mutable reference to the element at `index`.
	pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
		if index >= self.len() {
			return None;
		}
		let p = self.physical(index);
		Some(unsafe { self.storage.slots_mut()[p].assume_init_mut() })
	}

	/// Returns a reference to the front element, or `None` if the ring is
	/// empty.
	pub fn front(&self) -> Option<&T> { self.get(0) }

	/// Returns a mutable reference to the front element.
	pub fn front_mut(&mut self) -> Option<&mut T> { self.get_mut(0) }

	/// Returns a reference to the back element, or `None` if the ring is
	/// empty.
	pub fn back(&self) -> Option<&T> {
		self.get(self.len().wrapping_sub(1))
	}

	/// Returns a mutable reference to the back element.
	pub fn back_mut(&mut self) -> Option<&mut T> {
		self.get_mut(self.len().wrapping_sub(1))
	}

	/// Appends `value` to the back. If the ring is full, the front element is
	/// evicted to make room; the push itself always succeeds.
	pub fn push_back(&mut self, value: T) {
		if self.is_full() {
			self.pop_front();
		}
		let tail = self.tail;
		self.write(tail, value);
		self.tail = pos::next(tail, self.n());
	}

	/// Prepends `value` to the front. If the ring is full, the back element is
	/// evicted to make room.
	pub fn push_front(&mut self, value: T) {
		if self.is_full() {
			self.pop_back();
		}
		let head = pos::prev(self.head, self.n());
		self.write(head, value);
		self.head = head;
	}

	/// Removes the front element and returns it, or `None` if the ring is
	/// empty.
	pub fn pop_front(&mut self) -> Option<T> {
		(!self.is_empty()).then(|| {
			let head = self.head;
			self.head = pos::next(head, self.n());
			unsafe { self.read(head) }
		})
	}

	/// Removes the back element and returns it, or `None` if the ring is
	/// empty.
	pub fn pop_back(&mut self) -> Option<T> {
		(!self.is_empty()).then(|| {
			let tail = pos::prev(self.tail, self.n());
			self.tail = tail;
			unsafe { self.read(tail) }
		})
	}

	/// Inserts `value` at logical `index`, shifting whichever side of the
	/// insertion point holds fewer elements. A full ring evicts its front
	/// element first, which moves the insertion point down by one.
	///
	/// Returns the index the value landed at.
	pub fn insert(&mut self, index: usize, value: T) -> usize {
		assert_le!(index, self.len(), "insertion index out of bounds");
		let index = if self.is_full() {
			self.pop_front();
			index.saturating_sub(1)
		} else {
			index
		};

		let n = self.n();
		let len = self.len();
		if index == len {
			self.push_back(value);
		} else if index <= len - index {
			// Fewer elements before the insertion point: shift them one back.
			let new_head = pos::prev(self.head, n);
			let mut dst = new_head;
			for _ in 0..index {
				let src = pos::next(dst, n);
				unsafe { self.shift(src, dst) };
				dst = src;
			}
			self.head = new_head;
			self.write(dst, value);
		} else {
			// Fewer elements after: shift them one forward, back to front.
			let tail = self.tail;
			let mut dst = tail;
			for _ in 0..len - index {
				let src = pos::prev(dst, n);
				unsafe { self.shift(src, dst) };
				dst = src;
			}
			self.tail = pos::next(tail, n);
			self.write(dst, value);
		}
		index
	}

	/// Removes and returns the element at `index`, closing the gap from
	/// whichever side holds fewer elements. Returns `None` if `index` is out
	/// of bounds.
	pub fn remove(&mut self, index: usize) -> Option<T> {
		let len = self.len();
		if index >= len {
			return None;
		}

		let n = self.n();
		let value = unsafe { self.read(self.physical(index)) };
		if index <= len - index - 1 {
			// Shift the leading elements one forward onto the gap.
			let mut dst = self.physical(index);
			for _ in 0..index {
				let src = pos::prev(dst, n);
				unsafe { self.shift(src, dst) };
				dst = src;
			}
			self.head = pos::next(self.head, n);
		} else {
			let mut dst = self.physical(index);
			for _ in 0..len - index - 1 {
				let src = pos::next(dst, n);
				unsafe { self.shift(src, dst) };
				dst = src;
			}
			self.tail = pos::prev(self.tail, n);
		}
		Some(value)
	}

	/// Removes the elements in a logical `range`, shifting the shorter of the
	/// surrounding sides. Returns the number of elements removed.
	pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
		let len = self.len();
		let Range { start, end } = normalize(range, len);
		let count = end - start;
		if count == 0 {
			return 0;
		}

		let n = self.n();
		for i in start..end {
			let p = self.physical(i);
			unsafe { self.storage.slots_mut()[p].assume_init_drop() };
		}

		if start <= len - end {
			for i in (0..start).rev() {
				let src = self.physical(i);
				let dst = pos::advance(src, count as isize, n);
				unsafe { self.shift(src, dst) };
			}
			self.head = pos::advance(self.head, count as isize, n);
		} else {
			for i in end..len {
				let src = self.physical(i);
				let dst = pos::advance(src, -(count as isize), n);
				unsafe { self.shift(src, dst) };
			}
			self.tail = pos::advance(self.tail, -(count as isize), n);
		}
		count
	}

	/// Keeps only the elements for which `f` returns `true`, preserving
	/// logical order.
	pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
		let mut i = 0;
		while i < self.len() {
			let keep = f(unsafe { self.slot_ref(self.physical(i)) });
			if keep {
				i += 1;
			} else {
				self.remove(i);
			}
		}
	}

	/// Empties the ring. The boundary reset is O(1); live elements are
	/// dropped first when `T` needs it.
	pub fn clear(&mut self) {
		let (a, b) = self.span_ranges(0..self.len());
		self.tail = self.head;
		if mem::needs_drop::<T>() {
			let slots = self.storage.slots_mut();
			for slot in &mut slots[a] {
				unsafe { slot.assume_init_drop() };
			}
			for slot in &mut slots[b] {
				unsafe { slot.assume_init_drop() };
			}
		}
	}

	/// Shortens the ring to `len` elements, dropping from the back.
	pub fn truncate(&mut self, len: usize) {
		while self.len() > len {
			self.pop_back();
		}
	}

	/// Replaces the contents with the elements of `values`. Values beyond the
	/// capacity evict from the front as usual.
	pub fn assign<I: IntoIterator<Item = T>>(&mut self, values: I) {
		self.clear();
		self.extend(values);
	}

	/// Returns the logical window as one contiguous slice, or two when it
	/// wraps the end of the slot array.
	pub fn as_slices(&self) -> (&[T], &[T]) {
		let (a, b) = self.span_ranges(0..self.len());
		let slots = self.storage.slots();
		unsafe { (assume_init_slice(&slots[a]), assume_init_slice(&slots[b])) }
	}

	/// Returns the logical window as mutable slices.
	pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
		let (a, b) = self.span_ranges(0..self.len());
		let slots = self.storage.slots_mut();
		let (a, b) = split_range_mut(slots, a, b);
		unsafe { (assume_init_slice_mut(a), assume_init_slice_mut(b)) }
	}

	/// Calls `f` on each contiguous span of the window in logical order: once
	/// if the window is unwrapped, twice if it wraps. Together the spans cover
	/// exactly `len()` elements, so bulk operations never step element-wise
	/// across the wrap point.
	pub fn split<F: FnMut(&[T])>(&self, mut f: F) {
		let (a, b) = self.as_slices();
		f(a);
		if !b.is_empty() {
			f(b);
		}
	}

	/// Iterates over the elements front-to-back.
	pub fn iter(&self) -> Iter<'_, T> {
		let (a, b) = self.as_slices();
		Iter::new(a, b)
	}

	/// Iterates mutably over the elements front-to-back.
	pub fn iter_mut(&mut self) -> IterMut<'_, T> {
		let (a, b) = self.as_mut_slices();
		IterMut::new(a, b)
	}

	/// Returns a random-access cursor at logical `index`. `index == len()`
	/// yields the past-the-end cursor.
	pub fn cursor(&self, index: usize) -> Cursor<'_, T, S> {
		assert_le!(index, self.len(), "cursor index out of bounds");
		Cursor::new(self, self.physical(index))
	}

	/// Returns a cursor at the front element.
	pub fn cursor_front(&self) -> Cursor<'_, T, S> {
		Cursor::new(self, self.head)
	}

	/// Returns the past-the-end cursor.
	pub fn cursor_end(&self) -> Cursor<'_, T, S> {
		Cursor::new(self, self.tail)
	}
}

impl<T: Clone, S: Storage<T>> RingDeque<T, S> {
	/// Clones `values` into the back of the ring in bulk, at most two span
	/// copies. Older elements are evicted as needed, so the ring ends up
	/// holding the newest `capacity()` values.
	pub fn append(&mut self, values: &[T]) {
		let cap = self.capacity();
		let values = if values.len() > cap {
			self.clear();
			&values[values.len() - cap..]
		} else {
			values
		};
		let evict = (self.len() + values.len()).saturating_sub(cap);
		for _ in 0..evict {
			self.pop_front();
		}

		let n = self.n();
		let count = values.len();
		let start = self.tail;
		let until_edge = n - start;
		let (a, b) = if until_edge >= count {
			(start..start + count, 0..0)
		} else {
			(start..n, 0..count - until_edge)
		};
		let (front, back) = values.split_at(a.len());
		let slots = self.storage.slots_mut();
		for (slot, value) in slots[a].iter_mut().zip(front) {
			slot.write(value.clone());
		}
		for (slot, value) in slots[b].iter_mut().zip(back) {
			slot.write(value.clone());
		}
		self.tail = pos::advance(start, count as isize, n);
	}

	/// Clones up to `target.len()` elements out of the ring front-to-back,
	/// without consuming them. Returns the number copied.
	pub fn copy_to(&self, target: &mut [T]) -> usize {
		let count = min(target.len(), self.len());
		let (a, b) = self.as_slices();
		let a_len = min(a.len(), count);
		target[..a_len].clone_from_slice(&a[..a_len]);
		target[a_len..count].clone_from_slice(&b[..count - a_len]);
		count
	}

	/// Resizes the logical window in place. Growing clones `value`; growing
	/// past `capacity()` is a contract violation.
	pub fn resize(&mut self, len: usize, value: T) {
		assert_le!(len, self.capacity(), "cannot resize past capacity");
		if len <= self.len() {
			self.truncate(len);
		} else {
			while self.len() < len {
				self.push_back(value.clone());
			}
		}
	}
}

impl<T, S: Storage<T>> Drop for RingDeque<T, S> {
	fn drop(&mut self) {
		self.clear();
	}
}

impl<T, S: Storage<T>> Extend<T> for RingDeque<T, S> {
	/// Pushes each element to the back, evicting from the front once full.
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for value in iter {
			self.push_back(value);
		}
	}
}

impl<T> FromIterator<T> for HeapRing<T> {
	/// Collects into a heap ring whose capacity is the element count.
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let values: Vec<T> = iter.into_iter().collect();
		let mut ring = Self::with_capacity(values.len().max(1));
		ring.extend(values);
		ring
	}
}

impl<T: Clone> From<&[T]> for HeapRing<T> {
	fn from(values: &[T]) -> Self {
		values.iter().cloned().collect()
	}
}

impl<T: Clone, S: OwnedStorage<T>> Clone for RingDeque<T, S> {
	fn clone(&self) -> Self {
		let mut clone = Self::with_storage(S::fresh(self.n()));
		for value in self {
			clone.push_back(value.clone());
		}
		clone
	}
}

impl<T, S: Storage<T>> IntoIterator for RingDeque<T, S> {
	type Item = T;
	type IntoIter = IntoIter<T, S>;

	fn into_iter(self) -> Self::IntoIter {
		IntoIter::new(self)
	}
}

impl<'a, T, S: Storage<T>> IntoIterator for &'a RingDeque<T, S> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<'a, T, S: Storage<T>> IntoIterator for &'a mut RingDeque<T, S> {
	type Item = &'a mut T;
	type IntoIter = IterMut<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter_mut()
	}
}

impl<T, S: Storage<T>> Index<usize> for RingDeque<T, S> {
	type Output = T;

	fn index(&self, index: usize) -> &T {
		self.get(index).expect("index out of bounds")
	}
}

impl<T, S: Storage<T>> IndexMut<usize> for RingDeque<T, S> {
	fn index_mut(&mut self, index: usize) -> &mut T {
		self.get_mut(index).expect("index out of bounds")
	}
}

impl<T: fmt::Debug, S: Storage<T>> fmt::Debug for RingDeque<T, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

// Comparisons are sequence comparisons over the iterators; physical layout is
// not logical order, so raw memory is never compared.

impl<T: PartialEq, S1: Storage<T>, S2: Storage<T>> PartialEq<RingDeque<T, S2>> for RingDeque<T, S1> {
	fn eq(&self, other: &RingDeque<T, S2>) -> bool {
		self.len() == other.len() && self.iter().eq(other.iter())
	}
}

impl<T: Eq, S: Storage<T>> Eq for RingDeque<T, S> { }

impl<T: PartialEq, S: Storage<T>> PartialEq<[T]> for RingDeque<T, S> {
	fn eq(&self, other: &[T]) -> bool {
		self.len() == other.len() && self.iter().eq(other)
	}
}

impl<T: PartialEq, S: Storage<T>, const M: usize> PartialEq<[T; M]> for RingDeque<T, S> {
	fn eq(&self, other: &[T; M]) -> bool {
		self == &other[..]
	}
}

impl<T: PartialOrd, S1: Storage<T>, S2: Storage<T>> PartialOrd<RingDeque<T, S2>> for RingDeque<T, S1> {
	fn partial_cmp(&self, other: &RingDeque<T, S2>) -> Option<Ordering> {
		self.iter().partial_cmp(other.iter())
	}
}

impl<T: Ord, S: Storage<T>> Ord for RingDeque<T, S> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.iter().cmp(other.iter())
	}
}

#[cfg(test)]
mod test {
	use std::collections::VecDeque;
	use std::fmt;
	use std::fmt::{Debug, Formatter};
	use quickcheck::{Arbitrary, Gen};
	use quickcheck_macros::quickcheck;
	use super::{ArrayRing, HeapRing};

	const CAP: usize = 12;

	/// A generated ring with arbitrary head offset and length, paired with the
	/// value sequence it holds.
	#[derive(Clone)]
	struct TestRing {
		ring: ArrayRing<u32, 13>,
		values: Vec<u32>,
	}

	impl TestRing {
		fn new(off: usize, len: usize) -> Self {
			let mut ring = ArrayRing::new();
			// Rotate the window so properties cover the wrap point.
			for i in 0..off as u32 {
				ring.push_back(i);
			}
			for _ in 0..off {
				ring.pop_front();
			}
			let values: Vec<u32> = (0..len as u32).map(|v| v * 7 + 1).collect();
			for &v in &values {
				ring.push_back(v);
			}
			Self { ring, values }
		}
	}

	impl Debug for TestRing {
		fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
			let (a, b) = self.ring.as_slices();
			f.debug_tuple("TestRing").field(&a).field(&b).finish()
		}
	}

	impl Arbitrary for TestRing {
		fn arbitrary(g: &mut Gen) -> Self {
			let off = usize::arbitrary(g) % (CAP + 1);
			let len = usize::arbitrary(g) % (CAP + 1);
			Self::new(off, len)
		}

		fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
			let len = self.values.len();
			Box::new((0..len).rev().map(|len| Self::new(0, len)))
		}
	}

	/// One mutation from the container's operation set, for invariant checks
	/// against a `VecDeque` model.
	#[derive(Clone, Debug)]
	enum Op {
		PushBack(u32),
		PushFront(u32),
		PopBack,
		PopFront,
		Insert(usize, u32),
		Remove(usize),
		Clear,
	}

	impl Arbitrary for Op {
		fn arbitrary(g: &mut Gen) -> Self {
			let v = u32::arbitrary(g);
			let i = usize::arbitrary(g);
			match u8::arbitrary(g) % 12 {
				0 | 1 | 2 => Op::PushBack(v),
				3 | 4     => Op::PushFront(v),
				5         => Op::PopBack,
				6         => Op::PopFront,
				7 | 8     => Op::Insert(i, v),
				9 | 10    => Op::Remove(i),
				_         => Op::Clear,
			}
		}
	}

	impl Op {
		fn apply(&self, ring: &mut ArrayRing<u32, 13>, model: &mut VecDeque<u32>) {
			match *self {
				Op::PushBack(v) => {
					if model.len() == CAP {
						model.pop_front();
					}
					model.push_back(v);
					ring.push_back(v);
				}
				Op::PushFront(v) => {
					if model.len() == CAP {
						model.pop_back();
					}
					model.push_front(v);
					ring.push_front(v);
				}
				Op::PopBack => assert_eq!(ring.pop_back(), model.pop_back()),
				Op::PopFront => assert_eq!(ring.pop_front(), model.pop_front()),
				Op::Insert(i, v) => {
					let i = i % (model.len() + 1);
					let mut at = i;
					if model.len() == CAP {
						model.pop_front();
						at = i.saturating_sub(1);
					}
					model.insert(at, v);
					assert_eq!(ring.insert(i, v), at);
				}
				Op::Remove(i) => {
					let removed = ring.remove(i);
					assert_eq!(removed, (i < model.len()).then(|| model.remove(i)).flatten());
				}
				Op::Clear => {
					model.clear();
					ring.clear();
				}
			}
		}
	}

	#[quickcheck]
	fn tracks_model_with_invariants(ops: Vec<Op>) {
		let mut ring = ArrayRing::<u32, 13>::new();
		let mut model = VecDeque::new();
		for op in &ops {
			op.apply(&mut ring, &mut model);
			assert!(ring.len() <= ring.capacity(), "capacity invariant broken by {op:?}");
			assert_eq!(ring.len(), model.len());
			assert!(ring.iter().eq(model.iter()), "{op:?} diverged from model");
		}
	}

	#[quickcheck]
	fn fifo_round_trip(TestRing { mut ring, values }: TestRing) {
		for (i, &v) in values.iter().enumerate() {
			assert_eq!(ring.pop_front(), Some(v), "value {i}");
		}
		assert_eq!(ring.pop_front(), None);
	}

	#[quickcheck]
	fn eviction_keeps_newest(TestRing { mut ring, values }: TestRing) {
		for _ in ring.len()..CAP {
			ring.push_back(0);
		}
		ring.push_back(99_999);
		assert!(ring.is_full());
		assert_eq!(ring.back(), Some(&99_999));
		// The oldest surviving element moved up by one.
		if let Some(&second) = values.get(1) {
			assert_eq!(ring.front(), Some(&second));
		}
	}

	#[quickcheck]
	fn insert_remove_is_identity(TestRing { mut ring, values }: TestRing, index: usize) {
		if ring.is_full() {
			// A full ring would evict on insert; identity only holds below capacity.
			ring.pop_front();
		}
		let before: Vec<u32> = ring.iter().copied().collect();
		let index = index % (ring.len() + 1);
		let at = ring.insert(index, 424_242);
		assert_eq!(ring.remove(at), Some(424_242));
		assert!(ring.iter().eq(before.iter()), "insert/remove at {index} of {values:?}");
	}

	#[quickcheck]
	fn split_spans_cover_window(TestRing { ring, values }: TestRing) {
		let mut spans = Vec::new();
		let mut total = 0;
		ring.split(|span| {
			total += span.len();
			spans.extend_from_slice(span);
		});
		assert_eq!(total, ring.len());
		assert_eq!(spans, values);
	}

	#[quickcheck]
	fn append_then_copy_round_trips(TestRing { mut ring, .. }: TestRing, data: Vec<u32>) {
		ring.append(&data);
		let expect: Vec<u32> = ring.iter().copied().collect();
		let mut out = vec![0; expect.len()];
		assert_eq!(ring.copy_to(&mut out), expect.len());
		assert_eq!(out, expect);
		// The newest values always survive an append.
		let tail_len = data.len().min(CAP).min(ring.len());
		assert!(expect.ends_with(&data[data.len() - tail_len..]));
	}

	#[quickcheck]
	fn ordering_is_lexicographic(a: Vec<u32>, b: Vec<u32>) {
		let ra: HeapRing<u32> = a.iter().copied().collect();
		let rb: HeapRing<u32> = b.iter().copied().collect();
		assert_eq!(ra.partial_cmp(&rb), a.partial_cmp(&b));
		assert_eq!(ra == rb, a == b);
	}

	#[quickcheck]
	fn cursor_order_is_logical(TestRing { ring, .. }: TestRing, i: usize, j: usize) {
		if ring.is_empty() {
			return;
		}
		let (i, j) = (i % ring.len(), j % ring.len());
		let (ci, cj) = (ring.cursor(i), ring.cursor(j));
		assert_eq!(ci.cmp(&cj), i.cmp(&j), "ranks {i} and {j}");
		assert_eq!(cj - ci, j as isize - i as isize);
		assert_eq!(ci.value(), ring.get(i));
	}

	#[quickcheck]
	fn iter_mut_writes_through(TestRing { mut ring, values }: TestRing) {
		for v in ring.iter_mut() {
			*v = v.wrapping_mul(3);
		}
		let expect: Vec<u32> = values.iter().map(|v| v.wrapping_mul(3)).collect();
		assert_eq!(ring, expect[..]);
		// The reverse mutable walk reaches the same elements.
		for v in ring.iter_mut().rev() {
			*v = v.wrapping_add(1);
		}
		let expect: Vec<u32> = expect.iter().map(|v| v.wrapping_add(1)).collect();
		assert_eq!(ring, expect[..]);
	}

	#[quickcheck]
	fn assign_replaces_contents(TestRing { mut ring, .. }: TestRing, values: Vec<u32>) {
		ring.assign(values.iter().copied());
		let keep = values.len().min(CAP);
		assert_eq!(ring, values[values.len() - keep..]);
	}

	#[quickcheck]
	fn retain_matches_filter(TestRing { mut ring, values }: TestRing) {
		ring.retain(|v| v % 3 != 0);
		let kept: Vec<u32> = values.into_iter().filter(|v| v % 3 != 0).collect();
		assert_eq!(ring, kept[..]);
	}

	#[quickcheck]
	fn remove_range_closes_gap(TestRing { mut ring, values }: TestRing, start: usize, end: usize) {
		let len = ring.len();
		let (start, end) = (start % (len + 1), end % (len + 1));
		let (start, end) = (start.min(end), start.max(end));
		assert_eq!(ring.remove_range(start..end), end - start);
		let mut expect = values;
		expect.drain(start..end);
		assert_eq!(ring, expect[..]);
	}

	#[quickcheck]
	fn clone_is_element_wise(TestRing { ring, .. }: TestRing) {
		let clone = ring.clone();
		assert_eq!(clone, ring);
		assert_eq!(clone.len(), ring.len());
	}

	#[test]
	fn drops_are_balanced() {
		use std::rc::Rc;

		let tracker = Rc::new(());
		let mut ring = ArrayRing::<Rc<()>, 5>::new();
		for _ in 0..10 {
			ring.push_back(tracker.clone());
		}
		assert_eq!(Rc::strong_count(&tracker), 5);
		ring.remove(1);
		ring.insert(2, tracker.clone());
		ring.truncate(3);
		assert_eq!(Rc::strong_count(&tracker), 4);
		drop(ring);
		assert_eq!(Rc::strong_count(&tracker), 1);
	}

	#[test]
	fn resize_within_capacity() {
		let mut ring = HeapRing::with_capacity(6);
		ring.resize(4, 7u32);
		assert_eq!(ring, [7, 7, 7, 7]);
		ring.resize(2, 0);
		assert_eq!(ring, [7, 7]);
	}

	#[test]
	#[should_panic = "cannot resize past capacity"]
	fn resize_past_capacity_panics() {
		let mut ring = HeapRing::with_capacity(2);
		ring.resize(3, 0u32);
	}
}
