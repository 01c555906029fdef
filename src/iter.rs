// SPDX-License-Identifier: Apache-2.0

//! Iteration over the logical window.
//!
//! [`Iter`] and [`IterMut`] walk the (at most two) contiguous spans of the
//! window with plain slice iterators, so stepping never pays for wrap checks.
//! [`Cursor`] is the random-access view: a (buffer, physical position) pair
//! whose ordering and subtraction go through the buffer's position arithmetic
//! and are therefore correct across the wrap point.

use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::ops::Sub;
use std::slice;
use crate::pos;
use crate::ring::RingDeque;
use crate::storage::Storage;

/// Iterates over ring elements front-to-back.
pub struct Iter<'a, T: 'a> {
	a: slice::Iter<'a, T>,
	b: slice::Iter<'a, T>,
}

/// Iterates mutably over ring elements front-to-back.
pub struct IterMut<'a, T: 'a> {
	a: slice::IterMut<'a, T>,
	b: slice::IterMut<'a, T>,
}

/// Consumes a ring, yielding its elements front-to-back.
pub struct IntoIter<T, S: Storage<T>> {
	ring: RingDeque<T, S>,
}

impl<'a, T> Iter<'a, T> {
	pub(crate) fn new(a: &'a [T], b: &'a [T]) -> Self {
		Self { a: a.iter(), b: b.iter() }
	}
}

impl<'a, T> IterMut<'a, T> {
	pub(crate) fn new(a: &'a mut [T], b: &'a mut [T]) -> Self {
		Self { a: a.iter_mut(), b: b.iter_mut() }
	}
}

impl<T, S: Storage<T>> IntoIter<T, S> {
	pub(crate) fn new(ring: RingDeque<T, S>) -> Self {
		Self { ring }
	}
}

impl<'a, T> Clone for Iter<'a, T> {
	fn clone(&self) -> Self {
		Self { a: self.a.clone(), b: self.b.clone() }
	}
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		let Self { a, b } = self;
		a.next().or_else(|| {
			mem::swap(a, b);
			a.next()
		})
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.len();
		(len, Some(len))
	}

	fn last(mut self) -> Option<&'a T> { self.next_back() }

	fn fold<B, F>(self, mut acc: B, mut f: F) -> B
	where F: FnMut(B, Self::Item) -> B {
		acc = self.a.fold(acc, &mut f);
		self.b.fold(acc, &mut f)
	}
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
	fn next_back(&mut self) -> Option<&'a T> {
		let Self { a, b } = self;
		b.next_back().or_else(|| a.next_back())
	}

	fn rfold<B, F>(self, mut acc: B, mut f: F) -> B
	where F: FnMut(B, Self::Item) -> B {
		acc = self.b.rfold(acc, &mut f);
		self.a.rfold(acc, &mut f)
	}
}

impl<T> ExactSizeIterator for Iter<'_, T> {
	fn len(&self) -> usize {
		self.a.len() + self.b.len()
	}
}

impl<T> FusedIterator for Iter<'_, T> { }

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
	type Item = &'a mut T;

	fn next(&mut self) -> Option<&'a mut T> {
		let Self { a, b } = self;
		a.next().or_else(|| {
			mem::swap(a, b);
			a.next()
		})
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.len();
		(len, Some(len))
	}

	fn last(mut self) -> Option<&'a mut T> { self.next_back() }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
	fn next_back(&mut self) -> Option<&'a mut T> {
		let Self { a, b } = self;
		b.next_back().or_else(|| a.next_back())
	}
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
	fn len(&self) -> usize {
		self.a.len() + self.b.len()
	}
}

impl<T> FusedIterator for IterMut<'_, T> { }

impl<T, S: Storage<T>> Iterator for IntoIter<T, S> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		self.ring.pop_front()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.ring.len();
		(len, Some(len))
	}
}

impl<T, S: Storage<T>> DoubleEndedIterator for IntoIter<T, S> {
	fn next_back(&mut self) -> Option<T> {
		self.ring.pop_back()
	}
}

impl<T, S: Storage<T>> ExactSizeIterator for IntoIter<T, S> { }

impl<T, S: Storage<T>> FusedIterator for IntoIter<T, S> { }

/// A random-access cursor into a ring: the owning buffer paired with a
/// physical slot position.
///
/// Equality compares raw positions; ordering and subtraction compare logical
/// ranks (the distance from the buffer's first position), because raw
/// positions are not totally ordered across the wrap point. A cursor is only
/// meaningful while the ring is not structurally mutated.
pub struct Cursor<'a, T, S: Storage<T>> {
	ring: &'a RingDeque<T, S>,
	pos: usize,
}

impl<'a, T, S: Storage<T>> Cursor<'a, T, S> {
	pub(crate) fn new(ring: &'a RingDeque<T, S>, pos: usize) -> Self {
		Self { ring, pos }
	}

	/// Returns the logical rank: the cursor's offset from the ring's front.
	pub fn rank(&self) -> usize {
		pos::distance(self.ring.first_pos(), self.pos, self.ring.slot_count())
	}

	/// Returns the element under the cursor, or `None` for the past-the-end
	/// position.
	pub fn value(&self) -> Option<&'a T> {
		(self.rank() < self.ring.len()).then(|| unsafe {
			self.ring.slot_ref(self.pos)
		})
	}

	/// Moves the cursor by a signed element offset. The destination must stay
	/// within the window, end position included.
	pub fn advance(&mut self, by: isize) {
		self.pos = pos::advance(self.pos, by, self.ring.slot_count());
		debug_assert!(self.rank() <= self.ring.len());
	}

	/// Steps one element towards the back.
	pub fn next(&mut self) {
		self.advance(1);
	}

	/// Steps one element towards the front.
	pub fn prev(&mut self) {
		self.advance(-1);
	}

	/// Returns the element a signed offset away without moving the cursor.
	pub fn peek(&self, by: isize) -> Option<&'a T> {
		let mut probe = *self;
		probe.advance(by);
		probe.value()
	}
}

impl<T, S: Storage<T>> fmt::Debug for Cursor<'_, T, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Cursor")
			.field("pos", &self.pos)
			.field("rank", &self.rank())
			.finish()
	}
}

impl<T, S: Storage<T>> Clone for Cursor<'_, T, S> {
	fn clone(&self) -> Self { *self }
}

impl<T, S: Storage<T>> Copy for Cursor<'_, T, S> { }

impl<T, S: Storage<T>> PartialEq for Cursor<'_, T, S> {
	fn eq(&self, other: &Self) -> bool {
		self.pos == other.pos
	}
}

impl<T, S: Storage<T>> Eq for Cursor<'_, T, S> { }

impl<T, S: Storage<T>> PartialOrd for Cursor<'_, T, S> {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl<T, S: Storage<T>> Ord for Cursor<'_, T, S> {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.rank().cmp(&other.rank())
	}
}

impl<T, S: Storage<T>> Sub for Cursor<'_, T, S> {
	type Output = isize;

	/// Returns the signed rank difference between two cursors into the same
	/// ring.
	fn sub(self, other: Self) -> isize {
		self.rank() as isize - other.rank() as isize
	}
}
