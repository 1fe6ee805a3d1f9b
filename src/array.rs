use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

use crate::error::DynArrayError;
use crate::guard;
use crate::raw_buffer::{raise, RawBuffer};

/// Capacity of the first buffer allocated by a growing, empty array
const MIN_NON_ZERO_CAPACITY: usize = 1;
const GROWTH_FACTOR: usize = 2;

/// A growable array owning one contiguous buffer
///
/// Slots `[0, len)` of the buffer hold live values; slots `[len, capacity)` are
/// uninitialized. Every operation restores that split before returning, also
/// when a constructor or `Clone` panics halfway.
pub struct DynArray<T> {
    pub(crate) buf: RawBuffer<T>,
    pub(crate) len: usize,
}

impl<T> DynArray<T> {
    /// Creates an empty array. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
        }
    }

    /// Creates an empty array with room for exactly `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: RawBuffer::allocate(capacity),
            len: 0,
        }
    }

    /// Creates an empty array with room for exactly `capacity` values.
    ///
    /// # Errors
    ///
    /// Returns the allocation error from `RawBuffer::try_allocate`.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, DynArrayError> {
        Ok(Self {
            buf: RawBuffer::try_allocate(capacity)?,
            len: 0,
        })
    }

    /// Creates an array of `len` default values, with capacity exactly `len`.
    ///
    /// If `T::default` panics, the values already built are dropped and the
    /// buffer is released before the panic propagates.
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        match Self::try_build_with(len, T::default) {
            Ok(array) => array,
            Err(err) => raise(&err),
        }
    }

    /// Fallible form of [`DynArray::with_len`].
    ///
    /// # Errors
    ///
    /// Returns the allocation error; no value is constructed in that case.
    pub fn try_with_len(len: usize) -> Result<Self, DynArrayError>
    where
        T: Default,
    {
        Self::try_build_with(len, T::default)
    }

    /// Creates an array of `len` clones of `elem`.
    #[must_use]
    pub fn from_elem(elem: T, len: usize) -> Self
    where
        T: Clone,
    {
        match Self::try_build_with(len, || elem.clone()) {
            Ok(array) => array,
            Err(err) => raise(&err),
        }
    }

    fn try_build_with<F>(len: usize, f: F) -> Result<Self, DynArrayError>
    where
        F: FnMut() -> T,
    {
        let mut buf = RawBuffer::try_allocate(len)?;
        // Safe: the fresh buffer has exactly `len` uninitialized slots
        unsafe { guard::fill_with(buf.as_mut_ptr(), len, f) };
        Ok(Self { buf, len })
    }

    /// Deep copy with allocation failure reported instead of raised.
    ///
    /// # Errors
    ///
    /// Returns the allocation error; `self` is never modified.
    pub fn try_clone(&self) -> Result<Self, DynArrayError>
    where
        T: Clone,
    {
        let mut buf = RawBuffer::try_allocate(self.len)?;
        // Safe: the fresh buffer has exactly `self.len` slots and cannot overlap `self`
        unsafe { guard::clone_into(buf.as_mut_ptr(), self.as_slice()) };
        Ok(Self { buf, len: self.len })
    }

    /// Returns the number of live values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of values the array can hold without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Number of uninitialized slots left before the next reallocation.
    #[inline]
    #[must_use]
    pub fn spare_capacity(&self) -> usize {
        self.buf.capacity() - self.len
    }

    /// Returns a pointer to the first slot of the buffer.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Returns a mutable pointer to the first slot of the buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// Returns the live values as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // Safe: slots [0, len) are initialized
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// Returns the live values as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // Safe: slots [0, len) are initialized and borrowed exclusively
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Ensures the capacity is at least `new_capacity` slots.
    ///
    /// `new_capacity` is an absolute slot count, not a number of additional
    /// slots. When it exceeds the current capacity, a buffer of exactly that
    /// size is allocated and the elements are moved into it.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(err) = self.try_reserve(new_capacity) {
            raise(&err);
        }
    }

    /// Fallible form of [`DynArray::reserve`].
    ///
    /// # Errors
    ///
    /// Returns the allocation error. The array is left unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), DynArrayError> {
        if new_capacity <= self.buf.capacity() {
            return Ok(());
        }
        let new_buf = RawBuffer::try_allocate(new_capacity)?;
        self.relocate_into(new_buf);
        Ok(())
    }

    /// Shrinks the capacity to exactly `len`.
    pub fn shrink_to_fit(&mut self) {
        if self.buf.capacity() == self.len {
            return;
        }
        let new_buf = RawBuffer::allocate(self.len);
        self.relocate_into(new_buf);
    }

    /// Moves every live value into `new_buf` and makes it the array's buffer.
    fn relocate_into(&mut self, mut new_buf: RawBuffer<T>) {
        debug_assert!(new_buf.capacity() >= self.len);
        // Safe: both regions hold at least `len` slots and are distinct
        // allocations; the old slots are abandoned without being dropped
        unsafe { ptr::copy_nonoverlapping(self.buf.as_ptr(), new_buf.as_mut_ptr(), self.len) };
        self.adopt(new_buf);
    }

    /// Installs `new_buf`, whose slots are already populated, and releases the old region.
    fn adopt(&mut self, mut new_buf: RawBuffer<T>) {
        log::trace!(
            "dynarray reallocated: capacity {} -> {}, len={}",
            self.buf.capacity(),
            new_buf.capacity(),
            self.len
        );
        self.buf.swap(&mut new_buf);
        // `new_buf` now owns the old region, whose values have all been moved out
    }

    /// Makes room for `additional` more values without giving up amortized growth.
    ///
    /// Does nothing while the spare capacity suffices. Otherwise grows to the
    /// larger of `len + additional` and the doubled capacity.
    pub(crate) fn reserve_for_push(&mut self, additional: usize) {
        if additional <= self.spare_capacity() {
            return;
        }
        if let Err(err) = self.try_reserve_for_push(additional) {
            raise(&err);
        }
    }

    fn try_reserve_for_push(&mut self, additional: usize) -> Result<(), DynArrayError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(DynArrayError::CapacityOverflow {
                requested: additional,
            })?;
        self.try_reserve(needed.max(self.grown_capacity()?))
    }

    fn grown_capacity(&self) -> Result<usize, DynArrayError> {
        let capacity = self.buf.capacity();
        if capacity == 0 {
            return Ok(MIN_NON_ZERO_CAPACITY);
        }
        capacity
            .checked_mul(GROWTH_FACTOR)
            .ok_or(DynArrayError::CapacityOverflow {
                requested: capacity,
            })
    }

    /// Resizes to `new_len`, filling new slots with values produced by `f`.
    ///
    /// Shrinking drops the trailing values and keeps the capacity. Growing
    /// reserves exactly `new_len` slots first. If `f` panics, the values built
    /// by this call are dropped and the length is unchanged.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if let Err(err) = self.try_resize_with(new_len, f) {
            raise(&err);
        }
    }

    /// Fallible form of [`DynArray::resize_with`].
    ///
    /// # Errors
    ///
    /// Returns the allocation error before `f` is ever called.
    pub fn try_resize_with<F>(&mut self, new_len: usize, f: F) -> Result<(), DynArrayError>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        self.try_reserve(new_len)?;
        // Safe: try_reserve made slots [len, new_len) available and they are uninitialized
        unsafe { guard::fill_with(self.buf.element_ptr(self.len), new_len - self.len, f) };
        self.len = new_len;
        Ok(())
    }

    /// Resizes to `new_len`, default-constructing new values.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Fallible form of [`DynArray::resize`].
    ///
    /// # Errors
    ///
    /// Returns the allocation error. The array is left unchanged.
    pub fn try_resize(&mut self, new_len: usize) -> Result<(), DynArrayError>
    where
        T: Default,
    {
        self.try_resize_with(new_len, T::default)
    }

    /// Drops every value past `len`. Capacity is not changed.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        // Lower the length first: a panicking `Drop` then leaks the rest instead
        // of leaving dropped values inside the live range
        self.len = len;
        // Safe: slots [len, len + tail) were live and are now outside the live range
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.element_ptr(len),
                tail,
            ));
        }
    }

    /// Drops every value, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Appends `value` and returns a reference to it.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    pub fn push_back(&mut self, value: T) -> &mut T {
        self.emplace_back_with(|| value)
    }

    /// Appends the value built by `f` and returns a reference to it.
    ///
    /// With spare capacity the value is constructed directly in the next slot.
    /// Otherwise the capacity doubles (0 becomes 1): the new value is built in
    /// the new buffer first, then the existing values are moved in front of it.
    /// If `f` panics, the array is left exactly as it was.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    pub fn emplace_back_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        match self.try_emplace_back_with(f) {
            Ok(value) => value,
            Err(err) => raise(&err),
        }
    }

    /// Fallible form of [`DynArray::emplace_back_with`].
    ///
    /// # Errors
    ///
    /// Returns the allocation error without calling `f`.
    pub fn try_emplace_back_with<F>(&mut self, f: F) -> Result<&mut T, DynArrayError>
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        if len < self.buf.capacity() {
            // Safe: slot `len` is within capacity and uninitialized
            unsafe { self.buf.element_ptr(len).write(f()) };
        } else {
            let mut new_buf: RawBuffer<T> = RawBuffer::try_allocate(self.grown_capacity()?)?;
            // Safe: after doubling `len < new_buf.capacity()`, and the slot is
            // uninitialized. If `f` unwinds, only `new_buf` is discarded
            unsafe { new_buf.element_ptr(len).write(f()) };
            self.relocate_into(new_buf);
        }
        self.len = len + 1;
        // Safe: slot `len` was just initialized
        Ok(unsafe { &mut *self.buf.element_ptr(len) })
    }

    /// Removes the last value and returns it, or `None` if the array is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // Safe: the slot was live and is now outside the live range
        Some(unsafe { self.buf.element_ptr(self.len).read() })
    }

    /// Inserts `value` at `index`, shifting later values right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or on capacity overflow.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace_with(index, || value)
    }

    /// Inserts the value built by `f` at `index` and returns a reference to it.
    ///
    /// The value is always constructed before any existing value moves, so a
    /// panic in `f` leaves the array unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or on capacity overflow.
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        match self.try_emplace_with(index, f) {
            Ok(value) => value,
            Err(err) => raise(&err),
        }
    }

    /// Fallible form of [`DynArray::emplace_with`].
    ///
    /// # Errors
    ///
    /// Returns the allocation error without calling `f`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_emplace_with<F>(&mut self, index: usize, f: F) -> Result<&mut T, DynArrayError>
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        assert!(
            index <= len,
            "Insertion index {} out of bounds for length {}",
            index,
            len
        );
        if index == len {
            return self.try_emplace_back_with(f);
        }

        if len < self.buf.capacity() {
            let value = f();
            // Safe: slots [index, len] are within capacity; the overlapping move
            // opens a hole at `index` that is filled right away
            unsafe {
                let hole = self.buf.element_ptr(index);
                ptr::copy(hole, hole.add(1), len - index);
                hole.write(value);
            }
        } else {
            let mut new_buf: RawBuffer<T> = RawBuffer::try_allocate(self.grown_capacity()?)?;
            // Safe: the new buffer holds at least len + 1 slots; the value is built
            // before anything is moved, then the old values fill in around it
            unsafe {
                new_buf.element_ptr(index).write(f());
                let src = self.buf.as_ptr();
                let dst = new_buf.as_mut_ptr();
                ptr::copy_nonoverlapping(src, dst, index);
                ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), len - index);
            }
            self.adopt(new_buf);
        }
        self.len = len + 1;
        // Safe: slot `index` was just initialized
        Ok(unsafe { &mut *self.buf.element_ptr(index) })
    }

    /// Removes and returns the value at `index`, shifting later values left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "Removal index {} out of bounds for length {}",
            index,
            len
        );
        // Safe: `index` is live; the move closes the hole left by reading it out
        unsafe {
            let hole = self.buf.element_ptr(index);
            let value = hole.read();
            ptr::copy(hole.add(1), hole, len - index - 1);
            self.len = len - 1;
            value
        }
    }

    /// Drops the value at `index` and returns the index now holding its
    /// successor, which equals `len()` when the last value was erased.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Exchanges the full state of two arrays without moving any value.
    pub fn swap(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Gives up the buffer and the number of live values at its start.
    pub(crate) fn into_raw_parts(self) -> (RawBuffer<T>, usize) {
        let mut this = mem::ManuallyDrop::new(self);
        (this.buf.take(), this.len)
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // Safe: the live values are dropped exactly once; `buf` then frees the memory
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}
