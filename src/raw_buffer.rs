use alloc::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use crate::error::DynArrayError;

/// Uninitialized storage for up to `capacity` values of `T`.
///
/// A `RawBuffer` only manages memory. It never constructs, reads or drops a `T`:
/// the owner decides which slots hold live values and must drop them before the
/// buffer is released, otherwise those values are leaked.
///
/// Ownership can be moved or swapped but never duplicated, so `RawBuffer` does
/// not implement `Clone`.
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

// Safe: the region is owned exclusively, the same way `Box<[MaybeUninit<T>]>` owns it
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// Creates an empty buffer without touching the allocator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates uninitialized storage for `capacity` values.
    ///
    /// A zero capacity, or a zero-sized `T`, never calls the allocator.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::CapacityOverflow` if the byte size of the region
    /// would exceed `isize::MAX`, and `DynArrayError::AllocFailed` if the global
    /// allocator cannot provide the memory.
    pub fn try_allocate(capacity: usize) -> Result<Self, DynArrayError> {
        let layout = Self::layout_for(capacity)?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }

        // Safe: the layout has a non-zero size
        let raw = unsafe { alloc(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(DynArrayError::AllocFailed {
            size: layout.size(),
            align: layout.align(),
        })?;

        log::trace!(
            "allocated raw buffer: capacity={capacity}, bytes={}",
            layout.size()
        );
        Ok(Self {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Allocates uninitialized storage for `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow. Allocator failure is routed to
    /// `handle_alloc_error`, which aborts by default.
    #[must_use]
    pub fn allocate(capacity: usize) -> Self {
        match Self::try_allocate(capacity) {
            Ok(buffer) => buffer,
            Err(err) => raise(&err),
        }
    }

    fn layout_for(capacity: usize) -> Result<Layout, DynArrayError> {
        Layout::array::<T>(capacity).map_err(|_| DynArrayError::CapacityOverflow {
            requested: capacity,
        })
    }

    /// Returns the number of slots the region can hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the address of the first slot.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns the mutable address of the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the address of slot `index`.
    ///
    /// `index == capacity` is allowed and yields the one-past-the-end address.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than the capacity.
    #[inline]
    #[must_use]
    pub fn element_ptr(&self, index: usize) -> *mut T {
        assert!(
            index <= self.capacity,
            "Slot {} out of bounds for buffer of capacity {}",
            index,
            self.capacity
        );
        // Safe: the offset stays within the allocation or one past its end
        unsafe { self.ptr.as_ptr().add(index) }
    }

    /// Exchanges the regions owned by `self` and `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Moves the region out, leaving `self` empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Returns the region to the allocator and leaves the buffer empty.
    ///
    /// Contents are not dropped. Values still live in the region are leaked.
    pub fn release(&mut self) {
        if self.capacity == 0 {
            return;
        }

        let size = mem::size_of::<T>() * self.capacity;
        if size != 0 {
            // Safe: this is the layout `try_allocate` validated and allocated with
            unsafe {
                let layout = Layout::from_size_align_unchecked(size, mem::align_of::<T>());
                dealloc(self.ptr.as_ptr().cast::<u8>(), layout);
            }
            log::trace!(
                "released raw buffer: capacity={}, bytes={size}",
                self.capacity
            );
        }

        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }
}

/// Turns an allocation error into the infallible API's failure mode.
pub(crate) fn raise(err: &DynArrayError) -> ! {
    match *err {
        DynArrayError::AllocFailed { size, align } => match Layout::from_size_align(size, align) {
            Ok(layout) => handle_alloc_error(layout),
            Err(_) => panic!("{}", err),
        },
        DynArrayError::CapacityOverflow { .. } => panic!("{}", err),
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
