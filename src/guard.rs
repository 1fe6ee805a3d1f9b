use core::mem;
use core::ptr;

/// Tracks a run of slots being filled left to right.
///
/// If construction unwinds before `finish` is called, the values written so far
/// are dropped and the remaining slots are left untouched, so the caller's
/// length never covers a half-built run.
pub(crate) struct PartialInit<T> {
    start: *mut T,
    initialized: usize,
}

impl<T> PartialInit<T> {
    /// # Safety
    ///
    /// `start` must point at uninitialized, writable slots, as many as will be
    /// pushed, that nothing else reads or drops while the guard is alive.
    pub(crate) unsafe fn new(start: *mut T) -> Self {
        Self {
            start,
            initialized: 0,
        }
    }

    /// # Safety
    ///
    /// There must be room for one more slot after the ones already written.
    pub(crate) unsafe fn push(&mut self, value: T) {
        unsafe { self.start.add(self.initialized).write(value) };
        self.initialized += 1;
    }

    /// Disarms the guard and returns the number of slots it filled.
    pub(crate) fn finish(self) -> usize {
        let initialized = self.initialized;
        mem::forget(self);
        initialized
    }
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        // Safe: exactly the first `initialized` slots hold values written by `push`
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.initialized));
        }
    }
}

/// Constructs `count` values from `f` into the slots starting at `start`.
///
/// # Safety
///
/// Same contract as `PartialInit::new` for `count` slots.
pub(crate) unsafe fn fill_with<T, F>(start: *mut T, count: usize, mut f: F)
where
    F: FnMut() -> T,
{
    let mut run = unsafe { PartialInit::new(start) };
    for _ in 0..count {
        unsafe { run.push(f()) };
    }
    run.finish();
}

/// Clones every element of `src`, in order, into the slots starting at `start`.
///
/// # Safety
///
/// Same contract as `PartialInit::new` for `src.len()` slots, which must not
/// overlap `src`.
pub(crate) unsafe fn clone_into<T: Clone>(start: *mut T, src: &[T]) {
    let mut run = unsafe { PartialInit::new(start) };
    for item in src {
        unsafe { run.push(item.clone()) };
    }
    run.finish();
}
