use core::fmt;
use core::iter::FusedIterator;
use core::ptr;
use core::slice;

use crate::array::DynArray;
use crate::raw_buffer::RawBuffer;

/// Owning iterator over the values of a `DynArray`
///
/// Takes over the array's buffer; values not yet yielded are dropped together
/// with the iterator.
pub struct IntoIter<T> {
    buf: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// Returns the values not yet yielded.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // Safe: slots [start, end) are still live
        unsafe { slice::from_raw_parts(self.buf.element_ptr(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // Safe: the slot was live and is now outside [start, end)
        Some(unsafe { self.buf.element_ptr(index).read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // Safe: the slot was live and is now outside [start, end)
        Some(unsafe { self.buf.element_ptr(self.end).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        let first = self.buf.element_ptr(self.start);
        self.start = self.end;
        // Safe: the values in the remaining range were never yielded
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, remaining)) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let (buf, len) = self.into_raw_parts();
        IntoIter {
            buf,
            start: 0,
            end: len,
        }
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
