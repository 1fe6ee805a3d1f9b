use alloc::vec::Vec;
use core::borrow::{Borrow, BorrowMut};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::array::DynArray;
use crate::guard;
use crate::raw_buffer::raise;

impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(array) => array,
            Err(err) => raise(&err),
        }
    }

    /// Copy-assignment.
    ///
    /// When `source` does not fit in the current capacity, a complete copy is
    /// built aside and swapped in, so a panicking `clone` leaves `self` as it
    /// was. Otherwise the existing storage is reused: overlapping values are
    /// assigned with `clone_from`, surplus values are dropped and missing ones
    /// are cloned into the free slots.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut copy = source.clone();
            self.swap(&mut copy);
            return;
        }

        let common = self.len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source.as_slice()[..common]);
        if source.len <= self.len {
            self.truncate(source.len);
        } else {
            // Safe: source.len fits the capacity, so slots [common, source.len) are
            // free; they belong to `self` and cannot overlap `source`
            unsafe { guard::clone_into(self.buf.element_ptr(common), &source.as_slice()[common..]) };
            self.len = source.len;
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq<DynArray<U>> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &DynArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<[U]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T, U> PartialEq<Vec<U>> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: PartialOrd> PartialOrd for DynArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for DynArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Borrow<[T]> for DynArray<T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> BorrowMut<[T]> for DynArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve_for_push(lower);
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = DynArray::new();
        array.extend(iter);
        array
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    fn from(values: &[T]) -> Self {
        let mut array = DynArray::with_capacity(values.len());
        array.extend(values.iter().cloned());
        array
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(values: [T; N]) -> Self {
        let mut array = DynArray::with_capacity(N);
        array.extend(values);
        array
    }
}

/// Creates a [`DynArray`](crate::DynArray) from a list of values or from a
/// value and a count, like `vec!`.
///
/// ```
/// # use dynarray::dynarray;
/// let numbers = dynarray![1, 2, 3];
/// assert_eq!(numbers, [1, 2, 3]);
///
/// let zeros = dynarray![0u8; 4];
/// assert_eq!(zeros.len(), 4);
/// ```
#[macro_export]
macro_rules! dynarray {
    () => {
        $crate::DynArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynArray::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynArray::from([$($x),+])
    };
}
