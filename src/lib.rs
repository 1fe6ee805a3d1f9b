#![no_std]

//! `DynArray`: a growable array that manages its own raw buffer.
//!
//! `DynArray<T>` owns exactly one contiguous buffer and keeps the number of
//! allocated slots (the capacity) separate from the number of live values (the
//! length). The buffer itself is a [`RawBuffer`], which only allocates and
//! releases memory; `DynArray` decides which slots hold values and constructs,
//! moves and drops them explicitly.
//!
//! The crate is `no_std` and only needs `alloc`.
//!
//! Buffer layout: `[live values: 0..len][uninitialized: len..capacity]`
//!
//! # Performance Characteristics
//!
//! ## Time Complexity
//! - `push_back()`, `emplace_back_with()`: O(1) amortized, capacity doubles on overflow
//! - `pop_back()`: O(1), never reallocates
//! - `insert()`, `remove()`, `erase()`: O(n - index) values shifted
//! - `reserve()`, `resize()`: O(len) when they reallocate
//! - `swap()`, moves, `mem::take()`: O(1), no value is touched
//!
//! ## Growth
//! - An empty array grows to 1 slot, after that the capacity doubles: 1, 2, 4, 8, ...
//! - `reserve(n)` and `resize(n)` allocate exactly `n` slots when they have to grow
//! - Reallocation moves values bitwise and never calls `Clone`
//!
//! # Panic Safety
//!
//! Constructors passed to `emplace_*_with`, `Default::default` and `Clone::clone`
//! may panic. The array always stays consistent:
//! - Values are constructed in the new buffer before the old one is touched,
//!   so a panic in `push_back`/`insert`-style calls leaves the array unchanged
//! - `clone()` and `clone_from()` with reallocation either complete or leave
//!   the target unchanged; half-built copies are dropped
//! - `resize()` drops the values it already built and keeps the old length
//!
//! ```
//! # use dynarray::DynArray;
//! use std::panic::{catch_unwind, AssertUnwindSafe};
//!
//! let mut array: DynArray<String> = DynArray::new();
//! array.push_back("a".to_string());
//!
//! let result = catch_unwind(AssertUnwindSafe(|| {
//!     array.emplace_back_with(|| panic!("constructor failed"));
//! }));
//! assert!(result.is_err());
//! assert_eq!(array.len(), 1);
//! assert_eq!(array[0], "a");
//! ```
//!
//! # Allocation Failure
//!
//! Every allocating operation has a `try_*` variant that reports
//! [`DynArrayError`] instead of panicking, and leaves the array untouched:
//!
//! ```
//! # use dynarray::{DynArray, DynArrayError};
//! let mut array: DynArray<u64> = DynArray::new();
//! array.push_back(7);
//!
//! let err = array.try_reserve(usize::MAX).unwrap_err();
//! assert!(matches!(err, DynArrayError::CapacityOverflow { .. }));
//! assert_eq!(array.capacity(), 1);
//! assert_eq!(array, [7]);
//! ```
//!
//! # Vector Interface
//!
//! ```
//! # use dynarray::DynArray;
//! let mut array = DynArray::new();
//! array.push_back(1);
//! array.push_back(2);
//! array.push_back(3);
//! assert_eq!(array, [1, 2, 3]);
//!
//! array.insert(1, 9);
//! assert_eq!(array, [1, 9, 2, 3]);
//!
//! assert_eq!(array.erase(0), 0);
//! assert_eq!(array, [9, 2, 3]);
//!
//! assert_eq!(array.pop_back(), Some(3));
//! assert_eq!(array, [9, 2]);
//! ```
//!
//! `DynArray<T>` dereferences to `[T]`, so indexing, slicing and the slice
//! iterators work as usual:
//!
//! ```
//! # use dynarray::DynArray;
//! let mut array: DynArray<i32> = DynArray::with_len(3);
//! array[1] = 5;
//! for value in &mut array {
//!     *value += 1;
//! }
//! assert_eq!(array.iter().sum::<i32>(), 8);
//!
//! let collected: Vec<i32> = array.into_iter().collect();
//! assert_eq!(collected, vec![1, 6, 1]);
//! ```

extern crate alloc;

mod array;
mod error;
mod guard;
mod iter;
mod raw_buffer;
mod traits;

// Re-export public types and traits
pub use array::DynArray;
pub use error::DynArrayError;
pub use iter::IntoIter;
pub use raw_buffer::RawBuffer;
