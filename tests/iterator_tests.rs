mod common;

use common::Counters;
use dynarray::{dynarray, DynArray};

#[test]
fn test_iter_in_insertion_order() {
    let array = dynarray![3, 1, 4, 1, 5];

    let collected: Vec<_> = array.iter().copied().collect();
    assert_eq!(collected, vec![3, 1, 4, 1, 5]);

    let mut total = 0;
    for value in &array {
        total += value;
    }
    assert_eq!(total, 14);
}

#[test]
fn test_iter_mut() {
    let mut array = dynarray![1, 2, 3];

    for value in &mut array {
        *value *= 10;
    }
    array.iter_mut().rev().take(1).for_each(|v| *v += 1);

    assert_eq!(array, [10, 20, 31]);
}

#[test]
fn test_empty_iteration() {
    let array: DynArray<String> = DynArray::new();
    assert_eq!(array.iter().count(), 0);
    assert_eq!(array.into_iter().next(), None);
}

#[test]
fn test_into_iter_moves_values() {
    let array = dynarray![String::from("a"), String::from("b"), String::from("c")];

    let mut iter = array.into_iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next(), Some(String::from("a")));
    assert_eq!(iter.as_slice(), &[String::from("b"), String::from("c")]);
    assert_eq!(iter.next_back(), Some(String::from("c")));
    assert_eq!(iter.size_hint(), (1, Some(1)));
    assert_eq!(iter.next(), Some(String::from("b")));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
}

#[test]
fn test_into_iter_rev() {
    let array = dynarray![1, 2, 3, 4];
    let reversed: Vec<_> = array.into_iter().rev().collect();
    assert_eq!(reversed, vec![4, 3, 2, 1]);
}

#[test]
fn test_into_iter_partial_consumption_drops_rest() {
    let counters = Counters::new();
    let mut array = DynArray::new();
    for i in 0..6 {
        array.push_back(counters.make(i));
    }

    let mut iter = array.into_iter();
    let first = iter.next();
    let last = iter.next_back();
    assert_eq!(first.map(|t| t.value), Some(0));
    assert_eq!(last.map(|t| t.value), Some(5));
    assert_eq!(counters.live(), 4);

    drop(iter);
    assert_eq!(counters.live(), 0);
    assert_eq!(counters.clones(), 0);
}

#[test]
fn test_into_iter_debug() {
    let array = dynarray![1, 2];
    let mut iter = array.into_iter();
    iter.next();
    assert_eq!(format!("{iter:?}"), "IntoIter([2])");
}

#[test]
fn test_collect_and_extend() {
    let mut array: DynArray<u32> = (1..=4).collect();
    assert_eq!(array, [1, 2, 3, 4]);

    array.extend(5..=6);
    array.extend(&[7, 8]);
    assert_eq!(array, [1, 2, 3, 4, 5, 6, 7, 8]);

    let doubled: DynArray<u32> = array.iter().map(|v| v * 2).collect();
    assert_eq!(doubled.last(), Some(&16));
}

#[test]
fn test_iterator_adapters_over_slice() {
    let array: DynArray<i32> = (0..10).collect();

    assert_eq!(array.iter().filter(|v| *v % 2 == 0).count(), 5);
    assert_eq!(array.iter().max(), Some(&9));
    assert!(array.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(array.chunks(4).count(), 3);
}
