use crate::{Interval, IntervalSet};

fn spans(set: &IntervalSet) -> Vec<(i32, i32)> {
    set.intervals().iter().map(|iv| (iv.start, iv.end)).collect()
}

#[test]
fn add_keeps_intervals_sorted_and_disjoint() {
    let mut set = IntervalSet::new();
    set.add_range(10, 20);
    set.add(1);
    set.add_range(30, 40);

    assert_eq!(spans(&set), vec![(1, 1), (10, 20), (30, 40)]);
}

#[test]
fn add_merges_overlapping_and_adjacent() {
    let mut set = IntervalSet::new();
    set.add_range(1, 3);
    set.add_range(7, 9);
    set.add_range(4, 6);

    assert_eq!(spans(&set), vec![(1, 9)]);

    set.add_range(20, 25);
    set.add_range(0, 22);
    assert_eq!(spans(&set), vec![(0, 25)]);
}

#[test]
fn add_ignores_inverted_bounds() {
    let mut set = IntervalSet::new();
    set.add_range(5, 2);

    assert!(set.is_empty());
}

#[test]
fn equal_elements_compare_equal() {
    let a: IntervalSet = [1, 2, 3, 5].into_iter().collect();
    let mut b = IntervalSet::range(1, 3);
    b.add(5);

    assert_eq!(a, b);
}

#[test]
fn contains_and_intersects() {
    let mut set = IntervalSet::range('a' as i32, 'f' as i32);
    set.add('x' as i32);

    assert!(set.contains('a' as i32));
    assert!(set.contains('f' as i32));
    assert!(set.contains('x' as i32));
    assert!(!set.contains('g' as i32));

    assert!(set.intersects_range('e' as i32, 'k' as i32));
    assert!(!set.intersects_range('g' as i32, 'w' as i32));
    assert!(set.intersects_range('w' as i32, 'z' as i32));
}

#[test]
fn complement_within_vocabulary() {
    let mut set = IntervalSet::range(3, 4);
    set.add(7);

    let inverted = set.complement(1, 8);

    assert_eq!(spans(&inverted), vec![(1, 2), (5, 6), (8, 8)]);
}

#[test]
fn complement_of_full_range_is_empty() {
    let set = IntervalSet::range(0, 0x10FFFF);

    assert!(set.complement(0, 0x10FFFF).is_empty());
}

#[test]
fn subtract_splits_intervals() {
    let set = IntervalSet::range(0, 100);
    let cut: IntervalSet = [0, 50, 100].into_iter().collect();

    assert_eq!(spans(&set.subtract(&cut)), vec![(1, 49), (51, 99)]);
}

#[test]
fn len_counts_elements() {
    let mut set = IntervalSet::range(1, 10);
    set.add(20);

    assert_eq!(set.len(), 11);
    assert_eq!(set.min_element(), Some(1));
    assert_eq!(set.max_element(), Some(20));
    assert_eq!(set.single_element(), None);
    assert_eq!(IntervalSet::of(4).single_element(), Some(4));
    assert_eq!(Interval::new(3, 2).len(), 0);
}

#[test]
fn display() {
    let mut set = IntervalSet::range(1, 3);
    set.add(-1);

    assert_eq!(set.to_string(), "{-1, 1..3}");
    assert_eq!(IntervalSet::of(9).to_string(), "9");
}
