use bstree::{AllocError, Bounded, Error, First, Set, Tree};

use crate::init_tracing;

fn values(set: &Set<i32>) -> Vec<i32> {
    set.iter().copied().collect()
}

#[test]
fn duplicate_in_initial_sequence_is_rejected() {
    init_tracing();
    let mut set = Set::new();
    for x in [4, 2, 1, 1] {
        set.insert(x).unwrap();
    }

    assert_eq!(values(&set), [1, 2, 4]);
    assert_eq!(set.len(), 3);
}

#[test]
fn begin_and_before_end_of_singleton() {
    let set = Set::from([1]);

    assert_eq!(set.get(set.begin()), Some(&1));
    assert_eq!(set.get(set.prev(set.end())), Some(&1));
    assert_eq!(set.get(set.end()), None);
}

#[test]
fn erase_first() {
    init_tracing();
    let mut set = Set::from([1, 2]);
    set.erase(set.begin()).unwrap();

    assert_eq!(set.get(set.begin()), Some(&2));
    assert_eq!(values(&set), [2]);
}

#[test]
fn erase_middle() {
    let mut set = Set::from([1, 2, 3]);
    let middle = set.next(set.begin());
    set.erase(middle).unwrap();

    assert_eq!(set.get(set.begin()), Some(&1));
    assert_eq!(values(&set), [1, 3]);
}

#[test]
fn insert_same_value_twice() {
    let mut set = Set::new();

    let (cursor, inserted) = set.insert(1).unwrap();
    assert!(inserted);
    assert_eq!(set.get(cursor), Some(&1));

    let (cursor, inserted) = set.insert(1).unwrap();
    assert!(!inserted);
    assert_eq!(cursor, set.end());
}

#[test]
fn clear_empty_set() {
    let mut set: Set<i32> = Set::new();
    set.clear();

    assert_eq!(set.len(), 0);
    assert_eq!(set.begin(), set.end());
}

#[test]
fn erase_errors_leave_set_alone() {
    init_tracing();
    let mut empty: Set<i32> = Set::new();
    assert_eq!(empty.erase(empty.begin()), Err(Error::Empty));

    let mut set = Set::from([1, 2]);
    assert_eq!(set.erase(set.end()), Err(Error::InvalidPosition));

    let stranger = Set::from([1, 2]);
    assert_eq!(set.erase(stranger.begin()), Err(Error::InvalidPosition));
    assert_eq!(values(&set), [1, 2]);
}

#[test]
fn first_and_last_of_empty_set() {
    let set: Set<i32> = Set::new();
    assert_eq!(set.first(), Err(Error::Empty));
    assert_eq!(set.last(), Err(Error::Empty));
}

#[test]
fn move_leaves_source_empty() {
    let mut source = Set::from([1, 2, 3]);
    let three = source.find(&3);
    let target = std::mem::take(&mut source);

    assert!(source.is_empty());
    assert_eq!(values(&target), [1, 2, 3]);
    // Moving a set does not move its nodes.
    assert_eq!(target.get(three), Some(&3));
}

#[test]
fn bounded_set_reports_out_of_memory() {
    init_tracing();
    let mut set = Set::with_alloc(Bounded::new(1));
    set.insert("a").unwrap();

    assert_eq!(
        set.insert("b"),
        Err(Error::OutOfMemory(AllocError::LimitReached { limit: 1 }))
    );
    assert_eq!(set.len(), 1);
    assert!(!set.contains("b"));
}

#[test]
fn tree_backs_an_ordered_map() {
    let mut map: Tree<(&str, u32), First> = Tree::with_alloc(Default::default());
    for (word, count) in [("pear", 2), ("apple", 5), ("fig", 1), ("apple", 9)] {
        map.insert((word, count)).unwrap();
    }

    let words: Vec<_> = map.iter().map(|(word, _)| *word).collect();
    assert_eq!(words, ["apple", "fig", "pear"]);
    assert_eq!(map.get(map.find("apple")), Some(&("apple", 5)));
}
