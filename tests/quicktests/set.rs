use bstree::{Bounded, Set};

use std::collections::{BTreeSet, HashSet};

#[quickcheck]
fn ascending_and_unique(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut set = Set::new();
    for x in &xs {
        set.insert(*x).unwrap();
    }
    for delete in &deletes {
        set.remove(delete);
    }

    let walked: Vec<i8> = set.iter().copied().collect();
    walked.windows(2).all(|w| w[0] < w[1]) && walked.len() == set.len()
}

#[quickcheck]
fn stepping_matches_len(xs: Vec<i8>) -> bool {
    let set: Set<i8> = xs.into_iter().collect();

    let mut forward = 0;
    let mut cursor = set.begin();
    while cursor != set.end() {
        forward += 1;
        cursor = set.next(cursor);
    }

    let mut backward = 0;
    let mut cursor = set.prev(set.end());
    while cursor != set.end() {
        backward += 1;
        cursor = set.prev(cursor);
    }

    forward == set.len() && backward == set.len()
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let set: Set<i8> = xs.iter().copied().collect();

    xs.iter().all(|x| set.contains(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let set: Set<i8> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !set.contains(x) && set.find(x) == set.end())
}

#[quickcheck]
fn duplicate_insert_changes_nothing(xs: Vec<i8>, x: i8) -> bool {
    let mut set: Set<i8> = xs.into_iter().collect();
    set.insert(x).unwrap();
    let before = set.clone();

    set.insert(x) == Ok((set.end(), false)) && set == before
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut set: Set<i8> = xs.iter().copied().collect();
    for delete in &deletes {
        let cursor = set.find(delete);
        if cursor != set.end() {
            set.erase(cursor).unwrap();
        }
    }

    let mut still_present = xs;
    still_present.retain(|x| !deletes.contains(x));

    deletes.iter().all(|x| !set.contains(x)) && still_present.iter().all(|x| set.contains(x))
}

#[quickcheck]
fn merge_is_union_and_leaves_intersection(xs: Vec<i8>, ys: Vec<i8>) -> bool {
    let mut a: Set<i8> = xs.iter().copied().collect();
    let mut b: Set<i8> = ys.iter().copied().collect();
    a.merge(&mut b).unwrap();

    let xs: BTreeSet<i8> = xs.into_iter().collect();
    let ys: BTreeSet<i8> = ys.into_iter().collect();
    a.iter().eq(xs.union(&ys)) && b.iter().eq(xs.intersection(&ys))
}

#[quickcheck]
fn cursors_survive_inserts(xs: Vec<i8>, more: Vec<i8>) -> bool {
    let mut set: Set<i8> = xs.into_iter().collect();
    let mut held = Vec::new();
    let mut cursor = set.begin();
    while cursor != set.end() {
        held.push((cursor, *set.get(cursor).unwrap()));
        cursor = set.next(cursor);
    }

    for x in more {
        set.insert(x).unwrap();
    }

    held.into_iter().all(|(cursor, x)| set.get(cursor) == Some(&x))
}

#[quickcheck]
fn bounded_never_exceeds_limit(xs: Vec<i8>, limit: u8) -> bool {
    let limit = usize::from(limit % 16);
    let mut set = Set::with_alloc(Bounded::new(limit));
    for x in xs {
        let before = set.clone();
        if set.insert(x).is_err() && set != before {
            return false;
        }
    }
    set.len() <= limit
}

#[quickcheck]
fn bounded_try_extend_is_all_or_nothing(start: Vec<i8>, more: Vec<i8>, limit: u8) -> bool {
    let limit = usize::from(limit % 16);
    let mut set = Set::with_alloc(Bounded::new(limit));
    for x in start {
        let _ = set.insert(x);
    }
    let before = set.clone();

    let mut union: Vec<i8> = before.iter().copied().chain(more.iter().copied()).collect();
    union.sort_unstable();
    union.dedup();

    match set.try_extend(more) {
        Ok(()) => set.iter().eq(union.iter()) && set.len() <= limit,
        Err(_) => set == before && union.len() > limit,
    }
}
