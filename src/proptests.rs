use crate::{DeleteMode, Deletion, Error, Promotion, TreeConfig, WordTree};

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

fn validate_tree<R>(t: &WordTree<R>) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "integrity issues: {issues:?}");

    let keys: Vec<&str> = t.iter().map(|(k, _)| k).collect();
    assert!(
        keys.windows(2).all(|w| w[0] < w[1]),
        "in-order keys must be strictly ascending"
    );

    // An AVL tree with n nodes has height < 1.45 * log2(n + 2).
    let bound = 1.45 * ((t.len() + 2) as f64).log2();
    assert!(
        (t.height() as f64) < bound,
        "height {} exceeds AVL bound for {} nodes",
        t.height(),
        t.len()
    );
}

fn key_strategy() -> impl Strategy<Value = String> {
    // A small alphabet so deletes and repeats hit existing keys often.
    "[a-e]{1,3}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 25)]
    Delete(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 5)]
    ForceRemove(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 20)]
    Search(#[proptest(strategy = "key_strategy()")] String),
}

fn model_delete(m: &mut BTreeMap<String, usize>, key: &str, mode: DeleteMode) -> Option<Deletion> {
    let count = m.get_mut(key)?;
    if mode == DeleteMode::Decrement && *count > 1 {
        *count -= 1;
        return Some(Deletion::Decremented { remaining: *count });
    }
    m.remove(key);
    Some(Deletion::Removed)
}

fn run_ops(promotion: Promotion, seed: u64, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut t = WordTree::with_config(TreeConfig::new().promotion(promotion).seed(seed));
    let mut m: BTreeMap<String, usize> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(key) => {
                let got = t.insert(&key).unwrap();
                let count = m.entry(key).or_insert(0);
                *count += 1;
                prop_assert_eq!(got, *count);
            }
            Op::Delete(key) | Op::ForceRemove(key) if !m.contains_key(&key) => {
                let before = format!("{t:?}");
                let err = t.delete(&key).unwrap_err();
                prop_assert!(
                    matches!(err, Error::NotFound { .. }),
                    "deleting absent {:?} gave {:?}",
                    key,
                    err
                );
                prop_assert_eq!(format!("{t:?}"), before);
            }
            Op::Delete(key) => {
                let got = t.delete_with(&key, DeleteMode::Decrement).ok();
                prop_assert_eq!(got, model_delete(&mut m, &key, DeleteMode::Decrement));
            }
            Op::ForceRemove(key) => {
                let got = t.delete_with(&key, DeleteMode::ForceRemove).ok();
                prop_assert_eq!(got, model_delete(&mut m, &key, DeleteMode::ForceRemove));
            }
            Op::Search(key) => {
                prop_assert_eq!(t.count(&key), m.get(&key).copied());
            }
        }

        prop_assert_eq!(t.len(), m.len());
        prop_assert_eq!(t.total(), m.values().sum::<usize>());
        validate_tree(&t);
    }

    let got: Vec<(String, usize)> = t.iter().map(|(k, c)| (k.to_owned(), c)).collect();
    let expected: Vec<(String, usize)> = m.into_iter().collect();
    prop_assert_eq!(got, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_random(seed in any::<u64>(), ops in prop::collection::vec(any::<Op>(), 0..=600)) {
        run_ops(Promotion::Random, seed, ops)?;
    }

    #[test]
    fn prop_equivalence_successor(ops in prop::collection::vec(any::<Op>(), 0..=600)) {
        run_ops(Promotion::Successor, 0, ops)?;
    }

    #[test]
    fn prop_equivalence_predecessor(ops in prop::collection::vec(any::<Op>(), 0..=600)) {
        run_ops(Promotion::Predecessor, 0, ops)?;
    }
}

/// Calls `f` with every ordering of `items`, built by swapping each remaining
/// element into the next slot.
fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn permute<T: Clone>(work: &mut [T], fixed: usize, f: &mut impl FnMut(Vec<T>)) {
        if fixed == work.len() {
            f(work.to_vec());
            return;
        }
        for i in fixed..work.len() {
            work.swap(fixed, i);
            permute(work, fixed + 1, f);
            work.swap(fixed, i);
        }
    }

    permute(&mut items.to_vec(), 0, &mut f);
}

#[test]
fn permutations_are_complete_and_distinct() {
    let mut seen = std::collections::BTreeSet::new();
    for_each_permutation(&[1, 2, 3, 4], |perm| {
        assert!(seen.insert(perm));
    });
    assert_eq!(seen.len(), 24);
}

const SMALL_SET: [&str; 7] = ["a", "b", "c", "aa", "ab", "ba", "B"];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = WordTree::new();
        for k in &perm {
            assert_eq!(t.insert(k).unwrap(), 1);
            validate_tree(&t);
        }
        // Second pass only bumps counts; shape must not change.
        let shape = t.render(crate::Verbosity::Simple).replace("(1)", "");
        for k in &perm {
            assert_eq!(t.insert(k).unwrap(), 2);
        }
        assert_eq!(t.render(crate::Verbosity::Simple).replace("(2)", ""), shape);

        let mut expected: Vec<&str> = SMALL_SET.to_vec();
        expected.sort_unstable();
        let got: Vec<&str> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(got, expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    for promotion in [Promotion::Successor, Promotion::Predecessor] {
        // Insert in a fixed order, then remove in all permutations.
        let mut base = WordTree::with_config(TreeConfig::new().promotion(promotion).seed(7));
        for k in SMALL_SET {
            base.insert(k).unwrap();
        }
        base.insert("b").unwrap();

        for_each_permutation(&SMALL_SET, |perm| {
            let mut t = base.clone();
            for k in perm {
                if k == "b" {
                    assert_eq!(
                        t.delete(k).unwrap(),
                        Deletion::Decremented { remaining: 1 }
                    );
                }
                assert_eq!(t.delete(k).unwrap(), Deletion::Removed);
                assert!(!t.contains(k));
                validate_tree(&t);
            }
            assert!(t.is_empty());
            assert_eq!(t.total(), 0);
            assert!(t.root().is_none());
        });
    }
}
