//! Combining partial indices and dead-link lists.
//!
//! Used to fold per-root scan results together and to fold a fresh scan into
//! a previously persisted index. Both merges are key-wise set unions, so the
//! result does not depend on the order or grouping of the inputs.

use crate::domain::{DeadLinks, Index};
use std::time::Instant;

/// Merges `additions` into `base`.
///
/// Targets new to `base` are taken as-is; targets already present get the
/// union of both link sets. `base` is extended in place rather than rebuilt,
/// so the cost is proportional to the size of the additions.
///
/// # Examples
///
/// ```
/// use atlas::domain::Index;
/// use atlas::merge::merge_indices;
/// use std::path::Path;
///
/// let base: Index = [("/srv/data", "/home/a/data")].into_iter().collect();
/// let fresh: Index = [("/srv/data", "/home/b/data")].into_iter().collect();
///
/// let merged = merge_indices(base, [fresh]);
/// assert_eq!(merged.links_for(Path::new("/srv/data")).unwrap().len(), 2);
/// ```
pub fn merge_indices<I>(base: Index, additions: I) -> Index
where
    I: IntoIterator<Item = Index>,
{
    let start = Instant::now();
    let mut merged = base;
    for addition in additions {
        merged.absorb(addition);
    }
    tracing::debug!(
        targets = merged.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Index merged"
    );
    merged
}

/// Merges dead-link lists by set union.
///
/// Use [`DeadLinks::sorted`] on the result for deterministic output.
pub fn merge_dead_links<I>(lists: I) -> DeadLinks
where
    I: IntoIterator<Item = DeadLinks>,
{
    let mut merged = DeadLinks::new();
    for list in lists {
        merged.absorb(list);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::Path;

    fn index_of(pairs: &[(String, String)]) -> Index {
        pairs.iter().cloned().collect()
    }

    fn pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
        // Small alphabets so generated indices share targets and links often.
        prop::collection::vec(("/t[a-d]", "/l[a-f]"), 0..12)
    }

    #[test]
    fn merge_into_empty_base_copies_addition() {
        let addition: Index = [("/t", "/l")].into_iter().collect();
        assert_eq!(merge_indices(Index::new(), [addition.clone()]), addition);
    }

    #[test]
    fn merge_unions_links_for_shared_target() {
        let first: Index = [("/t", "/l1"), ("/t", "/l2")].into_iter().collect();
        let second: Index = [("/t", "/l2"), ("/t", "/l3")].into_iter().collect();

        let merged = merge_indices(Index::new(), [first, second]);

        assert_eq!(
            merged.links_for(Path::new("/t")).unwrap(),
            vec![Path::new("/l1"), Path::new("/l2"), Path::new("/l3")]
        );
    }

    #[test]
    fn merge_with_no_additions_returns_base() {
        let base: Index = [("/t", "/l")].into_iter().collect();
        assert_eq!(merge_indices(base.clone(), Vec::new()), base);
    }

    #[test]
    fn dead_link_merge_is_union() {
        let a: DeadLinks = ["/d1", "/d2"].into_iter().collect();
        let b: DeadLinks = ["/d2", "/d3"].into_iter().collect();

        let merged = merge_dead_links([a, b]);

        assert_eq!(
            merged.sorted(),
            vec![Path::new("/d1"), Path::new("/d2"), Path::new("/d3")]
        );
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(pairs in pairs_strategy()) {
            let index = index_of(&pairs);
            prop_assert_eq!(merge_indices(index.clone(), [index.clone()]), index);
        }

        #[test]
        fn merge_is_commutative(a in pairs_strategy(), b in pairs_strategy()) {
            let ab = merge_indices(merge_indices(Index::new(), [index_of(&a)]), [index_of(&b)]);
            let ba = merge_indices(merge_indices(Index::new(), [index_of(&b)]), [index_of(&a)]);
            prop_assert_eq!(ab, ba);
        }

        #[test]
        fn merge_is_associative(
            a in pairs_strategy(),
            b in pairs_strategy(),
            c in pairs_strategy(),
        ) {
            let left = merge_indices(merge_indices(index_of(&a), [index_of(&b)]), [index_of(&c)]);
            let right = merge_indices(index_of(&a), [merge_indices(index_of(&b), [index_of(&c)])]);
            prop_assert_eq!(left, right);
        }

        #[test]
        fn merged_index_has_no_empty_sets(a in pairs_strategy(), b in pairs_strategy()) {
            let merged = merge_indices(index_of(&a), [index_of(&b)]);
            for (_, links) in merged.iter() {
                prop_assert!(!links.is_empty());
            }
        }

        #[test]
        fn dead_link_merge_is_order_independent(
            a in prop::collection::vec("/d[a-e]", 0..8),
            b in prop::collection::vec("/d[a-e]", 0..8),
        ) {
            let ab = merge_dead_links([a.iter().collect::<DeadLinks>(), b.iter().collect::<DeadLinks>()]);
            let ba = merge_dead_links([b.iter().collect::<DeadLinks>(), a.iter().collect::<DeadLinks>()]);
            prop_assert_eq!(ab, ba);
        }
    }
}
