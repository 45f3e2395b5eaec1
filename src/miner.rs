//! Level-wise frequent itemset mining (Apriori)

use crate::cache::SupportCache;
use crate::error::MiningError;
use crate::itemset::{Item, ItemSet, Transaction};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Frequent itemsets grouped by size
///
/// Sizes are only present when at least one itemset of that size is frequent.
/// Size 0 always holds the empty itemset once mining has started.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequentSetTable {
    levels: BTreeMap<usize, BTreeSet<ItemSet>>,
}

impl FrequentSetTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, set: ItemSet) {
        self.levels.entry(set.len()).or_default().insert(set);
    }

    /// Frequent itemsets of exactly `size` items
    pub fn level(&self, size: usize) -> Option<&BTreeSet<ItemSet>> {
        self.levels.get(&size)
    }

    pub fn contains(&self, set: &ItemSet) -> bool {
        self.levels
            .get(&set.len())
            .is_some_and(|level| level.contains(set))
    }

    /// Populated sizes in ascending order
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.levels.keys().copied()
    }

    pub fn max_size(&self) -> Option<usize> {
        self.levels.keys().next_back().copied()
    }

    /// All frequent itemsets, smallest first
    pub fn iter(&self) -> impl Iterator<Item = &ItemSet> {
        self.levels.values().flatten()
    }

    /// Total number of frequent itemsets, the empty one included
    pub fn len(&self) -> usize {
        self.levels.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Validate the mining threshold before any scan work starts
pub fn check_min_support(min_support: i64) -> Result<usize, MiningError> {
    usize::try_from(min_support).map_err(|_| {
        MiningError::InvalidParameter(format!("min_support must be >= 0, got {}", min_support))
    })
}

/// Mine every frequent itemset of `transactions` with a fresh cache
///
/// `universe` must be exactly the set of items appearing in `transactions`.
pub fn mine(
    transactions: &[Transaction],
    universe: &BTreeSet<Item>,
    min_support: i64,
) -> Result<FrequentSetTable, MiningError> {
    let mut cache = SupportCache::new(transactions);
    mine_with_cache(&mut cache, universe, min_support)
}

/// Mine every frequent itemset, counting support through `cache`
pub fn mine_with_cache(
    cache: &mut SupportCache<'_>,
    universe: &BTreeSet<Item>,
    min_support: i64,
) -> Result<FrequentSetTable, MiningError> {
    let min_support = check_min_support(min_support)?;
    if cache.transaction_count() == 0 {
        return Err(MiningError::EmptyInput("transactions"));
    }
    if universe.is_empty() {
        return Err(MiningError::EmptyInput("items"));
    }

    let mut table = FrequentSetTable::new();
    table.insert(ItemSet::empty());

    for item in universe {
        let candidate = ItemSet::singleton(item.clone());
        if cache.support(&candidate, &ItemSet::empty()) >= min_support {
            table.insert(candidate);
        }
    }

    let mut size = 1;
    while let Some(level) = table.level(size) {
        info!(size = size + 1, "searching for candidates");
        let candidates = join_level(level, size);
        debug!(size = size + 1, candidates = candidates.len(), "generated candidates");

        let frequent: Vec<ItemSet> = candidates
            .into_iter()
            .filter(|candidate| cache.support_of(candidate.clone()) >= min_support)
            .collect();
        info!(size = size + 1, found = frequent.len(), "frequent sets found");

        for set in frequent {
            table.insert(set);
        }
        size += 1;
    }

    debug!(
        frequent = table.len(),
        scans = cache.scans(),
        cached = cache.len(),
        "mining finished"
    );
    Ok(table)
}

/// Union every pair of `size`-sets sharing `size - 1` items
fn join_level(level: &BTreeSet<ItemSet>, size: usize) -> BTreeSet<ItemSet> {
    let sets: Vec<&ItemSet> = level.iter().collect();
    let mut candidates = BTreeSet::new();

    for (i, first) in sets.iter().enumerate() {
        for second in &sets[i + 1..] {
            if first.intersection_len(second) == size - 1 {
                candidates.insert(first.union(second));
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset::universe_of;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn set(items: &[&str]) -> ItemSet {
        ItemSet::new(items.iter().copied())
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            set(&["a", "b"]),
            set(&["a", "b", "c"]),
            set(&["a"]),
            set(&["b", "c"]),
            set(&["a", "b", "c"]),
        ]
    }

    /// Every subset of the universe meeting `min_support`, by exhaustive count
    fn brute_force(transactions: &[Transaction], min_support: usize) -> FrequentSetTable {
        let universe: ItemSet = universe_of(transactions).into_iter().collect();
        let mut table = FrequentSetTable::new();
        // Level 0 is seeded whatever the threshold
        table.insert(ItemSet::empty());
        for size in 1..=universe.len() {
            for candidate in universe.subsets_of_size(size) {
                let support = transactions
                    .iter()
                    .filter(|t| candidate.is_subset_of(t))
                    .count();
                if support >= min_support {
                    table.insert(candidate);
                }
            }
        }
        table
    }

    fn random_transactions(rng: &mut StdRng) -> Vec<Transaction> {
        let items = ["a", "b", "c", "d", "e", "f"];
        let count = rng.gen_range(1..=10);
        (0..count)
            .map(|_| {
                items
                    .iter()
                    .filter(|_| rng.gen_bool(0.5))
                    .copied()
                    .collect::<Vec<_>>()
            })
            .map(ItemSet::new)
            .collect()
    }

    #[test]
    fn test_example_scenario() {
        let transactions = sample_transactions();
        let universe = universe_of(&transactions);
        let table = mine(&transactions, &universe, 2).unwrap();

        assert_eq!(table.level(0).unwrap().len(), 1);
        assert!(table.contains(&ItemSet::empty()));
        assert_eq!(table.level(1).unwrap().len(), 3);
        assert_eq!(
            table.level(2).unwrap().iter().cloned().collect::<Vec<_>>(),
            vec![set(&["a", "b"]), set(&["a", "c"]), set(&["b", "c"])]
        );
        assert!(table.contains(&set(&["a", "b", "c"])));
        assert_eq!(table.max_size(), Some(3));
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_higher_threshold_excludes_pairs() {
        let transactions = sample_transactions();
        let universe = universe_of(&transactions);
        let table = mine(&transactions, &universe, 3).unwrap();

        assert!(table.contains(&set(&["a", "b"])));
        assert!(table.contains(&set(&["b", "c"])));
        assert!(!table.contains(&set(&["a", "c"])));
        assert!(table.level(3).is_none());
    }

    #[test]
    fn test_zero_support_keeps_every_singleton() {
        let transactions = vec![set(&["a"]), set(&["b"]), set(&["c"])];
        let universe = universe_of(&transactions);
        let table = mine(&transactions, &universe, 0).unwrap();

        assert!(table.contains(&ItemSet::empty()));
        assert_eq!(table.level(1).unwrap().len(), 3);
        // Nothing co-occurs, yet a zero threshold admits every combination
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_unreachable_threshold_leaves_only_empty_set() {
        let transactions = sample_transactions();
        let universe = universe_of(&transactions);
        let table = mine(&transactions, &universe, 6).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.level(1).is_none());
    }

    #[test]
    fn test_invalid_and_empty_input() {
        let transactions = sample_transactions();
        let universe = universe_of(&transactions);

        assert!(matches!(
            mine(&transactions, &universe, -1),
            Err(MiningError::InvalidParameter(_))
        ));
        assert_eq!(
            mine(&[], &universe, 1),
            Err(MiningError::EmptyInput("transactions"))
        );
        assert_eq!(
            mine(&[ItemSet::empty()], &BTreeSet::new(), 1),
            Err(MiningError::EmptyInput("items"))
        );
    }

    #[test]
    fn test_validation_precedes_scanning() {
        let transactions = sample_transactions();
        let universe = universe_of(&transactions);
        let mut cache = SupportCache::new(&transactions);

        assert!(mine_with_cache(&mut cache, &universe, -5).is_err());
        assert_eq!(cache.scans(), 0);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..40 {
            let transactions = random_transactions(&mut rng);
            let universe = universe_of(&transactions);
            if universe.is_empty() {
                continue;
            }
            let min_support = rng.gen_range(0..=4);

            let table = mine(&transactions, &universe, min_support as i64).unwrap();
            assert_eq!(table, brute_force(&transactions, min_support));
        }
    }

    #[test]
    fn test_threshold_above_transaction_count() {
        let transactions = vec![set(&["a", "b"])];
        let universe = universe_of(&transactions);

        let table = mine(&transactions, &universe, 4).unwrap();
        assert_eq!(table, brute_force(&transactions, 4));
        assert_eq!(table.len(), 1);
        assert!(table.contains(&ItemSet::empty()));
    }

    #[test]
    fn test_anti_monotonicity() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let transactions = random_transactions(&mut rng);
            let universe = universe_of(&transactions);
            if universe.is_empty() {
                continue;
            }
            let table = mine(&transactions, &universe, 2).unwrap();

            for frequent in table.iter() {
                for size in 0..frequent.len() {
                    for subset in frequent.subsets_of_size(size) {
                        assert!(table.contains(&subset), "{} missing under {}", subset, frequent);
                    }
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let transactions = sample_transactions();
        let universe = universe_of(&transactions);

        let first = mine(&transactions, &universe, 2).unwrap();
        let second = mine(&transactions, &universe, 2).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.iter().collect::<Vec<_>>(),
            second.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_shared_cache_avoids_rescans() {
        let transactions = sample_transactions();
        let universe = universe_of(&transactions);
        let mut cache = SupportCache::new(&transactions);

        mine_with_cache(&mut cache, &universe, 2).unwrap();
        let scans = cache.scans();
        mine_with_cache(&mut cache, &universe, 2).unwrap();
        assert_eq!(cache.scans(), scans);
    }
}
