//! Run-scoped memoization of support counts and confidences
//!
//! Support counting is a full scan over the transactions, and both the miner
//! and the rule engine ask for the same itemsets many times. [`SupportCache`]
//! borrows the transaction collection for the lifetime of one run, so it can
//! never be reused against a different collection.

use crate::error::MiningError;
use crate::itemset::{ItemSet, Transaction};
use std::collections::HashMap;

/// Memoized `support(X ∪ Y)` over a fixed transaction collection
#[derive(Debug)]
pub struct SupportCache<'t> {
    transactions: &'t [Transaction],
    counts: HashMap<ItemSet, usize>,
    scans: usize,
}

impl<'t> SupportCache<'t> {
    pub fn new(transactions: &'t [Transaction]) -> Self {
        Self {
            transactions,
            counts: HashMap::new(),
            scans: 0,
        }
    }

    pub fn transactions(&self) -> &'t [Transaction] {
        self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Number of transactions containing every item of `x ∪ y`
    pub fn support(&mut self, x: &ItemSet, y: &ItemSet) -> usize {
        let union = x.union(y);
        self.support_of(union)
    }

    /// Same as [`support`](Self::support) for an already merged itemset
    pub fn support_of(&mut self, set: ItemSet) -> usize {
        if set.is_empty() {
            return self.transactions.len();
        }
        if let Some(&count) = self.counts.get(&set) {
            return count;
        }

        self.scans += 1;
        let count = self
            .transactions
            .iter()
            .filter(|transaction| set.is_subset_of(transaction))
            .count();
        self.counts.insert(set, count);
        count
    }

    /// `support(set) / transaction_count`; zero for an empty collection
    pub fn relative_support(&mut self, set: &ItemSet) -> f64 {
        let total = self.transactions.len();
        if total == 0 {
            return 0.0;
        }
        self.support_of(set.clone()) as f64 / total as f64
    }

    /// Transaction scans performed so far. Cache hits never scan.
    pub fn scans(&self) -> usize {
        self.scans
    }

    /// Distinct itemsets counted so far
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Memoized `confidence(X, Y) = support(X ∪ Y) / support(X)`
///
/// Undefined outcomes (zero antecedent support) are memoized too.
#[derive(Debug, Default)]
pub struct ConfidenceCache {
    values: HashMap<(ItemSet, ItemSet), Option<f64>>,
}

impl ConfidenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confidence(
        &mut self,
        support: &mut SupportCache<'_>,
        antecedent: &ItemSet,
        consequent: &ItemSet,
    ) -> Result<f64, MiningError> {
        let key = (antecedent.clone(), consequent.clone());
        let value = match self.values.get(&key) {
            Some(&value) => value,
            None => {
                let joint = support.support(antecedent, consequent);
                let base = support.support(antecedent, &ItemSet::empty());
                let value = (base > 0).then(|| joint as f64 / base as f64);
                self.values.insert(key, value);
                value
            }
        };

        value.ok_or_else(|| {
            MiningError::undefined("confidence", format!("{} --> {}", antecedent, consequent))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
