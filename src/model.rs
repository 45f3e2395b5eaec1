//! One Apriori run: mining, rule scoring and the resulting model

use crate::cache::SupportCache;
use crate::data::TransactionData;
use crate::error::MiningError;
use crate::miner::{check_min_support, mine_with_cache, FrequentSetTable};
use crate::rules::{check_min_confidence, sort_for_presentation, RuleEngine, RuleRecord};
use crate::viz::MetricSeries;
use tracing::info;

/// Thresholds for one run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AprioriParams {
    /// Absolute transaction count an itemset must reach
    pub min_support: i64,
    /// Minimum confidence of a strong rule, within `[0, 1]`
    pub min_confidence: f64,
}

impl AprioriParams {
    pub fn new(min_support: i64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
        }
    }

    /// Fail fast on out-of-range thresholds
    pub fn validate(&self) -> Result<(), MiningError> {
        check_min_support(self.min_support)?;
        check_min_confidence(self.min_confidence)
    }
}

/// Everything produced by one run over one transaction collection
#[derive(Debug)]
pub struct AssociationModel {
    /// Frequent itemsets by size
    pub frequent_sets: FrequentSetTable,
    /// Strong rules, by descending support then descending confidence
    pub rules: Vec<RuleRecord>,
    pub transaction_count: usize,
    /// Candidate rules skipped because a metric was undefined
    pub undefined_rules: usize,
    /// Full transaction scans the run needed
    pub support_scans: usize,
}

impl AssociationModel {
    /// Number of frequent itemsets per size, the empty set excluded
    pub fn level_counts(&self) -> Vec<(usize, usize)> {
        self.frequent_sets
            .sizes()
            .filter(|&size| size > 0)
            .filter_map(|size| Some((size, self.frequent_sets.level(size)?.len())))
            .collect()
    }

    pub fn metric_series(&self) -> MetricSeries {
        MetricSeries::from_rules(&self.rules)
    }
}

/// Run Apriori over `data` and score every strong rule
///
/// Mining and scoring share one support cache, created and dropped here.
pub fn fit_apriori(
    data: &TransactionData,
    params: &AprioriParams,
) -> crate::Result<AssociationModel> {
    params.validate()?;

    let mut cache = SupportCache::new(&data.transactions);
    let frequent_sets = mine_with_cache(&mut cache, &data.universe, params.min_support)?;
    info!(
        frequent = frequent_sets.len(),
        max_size = frequent_sets.max_size().unwrap_or(0),
        "frequent sets mined"
    );

    let found =
        RuleEngine::new(&mut cache).find_strong_rules(&frequent_sets, params.min_confidence)?;
    let mut rules = found.rules;
    sort_for_presentation(&mut rules);
    info!(
        strong = rules.len(),
        undefined = found.undefined,
        "strong association rules found"
    );

    Ok(AssociationModel {
        frequent_sets,
        rules,
        transaction_count: data.transactions.len(),
        undefined_rules: found.undefined,
        support_scans: cache.scans(),
    })
}
