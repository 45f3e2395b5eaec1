//! Strong association rules and their interestingness metrics

use crate::cache::{ConfidenceCache, SupportCache};
use crate::error::MiningError;
use crate::itemset::ItemSet;
use crate::miner::FrequentSetTable;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// An implication `antecedent --> consequent` between disjoint itemsets
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule(pub ItemSet, pub ItemSet);

impl Rule {
    pub fn antecedent(&self) -> &ItemSet {
        &self.0
    }

    pub fn consequent(&self) -> &ItemSet {
        &self.1
    }

    /// The frequent itemset this rule was split from
    pub fn itemset(&self) -> ItemSet {
        self.0.union(&self.1)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.0, self.1)
    }
}

/// A strong rule with its metric vector, serialized with the export field names
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub rule: Rule,
    pub sup: usize,
    pub rsup: f64,
    pub conf: f64,
    pub lift: f64,
    pub cosine: f64,
    pub jaccard: f64,
    pub cf: f64,
}

impl fmt::Display for RuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rule: {}, Support: {}, rSUP: {:.4}, Confidence: {:.4}, Lift: {:.4}, \
             Cosine: {:.4}, Jaccard: {:.4}, Certainty Factor: {:.4}",
            self.rule,
            self.sup,
            self.rsup,
            self.conf,
            self.lift,
            self.cosine,
            self.jaccard,
            self.cf
        )
    }
}

/// Output of [`RuleEngine::find_strong_rules`]
#[derive(Clone, Debug, Default)]
pub struct StrongRules {
    pub rules: Vec<RuleRecord>,
    /// Candidate rules skipped because a metric had a zero denominator
    pub undefined: usize,
}

/// `conf / rsup(Y)`
pub fn lift(confidence: f64, rsup_y: f64) -> Option<f64> {
    (rsup_y > 0.0).then(|| confidence / rsup_y)
}

/// `rsup(X ∪ Y) / sqrt(rsup(X) · rsup(Y))`
pub fn cosine(rsup_xy: f64, rsup_x: f64, rsup_y: f64) -> Option<f64> {
    let denominator = (rsup_x * rsup_y).sqrt();
    (denominator > 0.0).then(|| rsup_xy / denominator)
}

/// `rsup(X ∪ Y) / (rsup(X) + rsup(Y) − rsup(X ∪ Y))`
pub fn jaccard(rsup_xy: f64, rsup_x: f64, rsup_y: f64) -> Option<f64> {
    let denominator = rsup_x + rsup_y - rsup_xy;
    (denominator > 0.0).then(|| rsup_xy / denominator)
}

/// Certainty factor, an asymmetric gain in `[-1, 1]`
pub fn certainty_factor(confidence: f64, rsup_y: f64) -> Option<f64> {
    match confidence.partial_cmp(&rsup_y)? {
        Ordering::Greater => (rsup_y < 1.0).then(|| (confidence - rsup_y) / (1.0 - rsup_y)),
        Ordering::Equal => Some(0.0),
        Ordering::Less => (rsup_y > 0.0).then(|| -(rsup_y - confidence) / rsup_y),
    }
}

/// Presentation order: descending support, then descending confidence
///
/// The sort is stable, so equal rules keep their generation order.
pub fn sort_for_presentation(rules: &mut [RuleRecord]) {
    rules.sort_by(|a, b| {
        b.sup
            .cmp(&a.sup)
            .then_with(|| b.conf.partial_cmp(&a.conf).unwrap_or(Ordering::Equal))
    });
}

/// Splits frequent itemsets into rules and scores the strong ones
///
/// Borrows the run's [`SupportCache`] so counts gathered while mining are reused.
pub struct RuleEngine<'c, 't> {
    support: &'c mut SupportCache<'t>,
    confidence: ConfidenceCache,
}

impl<'c, 't> RuleEngine<'c, 't> {
    pub fn new(support: &'c mut SupportCache<'t>) -> Self {
        Self {
            support,
            confidence: ConfidenceCache::new(),
        }
    }

    pub fn confidence(&mut self, x: &ItemSet, y: &ItemSet) -> Result<f64, MiningError> {
        self.confidence.confidence(&mut *self.support, x, y)
    }

    /// Every strong rule derivable from `table`
    ///
    /// Rules with an undefined metric are skipped and counted, never fatal.
    pub fn find_strong_rules(
        &mut self,
        table: &FrequentSetTable,
        min_confidence: f64,
    ) -> Result<StrongRules, MiningError> {
        check_min_confidence(min_confidence)?;

        let mut found = StrongRules::default();
        for size in table.sizes().filter(|&size| size >= 2) {
            let Some(level) = table.level(size) else {
                continue;
            };
            for itemset in level {
                for antecedent_size in 1..size {
                    for antecedent in itemset.subsets_of_size(antecedent_size) {
                        let consequent = itemset.difference(&antecedent);
                        match self.score(antecedent, consequent, min_confidence) {
                            Ok(Some(record)) => found.rules.push(record),
                            Ok(None) => {}
                            Err(err) if err.is_undefined_metric() => {
                                debug!(%err, "skipping rule");
                                found.undefined += 1;
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
            }
        }

        debug!(
            strong = found.rules.len(),
            undefined = found.undefined,
            confidences = self.confidence.len(),
            scans = self.support.scans(),
            "rule search finished"
        );
        Ok(found)
    }

    /// Metric vector for `(x, y)`, or `None` when the rule is not strong
    fn score(
        &mut self,
        x: ItemSet,
        y: ItemSet,
        min_confidence: f64,
    ) -> Result<Option<RuleRecord>, MiningError> {
        let conf = self.confidence(&x, &y)?;
        if conf < min_confidence {
            return Ok(None);
        }

        let rule = Rule(x, y);
        let sup = self.support.support(&rule.0, &rule.1);
        let total = self.support.transaction_count() as f64;
        let rsup = sup as f64 / total;
        let rsup_x = self.support.relative_support(&rule.0);
        let rsup_y = self.support.relative_support(&rule.1);

        let undefined = |metric| MiningError::undefined(metric, rule.to_string());
        let lift = lift(conf, rsup_y).ok_or_else(|| undefined("lift"))?;
        let cosine = cosine(rsup, rsup_x, rsup_y).ok_or_else(|| undefined("cosine"))?;
        let jaccard = jaccard(rsup, rsup_x, rsup_y).ok_or_else(|| undefined("jaccard"))?;
        let cf = certainty_factor(conf, rsup_y).ok_or_else(|| undefined("certainty factor"))?;

        Ok(Some(RuleRecord {
            rule,
            sup,
            rsup,
            conf,
            lift,
            cosine,
            jaccard,
            cf,
        }))
    }
}

pub fn check_min_confidence(min_confidence: f64) -> Result<(), MiningError> {
    if (0.0..=1.0).contains(&min_confidence) {
        Ok(())
    } else {
        Err(MiningError::InvalidParameter(format!(
            "min_confidence must be within [0, 1], got {}",
            min_confidence
        )))
    }
}
