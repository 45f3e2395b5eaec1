//! Error kinds reported by the mining core

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum MiningError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("empty input: no {0} to mine")]
    EmptyInput(&'static str),
    #[error("{metric} is undefined for rule {rule} (zero denominator)")]
    UndefinedMetric { metric: &'static str, rule: String },
}

impl MiningError {
    pub(crate) fn undefined(metric: &'static str, rule: impl Into<String>) -> Self {
        Self::UndefinedMetric {
            metric,
            rule: rule.into(),
        }
    }

    /// True for per-rule failures that must not abort a run
    pub fn is_undefined_metric(&self) -> bool {
        matches!(self, Self::UndefinedMetric { .. })
    }
}
