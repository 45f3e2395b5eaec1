//! RuleForge: association rule mining over categorical transaction data
//!
//! Frequent itemsets are found with the level-wise Apriori algorithm, split
//! into candidate rules, and the strong rules are scored with support,
//! confidence, lift, cosine, Jaccard and certainty factor. Support counts are
//! memoized for the duration of a run.

pub mod cache;
pub mod cli;
pub mod data;
pub mod error;
pub mod export;
pub mod itemset;
pub mod miner;
pub mod model;
pub mod rules;
pub mod viz;

// Re-export public items for easier access
pub use cache::{ConfidenceCache, SupportCache};
pub use cli::Args;
pub use data::{load_transactions, LoadOptions, TransactionData};
pub use error::MiningError;
pub use export::{load_rules_json, save_rules_json};
pub use itemset::{Item, ItemSet, Transaction};
pub use miner::{mine, mine_with_cache, FrequentSetTable};
pub use model::{fit_apriori, AprioriParams, AssociationModel};
pub use rules::{Rule, RuleEngine, RuleRecord, StrongRules};
pub use viz::{create_metric_plots, MetricSeries};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
