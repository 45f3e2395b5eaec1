//! JSON persistence of scored rules

use crate::rules::RuleRecord;
use anyhow::Context;
use std::fs;

/// Write `rules` as a pretty-printed JSON array
///
/// Each record carries `rule` (antecedent and consequent item lists), `sup`,
/// `rsup`, `conf`, `lift`, `cosine`, `jaccard` and `cf`.
pub fn save_rules_json(rules: &[RuleRecord], output_path: &str) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(rules)?;
    fs::write(output_path, json).with_context(|| format!("failed to write {}", output_path))?;
    println!("Strong association rules saved to: {}", output_path);
    Ok(())
}

/// Read back a file written by [`save_rules_json`]
pub fn load_rules_json(input_path: &str) -> crate::Result<Vec<RuleRecord>> {
    let text = fs::read_to_string(input_path)
        .with_context(|| format!("failed to read {}", input_path))?;
    let rules = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a rule export", input_path))?;
    Ok(rules)
}
