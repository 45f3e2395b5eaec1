//! RuleForge: association rule explorer
//!
//! Loads transactions, mines frequent itemsets, scores the strong rules and
//! optionally exports them to JSON and plots their metrics.

use anyhow::Result;
use clap::Parser;
use ruleforge::{create_metric_plots, fit_apriori, load_transactions, save_rules_json, Args};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .compact()
        .init();

    if args.verbose {
        println!("RuleForge - Association Rule Explorer");
        println!("=====================================\n");
    }

    run_pipeline(&args)
}

/// Load, mine, report, then export and plot when requested
fn run_pipeline(args: &Args) -> Result<()> {
    let params = args.params();
    params.validate()?;

    let start_time = Instant::now();

    // Step 1: Load transactions
    if args.verbose {
        println!("Step 1: Loading transactions");
        println!("  Input file: {}", args.input);
    }
    let data = load_transactions(&args.input, &args.load_options())?;
    println!(
        "✓ Data loaded: {} transactions, {} unique items",
        data.len(),
        data.universe.len()
    );

    // Step 2: Mine and score
    if args.verbose {
        println!("\nStep 2: Mining frequent sets and strong rules");
        println!("  Minimum support: {}", params.min_support);
        println!("  Minimum confidence: {}", params.min_confidence);
    }
    let mining_start = Instant::now();
    let model = fit_apriori(&data, &params)?;
    let mining_time = mining_start.elapsed();

    println!("✓ Mining finished");
    if args.verbose {
        println!("  Mining time: {:.2}s", mining_time.as_secs_f64());
        println!("  Transaction scans: {}", model.support_scans);
        for (size, count) in model.level_counts() {
            println!("  Frequent sets of size {}: {}", size, count);
        }
        if model.undefined_rules > 0 {
            println!("  Rules skipped (undefined metric): {}", model.undefined_rules);
        }
    }

    // Step 3: Report
    println!("\n=== Strong Association Rules ===");
    let shown = args.top.unwrap_or(model.rules.len());
    for record in model.rules.iter().take(shown) {
        println!("{}", record);
    }
    if shown < model.rules.len() {
        println!("... {} more", model.rules.len() - shown);
    }
    println!("\n{} total records.", model.transaction_count);
    println!("{} strong association rules found.", model.rules.len());

    // Step 4: Export and plot
    if let Some(output) = &args.output {
        save_rules_json(&model.rules, output)?;
    }
    if let Some(plot) = &args.plot {
        if model.rules.is_empty() {
            println!("No strong rules, skipping plots");
        } else {
            create_metric_plots(&model.metric_series(), plot)?;
        }
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
