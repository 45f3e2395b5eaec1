//! Command-line interface definitions and argument parsing

use crate::data::LoadOptions;
use crate::model::AprioriParams;
use clap::Parser;

/// Association rule explorer: Apriori mining with rule interestingness metrics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input data file (.csv or .arff)
    #[arg(short, long)]
    pub input: String,

    /// Minimum support as an absolute transaction count
    #[arg(short = 's', long, default_value = "50", allow_negative_numbers = true)]
    pub min_support: i64,

    /// Minimum confidence of a strong rule, between 0 and 1
    #[arg(short = 'c', long, default_value = "0.5", allow_negative_numbers = true)]
    pub min_confidence: f64,

    /// CSV has a header and one attribute value per column
    #[arg(short, long)]
    pub fixed_length: bool,

    /// Drop the first CSV column (only with --fixed-length)
    #[arg(long, requires = "fixed_length")]
    pub omit_first_column: bool,

    /// Save the strong rules to this JSON file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Save metric scatter plots to this PNG file
    #[arg(short, long)]
    pub plot: Option<String>,

    /// Print at most this many rules
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn params(&self) -> AprioriParams {
        AprioriParams::new(self.min_support, self.min_confidence)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            fixed_length: self.fixed_length,
            omit_first_column: self.omit_first_column,
        }
    }

    /// Default `tracing` filter directive when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
