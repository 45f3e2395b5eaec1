//! Transaction loading from CSV and ARFF files
//!
//! Variable-length CSV rows are taken as raw item tokens. Fixed-length CSV
//! tables (read with Polars) and ARFF relations turn every present cell into a
//! `column=value` item.

use crate::itemset::{universe_of, Item, ItemSet, Transaction};
use anyhow::Context;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Loaded transactions and the distinct items they use
#[derive(Clone, Debug)]
pub struct TransactionData {
    pub transactions: Vec<Transaction>,
    /// Every distinct item across `transactions`
    pub universe: BTreeSet<Item>,
}

impl TransactionData {
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let universe = universe_of(&transactions);
        Self {
            transactions,
            universe,
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// How a CSV file should be interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Header row plus one attribute value per column
    pub fixed_length: bool,
    /// Drop the first column of a fixed-length table (usually a row id)
    pub omit_first_column: bool,
}

/// Load transactions, choosing the parser by file extension
///
/// # Arguments
/// * `file_path` - Path to a `.csv` or `.arff` file
/// * `options` - CSV interpretation; ignored for ARFF
pub fn load_transactions(file_path: &str, options: &LoadOptions) -> crate::Result<TransactionData> {
    let extension = Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let transactions = match extension.as_str() {
        "csv" if options.fixed_length => load_csv_fixed(file_path, options.omit_first_column)?,
        "csv" => {
            let text = fs::read_to_string(file_path)
                .with_context(|| format!("failed to read {}", file_path))?;
            parse_csv_rows(&text)
        }
        "arff" => {
            let text = fs::read_to_string(file_path)
                .with_context(|| format!("failed to read {}", file_path))?;
            parse_arff(&text).with_context(|| format!("failed to parse {}", file_path))?
        }
        other => anyhow::bail!("Data format '{}' is not supported (expected csv or arff)", other),
    };

    let data = TransactionData::from_transactions(transactions);
    info!(
        transactions = data.len(),
        unique_items = data.universe.len(),
        "transactions loaded"
    );
    Ok(data)
}

/// One transaction per line, items separated by commas
pub fn parse_csv_rows(text: &str) -> Vec<Transaction> {
    text.lines()
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect::<Vec<_>>()
        })
        .map(ItemSet::new)
        .collect()
}

/// Read a headed CSV table; each present cell becomes `column=value`
fn load_csv_fixed(file_path: &str, omit_first_column: bool) -> crate::Result<Vec<Transaction>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(file_path.into()))?
        .finish()
        .with_context(|| format!("failed to read CSV table {}", file_path))?;

    let skip = usize::from(omit_first_column);
    let columns = df.get_columns();
    let mut transactions = Vec::with_capacity(df.height());

    for row in 0..df.height() {
        let mut items = Vec::with_capacity(columns.len());
        for column in columns.iter().skip(skip) {
            let value = column.get(row)?;
            if value.is_null() {
                continue;
            }
            let text = match value.get_str() {
                Some(s) => s.to_string(),
                None => value.to_string(),
            };
            items.push(format!("{}={}", column.name(), text));
        }
        transactions.push(ItemSet::new(items));
    }

    Ok(transactions)
}

/// A declared ARFF column
#[derive(Clone, Debug, PartialEq, Eq)]
struct ArffAttribute {
    name: String,
    /// `numeric`, `real` or `integer`; values of other types are kept verbatim
    numeric: bool,
}

/// Parse an ARFF relation into `attribute=value` transactions
pub fn parse_arff(text: &str) -> crate::Result<Vec<Transaction>> {
    let mut attributes: Vec<ArffAttribute> = Vec::new();
    let mut in_data = false;
    let mut transactions = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        if !in_data {
            let lower = line.to_ascii_lowercase();
            if lower.starts_with("@attribute") {
                let rest = line["@attribute".len()..].trim_start();
                attributes.push(parse_attribute(rest));
            } else if lower.starts_with("@data") {
                if attributes.is_empty() {
                    anyhow::bail!("@data section found before any @attribute declaration");
                }
                in_data = true;
            }
            continue;
        }

        let cells = split_arff_row(line);
        if cells.len() != attributes.len() {
            anyhow::bail!(
                "line {}: expected {} values, found {}",
                line_no + 1,
                attributes.len(),
                cells.len()
            );
        }

        let items = attributes
            .iter()
            .zip(cells)
            .filter(|(_, cell)| cell != "?" && !cell.is_empty())
            .map(|(attribute, cell)| {
                format!("{}={}", attribute.name, arff_value(&cell, attribute.numeric))
            });
        transactions.push(ItemSet::new(items));
    }

    if !in_data {
        anyhow::bail!("no @data section found");
    }
    Ok(transactions)
}

/// Name and type from the text following `@attribute`, quotes removed
fn parse_attribute(declaration: &str) -> ArffAttribute {
    let (name, kind) = match declaration.chars().next().filter(|c| *c == '\'' || *c == '"') {
        Some(quote) => {
            let inner = &declaration[1..];
            match inner.split_once(quote) {
                Some((name, rest)) => (name, rest),
                None => (inner, ""),
            }
        }
        None => declaration
            .split_once(char::is_whitespace)
            .unwrap_or((declaration, "")),
    };

    let kind = kind.trim_start().to_ascii_lowercase();
    ArffAttribute {
        name: name.to_string(),
        numeric: ["numeric", "real", "integer"]
            .iter()
            .any(|prefix| kind.starts_with(prefix)),
    }
}

/// Split a data row on commas outside quotes; quotes are removed from values
fn split_arff_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') if current.trim().is_empty() => {
                current.clear();
                quote = Some(c);
            }
            (None, ',') => cells.push(std::mem::take(&mut current).trim().to_string()),
            (None, c) => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Integral numbers of numeric attributes lose their fraction
fn arff_value(cell: &str, numeric: bool) -> String {
    match cell.parse::<f64>() {
        Ok(number) if numeric && number.is_finite() && number.fract() == 0.0 => {
            format!("{}", number as i64)
        }
        _ => cell.to_string(),
    }
}
