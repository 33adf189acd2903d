//! Parser CLI - Normalizes one local sales extract
//!
//! Usage:
//!   cargo run --bin sales-parser -- --file data/sales_2016.csv
//!   cargo run --bin sales-parser -- --file data/sales_2016.csv --json

use anyhow::{Context, Result};
use clap::Parser;
use sales_parser::{decode_text, normalize_all, parse_delimited, CanonicalRow, ParseOptions};
use std::collections::BTreeMap;
use tokio::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sales-parser", about = "Normalizes a delimited sales extract")]
struct Args {
    /// Path to the delimited file
    #[arg(long)]
    file: String,

    /// Print canonical rows as JSON instead of a summary
    #[arg(long, default_value = "false")]
    json: bool,

    /// Keep every cell as text (no number/bool inference)
    #[arg(long, default_value = "false")]
    no_infer_types: bool,

    /// Field delimiter
    #[arg(long, default_value = ",")]
    delimiter: char,
}

fn print_summary(rows: &[CanonicalRow]) {
    println!("Rows: {}", rows.len());

    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for row in rows {
        *per_year.entry(row.year).or_insert(0) += 1;
    }
    println!("\nRows per year:");
    println!("{:-<40}", "");
    for (year, count) in &per_year {
        println!("  {}  {:>8}", year, count);
    }
    println!("{:-<40}", "");

    for (i, row) in rows.iter().take(3).enumerate() {
        println!(
            "  [{}] {} | {} | {} | {} | {:.2}",
            i + 1,
            row.order_id,
            row.year,
            row.region,
            row.sub_category,
            row.sales_value
        );
    }
    if rows.len() > 3 {
        println!("  ... and {} more", rows.len() - 3);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if !args.delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be a single ASCII character");
    }

    let bytes = fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file))?;
    let content = decode_text(&bytes);

    let options = ParseOptions {
        infer_types: !args.no_infer_types,
        delimiter: args.delimiter as u8,
        ..ParseOptions::default()
    };

    let records = parse_delimited(&content, &options).context("Failed to parse delimited text")?;
    let rows = normalize_all(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("=== Sales Parser ===");
    println!("File: {} ({} bytes)", args.file, bytes.len());
    print_summary(&rows);

    Ok(())
}
