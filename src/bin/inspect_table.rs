// src/bin/inspect_table.rs

use anyhow::{Context, Result};
use odflow::{
    process::parse_table,
    schema::{columns, derive_column_kinds},
};
use std::{env, fs};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .context("usage: inspect_table <file.csv>")?;
    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;

    let table = parse_table(&text);
    if table.headers.is_empty() {
        println!("{}: no data", path);
        return Ok(());
    }

    println!("{}: {} rows\n", path, table.rows.len());
    println!("{:<32} {:<8} {:>8} {:>8}", "column", "kind", "samples", "missing");
    for p in derive_column_kinds(&table.headers, &table.rows) {
        println!(
            "{:<32} {:<8} {:>8} {:>8}",
            p.name,
            format!("{:?}", p.kind).to_lowercase(),
            p.samples,
            p.missing
        );
    }

    let absent: Vec<&str> = columns::ALL
        .iter()
        .copied()
        .filter(|c| !table.headers.iter().any(|h| h == c))
        .collect();
    if !absent.is_empty() {
        println!("\nmissing flow columns: {}", absent.join(", "));
    }
    Ok(())
}
