use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use odflow::{
    pipeline::{self, PipelineOutput, TopN},
    process::{parse_table, LongitudeRepair},
    schema::{Purpose, YearFilter},
    select::distinct_years,
    PipelineConfig,
};
use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

#[derive(Parser)]
#[command(name = "odflow")]
#[command(about = "Rank origin-destination travel flows and compute map stroke weights")]
struct Cli {
    /// Input table; reads stdin when omitted
    input: Option<PathBuf>,

    /// TOML config file
    #[arg(long, env = "ODFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// "All" or a specific year
    #[arg(long)]
    year: Option<YearFilter>,

    /// leisure, business or total
    #[arg(long)]
    purpose: Option<Purpose>,

    /// Case-insensitive origin name filter
    #[arg(long)]
    origin: Option<String>,

    /// Case-insensitive destination name filter
    #[arg(long)]
    destination: Option<String>,

    /// Rendered subset size (50, 100 or 200)
    #[arg(long)]
    top_n: Option<TopN>,

    /// Skip the western-hemisphere longitude sign repair
    #[arg(long)]
    no_sign_repair: bool,

    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Print the distinct years in the input and exit
    #[arg(long)]
    years: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn write_table(out: &PipelineOutput, mut w: impl Write) -> Result<()> {
    writeln!(
        w,
        "{:>5} {:<28} {:<28} {:>14} {:>7}",
        "year", "origin", "destination", "value", "weight"
    )?;
    for r in &out.records {
        let weight = r
            .display_weight
            .map(|x| format!("{:.2}", x))
            .unwrap_or_else(|| "-".into());
        writeln!(
            w,
            "{:>5} {:<28} {:<28} {:>14.2} {:>7}",
            r.year, r.origin_name, r.destination_name, r.display_value, weight
        )?;
    }
    let s = &out.summary;
    writeln!(
        w,
        "\n{} rows parsed, {} matched, {} drawable, {} rendered",
        s.parsed_rows, s.matched, s.drawable, s.rendered
    )?;
    Ok(())
}

fn main() -> Result<()> {
    // logs to stderr, stdout carries the result
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(p) => PipelineConfig::load(p)?,
        None => PipelineConfig::default(),
    };
    if let Some(y) = cli.year {
        config.filter.year = y;
    }
    if let Some(p) = cli.purpose {
        config.filter.purpose = p;
    }
    if let Some(o) = cli.origin {
        config.filter.origin_query = o;
    }
    if let Some(d) = cli.destination {
        config.filter.destination_query = d;
    }
    if let Some(n) = cli.top_n {
        config.render.top_n = n;
    }
    if cli.no_sign_repair {
        config.coordinates.longitude_repair = LongitudeRepair::None;
    }

    let text = read_input(cli.input.as_ref())?;
    let stdout = io::stdout();

    if cli.years {
        let table = parse_table(&text);
        let years = distinct_years(&table.rows);
        serde_json::to_writer(stdout.lock(), &years)?;
        println!();
        return Ok(());
    }

    let out = pipeline::run(
        &text,
        &config.filter,
        config.render.top_n,
        &config.coordinates.longitude_repair,
        &config.weights,
    );

    if out.records.is_empty() {
        info!("no data available for the current filters");
    }

    match cli.format {
        Format::Json => {
            serde_json::to_writer_pretty(stdout.lock(), &out)?;
            println!();
        }
        Format::Table => write_table(&out, stdout.lock())?,
    }
    Ok(())
}
