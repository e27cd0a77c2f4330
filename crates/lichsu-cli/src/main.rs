//! lichsu CLI - extract and clean per-symbol stock history sheets

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use lichsu_core::{normalize, CleanedSheet, Config, SheetReport};
use lichsu_xlsx::{write_workbook, InputWorkbook};

#[derive(Parser)]
#[command(name = "lichsu")]
#[command(
    author,
    version,
    about = "Extract serialized trading records from a stock-history workbook \
             and export one cleaned sheet per symbol"
)]
struct Cli {
    /// Input workbook (default: the standard HNX history export)
    input: Option<PathBuf>,

    /// Output workbook (default: "<input stem>_Clean.xlsx")
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::default();
    if let Some(input) = cli.input {
        config.input_path = input;
    }
    config.output_path = cli
        .output
        .unwrap_or_else(|| derive_output_path(&config.input_path));

    run(&config)
}

fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_Clean.xlsx"))
}

fn run(config: &Config) -> Result<()> {
    print_banner();

    let mut workbook = InputWorkbook::open(&config.input_path)
        .with_context(|| format!("Failed to open '{}'", config.input_path.display()))?;

    let targets = config.targets(&workbook.sheet_names());

    if targets.is_empty() {
        println!("No target sheets found in '{}'", config.input_path.display());
    } else {
        println!("Found {} target sheet(s): {}", targets.len(), targets.join(", "));
    }
    println!();

    let mut reports: Vec<SheetReport> = Vec::new();
    for name in &targets {
        let raw = workbook
            .read_sheet(name)
            .with_context(|| format!("Failed to read sheet '{name}'"))?;
        let report = normalize::sheet(&raw, name, &config.schema);
        print_report(&report);
        reports.push(report);
    }

    let sheets: Vec<(String, CleanedSheet)> = reports
        .iter()
        .map(|r| (r.name.clone(), r.sheet.clone()))
        .collect();

    println!();
    println!(
        "Writing {} sheet(s) to '{}'",
        sheets.len(),
        config.output_path.display()
    );
    write_workbook(&config.output_path, &sheets)
        .with_context(|| format!("Failed to write '{}'", config.output_path.display()))?;

    let populated = reports.iter().filter(|r| !r.sheet.is_empty()).count();
    println!("Done. {populated} sheet(s) produced cleaned data.");

    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(70));
    println!("HNX-INDEX STOCK HISTORY - EXTRACT & CLEAN");
    println!("{}", "=".repeat(70));
}

fn print_report(report: &SheetReport) {
    println!(
        "Processing sheet: {} ({} rows)",
        report.name, report.input_rows
    );
    match &report.dict_column {
        None => println!("  no dict-bearing column found"),
        Some(column) => {
            println!("  dict column: '{column}'");
            if report.parsed_rows == 0 {
                println!("  no decodable records");
            } else {
                println!("  done: {} rows", report.sheet.rows.len());
            }
        }
    }
}
