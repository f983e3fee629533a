use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod aggregate;
mod columns;
mod error;
mod export;
mod format;
mod models;
mod pipeline;
mod summary;

use models::{ChartSpec, TableData};

#[derive(Parser)]
#[command(name = "gradebook-analyzer")]
#[command(about = "Grade average and pass/fail analysis for student gradebook files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV or XLSX gradebook and print the annotated results
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// Write the chart specification as JSON to this path
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { input, chart_out } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let extension = input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default();

            let output = pipeline::analyze(&bytes, extension);
            print_table(&output.table);

            if let Some(chart) = &output.chart {
                print_chart_summary(chart);
                if let Some(path) = &chart_out {
                    std::fs::write(path, serde_json::to_string_pretty(chart)?)?;
                    println!("Chart spec written to {}.", path.display());
                }
            }
            if let Some(path) = &output.artifact {
                println!("Results file written to {}.", path.display());
            }
        }
    }

    Ok(())
}

fn print_table(table: &TableData) {
    if table.columns.is_empty() {
        println!("No data.");
        return;
    }
    println!("{}", table.columns.join(" | "));
    for row in &table.rows {
        println!("{}", row.join(" | "));
    }
    println!();
}

fn print_chart_summary(chart: &ChartSpec) {
    println!("{}:", chart.title);
    for bar in &chart.bars {
        println!(
            "- {}: {} student(s) ({})",
            bar.label,
            bar.count,
            bar.members.join(", ")
        );
    }
    println!();
}
