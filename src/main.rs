use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use mdflow::{LayoutOptions, LogTrace};

#[derive(Parser)]
#[command(
    name = "mdflow",
    version,
    about = "Parse a flowchart description into positioned nodes and edges"
)]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "json")]
    format: Format,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// Distance between levels along the main axis
    #[arg(long, value_name = "PX")]
    level_spacing: Option<f64>,

    /// Distance between nodes within a level
    #[arg(long, value_name = "PX")]
    node_spacing: Option<f64>,

    /// Log every parsing decision to stderr
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Summary,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.trace);

    if let Err(e) = run(&cli) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(trace: bool) {
    let default = if trace { "mdflow=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let defaults = LayoutOptions::default();
    let options = LayoutOptions {
        level_spacing: cli.level_spacing.unwrap_or(defaults.level_spacing),
        node_spacing: cli.node_spacing.unwrap_or(defaults.node_spacing),
    };

    let flow = mdflow::parse_diagram_with(&input, &options, &mut LogTrace);

    match cli.format {
        Format::Json if cli.pretty => println!("{}", serde_json::to_string_pretty(&flow)?),
        Format::Json => println!("{}", serde_json::to_string(&flow)?),
        Format::Summary => print!("{flow}"),
    }
    Ok(())
}
