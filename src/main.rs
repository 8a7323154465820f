use clap::Parser;
use erdrank::rank::RankEngine;
use erdrank::serializer::{self, OutputFormat};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Compute a layered arrangement for an ER diagram
#[derive(Parser, Debug)]
#[command(name = "erdrank")]
#[command(version)]
#[command(about = "Assign levels and orders to ERD entities", long_about = None)]
struct Args {
    /// Input .erd file (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Rank only the entities of this view
    #[arg(long, value_name = "NAME")]
    view: Option<String>,

    /// Output format: arrangement, table, json
    #[arg(short, long, default_value = "arrangement", value_parser = parse_format)]
    format: OutputFormat,

    /// Number of down+up crossing-reduction sweeps
    #[arg(long, default_value_t = RankEngine::default().sweeps())]
    sweeps: usize,

    /// Log phase summaries to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s).ok_or_else(|| format!("expected arrangement, table or json, got {}", s))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "erdrank=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<String, String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
    }
}

fn run(args: &Args) -> Result<(), String> {
    let source = read_input(&args.input)?;

    let engine = RankEngine::default().with_sweeps(args.sweeps);
    let ranking = erdrank::arrange(&source, args.view.as_deref(), &engine).map_err(|e| e.to_string())?;
    let text = serializer::serialize(&ranking, args.format).map_err(|e| e.to_string())?;

    match &args.output {
        Some(path) => {
            fs::write(path, &text).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
        }
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
