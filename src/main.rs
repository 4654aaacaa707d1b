use anyhow::{Context, Result};
use chartspec::{compile, parse_chart_spec, validate, CompileError, PlotData};
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chartspec")]
#[command(about = "Compile a declarative chart specification into a render configuration", long_about = None)]
struct Args {
    /// Chart specification (JSON)
    #[arg(long)]
    spec: PathBuf,

    /// Row data: a JSON array of objects, or CSV when the file ends in `.csv`
    #[arg(long)]
    data: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Only validate the chart specification; print nothing on success
    #[arg(long)]
    validate_only: bool,
}

fn load_data(path: &Path) -> Result<PlotData> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        PlotData::from_csv_reader(file).with_context(|| format!("Failed to read CSV {}", path.display()))
    } else {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let value: serde_json::Value =
            serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))?;
        PlotData::from_json(&value)
    }
}

fn report_violations(errors: &chartspec::ValidationErrors) -> ! {
    eprintln!("Invalid chart specification:");
    for v in errors.violations() {
        eprintln!("  - {}", v);
    }
    std::process::exit(1);
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    let spec_text = fs::read_to_string(&args.spec)
        .with_context(|| format!("Failed to read spec {}", args.spec.display()))?;
    let spec = parse_chart_spec(&spec_text)?;

    if args.validate_only {
        if let Err(errors) = validate(&spec) {
            report_violations(&errors);
        }
        return Ok(());
    }

    let data = match &args.data {
        Some(path) => load_data(path)?,
        None => PlotData::default(),
    };

    let config = match compile(&spec, &data) {
        Ok(config) => config,
        Err(CompileError::Invalid(errors)) => report_violations(&errors),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&config)
    } else {
        serde_json::to_string(&config)
    }
    .context("Failed to serialize render configuration")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
