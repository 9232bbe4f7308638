use anyhow::Context;
use clap::Parser;
use placement_predictor::utils::validation::{validate_file_extension, Validate};
use placement_predictor::utils::logger;
use placement_predictor::{predict_csv, Predictor, TomlConfig};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

#[derive(Parser)]
#[command(name = "placement-batch")]
#[command(about = "Score a CSV of cgpa,iq rows with the placement predictor")]
struct Args {
    /// CSV file with a `cgpa,iq` header
    #[arg(short, long)]
    input: String,

    /// Output CSV path; stdout when omitted
    #[arg(short, long)]
    output: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override decision backend from config (rules or model)
    #[arg(long)]
    backend: Option<String>,

    /// Override model artifact path from config
    #[arg(long)]
    model_path: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose, None);

    let mut config = match &args.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };

    // 套用命令列覆蓋設定
    if let Some(backend) = &args.backend {
        config.model.backend = backend.clone();
        tracing::info!("🔧 Backend overridden to: {}", backend);
    }
    if let Some(model_path) = &args.model_path {
        config.model.path = model_path.clone();
    }

    config.validate().context("invalid configuration")?;
    validate_file_extension("input", &args.input, &["csv"]).context("invalid input file")?;

    let predictor = Predictor::from_config(&config.model, config.score_bounds());

    let reader = BufReader::new(
        File::open(&args.input).with_context(|| format!("failed to open '{}'", args.input))?,
    );
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create '{}'", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let summary = predict_csv(reader, writer, &predictor)
        .with_context(|| format!("batch scoring of '{}' failed", args.input))?;

    tracing::info!(
        "✅ Scored {} rows: {} placed, {} not placed, {} rejected",
        summary.total,
        summary.placed,
        summary.not_placed,
        summary.rejected
    );
    if let Some(path) = &args.output {
        tracing::info!("📁 Output saved to: {}", path);
    }

    Ok(())
}
