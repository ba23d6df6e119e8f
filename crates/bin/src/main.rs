//! Splice CLI binary.
//!
//! Fuses daily prices with quarterly statements for every ticker under an
//! input directory.

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use splice::data::QuarterlyDatePolicy;
use splice::engine::{FillPolicy, RatioPreset};
use splice::output::{ExportFormat, Exporter};
use splice::{PipelineConfig, run_batch};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "splice")]
#[command(about = "Fuse daily prices with quarterly financial statements", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build <TICKER>_with_all.csv for each ticker
    Run(RunArgs),

    /// List the tickers a run would process
    Tickers {
        /// Input root
        #[arg(long, default_value = "data")]
        input: PathBuf,
    },

    /// Show the ratios a preset recomputes
    Ratios {
        /// Ratio preset
        #[arg(long, value_enum, default_value_t = PresetArg::Standard)]
        preset: PresetArg,

        /// Print definitions as JSON, suitable for a config file
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Input root holding one directory per ticker
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory (defaults to each ticker's input directory)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Ticker to process; repeat for several (defaults to every directory)
    #[arg(long = "ticker")]
    tickers: Vec<String>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ratio preset
    #[arg(long, value_enum)]
    ratio_preset: Option<PresetArg>,

    /// Discount rate for the present value column
    #[arg(long)]
    discount_rate: Option<f64>,

    /// Growth rate for the present value column
    #[arg(long)]
    growth_rate: Option<f64>,

    /// Drop statement periods that are not dates instead of skipping the security
    #[arg(long)]
    drop_bad_dates: bool,

    /// Backward-fill daily gaps, letting early rows take later quarters' values
    #[arg(long)]
    allow_lookahead: bool,

    /// Treat ratio fields missing from a security as null instead of skipping it
    #[arg(long)]
    lenient_fields: bool,

    /// Process tickers in parallel
    #[arg(long)]
    parallel: bool,

    /// Write a run report (.json or .csv)
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Standard,
    CashFlow,
}

impl From<PresetArg> for RatioPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Standard => Self::Standard,
            PresetArg::CashFlow => Self::CashFlow,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_pipeline(args)?,
        Commands::Tickers { input } => {
            for ticker in PipelineConfig::new(input).tickers()? {
                println!("{ticker}");
            }
        }
        Commands::Ratios { preset, json } => show_ratios(preset.into(), json)?,
    }

    Ok(())
}

fn build_config(args: &RunArgs) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input_root = input.clone();
    }
    if args.output.is_some() {
        config.output_root = args.output.clone();
    }
    if !args.tickers.is_empty() {
        config.tickers = args.tickers.clone();
    }
    if let Some(preset) = args.ratio_preset {
        config.engine.ratios = RatioPreset::from(preset).ratio_set();
    }
    if let Some(r) = args.discount_rate {
        config.engine.valuation.discount_rate = r;
    }
    if let Some(g) = args.growth_rate {
        config.engine.valuation.growth_rate = g;
    }
    if args.drop_bad_dates {
        config.date_policy = QuarterlyDatePolicy::Drop;
    }
    if args.allow_lookahead {
        config.engine.align.fill = FillPolicy::legacy_daily();
    }
    if args.lenient_fields {
        config.engine.strict_fields = false;
    }
    config.parallel |= args.parallel;

    Ok(config)
}

fn run_pipeline(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    config.validate()?;

    let pb = ProgressBar::new(config.tickers()?.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.set_message("Fusing...");

    let report = run_batch(&config, |outcome| {
        pb.set_message(outcome.ticker.clone());
        pb.inc(1);
    })?;

    pb.finish_with_message(format!(
        "Wrote {} of {} tickers",
        report.written(),
        report.outcomes.len()
    ));

    if let Some(path) = &args.report {
        report.export_to_file(path, report_format(path))?;
        info!(path = %path.display(), "report saved");
    }

    Ok(())
}

fn report_format(path: &Path) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => ExportFormat::Csv,
        _ => ExportFormat::PrettyJson,
    }
}

fn show_ratios(preset: RatioPreset, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let set = preset.ratio_set();
    if json {
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    println!("Ratio preset: {preset}");
    for ratio in set.definitions() {
        println!("  {:<36} {}", ratio.name, ratio.expr.fields().join(", "));
    }
    Ok(())
}
