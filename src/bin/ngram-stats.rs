use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use ngram_stats::config::{ExtensionStrategy, IngestConfig};
use ngram_stats::good_turing::GoodTuringRow;
use ngram_stats::inspect::{frequency_window, resolve_bounds};
use ngram_stats::{
    AnalysisArtifacts, AnalysisReport, Analyzer, AnalyzerConfig, CsvSink, JsonSink, MultiSink,
    PunctuationSegmenter, SentenceSegmenter, UnicodeSentences,
};
use rayon::ThreadPoolBuilder;
use serde_json::json;

const DEFAULT_OUTPUT_DIR: &str = "ngram-stats-out";
const REPORT_FILE: &str = "analysis.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "N-gram frequency and smoothing statistics", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count n-grams in text inputs and write the result tables
    Analyze(AnalyzeArgs),
    /// Print a frequency window of the Good-Turing table from a JSON report
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    PrefixScan,
    CrossProduct,
}

impl From<StrategyArg> for ExtensionStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::PrefixScan => ExtensionStrategy::PrefixScan,
            StrategyArg::CrossProduct => ExtensionStrategy::CrossProduct,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SegmenterArg {
    /// Break after sentence-final punctuation followed by whitespace
    Punctuation,
    /// Unicode sentence boundaries (UAX #29)
    Unicode,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Text files or directories to ingest
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// N-gram order (at least 2)
    #[arg(short = 'n', long, value_name = "ORDER")]
    order: Option<usize>,

    /// Katz threshold for Good-Turing re-estimation
    #[arg(short = 'k', long = "katz", value_name = "K")]
    katz_threshold: Option<usize>,

    /// Directory receiving the result tables
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Witten-Bell extension counting strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::PrefixScan)]
    strategy: StrategyArg,

    /// Sentence segmentation rule
    #[arg(long, value_enum, default_value_t = SegmenterArg::Punctuation)]
    segmenter: SegmenterArg,

    /// Emit pretty JSON
    #[arg(long)]
    pretty: bool,

    /// Limit Rayon worker threads
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Disable recursive directory traversal
    #[arg(long)]
    no_recursive: bool,

    /// Follow symlinks during traversal
    #[arg(long)]
    follow_symlinks: bool,

    /// Disable stage logging and the spinner
    #[arg(long)]
    no_progress: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// JSON report written by `analyze --format json`
    #[arg(short = 'r', long, value_name = "PATH")]
    report: PathBuf,

    /// Smallest frequency to show
    #[arg(long, value_name = "C")]
    lower: Option<usize>,

    /// Largest frequency to show
    #[arg(long, value_name = "C")]
    upper: Option<usize>,

    /// Emit machine-readable JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Inspect(args) => run_inspect(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    if let Some(threads) = args.threads {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("unable to configure Rayon thread pool")?;
    }

    let mut cfg = AnalyzerConfig::builder()
        .extension_strategy(args.strategy.into())
        .show_progress(!args.no_progress);
    if let Some(order) = args.order {
        cfg = cfg.order(order);
    }
    if let Some(katz) = args.katz_threshold {
        cfg = cfg.katz_threshold(katz);
    }
    let cfg = cfg.build()?;
    let ingest = IngestConfig::builder()
        .recursive(!args.no_recursive)
        .follow_symlinks(args.follow_symlinks)
        .build();

    let spinner = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} analyzing corpus... {elapsed}")
            .context("invalid progress template")?
            .tick_chars("|/-\\ ");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let artifacts = match args.segmenter {
        SegmenterArg::Punctuation => analyze_with(cfg, PunctuationSegmenter, &args, &ingest),
        SegmenterArg::Unicode => analyze_with(cfg, UnicodeSentences, &args, &ingest),
    };
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let artifacts = artifacts?;

    // The report commits first; CSV tables move into place only after it landed.
    let mut sinks = MultiSink::new();
    if matches!(args.format, OutputFormat::Json | OutputFormat::Both) {
        sinks.push(JsonSink::new(args.output.join(REPORT_FILE), args.pretty));
    }
    if matches!(args.format, OutputFormat::Csv | OutputFormat::Both) {
        sinks.push(CsvSink::new(&args.output)?);
    }
    artifacts
        .persist(&mut sinks)
        .with_context(|| format!("failed to write results to {}", args.output.display()))?;

    info!(
        "analysis complete: ngrams={} contexts={} vocabulary={} duration={:.2?}",
        artifacts.ngrams.len(),
        artifacts.contexts.len(),
        artifacts.vocabulary.len(),
        artifacts.metrics.total_duration
    );
    print!("{artifacts}");
    println!("Output: {}", args.output.display());
    Ok(())
}

fn analyze_with<S: SentenceSegmenter>(
    cfg: AnalyzerConfig,
    segmenter: S,
    args: &AnalyzeArgs,
    ingest: &IngestConfig,
) -> Result<AnalysisArtifacts> {
    let analyzer = Analyzer::with_segmenter(cfg, segmenter);
    analyzer
        .analyze_paths(&args.inputs, ingest)
        .context("corpus analysis failed")
}

struct WindowTable<'a>(&'a [GoodTuringRow]);

impl fmt::Display for WindowTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10}  {:>12}  {:>14}", "Frequency", "Count", "Re-estimated")?;
        for row in self.0 {
            writeln!(
                f,
                "{:>10}  {:>12}  {:>14.6}",
                row.frequency, row.count, row.estimate
            )?;
        }
        Ok(())
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let report = AnalysisReport::load(&args.report)
        .with_context(|| format!("failed to load report {}", args.report.display()))?;
    let (lower, upper) = resolve_bounds(&report.good_turing, args.lower, args.upper);
    let window = frequency_window(&report.good_turing, args.lower, args.upper);

    if args.json {
        let summary = json!({
            "path": args.report.display().to_string(),
            "order": report.config.order,
            "katz_threshold": report.config.katz_threshold,
            "lower": lower,
            "upper": upper,
            "rows": window,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Order         : {}", report.config.order);
        println!("Katz threshold: {}", report.config.katz_threshold);
        println!("Window        : {lower}..={upper}");
        print!("{}", WindowTable(&window));
    }
    Ok(())
}
