use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "arreSTick CLI - Predicts arreSTick motif regions in protein sequences and UniProt entries.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a sequence, UniProt accession or entry name and report motif regions.
    Predict(PredictArgs),
    /// Print the accession a UniProt entry name or accession resolves to.
    Resolve(ResolveArgs),
}

/// Where the model and entry table come from, shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the per-user configuration directory, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the model parameter file.
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Override the model to use from the parameter file.
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// Override the UniProt entry table (TSV with `Entry` and `Entry Name` columns).
    #[arg(short, long, value_name = "PATH")]
    pub entries: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S regions.threshold=0.6
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// A UniProt accession, an entry name, or a literal amino acid sequence.
    /// Multiple values are joined, so a sequence may be split by whitespace.
    #[arg(required = true, num_args(1..), value_name = "QUERY")]
    pub query: Vec<String>,

    /// Output format written to stdout.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Per-run overrides of region and retrieval settings.
#[derive(Args, Debug, Default, Clone)]
pub struct TuningArgs {
    /// Minimum window probability for a residue to start a region.
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Probability assigned to residues that cannot start a full window.
    #[arg(long, value_name = "FLOAT")]
    pub trailing_fill: Option<f64>,

    /// Never contact AlphaFold DB. Only literal sequences can then be scored.
    #[arg(long)]
    pub no_confidence: bool,

    /// Timeout in seconds for each AlphaFold DB request.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of retries after a transport failure.
    #[arg(long, value_name = "INT")]
    pub retries: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// A UniProt entry name (e.g. ARRB1_HUMAN) or accession.
    #[arg(required = true)]
    pub identifier: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The full prediction as pretty-printed JSON.
    Json,
    /// One tab-separated row per region.
    Tsv,
    /// One tab-separated row per residue with probability and confidence.
    Residues,
}
