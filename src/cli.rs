use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{export::ExportFormat, parser::FileFormat};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Profile sample datasets and generate synthetic data",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze an uploaded CSV/JSON file: statistics, profiles, AI assessments, recommendations
    Analyze(AnalyzeArgs),
    /// Infer column kinds and summaries for a CSV/JSON file
    Profile(ProfileArgs),
    /// Count rows, columns, null values, and duplicate rows
    Stats(StatsArgs),
    /// Synthesize preview rows from a field schema file
    Preview(PreviewArgs),
    /// Propose a field schema from a natural-language description and preview it
    Describe(DescribeArgs),
    /// Generate synthetic rows for a field schema through the analysis service
    Generate(GenerateArgs),
    /// Re-serialize an uploaded file as CSV, JSON, or Excel-compatible CSV
    Export(ExportArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum InputFormat {
    Csv,
    Json,
}

impl From<InputFormat> for FileFormat {
    fn from(value: InputFormat) -> Self {
        match value {
            InputFormat::Csv => FileFormat::Csv,
            InputFormat::Json => FileFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum PreviewFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV or JSON file (use '-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Treat the input as this format instead of using its extension (required for stdin)
    #[arg(long = "input-format", value_enum)]
    pub input_format: Option<InputFormat>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct AiArgs {
    /// Gemini API key (falls back to GEMINI_API_KEY)
    #[arg(long = "api-key")]
    pub api_key: Option<String>,
    /// Model name (falls back to GEMINI_MODEL)
    #[arg(long = "model")]
    pub model: Option<String>,
    /// YAML file with api_key, model, endpoint, and timeout_secs
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Skip the analysis service and use fallback results
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub ai: AiArgs,
    /// Business domain hint passed to the analysis prompts
    #[arg(long, default_value = "general")]
    pub domain: String,
    /// Emit the full analysis as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Emit profiles as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Emit statistics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Field schema file (JSON, or YAML with a .yml/.yaml extension)
    #[arg(short = 's', long = "schema")]
    pub schema: PathBuf,
    /// Number of rows to synthesize
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
    /// Seed for reproducible values
    #[arg(long)]
    pub seed: Option<u64>,
    /// Output layout
    #[arg(long, value_enum, default_value_t = PreviewFormat::Table)]
    pub format: PreviewFormat,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Natural-language description of the dataset
    #[arg(short = 'd', long = "description")]
    pub description: String,
    /// Business domain hint
    #[arg(long, default_value = "general")]
    pub domain: String,
    /// Kind of data to design (e.g. tabular, time-series)
    #[arg(long = "data-type", default_value = "tabular")]
    pub data_type: String,
    /// Number of preview rows to synthesize from the proposed schema
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
    /// Seed for reproducible preview values
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the proposed schema as JSON to this path
    #[arg(long = "schema-out")]
    pub schema_out: Option<PathBuf>,
    #[command(flatten)]
    pub ai: AiArgs,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Field schema file (JSON, or YAML with a .yml/.yaml extension)
    #[arg(short = 's', long = "schema")]
    pub schema: PathBuf,
    /// Number of rows to request
    #[arg(long, default_value_t = 100)]
    pub rows: usize,
    /// Business domain hint
    #[arg(long, default_value = "general")]
    pub domain: String,
    /// Kind of data to generate
    #[arg(long = "data-type", default_value = "tabular")]
    pub data_type: String,
    /// Optional free-text description included in the prompt
    #[arg(long)]
    pub description: Option<String>,
    /// Original CSV/JSON sample to assess the generated rows against
    #[arg(long)]
    pub sample: Option<PathBuf>,
    /// Output format for generated rows
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Character encoding for the output (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
    #[command(flatten)]
    pub ai: AiArgs,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Target format; `excel` writes CSV text
    #[arg(long, value_enum)]
    pub format: ExportFormat,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Character encoding for the output (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}
