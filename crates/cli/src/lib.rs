//! c3 CLI -- verify recorded memory traces against causal consistency models.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use c3_core::history::display::format_history;
use c3_core::history::trace::Trace;
use c3_core::history::types::OpId;
use c3_core::history::History;
use c3_core::specification::{MemoryArg, MemoryMethod, MemoryValue, RwMemory};
use c3_core::Model;
use c3_parser::ParseError;
use clap::{Parser, Subcommand, ValueEnum};
use derive_more::From;

/// A history over the key-value memory, as loaded from disk.
pub type MemoryHistory = History<MemoryMethod, MemoryArg<String, u64>, MemoryValue<u64>>;

/// The JSON input format.
pub type MemoryTrace = Trace<MemoryMethod, MemoryArg<String, u64>, MemoryValue<u64>>;

/// The oracle every loaded history is checked against.
pub const MEMORY: RwMemory<String, u64> = RwMemory::new();

#[derive(Debug, Parser)]
#[command(
    name = "c3",
    about = "Causal consistency checking for recorded memory traces"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify every trace (.json or .hist) in a directory
    Verify(VerifyArgs),
    /// Format compact trace (.hist) files
    Fmt(FmtArgs),
    /// Print the JSON Schema for the trace input format to stdout
    Schema,
    /// Print the program order of a trace as a Graphviz DOT graph
    Dot(DotArgs),
}

#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Input directory containing trace files
    #[arg(long)]
    pub input_dir: PathBuf,
    /// Consistency model to check
    #[arg(long)]
    pub model: ModelArg,
    /// Search candidate orders on all cores
    #[arg(long)]
    pub parallel: bool,
    /// Print witness details on PASS
    #[arg(long)]
    pub verbose: bool,
    /// Output results as JSON (one object per file)
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    /// Causal Consistency
    Cc,
    /// Causal Memory
    Cm,
    /// Causal Convergence
    Ccv,
}

impl From<ModelArg> for Model {
    fn from(model: ModelArg) -> Self {
        match model {
            ModelArg::Cc => Self::CausalConsistency,
            ModelArg::Cm => Self::CausalMemory,
            ModelArg::Ccv => Self::CausalConvergence,
        }
    }
}

#[derive(Debug, Parser)]
pub struct FmtArgs {
    /// Input files or directories to format
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Check formatting without modifying files (exit 1 if unformatted)
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Parser)]
pub struct DotArgs {
    /// Trace file (.json or .hist)
    pub file: PathBuf,
    /// Label nodes with operation ids only
    #[arg(long)]
    pub no_label: bool,
}

/// Errors raised while reading or writing trace files.
#[derive(Debug, From)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    Parse(ParseError),
    /// A method applied to an argument of the wrong shape, such as `wr`
    /// with a bare key.
    #[from(skip)]
    Malformed { op_id: OpId, request: String },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::Json(e) => write!(f, "invalid trace: {e}"),
            Self::Parse(e) => write!(f, "{e}"),
            Self::Malformed { op_id, request } => {
                write!(f, "invalid trace: {op_id} issues malformed request {request}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Load a trace file: `.json` files use the [`Trace`] format, anything else
/// the compact text format.
///
/// # Errors
///
/// Returns an [`Error`] if the file cannot be read, does not parse, or
/// pairs a method with an argument [`MEMORY`] cannot apply it to.
pub fn load_history(path: &Path) -> Result<MemoryHistory, Error> {
    let history = if has_extension(path, "json") {
        let trace: MemoryTrace = serde_json::from_reader(BufReader::new(fs::File::open(path)?))?;
        History::from(trace)
    } else {
        History::from_sessions(c3_parser::parse_history(&fs::read_to_string(path)?)?)
    };
    if let Some((op_id, label)) = history
        .labels()
        .iter()
        .find(|(_, label)| !label.method().accepts(label.arg()))
    {
        return Err(Error::Malformed {
            op_id: op_id.clone(),
            request: format!("{}({})", label.method(), label.arg()),
        });
    }
    tracing::debug!(path = %path.display(), operations = history.len(), "loaded trace");
    Ok(history)
}

/// Trace files directly under `dir`, sorted by path.
///
/// # Errors
///
/// Returns an [`Error`] if `dir` cannot be read.
pub fn trace_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, Error> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| extensions.iter().any(|ext| has_extension(path, ext)))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Canonical text of a compact trace: one operation per line, comments and
/// blank lines dropped.
///
/// # Errors
///
/// Returns the [`ParseError`] if `source` is not a valid compact trace.
pub fn canonical_form(source: &str) -> Result<String, ParseError> {
    c3_parser::parse_history(source).map(|processes| format_history(&processes))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}
