//! CLI argument parsing for report generation.
//!
//! The CLI is intentionally thin: it names an analysis document and an
//! output root, then hands everything to the report engine.
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "covrep",
    version,
    about = "Render per-symbol coverage analysis into annotated reports",
    after_help = "Examples:\n  covrep --analysis run.json --output-dir coverage/\n  covrep --analysis run.json --output-dir coverage/ --set core --verbose"
)]
pub struct RootArgs {
    /// Analysis document produced by the coverage analyzer (JSON)
    #[arg(long, value_name = "FILE")]
    pub analysis: PathBuf,

    /// Directory under which per-set report directories are written
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Restrict generation to the named symbol sets (default: every set)
    #[arg(long = "set", value_name = "NAME")]
    pub sets: Vec<String>,

    /// Emit a transcript of generated report files
    #[arg(long)]
    pub verbose: bool,
}
