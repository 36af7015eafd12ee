//! Coverage report generator.
//!
//! Loads an analysis document produced by an external coverage analyzer and
//! renders per-symbol reports for each requested symbol set.
use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod analysis;
mod cli;
mod files;
mod model;
mod report;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::RootArgs::parse();
    let analysis = analysis::load_analysis(&args.analysis)?;

    let set_names: Vec<String> = if args.sets.is_empty() {
        analysis
            .symbols
            .sets()
            .iter()
            .map(|set| set.name.clone())
            .collect()
    } else {
        for name in &args.sets {
            if analysis.symbols.set(name).is_none() {
                return Err(anyhow!("unknown symbol set {name:?}"));
            }
        }
        args.sets.clone()
    };

    for set_name in &set_names {
        report::generate_reports(set_name, &args.output_dir, &analysis, args.verbose)?;
    }

    Ok(())
}
