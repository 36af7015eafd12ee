//! Analysis-input loading.
//!
//! The coverage analyzer is an external collaborator; its output arrives as
//! one JSON document that is deserialized here and validated against the
//! paired uncovered-set invariant before any report runs.
use crate::model::{
    AnalyzedSymbols, CoverageDetail, CoverageMap, CoverageRange, CoverageRanges, Instruction,
    SetCounters, SymbolInformation, SymbolSet,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One analysis run: everything the report engine consumes.
#[derive(Debug)]
pub struct Analysis {
    pub project_name: String,
    pub branch_info_available: bool,
    pub symbols: AnalyzedSymbols,
}

#[derive(Deserialize)]
struct RawAnalysis {
    project_name: String,
    branch_info_available: bool,
    sets: Vec<RawSet>,
    symbols: BTreeMap<String, RawSymbol>,
}

#[derive(Deserialize)]
struct RawSet {
    name: String,
    symbols: Vec<String>,
    #[serde(default)]
    counters: SetCounters,
}

#[derive(Deserialize)]
struct RawSymbol {
    base_address: u32,
    size_in_bytes: u32,
    #[serde(default)]
    instructions: Vec<Instruction>,
    coverage_map: Option<CoverageMap>,
    uncovered_ranges: Option<Vec<CoverageRange>>,
    uncovered_branches: Option<Vec<CoverageRange>>,
}

/// Load and validate an analysis document.
pub fn load_analysis(path: &Path) -> Result<Analysis> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read analysis {}", path.display()))?;
    let raw: RawAnalysis = serde_json::from_str(&text)
        .with_context(|| format!("parse analysis {}", path.display()))?;

    let sets = raw
        .sets
        .into_iter()
        .map(|set| SymbolSet {
            name: set.name,
            symbols: set.symbols,
            counters: set.counters,
        })
        .collect();

    let symbols = raw
        .symbols
        .into_iter()
        .map(|(name, symbol)| {
            let info = symbol_information(&name, symbol);
            (name, info)
        })
        .collect();

    Ok(Analysis {
        project_name: raw.project_name,
        branch_info_available: raw.branch_info_available,
        symbols: AnalyzedSymbols::new(sets, symbols),
    })
}

fn symbol_information(name: &str, raw: RawSymbol) -> SymbolInformation {
    // Uncovered ranges and branches are allocated together by the analyzer;
    // one without the other means the input data is corrupt.
    assert_eq!(
        raw.uncovered_ranges.is_some(),
        raw.uncovered_branches.is_some(),
        "symbol {name}: uncovered range and branch sets must be present together",
    );
    let detail = raw
        .uncovered_ranges
        .zip(raw.uncovered_branches)
        .map(|(ranges, branches)| CoverageDetail {
            ranges: CoverageRanges::new(ranges),
            branches: CoverageRanges::new(branches),
        });

    SymbolInformation {
        base_address: raw.base_address,
        size_in_bytes: raw.size_in_bytes,
        instructions: raw.instructions,
        coverage_map: raw.coverage_map,
        detail,
    }
}
