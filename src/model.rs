//! Symbol and coverage data model borrowed read-only by the report engine.
//!
//! The engine narrates coverage facts computed elsewhere; nothing in this
//! module mutates after load.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One disassembled line of a symbol.
///
/// `is_instruction` distinguishes real instructions from label or comment
/// lines, which are never annotated.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Instruction {
    pub address: u32,
    pub line: String,
    pub is_instruction: bool,
}

/// Why a contiguous address interval appears in an uncovered set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeReason {
    #[default]
    NotExecuted,
    BranchAlwaysTaken,
    BranchNeverTaken,
}

impl RangeReason {
    pub fn describe(&self) -> &'static str {
        match self {
            RangeReason::NotExecuted => "NOT EXECUTED",
            RangeReason::BranchAlwaysTaken => "ALWAYS TAKEN",
            RangeReason::BranchNeverTaken => "NEVER TAKEN",
        }
    }
}

/// A contiguous address interval marked uncovered.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CoverageRange {
    pub low_address: u32,
    pub high_address: u32,
    #[serde(default)]
    pub reason: RangeReason,
}

impl CoverageRange {
    pub fn size(&self) -> u32 {
        self.high_address - self.low_address + 1
    }
}

/// An ordered uncovered-range set with identifiers assigned in discovery
/// order, starting at 1. Identifier 0 means "no entry for this address".
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CoverageRanges {
    ranges: Vec<CoverageRange>,
}

impl CoverageRanges {
    pub fn new(ranges: Vec<CoverageRange>) -> Self {
        Self { ranges }
    }

    /// Identifier of the range starting at `address`, or 0 when none does.
    pub fn id_for(&self, address: u32) -> u32 {
        self.ranges
            .iter()
            .position(|range| range.low_address == address)
            .map(|index| index as u32 + 1)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoverageRange> {
        self.ranges.iter()
    }
}

/// Uncovered byte ranges and uncovered branches travel together: the
/// upstream analyzer allocates both or neither for a symbol, so a single
/// optional value holds the pair.
#[derive(Clone, Debug)]
pub struct CoverageDetail {
    pub ranges: CoverageRanges,
    pub branches: CoverageRanges,
}

#[derive(Clone, Copy, Debug, Default)]
struct BranchOutcome {
    was_taken: bool,
    was_not_taken: bool,
}

/// Merged executed/branch-outcome record for one symbol, queried by byte
/// offset from the symbol's base address.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "CoverageMapData")]
pub struct CoverageMap {
    executed: Vec<bool>,
    branches: BTreeMap<u32, BranchOutcome>,
}

impl CoverageMap {
    pub fn new(executed: Vec<bool>) -> Self {
        Self {
            executed,
            branches: BTreeMap::new(),
        }
    }

    pub fn record_branch(&mut self, offset: u32, was_taken: bool, was_not_taken: bool) {
        self.branches.insert(
            offset,
            BranchOutcome {
                was_taken,
                was_not_taken,
            },
        );
    }

    pub fn was_executed(&self, offset: u32) -> bool {
        self.executed.get(offset as usize).copied().unwrap_or(false)
    }

    pub fn is_branch(&self, offset: u32) -> bool {
        self.branches.contains_key(&offset)
    }

    pub fn was_always_taken(&self, offset: u32) -> bool {
        self.branches
            .get(&offset)
            .is_some_and(|outcome| outcome.was_taken && !outcome.was_not_taken)
    }

    pub fn was_never_taken(&self, offset: u32) -> bool {
        self.branches
            .get(&offset)
            .is_some_and(|outcome| !outcome.was_taken && outcome.was_not_taken)
    }
}

#[derive(Deserialize)]
struct CoverageMapData {
    executed: Vec<bool>,
    #[serde(default)]
    branches: Vec<BranchRecord>,
}

#[derive(Deserialize)]
struct BranchRecord {
    offset: u32,
    was_taken: bool,
    was_not_taken: bool,
}

impl From<CoverageMapData> for CoverageMap {
    fn from(data: CoverageMapData) -> Self {
        let mut map = CoverageMap::new(data.executed);
        for branch in data.branches {
            map.record_branch(branch.offset, branch.was_taken, branch.was_not_taken);
        }
        map
    }
}

/// Everything the engine knows about one analyzed symbol.
///
/// `coverage_map` and `detail` are absent for symbols never referenced by
/// any analyzed executable.
#[derive(Clone, Debug)]
pub struct SymbolInformation {
    pub base_address: u32,
    pub size_in_bytes: u32,
    pub instructions: Vec<Instruction>,
    pub coverage_map: Option<CoverageMap>,
    pub detail: Option<CoverageDetail>,
}

/// Per-subset counters supplied by the upstream analyzer.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct SetCounters {
    pub branches_found: u32,
    pub branches_always_taken: u32,
    pub branches_never_taken: u32,
    pub branches_not_executed: u32,
    pub unreferenced_symbols: u32,
    pub uncovered_ranges: u32,
}

/// A named symbol subset in its defined report order.
#[derive(Clone, Debug)]
pub struct SymbolSet {
    pub name: String,
    pub symbols: Vec<String>,
    pub counters: SetCounters,
}

/// The full analyzed-symbol view handed to the report engine.
#[derive(Debug, Default)]
pub struct AnalyzedSymbols {
    sets: Vec<SymbolSet>,
    symbols: BTreeMap<String, SymbolInformation>,
}

impl AnalyzedSymbols {
    pub fn new(sets: Vec<SymbolSet>, symbols: BTreeMap<String, SymbolInformation>) -> Self {
        Self { sets, symbols }
    }

    pub fn sets(&self) -> &[SymbolSet] {
        &self.sets
    }

    pub fn set(&self, name: &str) -> Option<&SymbolSet> {
        self.sets.iter().find(|set| set.name == name)
    }

    pub fn info(&self, symbol: &str) -> Option<&SymbolInformation> {
        self.symbols.get(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoverageMap, CoverageRange, CoverageRanges, RangeReason};

    fn range(low: u32, high: u32) -> CoverageRange {
        CoverageRange {
            low_address: low,
            high_address: high,
            reason: RangeReason::NotExecuted,
        }
    }

    #[test]
    fn range_ids_follow_discovery_order() {
        let ranges = CoverageRanges::new(vec![range(0x100, 0x103), range(0x200, 0x207)]);
        assert_eq!(ranges.id_for(0x100), 1);
        assert_eq!(ranges.id_for(0x200), 2);
    }

    #[test]
    fn unknown_address_has_no_id() {
        let ranges = CoverageRanges::new(vec![range(0x100, 0x103)]);
        assert_eq!(ranges.id_for(0x104), 0);
        assert_eq!(CoverageRanges::default().id_for(0x100), 0);
    }

    #[test]
    fn range_size_is_inclusive() {
        assert_eq!(range(0x100, 0x100).size(), 1);
        assert_eq!(range(0x100, 0x107).size(), 8);
    }

    #[test]
    fn map_reports_branch_outcomes() {
        let mut map = CoverageMap::new(vec![true, true, true, true]);
        map.record_branch(0, true, false);
        map.record_branch(2, false, true);
        assert!(map.is_branch(0));
        assert!(map.was_always_taken(0));
        assert!(!map.was_never_taken(0));
        assert!(map.was_never_taken(2));
        assert!(!map.is_branch(1));
    }

    #[test]
    fn both_outcomes_observed_is_neither_always_nor_never() {
        let mut map = CoverageMap::new(vec![true]);
        map.record_branch(0, true, true);
        assert!(map.is_branch(0));
        assert!(!map.was_always_taken(0));
        assert!(!map.was_never_taken(0));
    }

    #[test]
    fn offsets_past_map_end_read_as_not_executed() {
        let map = CoverageMap::new(vec![true]);
        assert!(map.was_executed(0));
        assert!(!map.was_executed(1));
    }
}
