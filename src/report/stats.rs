//! Run statistics for the aggregate summary.
//!
//! Byte counts are scanned from every symbol's unified coverage map; branch
//! counters come from the upstream analyzer. Statistics are recomputed per
//! run and never persisted.
use crate::analysis::Analysis;
use crate::model::SetCounters;

/// Aggregate coverage statistics for one symbol subset.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunStatistics {
    pub total_bytes: u64,
    pub bytes_not_executed: u64,
    pub counters: SetCounters,
    pub branch_info_available: bool,
}

impl RunStatistics {
    /// Scan every symbol in the subset that has a unified coverage map.
    pub fn collect(set_name: &str, analysis: &Analysis) -> Self {
        let mut stats = RunStatistics {
            branch_info_available: analysis.branch_info_available,
            ..RunStatistics::default()
        };
        let Some(set) = analysis.symbols.set(set_name) else {
            return stats;
        };
        stats.counters = set.counters;

        for symbol in &set.symbols {
            let Some(info) = analysis.symbols.info(symbol) else {
                continue;
            };
            let Some(map) = info.coverage_map.as_ref() else {
                continue;
            };
            for offset in 0..info.size_in_bytes {
                stats.total_bytes += 1;
                if !map.was_executed(offset) {
                    stats.bytes_not_executed += 1;
                }
            }
        }
        stats
    }

    /// Percentage of analyzed bytes not executed. Zero analyzed bytes reads
    /// as 0% not executed, so the summary shows 100% executed; see DESIGN.md
    /// for why that guard is preserved as-is.
    pub fn percent_not_executed(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            100.0 * self.bytes_not_executed as f64 / self.total_bytes as f64
        }
    }

    pub fn percent_executed(&self) -> f64 {
        100.0 - self.percent_not_executed()
    }

    /// Whether branch statistics can be reported at all.
    pub fn has_branch_data(&self) -> bool {
        self.branch_info_available && self.counters.branches_found > 0
    }

    /// Each conditional branch contributes two paths; a never-executed
    /// branch misses both.
    pub fn uncovered_branch_paths(&self) -> u32 {
        self.counters.branches_always_taken
            + self.counters.branches_never_taken
            + self.counters.branches_not_executed * 2
    }

    /// Percentage of branch paths covered; `None` when no branch data exists
    /// for the run.
    pub fn percent_branch_paths_covered(&self) -> Option<f64> {
        if !self.has_branch_data() {
            return None;
        }
        let total_paths = f64::from(self.counters.branches_found) * 2.0;
        Some(100.0 - 100.0 * f64::from(self.uncovered_branch_paths()) / total_paths)
    }
}

#[cfg(test)]
mod tests {
    use super::RunStatistics;
    use crate::model::SetCounters;

    #[test]
    fn zero_analyzed_bytes_reads_as_fully_executed() {
        let stats = RunStatistics::default();
        assert_eq!(stats.percent_not_executed(), 0.0);
        assert_eq!(stats.percent_executed(), 100.0);
    }

    #[test]
    fn byte_percentages_follow_the_scan() {
        let stats = RunStatistics {
            total_bytes: 200,
            bytes_not_executed: 50,
            ..RunStatistics::default()
        };
        assert_eq!(stats.percent_not_executed(), 25.0);
        assert_eq!(stats.percent_executed(), 75.0);
    }

    #[test]
    fn branch_path_percentage_matches_path_accounting() {
        let stats = RunStatistics {
            branch_info_available: true,
            counters: SetCounters {
                branches_found: 10,
                branches_always_taken: 2,
                branches_never_taken: 1,
                branches_not_executed: 1,
                ..SetCounters::default()
            },
            ..RunStatistics::default()
        };
        assert_eq!(stats.uncovered_branch_paths(), 5);
        assert_eq!(stats.percent_branch_paths_covered(), Some(75.0));
    }

    #[test]
    fn branch_percentage_is_omitted_without_branch_data() {
        let no_branches = RunStatistics {
            branch_info_available: true,
            ..RunStatistics::default()
        };
        assert_eq!(no_branches.percent_branch_paths_covered(), None);

        let unavailable = RunStatistics {
            branch_info_available: false,
            counters: SetCounters {
                branches_found: 4,
                ..SetCounters::default()
            },
            ..RunStatistics::default()
        };
        assert!(!unavailable.has_branch_data());
        assert_eq!(unavailable.percent_branch_paths_covered(), None);
    }
}
