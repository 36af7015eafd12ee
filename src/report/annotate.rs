//! Annotation classification for the annotated listing.
//!
//! Classification is a pure function of the coverage-map facts for one
//! instruction; identifier correlation to uncovered ranges and branches
//! happens alongside it so a listing line can link into the range reports.
use crate::model::{CoverageDetail, CoverageMap, Instruction};

/// Coverage state of one listing line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationState {
    /// Label or comment line; never annotated.
    Source,
    /// Executed instruction with no outstanding branch outcome.
    Executed,
    NeverExecuted,
    BranchAlwaysTaken,
    BranchNeverTaken,
}

impl AnnotationState {
    /// Suffix appended to the listing line for this state.
    pub fn annotation(&self) -> &'static str {
        match self {
            AnnotationState::Source | AnnotationState::Executed => "",
            AnnotationState::NeverExecuted => "<== NOT EXECUTED",
            AnnotationState::BranchAlwaysTaken => "<== ALWAYS TAKEN",
            AnnotationState::BranchNeverTaken => "<== NEVER TAKEN",
        }
    }
}

/// Classify coverage-map facts for one real instruction.
///
/// A branch with both outcomes observed is fully covered and reads as a
/// plain executed instruction.
pub fn classify(
    executed: bool,
    is_branch: bool,
    always_taken: bool,
    never_taken: bool,
) -> AnnotationState {
    if !executed {
        AnnotationState::NeverExecuted
    } else if is_branch {
        if always_taken {
            AnnotationState::BranchAlwaysTaken
        } else if never_taken {
            AnnotationState::BranchNeverTaken
        } else {
            AnnotationState::Executed
        }
    } else {
        AnnotationState::Executed
    }
}

/// Classify one instruction against its symbol's coverage map and correlate
/// it with an uncovered-range or uncovered-branch identifier (0 when none).
pub fn classify_instruction(
    instruction: &Instruction,
    map: &CoverageMap,
    base_address: u32,
    detail: &CoverageDetail,
) -> (AnnotationState, u32) {
    if !instruction.is_instruction {
        return (AnnotationState::Source, 0);
    }

    let offset = instruction.address - base_address;
    if !map.was_executed(offset) {
        return (
            AnnotationState::NeverExecuted,
            detail.ranges.id_for(instruction.address),
        );
    }
    if map.is_branch(offset) {
        let id = detail.branches.id_for(instruction.address);
        let state = classify(
            true,
            true,
            map.was_always_taken(offset),
            map.was_never_taken(offset),
        );
        return (state, id);
    }
    (AnnotationState::Executed, 0)
}

#[cfg(test)]
mod tests {
    use super::{classify, classify_instruction, AnnotationState};
    use crate::model::{
        CoverageDetail, CoverageMap, CoverageRange, CoverageRanges, Instruction, RangeReason,
    };

    #[test]
    fn all_fact_combinations_reach_only_documented_states() {
        for bits in 0..16u32 {
            let executed = bits & 1 != 0;
            let is_branch = bits & 2 != 0;
            let always = bits & 4 != 0;
            let never = bits & 8 != 0;
            let state = classify(executed, is_branch, always, never);
            let expected = if !executed {
                AnnotationState::NeverExecuted
            } else if is_branch && always {
                AnnotationState::BranchAlwaysTaken
            } else if is_branch && never {
                AnnotationState::BranchNeverTaken
            } else {
                AnnotationState::Executed
            };
            assert_eq!(state, expected, "facts {bits:04b}");
        }
    }

    #[test]
    fn branch_with_both_outcomes_reads_as_executed() {
        let state = classify(true, true, false, false);
        assert_eq!(state, AnnotationState::Executed);
        assert_eq!(state.annotation(), "");
    }

    #[test]
    fn annotation_suffixes_match_states() {
        assert_eq!(AnnotationState::Source.annotation(), "");
        assert_eq!(
            AnnotationState::NeverExecuted.annotation(),
            "<== NOT EXECUTED"
        );
        assert_eq!(
            AnnotationState::BranchAlwaysTaken.annotation(),
            "<== ALWAYS TAKEN"
        );
        assert_eq!(
            AnnotationState::BranchNeverTaken.annotation(),
            "<== NEVER TAKEN"
        );
    }

    fn instruction(address: u32, is_instruction: bool) -> Instruction {
        Instruction {
            address,
            line: "insn".to_string(),
            is_instruction,
        }
    }

    fn detail_with(ranges: Vec<CoverageRange>, branches: Vec<CoverageRange>) -> CoverageDetail {
        CoverageDetail {
            ranges: CoverageRanges::new(ranges),
            branches: CoverageRanges::new(branches),
        }
    }

    #[test]
    fn non_instruction_lines_are_plain_source() {
        let map = CoverageMap::new(vec![false]);
        let detail = detail_with(Vec::new(), Vec::new());
        let (state, id) = classify_instruction(&instruction(0x100, false), &map, 0x100, &detail);
        assert_eq!(state, AnnotationState::Source);
        assert_eq!(id, 0);
    }

    #[test]
    fn never_executed_instruction_links_to_its_range() {
        let map = CoverageMap::new(vec![false, false]);
        let detail = detail_with(
            vec![CoverageRange {
                low_address: 0x100,
                high_address: 0x101,
                reason: RangeReason::NotExecuted,
            }],
            Vec::new(),
        );
        let (state, id) = classify_instruction(&instruction(0x100, true), &map, 0x100, &detail);
        assert_eq!(state, AnnotationState::NeverExecuted);
        assert_eq!(id, 1);
    }

    #[test]
    fn uncovered_branch_links_to_its_branch_entry() {
        let mut map = CoverageMap::new(vec![true]);
        map.record_branch(0, true, false);
        let detail = detail_with(
            Vec::new(),
            vec![CoverageRange {
                low_address: 0x100,
                high_address: 0x103,
                reason: RangeReason::BranchAlwaysTaken,
            }],
        );
        let (state, id) = classify_instruction(&instruction(0x100, true), &map, 0x100, &detail);
        assert_eq!(state, AnnotationState::BranchAlwaysTaken);
        assert_eq!(id, 1);
    }
}
