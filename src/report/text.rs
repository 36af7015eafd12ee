//! Plain-text report format.
//!
//! Keeps the default (empty) file headers and footers; every report is a
//! stream of labelled entry blocks separated by rule lines.
use super::annotate::AnnotationState;
use super::ReportFormat;
use crate::model::{CoverageRange, SymbolInformation};
use anyhow::Result;
use std::io::Write;

const SEPARATOR: &str =
    "============================================================";

pub struct TextFormat;

impl ReportFormat for TextFormat {
    fn extension(&self) -> &'static str {
        ".txt"
    }

    fn open_branch(&self, out: &mut dyn Write, has_branches: bool) -> Result<()> {
        if !has_branches {
            writeln!(out, "No branch information available")?;
        }
        Ok(())
    }

    fn annotated_start(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{SEPARATOR}")?;
        Ok(())
    }

    fn annotated_end(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out)?;
        Ok(())
    }

    fn put_annotated_line(
        &self,
        out: &mut dyn Write,
        _state: AnnotationState,
        line: &str,
        _id: u32,
    ) -> Result<()> {
        writeln!(out, "{line}")?;
        Ok(())
    }

    fn put_branch_entry(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        info: &SymbolInformation,
        range: &CoverageRange,
    ) -> Result<()> {
        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "Index         : {count}")?;
        writeln!(out, "Symbol        : {symbol} (0x{:x})", info.base_address)?;
        writeln!(
            out,
            "Range         : 0x{:x} - 0x{:x}",
            range.low_address, range.high_address
        )?;
        writeln!(out, "Size in Bytes : {}", range.size())?;
        writeln!(out, "Reason        : {}", range.reason.describe())?;
        Ok(())
    }

    fn put_coverage_line(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        info: &SymbolInformation,
        range: &CoverageRange,
    ) -> Result<()> {
        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "Index         : {count}")?;
        writeln!(out, "Symbol        : {symbol} (0x{:x})", info.base_address)?;
        writeln!(
            out,
            "Range         : 0x{:x} - 0x{:x}",
            range.low_address, range.high_address
        )?;
        writeln!(out, "Size in Bytes : {}", range.size())?;
        writeln!(out, "Reason        : {}", range.reason.describe())?;
        Ok(())
    }

    fn put_coverage_no_range(
        &self,
        _out: &mut dyn Write,
        no_range_out: &mut dyn Write,
        count: u32,
        symbol: &str,
    ) -> Result<()> {
        writeln!(no_range_out, "{SEPARATOR}")?;
        writeln!(no_range_out, "Index         : {count}")?;
        writeln!(no_range_out, "Symbol        : {symbol}")?;
        writeln!(no_range_out, "Status        : NEVER REFERENCED")?;
        writeln!(
            no_range_out,
            "This symbol was never referenced by an analyzed executable."
        )?;
        Ok(())
    }

    fn put_size_line(
        &self,
        out: &mut dyn Write,
        _count: u32,
        symbol: &str,
        range: &CoverageRange,
    ) -> Result<()> {
        writeln!(
            out,
            "{}\t{}\t0x{:x}",
            range.size(),
            symbol,
            range.low_address
        )?;
        Ok(())
    }

    fn put_symbol_summary_line(
        &self,
        out: &mut dyn Write,
        _count: u32,
        symbol: &str,
        info: &SymbolInformation,
    ) -> Result<()> {
        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "Symbol              : {symbol}")?;
        writeln!(out, "Size in Bytes       : {}", info.size_in_bytes)?;
        let instruction_count = info
            .instructions
            .iter()
            .filter(|instruction| instruction.is_instruction)
            .count();
        writeln!(out, "Instruction Count   : {instruction_count}")?;
        match info.detail.as_ref() {
            None => {
                writeln!(out, "Status              : NEVER REFERENCED")?;
            }
            Some(detail) => {
                writeln!(out, "Uncovered Ranges    : {}", detail.ranges.len())?;
                writeln!(out, "Uncovered Branches  : {}", detail.branches.len())?;
            }
        }
        Ok(())
    }
}
