//! Report generation for analyzed symbol sets.
//!
//! The engine walks one symbol subset per run and narrates coverage facts
//! through a pluggable [`ReportFormat`]; it decides when each entry is
//! emitted and with what arguments, never how it renders. Drivers run
//! sequentially per format, and the aggregate summary runs once, last,
//! independent of format.
use crate::analysis::Analysis;
use crate::files;
use crate::model::{CoverageRange, SymbolInformation, SymbolSet};
use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::path::Path;

pub mod annotate;
pub mod html;
pub mod line;
pub mod stats;
pub mod text;

use annotate::{classify_instruction, AnnotationState};
use html::HtmlFormat;
use line::format_source_line;
use stats::RunStatistics;
use text::TextFormat;

/// Run-level facts a format may render into headers or index pages.
pub struct ReportContext<'a> {
    pub output_dir: &'a Path,
    pub set_name: &'a str,
    pub project_name: &'a str,
}

/// Rendering capability implemented once per output format.
///
/// Open/close hooks let a format add per-file headers and footers; the
/// defaults write nothing, which is all the plain-text format needs for most
/// report kinds.
pub trait ReportFormat {
    /// File extension used to build report file names, e.g. `.txt`.
    fn extension(&self) -> &'static str;

    /// Landing page for the subset; formats without one write nothing.
    fn write_index(&self, ctx: &ReportContext<'_>, file_name: &str) -> Result<()> {
        let _ = (ctx, file_name);
        Ok(())
    }

    fn open_annotated(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn close_annotated(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn open_branch(&self, out: &mut dyn Write, has_branches: bool) -> Result<()> {
        let _ = (out, has_branches);
        Ok(())
    }
    fn close_branch(&self, out: &mut dyn Write, has_branches: bool) -> Result<()> {
        let _ = (out, has_branches);
        Ok(())
    }
    fn open_coverage(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn close_coverage(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn open_no_range(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn close_no_range(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn open_size(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn close_size(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn open_symbol_summary(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }
    fn close_symbol_summary(&self, out: &mut dyn Write) -> Result<()> {
        let _ = out;
        Ok(())
    }

    /// Marker before the first line of one symbol's annotated listing.
    fn annotated_start(&self, out: &mut dyn Write) -> Result<()>;
    /// Marker after the last line of one symbol's annotated listing.
    fn annotated_end(&self, out: &mut dyn Write) -> Result<()>;
    fn put_annotated_line(
        &self,
        out: &mut dyn Write,
        state: AnnotationState,
        line: &str,
        id: u32,
    ) -> Result<()>;
    fn put_branch_entry(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        info: &SymbolInformation,
        range: &CoverageRange,
    ) -> Result<()>;
    fn put_coverage_line(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        info: &SymbolInformation,
        range: &CoverageRange,
    ) -> Result<()>;
    fn put_coverage_no_range(
        &self,
        out: &mut dyn Write,
        no_range_out: &mut dyn Write,
        count: u32,
        symbol: &str,
    ) -> Result<()>;
    fn put_size_line(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        range: &CoverageRange,
    ) -> Result<()>;
    fn put_symbol_summary_line(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        info: &SymbolInformation,
    ) -> Result<()>;
}

/// One format's report pass over one symbol subset.
struct Reports<'a> {
    set: &'a SymbolSet,
    output_dir: &'a Path,
    analysis: &'a Analysis,
    format: &'a dyn ReportFormat,
}

impl<'a> Reports<'a> {
    fn info(&self, symbol: &str) -> Result<&'a SymbolInformation> {
        self.analysis
            .symbols
            .info(symbol)
            .ok_or_else(|| anyhow!("symbol {symbol:?} missing from analysis"))
    }

    fn context(&self) -> ReportContext<'a> {
        ReportContext {
            output_dir: self.output_dir,
            set_name: &self.set.name,
            project_name: &self.analysis.project_name,
        }
    }

    fn write_index(&self, file_name: &str) -> Result<()> {
        self.format.write_index(&self.context(), file_name)
    }

    /// Annotated listing. Symbols never referenced by any executable and
    /// symbols with nothing uncovered are skipped. A failed open is fatal
    /// for this report alone; the other drivers skip silently instead.
    fn write_annotated_report(&self, file_name: &str) -> Result<()> {
        let mut out = files::ensure_and_open(self.output_dir, &self.set.name, file_name)?
            .ok_or_else(|| anyhow!("unable to open {file_name}"))?;
        self.format.open_annotated(&mut out)?;

        for symbol in &self.set.symbols {
            let info = self.info(symbol)?;
            let Some(detail) = info.detail.as_ref() else {
                continue;
            };
            if detail.ranges.is_empty() && detail.branches.is_empty() {
                continue;
            }
            let Some(map) = info.coverage_map.as_ref() else {
                continue;
            };

            self.format.annotated_start(&mut out)?;
            for instruction in &info.instructions {
                let (state, id) = classify_instruction(instruction, map, info.base_address, detail);
                let line = format_source_line(&instruction.line, state.annotation());
                self.format.put_annotated_line(&mut out, state, &line, id)?;
            }
            self.format.annotated_end(&mut out)?;
        }

        self.format.close_annotated(&mut out)
    }

    /// Uncovered-branch report. Without branch data the file still exists
    /// but states that no branch information is available.
    fn write_branch_report(&self, file_name: &str) -> Result<()> {
        let has_branches =
            self.set.counters.branches_found != 0 && self.analysis.branch_info_available;

        let Some(mut out) = files::ensure_and_open(self.output_dir, &self.set.name, file_name)?
        else {
            return Ok(());
        };
        self.format.open_branch(&mut out, has_branches)?;

        if has_branches {
            let mut count = 0u32;
            for symbol in &self.set.symbols {
                let info = self.info(symbol)?;
                let Some(detail) = info.detail.as_ref() else {
                    continue;
                };
                for range in detail.branches.iter() {
                    self.format
                        .put_branch_entry(&mut out, count, symbol, info, range)?;
                    count += 1;
                }
            }
        }

        self.format.close_branch(&mut out, has_branches)
    }

    /// Uncovered-range report plus its `no_range_` companion. The counter is
    /// shared across both files and stays monotonic over the whole walk.
    fn write_coverage_report(&self, file_name: &str) -> Result<()> {
        let no_range_name = format!("no_range_{file_name}");
        let Some(mut no_range) =
            files::ensure_and_open(self.output_dir, &self.set.name, &no_range_name)?
        else {
            return Ok(());
        };
        let Some(mut out) = files::ensure_and_open(self.output_dir, &self.set.name, file_name)?
        else {
            return Ok(());
        };
        self.format.open_no_range(&mut no_range)?;
        self.format.open_coverage(&mut out)?;

        let mut count = 0u32;
        for symbol in &self.set.symbols {
            let info = self.info(symbol)?;
            match info.detail.as_ref() {
                None => {
                    self.format
                        .put_coverage_no_range(&mut out, &mut no_range, count, symbol)?;
                    count += 1;
                }
                Some(detail) => {
                    for range in detail.ranges.iter() {
                        self.format
                            .put_coverage_line(&mut out, count, symbol, info, range)?;
                        count += 1;
                    }
                }
            }
        }

        self.format.close_no_range(&mut no_range)?;
        self.format.close_coverage(&mut out)
    }

    fn write_size_report(&self, file_name: &str) -> Result<()> {
        let Some(mut out) = files::ensure_and_open(self.output_dir, &self.set.name, file_name)?
        else {
            return Ok(());
        };
        self.format.open_size(&mut out)?;

        let mut count = 0u32;
        for symbol in &self.set.symbols {
            let info = self.info(symbol)?;
            let Some(detail) = info.detail.as_ref() else {
                continue;
            };
            for range in detail.ranges.iter() {
                self.format.put_size_line(&mut out, count, symbol, range)?;
                count += 1;
            }
        }

        self.format.close_size(&mut out)
    }

    fn write_symbol_summary_report(&self, file_name: &str) -> Result<()> {
        let Some(mut out) = files::ensure_and_open(self.output_dir, &self.set.name, file_name)?
        else {
            return Ok(());
        };
        self.format.open_symbol_summary(&mut out)?;

        let mut count = 0u32;
        for symbol in &self.set.symbols {
            let info = self.info(symbol)?;
            self.format
                .put_symbol_summary_line(&mut out, count, symbol, info)?;
            count += 1;
        }

        self.format.close_symbol_summary(&mut out)
    }
}

fn announce(verbose: bool, file_name: &str) {
    tracing::debug!(report = %file_name, "generate");
    if verbose {
        eprintln!("generate {file_name}");
    }
}

/// Generate every report for one symbol subset: all drivers per format, in a
/// fixed sequence, then the format-independent aggregate summary.
pub fn generate_reports(
    set_name: &str,
    output_dir: &Path,
    analysis: &Analysis,
    verbose: bool,
) -> Result<()> {
    let set = analysis
        .symbols
        .set(set_name)
        .ok_or_else(|| anyhow!("unknown symbol set {set_name:?}"))?;

    let formats: [&dyn ReportFormat; 2] = [&TextFormat, &HtmlFormat];
    for format in formats {
        let reports = Reports {
            set,
            output_dir,
            analysis,
            format,
        };
        let ext = format.extension();

        let name = format!("index{ext}");
        announce(verbose, &name);
        reports.write_index(&name)?;

        let name = format!("annotated{ext}");
        announce(verbose, &name);
        reports
            .write_annotated_report(&name)
            .with_context(|| format!("write annotated report for set {set_name:?}"))?;

        let name = format!("branch{ext}");
        announce(verbose, &name);
        reports.write_branch_report(&name)?;

        let name = format!("uncovered{ext}");
        announce(verbose, &name);
        reports.write_coverage_report(&name)?;

        let name = format!("sizes{ext}");
        announce(verbose, &name);
        reports.write_size_report(&name)?;

        let name = format!("symbolSummary{ext}");
        announce(verbose, &name);
        reports.write_symbol_summary_report(&name)?;
    }

    announce(verbose, "summary.txt");
    write_summary_report("summary.txt", output_dir, set_name, analysis)
}

/// Aggregate statistics summary, written directly under the output root.
pub fn write_summary_report(
    file_name: &str,
    output_dir: &Path,
    set_name: &str,
    analysis: &Analysis,
) -> Result<()> {
    let Some(mut out) = files::ensure_and_open_root(output_dir, file_name)? else {
        return Ok(());
    };
    let stats = RunStatistics::collect(set_name, analysis);
    let counters = stats.counters;

    writeln!(out, "Bytes Analyzed                   : {}", stats.total_bytes)?;
    writeln!(
        out,
        "Bytes Not Executed               : {}",
        stats.bytes_not_executed
    )?;
    writeln!(
        out,
        "Percentage Executed              : {:5.2}",
        stats.percent_executed()
    )?;
    writeln!(
        out,
        "Percentage Not Executed          : {:5.2}",
        stats.percent_not_executed()
    )?;
    writeln!(
        out,
        "Unreferenced Symbols             : {}",
        counters.unreferenced_symbols
    )?;
    writeln!(
        out,
        "Uncovered ranges found           : {}",
        counters.uncovered_ranges
    )?;
    writeln!(out)?;

    match stats.percent_branch_paths_covered() {
        None => {
            writeln!(out, "No branch information available")?;
        }
        Some(percent) => {
            writeln!(
                out,
                "Total conditional branches found : {}",
                counters.branches_found
            )?;
            writeln!(
                out,
                "Total branch paths found         : {}",
                counters.branches_found * 2
            )?;
            writeln!(
                out,
                "Uncovered branch paths found     : {}",
                stats.uncovered_branch_paths()
            )?;
            writeln!(out, "   {} branches always taken", counters.branches_always_taken)?;
            writeln!(out, "   {} branches never taken", counters.branches_never_taken)?;
            writeln!(
                out,
                "   {} branch paths not executed",
                counters.branches_not_executed * 2
            )?;
            writeln!(out, "Percentage branch paths covered  : {percent:4.2}")?;
        }
    }

    Ok(())
}
