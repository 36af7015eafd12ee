//! Hypertext report format.
//!
//! Every page is self-contained: inline stylesheet, escaped content, no
//! external assets. The annotated listing colors lines by coverage state and
//! anchors uncovered entries so range reports can deep-link into it.
use super::annotate::AnnotationState;
use super::{ReportContext, ReportFormat};
use crate::files;
use crate::model::{CoverageRange, SymbolInformation};
use anyhow::Result;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 1em 2em; }\n\
pre { font-family: monospace; }\n\
table { border-collapse: collapse; }\n\
th, td { border: 1px solid #999; padding: 2px 8px; text-align: left; }\n\
th { background: #eee; }\n\
.not-executed { background: #fbb; }\n\
.branch-always { background: #fd9; }\n\
.branch-never { background: #fd9; }\n\
.separator { color: #999; }\n";

pub struct HtmlFormat;

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn page_header(out: &mut dyn Write, title: &str) -> Result<()> {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"UTF-8\">")?;
    writeln!(out, "<title>{}</title>", escape(title))?;
    writeln!(out, "<style>{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>{}</h1>", escape(title))?;
    Ok(())
}

fn page_footer(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

fn range_cell(range: &CoverageRange) -> String {
    format!("0x{:x} - 0x{:x}", range.low_address, range.high_address)
}

impl ReportFormat for HtmlFormat {
    fn extension(&self) -> &'static str {
        ".html"
    }

    fn write_index(&self, ctx: &ReportContext<'_>, file_name: &str) -> Result<()> {
        let Some(mut out) = files::ensure_and_open(ctx.output_dir, ctx.set_name, file_name)?
        else {
            return Ok(());
        };
        page_header(&mut out, &format!("{} Coverage Reports", ctx.project_name))?;
        writeln!(out, "<p>Symbol set: {}</p>", escape(ctx.set_name))?;
        writeln!(out, "<ul>")?;
        for (href, label) in [
            ("annotated.html", "Annotated listing"),
            ("branch.html", "Uncovered branches"),
            ("uncovered.html", "Uncovered ranges"),
            ("no_range_uncovered.html", "Symbols never referenced"),
            ("sizes.html", "Uncovered range sizes"),
            ("symbolSummary.html", "Symbol summary"),
        ] {
            writeln!(out, "<li><a href=\"{href}\">{label}</a></li>")?;
        }
        writeln!(out, "</ul>")?;
        let generated_at_epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or(0);
        writeln!(
            out,
            "<p class=\"separator\">Generated at epoch ms {generated_at_epoch_ms}</p>"
        )?;
        page_footer(&mut out)
    }

    fn open_annotated(&self, out: &mut dyn Write) -> Result<()> {
        page_header(out, "Annotated Listing")?;
        writeln!(out, "<pre>")?;
        Ok(())
    }

    fn close_annotated(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "</pre>")?;
        page_footer(out)
    }

    fn open_branch(&self, out: &mut dyn Write, has_branches: bool) -> Result<()> {
        page_header(out, "Uncovered Branches")?;
        if has_branches {
            writeln!(out, "<table>")?;
            writeln!(
                out,
                "<tr><th>Index</th><th>Symbol</th><th>Range</th>\
                 <th>Size in Bytes</th><th>Reason</th></tr>"
            )?;
        } else {
            writeln!(out, "<p>No branch information available</p>")?;
        }
        Ok(())
    }

    fn close_branch(&self, out: &mut dyn Write, has_branches: bool) -> Result<()> {
        if has_branches {
            writeln!(out, "</table>")?;
        }
        page_footer(out)
    }

    fn open_coverage(&self, out: &mut dyn Write) -> Result<()> {
        page_header(out, "Uncovered Ranges")?;
        writeln!(out, "<table>")?;
        writeln!(
            out,
            "<tr><th>Index</th><th>Symbol</th><th>Range</th>\
             <th>Size in Bytes</th><th>Reason</th></tr>"
        )?;
        Ok(())
    }

    fn close_coverage(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "</table>")?;
        page_footer(out)
    }

    fn open_no_range(&self, out: &mut dyn Write) -> Result<()> {
        page_header(out, "Symbols Never Referenced")?;
        writeln!(out, "<table>")?;
        writeln!(out, "<tr><th>Index</th><th>Symbol</th></tr>")?;
        Ok(())
    }

    fn close_no_range(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "</table>")?;
        page_footer(out)
    }

    fn open_size(&self, out: &mut dyn Write) -> Result<()> {
        page_header(out, "Uncovered Range Sizes")?;
        writeln!(out, "<table>")?;
        writeln!(
            out,
            "<tr><th>Index</th><th>Size in Bytes</th><th>Symbol</th><th>Address</th></tr>"
        )?;
        Ok(())
    }

    fn close_size(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "</table>")?;
        page_footer(out)
    }

    fn open_symbol_summary(&self, out: &mut dyn Write) -> Result<()> {
        page_header(out, "Symbol Summary")?;
        writeln!(out, "<table>")?;
        writeln!(
            out,
            "<tr><th>Index</th><th>Symbol</th><th>Size in Bytes</th>\
             <th>Uncovered Ranges</th><th>Uncovered Branches</th></tr>"
        )?;
        Ok(())
    }

    fn close_symbol_summary(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "</table>")?;
        page_footer(out)
    }

    fn annotated_start(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "<span class=\"separator\">{}</span>", "=".repeat(60))?;
        Ok(())
    }

    fn annotated_end(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out)?;
        Ok(())
    }

    fn put_annotated_line(
        &self,
        out: &mut dyn Write,
        state: AnnotationState,
        line: &str,
        id: u32,
    ) -> Result<()> {
        let escaped = escape(line);
        match state {
            AnnotationState::Source | AnnotationState::Executed => {
                writeln!(out, "{escaped}")?;
            }
            AnnotationState::NeverExecuted => {
                writeln!(
                    out,
                    "<span id=\"range{id}\" class=\"not-executed\">{escaped}</span>"
                )?;
            }
            AnnotationState::BranchAlwaysTaken => {
                writeln!(
                    out,
                    "<span id=\"branch{id}\" class=\"branch-always\">{escaped}</span>"
                )?;
            }
            AnnotationState::BranchNeverTaken => {
                writeln!(
                    out,
                    "<span id=\"branch{id}\" class=\"branch-never\">{escaped}</span>"
                )?;
            }
        }
        Ok(())
    }

    fn put_branch_entry(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        _info: &SymbolInformation,
        range: &CoverageRange,
    ) -> Result<()> {
        writeln!(
            out,
            "<tr><td>{count}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(symbol),
            range_cell(range),
            range.size(),
            range.reason.describe()
        )?;
        Ok(())
    }

    fn put_coverage_line(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        _info: &SymbolInformation,
        range: &CoverageRange,
    ) -> Result<()> {
        writeln!(
            out,
            "<tr><td>{count}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(symbol),
            range_cell(range),
            range.size(),
            range.reason.describe()
        )?;
        Ok(())
    }

    fn put_coverage_no_range(
        &self,
        _out: &mut dyn Write,
        no_range_out: &mut dyn Write,
        count: u32,
        symbol: &str,
    ) -> Result<()> {
        writeln!(
            no_range_out,
            "<tr><td>{count}</td><td>{}</td></tr>",
            escape(symbol)
        )?;
        Ok(())
    }

    fn put_size_line(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        range: &CoverageRange,
    ) -> Result<()> {
        writeln!(
            out,
            "<tr><td>{count}</td><td>{}</td><td>{}</td><td>0x{:x}</td></tr>",
            range.size(),
            escape(symbol),
            range.low_address
        )?;
        Ok(())
    }

    fn put_symbol_summary_line(
        &self,
        out: &mut dyn Write,
        count: u32,
        symbol: &str,
        info: &SymbolInformation,
    ) -> Result<()> {
        let (ranges, branches) = match info.detail.as_ref() {
            None => ("never referenced".to_string(), "never referenced".to_string()),
            Some(detail) => (detail.ranges.len().to_string(), detail.branches.len().to_string()),
        };
        writeln!(
            out,
            "<tr><td>{count}</td><td>{}</td><td>{}</td><td>{ranges}</td><td>{branches}</td></tr>",
            escape(symbol),
            info.size_in_bytes
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(escape("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape("mov r0, r1"), "mov r0, r1");
    }
}
