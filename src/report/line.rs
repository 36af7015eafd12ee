//! Source-line normalization for the annotated listing.
//!
//! Lines are tab-expanded and padded into a fixed field so annotations align
//! in one column regardless of source-line length.

/// Display field the source text is left-justified into.
const SOURCE_FIELD_WIDTH: usize = 90;

/// Hard cap on the padded source text; characters beyond it are dropped.
const MAX_LINE_LENGTH: usize = 150;

/// Expand tabs to 4-column stops, tracking the visual column left to right.
pub fn expand_tabs(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    let mut column = 0usize;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = 4 - column % 4;
            expanded.push_str(&" ".repeat(pad));
            column += pad;
        } else {
            expanded.push(ch);
            column += 1;
        }
    }
    expanded
}

/// Left-justify the tab-expanded text into the display field, cap the padded
/// result at [`MAX_LINE_LENGTH`] characters, then append the annotation
/// suffix outside the cap.
pub fn format_source_line(text: &str, annotation: &str) -> String {
    let expanded = expand_tabs(text);
    let padded = format!("{expanded:<width$}", width = SOURCE_FIELD_WIDTH);
    let mut line: String = padded.chars().take(MAX_LINE_LENGTH).collect();
    line.push_str(annotation);
    line
}

#[cfg(test)]
mod tests {
    use super::{expand_tabs, format_source_line, MAX_LINE_LENGTH, SOURCE_FIELD_WIDTH};

    #[test]
    fn tabs_advance_to_next_four_column_stop() {
        assert_eq!(expand_tabs("\t"), "    ");
        assert_eq!(expand_tabs("a\tb"), "a   b");
        assert_eq!(expand_tabs("abc\td"), "abc d");
        assert_eq!(expand_tabs("abcd\te"), "abcd    e");
    }

    #[test]
    fn consecutive_tabs_each_reach_a_stop() {
        assert_eq!(expand_tabs("a\t\tb"), "a       b");
    }

    #[test]
    fn expansion_is_idempotent_on_tab_free_text() {
        let once = expand_tabs("ldr\tr0, [r1]");
        assert_eq!(expand_tabs(&once), once);
    }

    #[test]
    fn short_lines_pad_to_the_display_field() {
        let line = format_source_line("mov r0, r1", "");
        assert_eq!(line.chars().count(), SOURCE_FIELD_WIDTH);
        assert!(line.ends_with(' '));
    }

    #[test]
    fn source_text_never_exceeds_the_cap() {
        let long = "x".repeat(400);
        let line = format_source_line(&long, "");
        assert_eq!(line.chars().count(), MAX_LINE_LENGTH);
    }

    #[test]
    fn annotation_lands_outside_the_cap() {
        let long = "x".repeat(400);
        let line = format_source_line(&long, "<== NOT EXECUTED");
        assert!(line.ends_with("<== NOT EXECUTED"));
        assert_eq!(
            line.chars().count(),
            MAX_LINE_LENGTH + "<== NOT EXECUTED".chars().count()
        );
    }

    #[test]
    fn annotation_follows_the_padded_field_on_short_lines() {
        let line = format_source_line("bne .L1", "<== NEVER TAKEN");
        assert!(line.starts_with("bne .L1"));
        assert!(line.ends_with("<== NEVER TAKEN"));
        assert_eq!(
            line.chars().count(),
            SOURCE_FIELD_WIDTH + "<== NEVER TAKEN".chars().count()
        );
    }
}
