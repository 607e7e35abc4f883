#![forbid(unsafe_code)]

//! Line serialization and the measuring/rendering entry points.

use crate::doc::{Atom, Doc};
use crate::layout::{Line, layout};

/// Measured extent of a laid-out document: the maximum printable width
/// observed and the number of emitted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

fn serialize_line(line: &Line, out: &mut String) {
    // Soft spaces with no text to their right are dropped; interior ones
    // become ordinary spaces.
    let last_solid = line
        .atoms
        .iter()
        .rposition(|atom| !matches!(atom, Atom::SoftSpace));
    if let Some(last) = last_solid {
        for atom in &line.atoms[..=last] {
            match atom {
                Atom::Text { content, .. } => out.push_str(content),
                Atom::SoftSpace => out.push(' '),
                _ => {}
            }
        }
    }
    if line.needs_newline {
        out.push('\n');
    }
}

/// Render the document at the given wrap width (`None` = no wrapping).
///
/// Output is UTF-8 text with `\n` line terminators; the final line carries a
/// terminator only when the document demands one (it ends with a hard break
/// or blank directive, or a wrap continuation is still in flight).
#[must_use]
pub fn render(line_length: Option<usize>, doc: &Doc) -> String {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("render", width = ?line_length).entered();

    let (lines, _) = layout(doc, line_length);

    #[cfg(feature = "tracing")]
    tracing::debug!(lines = lines.len(), "layout complete");

    let mut out = String::new();
    for line in &lines {
        serialize_line(line, &mut out);
    }
    out
}

/// Measure the document at the given wrap width without producing output.
#[must_use]
pub fn dimensions(line_length: Option<usize>, doc: &Doc) -> Dimensions {
    let (lines, width) = layout(doc, line_length);
    Dimensions {
        width,
        height: lines.len(),
    }
}

/// Width of the widest line when rendered without wrapping.
#[must_use]
pub fn offset(doc: &Doc) -> usize {
    dimensions(None, doc).width
}

/// Width of the widest line in minimal-width mode, where every breakable
/// space breaks. The narrowest width the document can be squeezed to.
#[must_use]
pub fn min_offset(doc: &Doc) -> usize {
    dimensions(Some(0), doc).width
}

/// Number of lines when rendered without wrapping.
#[must_use]
pub fn height(doc: &Doc) -> usize {
    dimensions(None, doc).height
}

impl Doc {
    /// Render at the given wrap width. See [`render`].
    #[must_use]
    pub fn render(&self, line_length: Option<usize>) -> String {
        render(line_length, self)
    }

    /// Measure at the given wrap width. See [`dimensions`].
    #[must_use]
    pub fn dimensions(&self, line_length: Option<usize>) -> Dimensions {
        dimensions(line_length, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{blankline, cr, lit, space, text};

    #[test]
    fn empty_document_renders_to_nothing() {
        assert_eq!(render(None, &Doc::default()), "");
        assert_eq!(render(Some(10), &Doc::default()), "");
        assert_eq!(dimensions(None, &Doc::default()), Dimensions::default());
    }

    #[test]
    fn trailing_newline_follows_the_final_flag() {
        assert_eq!(render(None, &lit("x")), "x");
        assert_eq!(render(None, &(lit("x") + cr())), "x\n");
        assert_eq!(render(None, &(lit("x") + blankline())), "x\n");
    }

    #[test]
    fn interior_soft_spaces_become_spaces() {
        let doc = lit("a") + space() + space() + lit("b");
        assert_eq!(render(None, &doc), "a  b");
    }

    #[test]
    fn display_renders_without_wrapping() {
        let doc = lit("a") + space() + lit("b");
        assert_eq!(doc.to_string(), "a b");
    }

    #[test]
    fn offset_and_height_measure_unwrapped_extent() {
        let doc = text("abc\nde");
        assert_eq!(offset(&doc), 3);
        assert_eq!(height(&doc), 2);
        assert_eq!(min_offset(&(lit("ab") + space() + lit("cdef"))), 4);
    }

    #[test]
    fn height_counts_blank_lines() {
        let doc = lit("x") + blankline() + lit("y");
        assert_eq!(height(&doc), 3);
    }
}
