#![forbid(unsafe_code)]

//! Structural combinators: nesting scopes, alignment scopes, boxes, prefix
//! layouts, and separator/wrapper sugar.
//!
//! Everything here desugars to the atoms of [`crate::doc`]; the layout
//! interpreter never sees these names.

use std::sync::Arc;

use crate::doc::{Alignment, Atom, Doc, Nesting, cr, lit, space, text, vfill};
use crate::render::{min_offset, offset};
use crate::text_width::real_length;

fn nesting_scope(nesting: Nesting, doc: Doc) -> Doc {
    let mut out = Doc::one(Atom::PushNesting(nesting));
    out += doc;
    out.push(Atom::PopNesting);
    out
}

fn alignment_scope(alignment: Alignment, doc: Doc) -> Doc {
    // The trailing carriage return closes the scope on a line boundary, so
    // padding applies to the document's last line.
    let mut out = Doc::one(Atom::PushAlignment(alignment));
    out += doc;
    out += cr();
    out.push(Atom::PopAlignment);
    out
}

/// Indent every new line of `doc` by `k` more columns than the enclosing
/// nesting level.
#[must_use]
pub fn nest(k: isize, doc: Doc) -> Doc {
    nesting_scope(Nesting::Increase(k), doc)
}

/// Lay out `doc` against the left margin regardless of enclosing nesting.
#[must_use]
pub fn flush(doc: Doc) -> Doc {
    nesting_scope(Nesting::Exact(0), doc)
}

/// Indent continuation lines of `doc` to the column where it starts.
#[must_use]
pub fn aligned(doc: Doc) -> Doc {
    nesting_scope(Nesting::AtColumn, doc)
}

/// A hanging indent: `start` on the first line, `body` indented `k` columns
/// on continuations.
#[must_use]
pub fn hang(k: isize, start: Doc, body: Doc) -> Doc {
    start.append(nest(k, body))
}

/// Lay out `doc` as a fixed-width block occupying `width` cells on its host
/// line. Adjacent boxes compose side by side; shorter boxes are padded to
/// the tallest on the line.
#[must_use]
pub fn boxed(width: usize, inner: Doc) -> Doc {
    Doc::one(Atom::Box { width, inner })
}

/// A box sized to the minimal width of its content, clamped to the given
/// bounds (`None` means unbounded on that side).
#[must_use]
pub fn resizable_box(min_width: Option<usize>, max_width: Option<usize>, inner: Doc) -> Doc {
    let mut width = min_offset(&inner);
    if let Some(lo) = min_width {
        width = width.max(lo);
    }
    if let Some(hi) = max_width {
        width = width.min(hi);
    }
    boxed(width, inner)
}

fn block(width: usize, alignment: Alignment, doc: Doc) -> Doc {
    boxed(width, alignment_scope(alignment, doc.chomp()))
}

/// A left-aligned block of the given width.
#[must_use]
pub fn lblock(width: usize, doc: Doc) -> Doc {
    block(width, Alignment::Left, doc)
}

/// A centered block of the given width.
#[must_use]
pub fn cblock(width: usize, doc: Doc) -> Doc {
    block(width, Alignment::Center, doc)
}

/// A right-aligned block of the given width.
#[must_use]
pub fn rblock(width: usize, doc: Doc) -> Doc {
    block(width, Alignment::Right, doc)
}

/// Left-align the lines of `doc` within the wrap width.
#[must_use]
pub fn align_left(doc: Doc) -> Doc {
    alignment_scope(Alignment::Left, doc)
}

/// Center the lines of `doc` within the wrap width.
#[must_use]
pub fn align_center(doc: Doc) -> Doc {
    alignment_scope(Alignment::Center, doc)
}

/// Right-align the lines of `doc` within the wrap width.
#[must_use]
pub fn align_right(doc: Doc) -> Doc {
    alignment_scope(Alignment::Right, doc)
}

/// Print `prefix` before `doc` and lay `doc` out in a box beside it, so
/// every line of `doc` clears the prefix. The prefix repeats vertically
/// beside taller content; its trailing spaces stay breakable.
#[must_use]
pub fn prefixed(prefix: &str, doc: Doc) -> Doc {
    let prefix = prefix.to_string();
    with_column(move |column| {
        let prefix = prefix.clone();
        let doc = doc.clone();
        with_line_length(move |line_length| {
            let body = prefix.trim_end_matches(' ');
            let trailing = prefix.len() - body.len();
            let width = match line_length {
                Some(len) => len.saturating_sub(column + real_length(&prefix)),
                None => offset(&doc),
            };
            let mut out = vfill(body);
            for _ in 0..trailing {
                out += space();
            }
            out.append(boxed(width, doc.clone()))
        })
    })
}

/// A document computed from the column where it is laid out. The closure
/// may expand to anything, including further conditionals.
#[must_use]
pub fn with_column(f: impl Fn(usize) -> Doc + Send + Sync + 'static) -> Doc {
    Doc::one(Atom::WithColumn(Arc::new(f)))
}

/// A document computed from the ambient wrap width (`None` when rendering
/// without wrapping).
#[must_use]
pub fn with_line_length(f: impl Fn(Option<usize>) -> Doc + Send + Sync + 'static) -> Doc {
    Doc::one(Atom::WithLineLength(Arc::new(f)))
}

/// Content printed only when it lands at the very start of a line, e.g. an
/// escape for line-initial control words.
#[must_use]
pub fn after_break(s: &str) -> Doc {
    let content = s.to_string();
    with_column(move |column| if column == 0 { text(&content) } else { Doc::default() })
}

fn joined(separator: Doc, docs: impl IntoIterator<Item = Doc>) -> Doc {
    let mut out = Doc::default();
    for doc in docs {
        if doc.is_empty() {
            continue;
        }
        if !out.atoms.is_empty() {
            out += separator.clone();
        }
        out += doc;
    }
    out
}

/// Concatenate a sequence of documents.
#[must_use]
pub fn hcat(docs: impl IntoIterator<Item = Doc>) -> Doc {
    docs.into_iter().sum()
}

/// Join non-empty documents with breakable spaces.
#[must_use]
pub fn hsep(docs: impl IntoIterator<Item = Doc>) -> Doc {
    joined(space(), docs)
}

/// Stack non-empty documents on consecutive lines.
#[must_use]
pub fn vcat(docs: impl IntoIterator<Item = Doc>) -> Doc {
    joined(cr(), docs)
}

/// Stack non-empty documents separated by blank lines.
#[must_use]
pub fn vsep(docs: impl IntoIterator<Item = Doc>) -> Doc {
    joined(crate::doc::blankline(), docs)
}

/// Enclose `contents` between `start` and `end`.
#[must_use]
pub fn inside(start: Doc, end: Doc, contents: Doc) -> Doc {
    start + contents + end
}

/// Wrap in `{` ... `}`.
#[must_use]
pub fn braces(doc: Doc) -> Doc {
    inside(lit("{"), lit("}"), doc)
}

/// Wrap in `[` ... `]`.
#[must_use]
pub fn brackets(doc: Doc) -> Doc {
    inside(lit("["), lit("]"), doc)
}

/// Wrap in `(` ... `)`.
#[must_use]
pub fn parens(doc: Doc) -> Doc {
    inside(lit("("), lit(")"), doc)
}

/// Wrap in single quotes.
#[must_use]
pub fn quotes(doc: Doc) -> Doc {
    inside(lit("'"), lit("'"), doc)
}

/// Wrap in double quotes.
#[must_use]
pub fn double_quotes(doc: Doc) -> Doc {
    inside(lit("\""), lit("\""), doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::empty;

    #[test]
    fn hsep_skips_empty_documents() {
        let doc = hsep([lit("a"), empty(), lit("b")]);
        assert_eq!(crate::render(None, &doc), "a b");
    }

    #[test]
    fn vcat_stacks_lines() {
        let doc = vcat([lit("a"), lit("b"), lit("c")]);
        assert_eq!(crate::render(None, &doc), "a\nb\nc");
    }

    #[test]
    fn vsep_inserts_blank_lines() {
        let doc = vsep([lit("a"), lit("b")]);
        assert_eq!(crate::render(None, &doc), "a\n\nb");
    }

    #[test]
    fn wrappers_enclose_content() {
        assert_eq!(crate::render(None, &braces(lit("x"))), "{x}");
        assert_eq!(crate::render(None, &parens(lit("x"))), "(x)");
        assert_eq!(crate::render(None, &quotes(lit("x"))), "'x'");
        assert_eq!(crate::render(None, &double_quotes(lit("x"))), "\"x\"");
        assert_eq!(crate::render(None, &brackets(lit("x"))), "[x]");
    }

    #[test]
    fn with_column_sees_the_layout_position() {
        let doc = lit("ab") + with_column(|col| lit(format!("@{col}")));
        assert_eq!(crate::render(None, &doc), "ab@2");
    }

    #[test]
    fn with_line_length_sees_the_wrap_width() {
        let doc = with_line_length(|len| match len {
            Some(n) => lit(format!("w{n}")),
            None => lit("unbounded"),
        });
        assert_eq!(crate::render(Some(8), &doc), "w8");
        assert_eq!(crate::render(None, &doc), "unbounded");
    }

    #[test]
    fn resizable_box_clamps_to_bounds() {
        // "hello" has minimal width 5; clamp into [2, 3] takes the upper
        // bound.
        let doc = resizable_box(Some(2), Some(3), lit("hello"));
        let Atom::Box { width, .. } = &doc.atoms[0] else {
            panic!("expected a box atom");
        };
        assert_eq!(*width, 3);
    }

    #[test]
    fn resizable_box_unbounded_uses_minimal_width() {
        let doc = resizable_box(None, None, lit("ab") + space() + lit("cdef"));
        let Atom::Box { width, .. } = &doc.atoms[0] else {
            panic!("expected a box atom");
        };
        assert_eq!(*width, 4);
    }
}
