#![forbid(unsafe_code)]

//! Streaming layout interpreter.
//!
//! Consumes a normalized atom stream left to right through a mutable render
//! state and produces a list of [`Line`]s plus the maximum printable width
//! observed. No lookahead: wrapping decisions are made when a breakable
//! space arrives, nesting and alignment are tracked as value stacks, and
//! conditionals expand in place through a work queue.
//!
//! # Flush
//!
//! A line is flushed when a hard break or blank directive arrives, when a
//! breakable space finds the line over the wrap width, and once at end of
//! stream. The flush strips trailing soft spaces, splits overflowing lines
//! at the rightmost soft space (the remainder stays in flight with a fresh
//! margin), applies alignment padding, and re-arms the nesting/alignment
//! levels that were popped while the line was still open.

use std::collections::VecDeque;

use crate::doc::{Alignment, Atom, Doc, normalize};

/// One emitted line: text/soft-space/box atoms in display order plus a
/// trailing-newline flag. Lines concatenate by appending atoms and OR-ing
/// the flag.
#[derive(Clone, Debug, Default)]
pub(crate) struct Line {
    pub(crate) needs_newline: bool,
    pub(crate) atoms: Vec<Atom>,
}

struct LayoutState {
    /// Visible column of the next character (0-based).
    column: usize,
    /// Indentation stack; never empty.
    nesting: Vec<usize>,
    /// Margin to apply at the next line start. Tracks the top of `nesting`
    /// except while a popped scope's last line is still in flight.
    current_nesting: usize,
    /// Alignment stack; never empty.
    alignment: Vec<Alignment>,
    current_alignment: Alignment,
    /// Wrap width. `None` = no wrapping; `Some(0)` = minimal-width mode.
    line_length: Option<usize>,
    /// Trailing blank lines already emitted; `None` until the first
    /// printable line commits, which suppresses leading blanks.
    blanks: Option<usize>,
    current_line: Vec<Atom>,
    actual_width: usize,
    lines: Vec<Line>,
}

impl LayoutState {
    fn new(line_length: Option<usize>) -> LayoutState {
        LayoutState {
            column: 0,
            nesting: vec![0],
            current_nesting: 0,
            alignment: vec![Alignment::Left],
            current_alignment: Alignment::Left,
            line_length,
            blanks: None,
            current_line: Vec::new(),
            actual_width: 0,
            lines: Vec::new(),
        }
    }

    fn top_nesting(&self) -> usize {
        self.nesting.last().copied().unwrap_or(0)
    }

    fn top_alignment(&self) -> Alignment {
        self.alignment.last().copied().unwrap_or_default()
    }

    /// Append a text, box, or soft-space atom to the open line, injecting
    /// the margin at line start. A soft space at line start is discarded; a
    /// zero-width text run neither injects the margin nor suppresses later
    /// content.
    fn push_line_atom(&mut self, atom: Atom) {
        if self.current_line.is_empty() {
            if matches!(atom, Atom::SoftSpace) {
                return;
            }
            let opens_margin = match &atom {
                Atom::Text { width, .. } => *width > 0,
                _ => true,
            };
            if opens_margin && self.current_nesting > 0 {
                self.current_line.push(Atom::spaces(self.current_nesting));
                self.column = self.current_nesting;
            }
        }
        self.column += atom.width();
        self.current_line.push(atom);
    }

    /// Flush the open line. `force` marks breaks demanded by a newline,
    /// blank directive, or soft-space overflow; the emitted line also gets a
    /// newline flag when split content stays in flight.
    fn flush(&mut self, force: bool) {
        let align = self.current_alignment;
        let mut emitted = std::mem::take(&mut self.current_line);
        while matches!(emitted.last(), Some(Atom::SoftSpace)) {
            emitted.pop();
        }

        // Overflowing lines break at the rightmost soft space; the content
        // after it carries over to the next line. With no soft space the
        // overlong line is emitted whole.
        let mut remainder: Vec<Atom> = Vec::new();
        let overflow = self.line_length.is_some_and(|len| self.column > len);
        if overflow
            && let Some(split) = emitted
                .iter()
                .rposition(|a| matches!(a, Atom::SoftSpace))
        {
            let mut rest = emitted.split_off(split);
            rest.remove(0);
            remainder = rest;
            while matches!(emitted.last(), Some(Atom::SoftSpace)) {
                emitted.pop();
            }
        }
        let continued = !remainder.is_empty();

        let printable: usize = emitted.iter().map(Atom::width).sum();
        self.actual_width = self.actual_width.max(printable);

        if continued {
            let carried: usize = remainder.iter().map(Atom::width).sum();
            self.column = self.current_nesting + carried;
            let mut next = Vec::with_capacity(remainder.len() + 1);
            if self.current_nesting > 0 {
                next.push(Atom::spaces(self.current_nesting));
            }
            next.extend(remainder);
            self.current_line = next;
        } else {
            self.column = self.current_nesting;
        }

        // Scopes popped while the line was open take effect now.
        self.current_nesting = self.top_nesting();
        self.current_alignment = self.top_alignment();

        if emitted.is_empty() {
            return;
        }
        self.blanks = Some(0);

        if let Some(len) = self.line_length
            && printable > 0
            && printable < len
        {
            let pad = len - printable;
            match align {
                Alignment::Left => {
                    emitted.extend(std::iter::repeat_n(Atom::SoftSpace, pad));
                }
                Alignment::Right => {
                    emitted.insert(0, Atom::spaces(pad));
                }
                Alignment::Center => {
                    let left = pad / 2;
                    if left > 0 {
                        emitted.insert(0, Atom::spaces(left));
                    }
                    emitted.extend(std::iter::repeat_n(Atom::SoftSpace, pad - left));
                }
            }
        }

        self.lines.push(Line {
            needs_newline: force || continued,
            atoms: emitted,
        });
    }

    /// A hard break ends the open line completely: overflow splits keep
    /// flushing until nothing is left in flight.
    fn hard_break(&mut self) {
        loop {
            self.flush(true);
            if self.current_line.is_empty() {
                break;
            }
        }
    }

    /// Emit empty flagged lines until `n` trailing blanks exist. Suppressed
    /// before the first printable output.
    fn emit_blanks(&mut self, n: usize) {
        let Some(mut have) = self.blanks else {
            return;
        };
        while have < n {
            self.lines.push(Line {
                needs_newline: true,
                atoms: Vec::new(),
            });
            have += 1;
        }
        self.blanks = Some(have);
    }
}

fn splice(queue: &mut VecDeque<Atom>, doc: Doc) {
    for atom in normalize(doc.atoms).into_iter().rev() {
        queue.push_front(atom);
    }
}

/// Interpret the document at the given wrap width, producing raw lines
/// (box atoms still embedded) and the maximum printable width.
pub(crate) fn interpret(doc: &Doc, line_length: Option<usize>) -> (Vec<Line>, usize) {
    let mut state = LayoutState::new(line_length);
    let mut queue: VecDeque<Atom> = normalize(doc.atoms.clone()).into();

    while let Some(atom) = queue.pop_front() {
        match atom {
            Atom::WithColumn(f) => splice(&mut queue, f(state.column)),
            Atom::WithLineLength(f) => splice(&mut queue, f(state.line_length)),
            Atom::PushNesting(nesting) => {
                let level = nesting.resolve(state.column, state.top_nesting());
                state.nesting.push(level);
                state.current_nesting = level;
            }
            Atom::PopNesting => {
                // An unmatched pop leaves the stack untouched.
                if state.nesting.len() > 1 {
                    state.nesting.pop();
                    if state.current_line.is_empty() {
                        state.current_nesting = state.top_nesting();
                    }
                }
            }
            Atom::PushAlignment(alignment) => {
                state.alignment.push(alignment);
                state.current_alignment = alignment;
            }
            Atom::PopAlignment => {
                if state.alignment.len() > 1 {
                    state.alignment.pop();
                    if state.current_line.is_empty() {
                        state.current_alignment = state.top_alignment();
                    }
                }
            }
            Atom::Newline => state.hard_break(),
            Atom::Blanks(n) => {
                state.hard_break();
                // Required blanks are skipped when nothing follows.
                if !queue.is_empty() {
                    state.emit_blanks(n);
                }
            }
            Atom::SoftSpace => {
                if state.line_length.is_some_and(|len| state.column > len) {
                    state.flush(true);
                }
                // At a fresh line start the space is discarded by the margin
                // rule; after an overflow split it joins the carried content.
                state.push_line_atom(Atom::SoftSpace);
            }
            atom @ (Atom::Text { .. } | Atom::Box { .. }) => state.push_line_atom(atom),
        }
    }

    // Final flush; overflow splits may need more than one pass. A trailing
    // empty line is dropped.
    loop {
        state.flush(false);
        if state.current_line.is_empty() {
            break;
        }
    }

    (state.lines, state.actual_width)
}

/// Full layout pipeline: interpret, then compose box rows. Composed rows
/// feed back into the measured width, so overlong box internals are
/// reported like any other over-wide line.
pub(crate) fn layout(doc: &Doc, line_length: Option<usize>) -> (Vec<Line>, usize) {
    let (lines, mut actual_width) = interpret(doc, line_length);
    let lines = crate::boxes::compose(lines);
    for line in &lines {
        let solid = line
            .atoms
            .iter()
            .rposition(|atom| !matches!(atom, Atom::SoftSpace));
        if let Some(last) = solid {
            let printable: usize = line.atoms[..=last].iter().map(Atom::width).sum();
            actual_width = actual_width.max(printable);
        }
    }
    (lines, actual_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{blankline, blanklines, cr, lit, space, text};
    use crate::{aligned, nest};

    fn rendered(doc: &Doc, len: Option<usize>) -> String {
        crate::render(len, doc)
    }

    #[test]
    fn soft_space_wraps_overflowing_line() {
        let doc = lit("aaaa") + space() + lit("bbbb");
        assert_eq!(rendered(&doc, Some(6)), "aaaa\nbbbb");
        assert_eq!(rendered(&doc, Some(20)), "aaaa bbbb");
    }

    #[test]
    fn minimal_width_mode_breaks_every_space() {
        let doc = lit("aa") + space() + lit("b") + space() + lit("cccc");
        assert_eq!(rendered(&doc, Some(0)), "aa\nb\ncccc");
        assert_eq!(crate::min_offset(&doc), 4);
    }

    #[test]
    fn trailing_soft_spaces_are_elided() {
        let doc = lit("x") + space() + space();
        assert_eq!(rendered(&doc, None), "x");
    }

    #[test]
    fn consecutive_hard_breaks_collapse() {
        let doc = lit("a") + cr() + cr() + lit("b");
        assert_eq!(rendered(&doc, None), "a\nb");
    }

    #[test]
    fn empty_text_runs_keep_lines_alive() {
        assert_eq!(rendered(&text("a\n\nb"), None), "a\n\nb");
    }

    #[test]
    fn blank_requirements_coalesce() {
        let doc = lit("x") + blanklines(2) + blanklines(3) + lit("y");
        assert_eq!(rendered(&doc, None), "x\n\n\n\ny");
    }

    #[test]
    fn blanks_are_suppressed_before_any_output() {
        let doc = blanklines(3) + lit("x");
        assert_eq!(rendered(&doc, None), "x");
    }

    #[test]
    fn blanks_are_suppressed_at_end_of_stream() {
        let doc = lit("x") + blanklines(3);
        assert_eq!(rendered(&doc, None), "x\n");
    }

    #[test]
    fn blankline_between_lines() {
        let doc = lit("x") + blankline() + lit("y");
        assert_eq!(rendered(&doc, None), "x\n\ny");
    }

    #[test]
    fn nest_indents_continuation_lines() {
        let doc = lit("let") + nest(4, cr() + lit("a") + cr() + lit("b"));
        assert_eq!(rendered(&doc, None), "let\n    a\n    b");
    }

    #[test]
    fn nested_margin_survives_wrap_of_open_line() {
        // The pop arrives while the line is open; the wrapped remainder
        // still gets the inner margin.
        let doc = lit("-") + nest(2, lit("foo") + space() + lit("bar"));
        assert_eq!(rendered(&doc, Some(7)), "-foo\n  bar");
    }

    #[test]
    fn aligned_indents_to_current_column() {
        let doc = lit("k = ") + aligned(lit("v1") + cr() + lit("v2"));
        assert_eq!(rendered(&doc, None), "k = v1\n    v2");
    }

    #[test]
    fn flush_resets_margin_to_zero() {
        let doc = nest(4, lit("a") + cr() + crate::flush(lit("b") + cr() + lit("c")));
        assert_eq!(rendered(&doc, None), "    a\nb\nc");
    }

    #[test]
    fn unmatched_pop_is_ignored() {
        let mut doc = Doc::default();
        doc.push(Atom::PopNesting);
        doc.push(Atom::PopAlignment);
        let doc = doc + lit("x");
        assert_eq!(rendered(&doc, None), "x");
    }

    #[test]
    fn cjk_text_wraps_by_display_width() {
        let doc = lit("日本") + space() + lit("語");
        assert_eq!(rendered(&doc, Some(4)), "日本\n語");
        assert_eq!(rendered(&doc, Some(8)), "日本 語");
    }

    #[test]
    fn actual_width_tracks_widest_line() {
        let doc = lit("ab") + cr() + lit("wider") + cr() + lit("x");
        let dims = crate::dimensions(None, &doc);
        assert_eq!(dims.width, 5);
        assert_eq!(dims.height, 3);
    }

    #[test]
    fn overlong_unbreakable_line_is_emitted_whole() {
        let doc = lit("abcdefgh") + space() + lit("x");
        assert_eq!(rendered(&doc, Some(4)), "abcdefgh\nx");
    }
}
