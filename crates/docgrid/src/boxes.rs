#![forbid(unsafe_code)]

//! Box composition: lines containing box atoms expand into transposed,
//! padded rows.
//!
//! Every atom on a host line becomes a column. A box column is laid out
//! recursively at its own width; any other atom is a one-line column of its
//! own width. Columns shorter than the tallest are extended with fill
//! lines, then row *i* of the output is the concatenation of row *i* across
//! all columns. Box internals arrive here fully composed, so a composed
//! line is never re-entered.

use crate::doc::{Atom, Fill};
use crate::layout::{Line, layout};

struct Column {
    width: usize,
    sub: Vec<Line>,
}

/// Replace every line containing box atoms with its composed rows.
pub(crate) fn compose(lines: Vec<Line>) -> Vec<Line> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        if line
            .atoms
            .iter()
            .any(|atom| matches!(atom, Atom::Box { .. }))
        {
            expand(line, &mut out);
        } else {
            out.push(line);
        }
    }
    out
}

fn expand(line: Line, out: &mut Vec<Line>) {
    let host_newline = line.needs_newline;
    let mut columns: Vec<Column> = line
        .atoms
        .into_iter()
        .map(|atom| match atom {
            Atom::Box { width, inner } => {
                let (sub, _) = layout(&inner, Some(width));
                Column { width, sub }
            }
            atom => Column {
                width: atom.width(),
                sub: vec![Line {
                    needs_newline: host_newline,
                    atoms: vec![atom],
                }],
            },
        })
        .collect();

    let max_depth = columns.iter().map(|c| c.sub.len()).max().unwrap_or(0);
    if max_depth == 0 {
        return;
    }

    let last = columns.len() - 1;
    for (i, column) in columns.iter_mut().enumerate() {
        let depth = column.sub.len();
        if depth < max_depth {
            let fill = fill_atoms(column, i == last);
            for _ in 0..max_depth - depth - 1 {
                column.sub.push(Line {
                    needs_newline: true,
                    atoms: fill.clone(),
                });
            }
            column.sub.push(Line {
                needs_newline: host_newline,
                atoms: fill,
            });
        }
    }

    for row in 0..max_depth {
        let mut combined = Line::default();
        for column in &columns {
            let line = &column.sub[row];
            combined.needs_newline |= line.needs_newline;
            combined.atoms.extend(line.atoms.iter().cloned());
        }
        out.push(combined);
    }
}

/// Content used to extend a short column. A column holding a lone
/// vertically-fillable text repeats that payload, padded to the column
/// width. Otherwise the rightmost column fills with nothing and interior
/// columns with breakable spaces, keeping row widths stable.
fn fill_atoms(column: &Column, rightmost: bool) -> Vec<Atom> {
    if let [only] = column.sub.as_slice() {
        let mut solid = only
            .atoms
            .iter()
            .filter(|atom| !matches!(atom, Atom::SoftSpace));
        if let (
            Some(
                text @ Atom::Text {
                    fill: Fill::Vertical,
                    width,
                    ..
                },
            ),
            None,
        ) = (solid.next(), solid.next())
        {
            let mut atoms = vec![text.clone()];
            atoms.extend(std::iter::repeat_n(
                Atom::SoftSpace,
                column.width.saturating_sub(*width),
            ));
            return atoms;
        }
    }
    if rightmost {
        Vec::new()
    } else {
        vec![Atom::SoftSpace; column.width]
    }
}
