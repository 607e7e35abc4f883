#![forbid(unsafe_code)]

//! Document model: layout atoms, the `Doc` monoid, and primitive
//! constructors.
//!
//! A [`Doc`] is an ordered sequence of atoms. Concatenation is associative
//! with [`empty`] as identity, and construction order is emission order; all
//! layout decisions (wrapping, margins, alignment, box composition) are
//! deferred to render time.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::sync::Arc;

use crate::text_width::{char_width, real_length};

/// Text alignment inside a wrapped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Horizontal fill behavior of a text atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Fill {
    /// Ordinary printable text.
    #[default]
    None,
    /// Repeats vertically during box composition when it is the only content
    /// of a shorter column.
    Vertical,
}

/// How a pushed nesting level is computed from the current column and the
/// enclosing level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nesting {
    /// A fixed margin, ignoring context.
    Exact(usize),
    /// The enclosing level plus a delta, clamped at zero.
    Increase(isize),
    /// Whatever column the line has reached.
    AtColumn,
}

impl Nesting {
    pub(crate) fn resolve(self, column: usize, enclosing: usize) -> usize {
        match self {
            Nesting::Exact(level) => level,
            Nesting::Increase(delta) => {
                let level = (enclosing as isize).saturating_add(delta);
                level.max(0) as usize
            }
            Nesting::AtColumn => column,
        }
    }
}

/// A document computed lazily from the current column.
pub(crate) type ColumnFn = Arc<dyn Fn(usize) -> Doc + Send + Sync>;

/// A document computed lazily from the ambient wrap width.
pub(crate) type LineLengthFn = Arc<dyn Fn(Option<usize>) -> Doc + Send + Sync>;

/// One element of the document stream.
#[derive(Clone)]
pub(crate) enum Atom {
    /// A contiguous printable run. The payload contains no newline; `width`
    /// is its display width per [`real_length`].
    Text {
        fill: Fill,
        width: usize,
        content: String,
    },
    /// Break the current line (no-op on an empty line).
    Newline,
    /// A single-cell space that may become a line break and is elided at end
    /// of line.
    SoftSpace,
    PushNesting(Nesting),
    PopNesting,
    PushAlignment(Alignment),
    PopAlignment,
    /// Require at least this many blank lines here.
    Blanks(usize),
    /// A fixed-width sub-layout occupying a single cell span on its host
    /// line(s).
    Box { width: usize, inner: Doc },
    WithColumn(ColumnFn),
    WithLineLength(LineLengthFn),
}

impl Atom {
    /// Display width this atom contributes to a line.
    pub(crate) fn width(&self) -> usize {
        match self {
            Atom::Text { width, .. } => *width,
            Atom::SoftSpace => 1,
            Atom::Box { width, .. } => *width,
            _ => 0,
        }
    }

    /// A plain text atom of `width` spaces.
    pub(crate) fn spaces(width: usize) -> Atom {
        Atom::Text {
            fill: Fill::None,
            width,
            content: " ".repeat(width),
        }
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Text {
                fill,
                width,
                content,
            } => f
                .debug_struct("Text")
                .field("fill", fill)
                .field("width", width)
                .field("content", content)
                .finish(),
            Atom::Newline => write!(f, "Newline"),
            Atom::SoftSpace => write!(f, "SoftSpace"),
            Atom::PushNesting(n) => f.debug_tuple("PushNesting").field(n).finish(),
            Atom::PopNesting => write!(f, "PopNesting"),
            Atom::PushAlignment(a) => f.debug_tuple("PushAlignment").field(a).finish(),
            Atom::PopAlignment => write!(f, "PopAlignment"),
            Atom::Blanks(n) => f.debug_tuple("Blanks").field(n).finish(),
            Atom::Box { width, inner } => f
                .debug_struct("Box")
                .field("width", width)
                .field("inner", inner)
                .finish(),
            Atom::WithColumn(_) => write!(f, "WithColumn(..)"),
            Atom::WithLineLength(_) => write!(f, "WithLineLength(..)"),
        }
    }
}

/// A structured document that renders to wrapped, aligned monospaced text.
///
/// Build documents from the constructors in this crate ([`text`], [`lit`],
/// [`space`], [`crate::nest`], [`crate::boxed`], ...), combine them with
/// [`Doc::append`] or `+`, and produce output with [`Doc::render`].
#[derive(Clone, Debug, Default)]
pub struct Doc {
    pub(crate) atoms: Vec<Atom>,
}

impl Doc {
    /// The empty document.
    #[must_use]
    pub fn new() -> Doc {
        Doc::default()
    }

    pub(crate) fn one(atom: Atom) -> Doc {
        Doc { atoms: vec![atom] }
    }

    pub(crate) fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    /// Concatenate two documents.
    #[must_use]
    pub fn append(mut self, other: Doc) -> Doc {
        self.atoms.extend(other.atoms);
        self
    }

    /// Whether the document produces no printable output: no text of nonzero
    /// width, no line breaks or blank-line directives, and no non-empty box.
    ///
    /// Column/width conditionals are treated as potentially printing, since
    /// their expansion is only known at render time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.iter().all(|atom| match atom {
            Atom::Text { width, .. } => *width == 0,
            Atom::Newline | Atom::Blanks(_) => false,
            Atom::SoftSpace
            | Atom::PushNesting(_)
            | Atom::PopNesting
            | Atom::PushAlignment(_)
            | Atom::PopAlignment => true,
            Atom::Box { inner, .. } => inner.is_empty(),
            Atom::WithColumn(_) | Atom::WithLineLength(_) => false,
        })
    }

    /// Strip trailing breakable material: soft spaces, newlines, and
    /// blank-line directives. Trailing nesting/alignment pushes and pops are
    /// preserved so scopes still close correctly. Idempotent.
    #[must_use]
    pub fn chomp(mut self) -> Doc {
        let mut scope_tail: Vec<Atom> = Vec::new();
        while let Some(atom) = self.atoms.pop() {
            match atom {
                Atom::SoftSpace | Atom::Newline | Atom::Blanks(_) => {}
                Atom::PushNesting(_)
                | Atom::PopNesting
                | Atom::PushAlignment(_)
                | Atom::PopAlignment => scope_tail.push(atom),
                other => {
                    self.atoms.push(other);
                    break;
                }
            }
        }
        self.atoms.extend(scope_tail.into_iter().rev());
        self
    }

    /// Strip leading newlines and blank-line directives. Idempotent.
    #[must_use]
    pub fn nestle(mut self) -> Doc {
        let kept = self
            .atoms
            .iter()
            .position(|atom| !matches!(atom, Atom::Newline | Atom::Blanks(_)))
            .unwrap_or(self.atoms.len());
        self.atoms.drain(..kept);
        self
    }

    /// Replace every breakable space with an ordinary space, so rendering
    /// introduces no line break that was not written as a newline or blank.
    #[must_use]
    pub fn nowrap(self) -> Doc {
        let atoms = self
            .atoms
            .into_iter()
            .map(|atom| match atom {
                Atom::SoftSpace => Atom::spaces(1),
                Atom::Box { width, inner } => Atom::Box {
                    width,
                    inner: inner.nowrap(),
                },
                Atom::WithColumn(f) => {
                    Atom::WithColumn(Arc::new(move |column| f(column).nowrap()))
                }
                Atom::WithLineLength(f) => {
                    Atom::WithLineLength(Arc::new(move |len| f(len).nowrap()))
                }
                other => other,
            })
            .collect();
        Doc { atoms }
    }
}

impl Add for Doc {
    type Output = Doc;

    fn add(self, rhs: Doc) -> Doc {
        self.append(rhs)
    }
}

impl AddAssign for Doc {
    fn add_assign(&mut self, rhs: Doc) {
        self.atoms.extend(rhs.atoms);
    }
}

impl Sum for Doc {
    fn sum<I: Iterator<Item = Doc>>(iter: I) -> Doc {
        iter.fold(Doc::default(), Doc::append)
    }
}

impl FromIterator<Doc> for Doc {
    fn from_iter<I: IntoIterator<Item = Doc>>(iter: I) -> Doc {
        iter.into_iter().sum()
    }
}

impl From<&str> for Doc {
    fn from(s: &str) -> Doc {
        text(s)
    }
}

impl From<String> for Doc {
    fn from(s: String) -> Doc {
        text(&s)
    }
}

impl From<char> for Doc {
    fn from(c: char) -> Doc {
        chr(c)
    }
}

impl fmt::Display for Doc {
    /// Renders without a wrap width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render(None, self))
    }
}

/// The empty document, the identity for concatenation.
#[must_use]
pub fn empty() -> Doc {
    Doc::default()
}

/// A run of literal text with no newlines. Use [`text`] for input that may
/// contain them.
#[must_use]
pub fn lit(s: impl Into<String>) -> Doc {
    let content = s.into();
    Doc::one(Atom::Text {
        fill: Fill::None,
        width: real_length(&content),
        content,
    })
}

/// Literal text, split on `\n` into lines joined by hard line breaks.
#[must_use]
pub fn text(s: &str) -> Doc {
    let mut doc = Doc::default();
    for (i, part) in s.split('\n').enumerate() {
        if i > 0 {
            doc.push(Atom::Newline);
        }
        doc.push(Atom::Text {
            fill: Fill::None,
            width: real_length(part),
            content: part.to_string(),
        });
    }
    doc
}

/// A single character.
#[must_use]
pub fn chr(c: char) -> Doc {
    Doc::one(Atom::Text {
        fill: Fill::None,
        width: char_width(c),
        content: c.to_string(),
    })
}

/// Vertically fillable text: when it is the only content of a box column
/// that is shorter than its neighbors, the payload repeats on the fill
/// lines. Used for things like table column separators.
#[must_use]
pub fn vfill(s: impl Into<String>) -> Doc {
    let content = s.into();
    Doc::one(Atom::Text {
        fill: Fill::Vertical,
        width: real_length(&content),
        content,
    })
}

/// A breakable space: renders as one space, may become a line break under
/// wrapping, and is elided at end of line.
#[must_use]
pub fn space() -> Doc {
    Doc::one(Atom::SoftSpace)
}

/// A carriage return: ends the current line if it has any content.
#[must_use]
pub fn cr() -> Doc {
    Doc::one(Atom::Newline)
}

/// At least one blank line here. Consecutive requirements coalesce rather
/// than accumulate, and nothing is emitted at the start or end of a
/// document.
#[must_use]
pub fn blankline() -> Doc {
    blanklines(1)
}

/// At least `n` blank lines here.
#[must_use]
pub fn blanklines(n: usize) -> Doc {
    Doc::one(Atom::Blanks(n))
}

/// Collapse the atom stream before interpretation: adjacent text runs with
/// the same fill merge, and adjacent blank-line directives coalesce to the
/// larger requirement. Stable for everything else.
pub(crate) fn normalize(atoms: Vec<Atom>) -> Vec<Atom> {
    let mut out: Vec<Atom> = Vec::with_capacity(atoms.len());
    for atom in atoms {
        let atom = match (out.pop(), atom) {
            (
                Some(Atom::Text {
                    fill,
                    width,
                    mut content,
                }),
                Atom::Text {
                    fill: next_fill,
                    width: next_width,
                    content: next,
                },
            ) if fill == next_fill => {
                content.push_str(&next);
                Atom::Text {
                    fill,
                    width: width + next_width,
                    content,
                }
            }
            (Some(Atom::Blanks(n)), Atom::Blanks(m)) => Atom::Blanks(n.max(m)),
            (Some(prev), atom) => {
                out.push(prev);
                atom
            }
            (None, atom) => atom,
        };
        out.push(atom);
    }
    out
}
