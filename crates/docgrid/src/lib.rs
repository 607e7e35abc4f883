#![forbid(unsafe_code)]

//! Layout engine for wrapped, aligned, box-composed monospaced text.
//!
//! # Role
//! `docgrid` renders a structured [`Doc`] value into plain text honoring
//! display-column widths (combining marks are zero cells, East Asian wide
//! characters two). Documents are built from atoms — text runs, breakable
//! spaces, hard breaks, blank-line directives, nesting and alignment scopes,
//! fixed-width boxes — and laid out by a streaming interpreter with no
//! lookahead.
//!
//! # Primary responsibilities
//! - **Width oracle** ([`text_width`]): the bit-exact codepoint → cell-width
//!   contract.
//! - **Document model** ([`Doc`] and constructors): monoidal construction,
//!   structural transforms (`chomp`, `nestle`, `nowrap`).
//! - **Layout**: soft-space wrapping, margin and alignment stacks,
//!   blank-line coalescing, column/width conditionals.
//! - **Box composition**: adjacent fixed-width blocks compose side by side,
//!   padded or vertically filled to the tallest on the line.
//!
//! # Example
//! ```
//! use docgrid::{hang, lit, render, space};
//!
//! let doc = hang(2, lit("-"), lit("foo") + space() + lit("bar"));
//! assert_eq!(render(Some(7), &doc), "-foo\n  bar");
//! ```
//!
//! The engine is purely functional at its boundary: rendering holds no
//! global state, performs no I/O, and never fails — over-wide content is
//! emitted overlong and reported through the measured width.

mod boxes;
mod combinators;
mod doc;
mod layout;
mod render;
pub mod text_width;

pub use combinators::{
    after_break, align_center, align_left, align_right, aligned, boxed, braces, brackets, cblock,
    double_quotes, flush, hang, hcat, hsep, inside, lblock, nest, parens, prefixed, quotes,
    rblock, resizable_box, vcat, vsep, with_column, with_line_length,
};
pub use doc::{
    Alignment, Doc, blankline, blanklines, chr, cr, empty, lit, space, text, vfill,
};
pub use render::{Dimensions, dimensions, height, min_offset, offset, render};
pub use text_width::{char_width, real_length};
