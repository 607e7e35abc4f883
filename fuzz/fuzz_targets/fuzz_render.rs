#![no_main]

use docgrid::{
    Doc, aligned, blanklines, boxed, cblock, cr, dimensions, lblock, lit, nest, real_length,
    render, space,
};
use libfuzzer_sys::fuzz_target;

/// Build a document from fuzz bytes: each 3-byte chunk selects a
/// constructor and its payload.
fn build_doc(data: &[u8]) -> Doc {
    let mut doc = Doc::new();
    for chunk in data.chunks(3) {
        let op = chunk[0] % 10;
        let a = chunk.get(1).copied().unwrap_or(0);
        let b = chunk.get(2).copied().unwrap_or(0);
        let word: String = (0..1 + a % 6)
            .map(|i| char::from(b'a' + (b.wrapping_add(i)) % 26))
            .collect();
        doc = match op {
            0 | 1 | 2 => doc + lit(word),
            3 => doc + lit("日本".repeat(1 + (a % 3) as usize)),
            4 => doc + space(),
            5 => doc + cr(),
            6 => doc + blanklines((a % 3) as usize),
            7 => nest((a % 5) as isize, doc),
            8 => boxed(1 + (a % 12) as usize, doc),
            _ => cblock(1 + (a % 12) as usize, doc),
        };
    }
    doc
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let wrap = if data[0] & 0x80 == 0 {
        Some((data[0] % 41) as usize)
    } else {
        None
    };
    let doc = build_doc(&data[1..]);

    // Post-conditions that must always hold:
    let out = render(wrap, &doc);
    assert_eq!(out, render(wrap, &doc), "render must be deterministic");

    let dims = dimensions(wrap, &doc);
    let bound = dims.width.max(wrap.unwrap_or(0));
    for line in out.lines() {
        assert!(
            real_length(line) <= bound,
            "line {line:?} exceeds measured bound {bound}"
        );
    }

    // Aligned/nested wrappers must not change the no-failure contract.
    let wrapped = aligned(lblock(4, doc));
    let _ = render(wrap, &wrapped);
});
