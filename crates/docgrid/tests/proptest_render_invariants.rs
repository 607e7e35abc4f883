//! Property-based invariant tests for the layout engine.
//!
//! These verify structural invariants that must hold for arbitrary
//! documents and wrap widths:
//!
//! 1. Rendering is deterministic.
//! 2. Concatenation is a monoid modulo rendering (associativity, identity).
//! 3. Semantically empty documents render to nothing.
//! 4. No emitted line is wider than the measured width allows.
//! 5. `chomp` and `nestle` are idempotent.
//! 6. `nowrap` introduces no line breaks that were not written as breaks.
//! 7. `height` agrees with the newline count of unwrapped output.
//! 8. Blank-line requirements coalesce instead of accumulating.
//! 9. Width measurement matches the width oracle on every output line.

use proptest::prelude::*;

use docgrid::{
    Doc, aligned, blanklines, boxed, cblock, cr, dimensions, empty, height, lblock, lit, nest,
    real_length, render, space, text,
};

// ── Strategies ──────────────────────────────────────────────────────────

/// Words over ASCII, CJK, and combining-mark codepoints.
fn arb_word() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        Just("日本".to_string()),
        Just("世界".to_string()),
        Just("e\u{0301}tude".to_string()),
        Just("한글".to_string()),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Doc> {
    prop_oneof![
        arb_word().prop_map(|w| lit(w)),
        arb_word().prop_map(|w| text(&w)),
        Just(space()),
        Just(cr()),
        (0usize..3).prop_map(blanklines),
        Just(empty()),
    ]
}

/// Documents built from the public constructor vocabulary.
fn arb_doc() -> impl Strategy<Value = Doc> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4)
                .prop_map(|docs| docs.into_iter().sum::<Doc>()),
            (0isize..4, inner.clone()).prop_map(|(k, d)| nest(k, d)),
            inner.clone().prop_map(aligned),
            (1usize..8, inner.clone()).prop_map(|(w, d)| boxed(w, d)),
            (1usize..8, inner.clone()).prop_map(|(w, d)| lblock(w, d)),
            (1usize..8, inner).prop_map(|(w, d)| cblock(w, d)),
        ]
    })
}

/// Documents with no hard breaks or blanks, for the `nowrap` property.
fn arb_flat_doc() -> impl Strategy<Value = Doc> {
    prop::collection::vec(
        prop_oneof![arb_word().prop_map(|w| lit(w)), Just(space())],
        0..12,
    )
    .prop_map(|docs| docs.into_iter().sum())
}

fn arb_width() -> impl Strategy<Value = Option<usize>> {
    prop_oneof![Just(None), (0usize..30).prop_map(Some)]
}

// ── Invariants ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rendering_is_deterministic(doc in arb_doc(), width in arb_width()) {
        prop_assert_eq!(render(width, &doc), render(width, &doc));
    }

    #[test]
    fn concatenation_is_associative_under_rendering(
        a in arb_doc(),
        b in arb_doc(),
        c in arb_doc(),
        width in arb_width(),
    ) {
        let left = (a.clone() + b.clone()) + c.clone();
        let right = a + (b + c);
        prop_assert_eq!(render(width, &left), render(width, &right));
    }

    #[test]
    fn empty_is_the_identity_for_concatenation(doc in arb_doc(), width in arb_width()) {
        let expected = render(width, &doc);
        prop_assert_eq!(render(width, &(empty() + doc.clone())), expected.clone());
        prop_assert_eq!(render(width, &(doc + empty())), expected);
    }

    #[test]
    fn semantically_empty_documents_render_to_nothing(width in arb_width()) {
        let docs = [empty(), space(), lit(""), space() + space() + lit("")];
        for doc in docs {
            prop_assert!(doc.is_empty());
            prop_assert_eq!(render(width, &doc), "");
        }
    }

    #[test]
    fn no_line_exceeds_the_measured_width(doc in arb_doc(), width in 0usize..30) {
        let dims = dimensions(Some(width), &doc);
        let bound = dims.width.max(width);
        for line in render(Some(width), &doc).lines() {
            prop_assert!(
                real_length(line) <= bound,
                "line {line:?} wider than {bound}"
            );
        }
    }

    #[test]
    fn chomp_is_idempotent_under_rendering(doc in arb_doc(), width in arb_width()) {
        let once = doc.clone().chomp();
        let twice = once.clone().chomp();
        prop_assert_eq!(render(width, &once), render(width, &twice));
    }

    #[test]
    fn nestle_is_idempotent_under_rendering(doc in arb_doc(), width in arb_width()) {
        let once = doc.clone().nestle();
        let twice = once.clone().nestle();
        prop_assert_eq!(render(width, &once), render(width, &twice));
    }

    #[test]
    fn nowrap_never_introduces_breaks(doc in arb_flat_doc(), width in 0usize..20) {
        let out = render(Some(width), &doc.nowrap());
        prop_assert!(!out.contains('\n'), "unexpected break in {out:?}");
    }

    #[test]
    fn height_matches_unwrapped_newline_count(doc in arb_doc()) {
        let out = render(None, &doc);
        if !out.is_empty() {
            let newlines = out.matches('\n').count();
            let expected = newlines + usize::from(!out.ends_with('\n'));
            prop_assert_eq!(height(&doc), expected);
        }
    }

    #[test]
    fn blank_requirements_reach_rather_than_accumulate(
        n in 0usize..4,
        m in 0usize..4,
    ) {
        let combined = lit("x") + blanklines(n) + blanklines(m) + lit("y");
        let single = lit("x") + blanklines(n.max(m)) + lit("y");
        prop_assert_eq!(render(None, &combined), render(None, &single));
    }

    #[test]
    fn measured_width_bounds_every_unwrapped_line(doc in arb_doc()) {
        let dims = dimensions(None, &doc);
        for line in render(None, &doc).lines() {
            prop_assert!(real_length(line) <= dims.width);
        }
    }
}
