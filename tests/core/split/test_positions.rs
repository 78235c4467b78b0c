// Term positions and byte spans

use ferret::core::split::{collect_terms, SplitMode, TermSink, TextSplit};

#[test]
fn test_word_positions_are_strictly_increasing_per_position_class() {
    let terms = collect_terms("alpha beta gamma delta", SplitMode::Index);
    let positions: Vec<usize> = terms.iter().map(|t| t.pos).collect();
    assert_eq!(positions, [0, 1, 2, 3]);
}

#[test]
fn test_byte_spans_slice_back_to_terms() {
    let text = "plain words, the café and c++ too";
    for term in collect_terms(text, SplitMode::Index) {
        let slice = &text[term.bstart..term.bend];
        // spans with swallowed characters aside, plain terms slice
        // back exactly
        if !term.text.contains('\n') {
            assert_eq!(slice, term.text, "bad span for {:?}", term.text);
        }
    }
}

#[test]
fn test_span_and_word_share_position() {
    // the span and its first constituent word sit at the same
    // word-count ordinal
    let terms = collect_terms("x jfd@okyz.com y", SplitMode::Index);
    let span = terms.iter().find(|t| t.text == "jfd@okyz.com").unwrap();
    let tail = terms.iter().find(|t| t.text == "com").unwrap();
    assert!(span.pos < tail.pos);
    let x = terms.iter().find(|t| t.text == "x").unwrap();
    let y = terms.iter().find(|t| t.text == "y").unwrap();
    assert_eq!(x.pos, 0);
    assert!(y.pos > span.pos);
}

#[test]
fn test_sink_abort_propagates() {
    struct CountDown(usize);
    impl TermSink for CountDown {
        fn take_word(&mut self, _t: &str, _p: usize, _s: usize, _e: usize) -> bool {
            self.0 -= 1;
            self.0 > 0
        }
    }
    let mut sink = CountDown(3);
    let finished = TextSplit::new(SplitMode::Index).split("a b c d e f", &mut sink);
    assert!(!finished);
}
