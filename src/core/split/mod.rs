//! Splitting text into index terms.
//!
//! [`TextSplit::split`] walks decoded document text once and emits an
//! ordered sequence of terms through a [`TermSink`]. A term is a word
//! plus its word-count position and the byte span it covers in the
//! source text.
//!
//! Two accumulators run side by side: **word** holds a strict
//! alphanumeric run, **span** is a superset that may keep selected
//! embedded punctuation so that compound tokens like `c++`,
//! `o'brien` or `jfd@okyz.com` survive as single terms. A word is
//! emitted only when it differs from the current span, so plain text
//! costs one term per word.
//!
//! No case folding or accent stripping happens here; a raw index
//! keeps terms exactly as written and the expansion databases widen
//! queries later.

pub mod charclass;

pub use charclass::is_cjk;

use crate::core::types::Term;
use charclass::{classify, CharClass};

/// Terms at or above this many bytes are discarded unless configured
/// otherwise.
pub const DEFAULT_MAX_TERM_LENGTH: usize = 40;

/// Receiver for the terms produced by one split pass.
///
/// Returning `false` stops the split; [`TextSplit::split`] then
/// returns `false` as well.
pub trait TermSink {
    fn take_word(&mut self, term: &str, pos: usize, bstart: usize, bend: usize) -> bool;
}

/// How the splitter is being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Document indexing: emit spans and their constituent words.
    #[default]
    Index,
    /// Query splitting: emit only final spans. Query terms must not
    /// be atomized the way indexed document terms are.
    Query,
}

/// Text splitter configuration.
#[derive(Debug, Clone)]
pub struct TextSplit {
    mode: SplitMode,
    max_term_length: usize,
}

impl Default for TextSplit {
    fn default() -> Self {
        Self::new(SplitMode::Index)
    }
}

impl TextSplit {
    pub fn new(mode: SplitMode) -> Self {
        Self {
            mode,
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
        }
    }

    pub fn with_max_term_length(mode: SplitMode, max_term_length: usize) -> Self {
        Self {
            mode,
            max_term_length,
        }
    }

    /// Split `text` into terms, feeding them to `sink` in order.
    ///
    /// Returns `false` if the sink asked to stop, `true` otherwise.
    /// The input is already valid UTF-8 by construction; decoding
    /// failures are the extractor's to report, and the caller skips
    /// the whole document in that case.
    pub fn split<S: TermSink>(&self, text: &str, sink: &mut S) -> bool {
        let mut st = SplitState {
            mode: self.mode,
            max_term_length: self.max_term_length,
            sink,
            word: String::new(),
            span: String::new(),
            word_bstart: 0,
            span_bstart: 0,
            word_pos: 0,
            span_pos: 0,
            number: false,
            prev_term: String::new(),
            prev_pos: usize::MAX,
        };

        let mut it = text.char_indices().peekable();
        while let Some((bpos, c)) = it.next() {
            // Lookahead class; end of input counts as whitespace.
            let next_class = it
                .peek()
                .map(|&(_, n)| classify(n))
                .unwrap_or(CharClass::Space);

            match classify(c) {
                CharClass::Space => {
                    if !st.handle_space(bpos) {
                        return false;
                    }
                }
                CharClass::Special(b'-') | CharClass::Special(b'+') => {
                    if st.word.is_empty() {
                        if next_class == CharClass::Digit {
                            // Leading sign starts a number
                            st.number = true;
                            st.push_both(bpos, c);
                        } else {
                            st.push_span(bpos, c);
                        }
                    } else {
                        if !st.doemit(false, bpos) {
                            return false;
                        }
                        st.number = false;
                        st.push_span(bpos, c);
                    }
                }
                CharClass::Special(b'.') | CharClass::Special(b',') => {
                    if st.number {
                        // Inside a running number both are kept
                        // literally: 1.5, 1,2e30, 192.168.4.1
                        st.push_both(bpos, c);
                    } else if c == '.' {
                        // A dot inside a word closes the word but
                        // stays in the span; an initial dot is kept
                        // to catch patterns like `.net`, at the
                        // price of a few spurious terms.
                        if !st.word.is_empty() {
                            if !st.doemit(false, bpos) {
                                return false;
                            }
                            st.push_span(bpos, c);
                        } else {
                            st.push_span(bpos, c);
                        }
                    } else if !st.handle_space(bpos) {
                        return false;
                    }
                }
                CharClass::Special(b'@') => {
                    // Email/user-tag boundary: closes the word,
                    // folded into the span
                    if !st.word.is_empty() {
                        if !st.doemit(false, bpos) {
                            return false;
                        }
                        st.number = false;
                    }
                    st.push_span(bpos, c);
                }
                CharClass::Special(b'\'') => {
                    // Only meaningful inside a word (o'brien, it's);
                    // anywhere else it is whitespace
                    if !st.word.is_empty() {
                        if !st.doemit(false, bpos) {
                            return false;
                        }
                        st.number = false;
                        st.push_span(bpos, c);
                    } else if !st.handle_space(bpos) {
                        return false;
                    }
                }
                CharClass::Special(b'#') => {
                    // Kept only as the last character before a
                    // separator, so `c#` survives but `#comment`
                    // does not
                    let keep = !st.word.is_empty()
                        && matches!(
                            next_class,
                            CharClass::Space
                                | CharClass::Special(b'\n')
                                | CharClass::Special(b'\r')
                        );
                    if keep {
                        st.push_both(bpos, c);
                    } else if !st.handle_space(bpos) {
                        return false;
                    }
                }
                CharClass::Special(b'\n') | CharClass::Special(b'\r') => {
                    if st.span.ends_with('-') {
                        // Soft line-wrap de-hyphenation: when a
                        // hyphen is the last char before the line
                        // break, drop it and keep scanning without
                        // closing the span. Heuristic with known
                        // false positives; telling a wrap hyphen
                        // from a real one would need a dictionary.
                        st.span.pop();
                    } else if !st.handle_space(bpos) {
                        return false;
                    }
                }
                CharClass::Digit => {
                    if st.word.is_empty() {
                        st.number = true;
                    }
                    st.push_both(bpos, c);
                }
                CharClass::Letter | CharClass::Special(_) => {
                    st.push_both(bpos, c);
                }
            }
        }

        if !st.word.is_empty() || !st.span.is_empty() {
            if !st.doemit(true, text.len()) {
                return false;
            }
        }
        true
    }
}

/// Mutable state for one pass over one document.
struct SplitState<'a, S: TermSink> {
    mode: SplitMode,
    max_term_length: usize,
    sink: &'a mut S,
    /// Strict alphanumeric run, no punctuation ever
    word: String,
    /// Superset of word, may hold `- + . , @ ' #`
    span: String,
    word_bstart: usize,
    span_bstart: usize,
    word_pos: usize,
    span_pos: usize,
    /// Inside a running number: keeps `.` and `,` literal
    number: bool,
    prev_term: String,
    prev_pos: usize,
}

impl<S: TermSink> SplitState<'_, S> {
    fn push_both(&mut self, bpos: usize, c: char) {
        if self.word.is_empty() {
            self.word_bstart = bpos;
        }
        self.word.push(c);
        self.push_span(bpos, c);
    }

    fn push_span(&mut self, bpos: usize, c: char) {
        if self.span.is_empty() {
            self.span_bstart = bpos;
        }
        self.span.push(c);
    }

    fn handle_space(&mut self, bpos: usize) -> bool {
        if !self.word.is_empty() || !self.span.is_empty() {
            if !self.doemit(true, bpos) {
                return false;
            }
            self.number = false;
        }
        true
    }

    /// Emit and reset the current word, and the span too when it is
    /// at its end. The span only ever reaches the sink at span end
    /// (`spanerase`); closing a word mid-span emits the word alone,
    /// and only when it differs from the span, so `c++` stays one
    /// term with no separate `c`.
    ///
    /// `bp` is the byte position just past the accumulated text.
    fn doemit(&mut self, spanerase: bool, bp: usize) -> bool {
        let word = std::mem::take(&mut self.word);
        if spanerase {
            let span = std::mem::take(&mut self.span);
            if !self.emit_term(&span, self.span_pos, self.span_bstart, bp) {
                return false;
            }
            if self.mode == SplitMode::Index && !word.is_empty() && word.len() != span.len() {
                if !self.emit_term(&word, self.word_pos, self.word_bstart, bp) {
                    return false;
                }
            }
            self.word_pos += 1;
            self.span_pos = self.word_pos;
        } else {
            if self.mode == SplitMode::Index && !word.is_empty() && word.len() != self.span.len() {
                if !self.emit_term(&word, self.word_pos, self.word_bstart, bp) {
                    return false;
                }
            }
            self.word_pos += 1;
        }
        true
    }

    /// Cleanup which is simpler to do here than in the main loop,
    /// then hand the term to the sink.
    fn emit_term(&mut self, term: &str, pos: usize, bstart: usize, bend: usize) -> bool {
        // Chars we keep inside a word or span, but not at the end
        let mut w = term;
        let mut bend = bend;
        while w.ends_with(['.', ',', '@', '\'']) {
            w = &w[..w.len() - 1];
            bend = bend.saturating_sub(1).max(bstart);
        }

        if w.is_empty() || w.len() >= self.max_term_length {
            return true;
        }

        let mut chars = w.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            // Single letters and digits are indexed, nothing else
            if !matches!(classify(c), CharClass::Letter | CharClass::Digit) {
                return true;
            }
        }

        // When word and span coincide the same term would come
        // through twice at the same position
        if pos == self.prev_pos && w == self.prev_term {
            return true;
        }

        let ret = self.sink.take_word(w, pos, bstart, bend);
        self.prev_term.clear();
        self.prev_term.push_str(w);
        self.prev_pos = pos;
        ret
    }
}

/// A sink that collects everything into a `Vec<Term>`.
#[derive(Debug, Default)]
pub struct TermAccumulator {
    pub terms: Vec<Term>,
}

impl TermSink for TermAccumulator {
    fn take_word(&mut self, term: &str, pos: usize, bstart: usize, bend: usize) -> bool {
        self.terms.push(Term::new(term, pos, bstart, bend));
        true
    }
}

/// Split `text` and collect the produced terms.
pub fn collect_terms(text: &str, mode: SplitMode) -> Vec<Term> {
    let mut acc = TermAccumulator::default();
    TextSplit::new(mode).split(text, &mut acc);
    acc.terms
}
