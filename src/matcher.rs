//! # Text Match Engine Module
//!
//! ## Purpose
//! Client-side word matching and highlighting over a document's extracted
//! text. Given a single search term or a list of candidate words, computes
//! the ordered set of whole-word matches, produces highlighted markup, and
//! supports wrap-around navigation among the matches.
//!
//! ## Input/Output Specification
//! - **Input**: Document text plus a term or candidate word list
//! - **Output**: Match count, byte spans, highlighted markup, one active
//!   match index
//! - **Matching**: case-insensitive, word-boundary anchored, left-to-right
//!   non-overlapping
//!
//! ## Key Features
//! - Literal tokens (every token is regex-escaped before use)
//! - Original casing and all non-matching text preserved in the markup
//! - Exactly one active match; scrolling it into view is a view concern
//! - Empty input produces an empty match set and unchanged markup

use regex::RegexBuilder;

/// Opening marker wrapped around every match span.
pub const HIGHLIGHT_OPEN: &str = r#"<mark class="match">"#;
/// Opening marker for the single active match.
pub const HIGHLIGHT_ACTIVE_OPEN: &str = r#"<mark class="match active">"#;
/// Closing marker for every match span.
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Byte span of one match within the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// Ordered matches of a query over one document text, with a cursor over
/// the active match.
#[derive(Debug, Clone)]
pub struct MatchSet {
    text: String,
    spans: Vec<MatchSpan>,
    current: usize,
}

impl MatchSet {
    /// Match a single term as a whole word.
    pub fn for_term(text: &str, term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            return Self::empty(text);
        }
        Self::build(text, &[term])
    }

    /// Match the union of candidate words, each as a whole word.
    pub fn for_words(text: &str, words: &[String]) -> Self {
        let tokens: Vec<&str> = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect();
        if tokens.is_empty() {
            return Self::empty(text);
        }
        Self::build(text, &tokens)
    }

    /// An empty match set over `text` (count zero, markup unchanged).
    pub fn empty(text: &str) -> Self {
        Self {
            text: text.to_string(),
            spans: Vec::new(),
            current: 0,
        }
    }

    fn build(text: &str, tokens: &[&str]) -> Self {
        let escaped: Vec<String> = tokens.iter().map(|t| regex::escape(t)).collect();
        let pattern = format!(r"\b({})\b", escaped.join("|"));

        // Escaped literals cannot produce an invalid pattern; the guard
        // only covers pathological sizes.
        let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(e) => {
                tracing::warn!("match pattern rejected: {}", e);
                return Self::empty(text);
            }
        };

        let spans = regex
            .find_iter(text)
            .map(|m| MatchSpan {
                start: m.start(),
                end: m.end(),
            })
            .collect();

        Self {
            text: text.to_string(),
            spans,
            current: 0,
        }
    }

    /// The original document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn count(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[MatchSpan] {
        &self.spans
    }

    /// Index of the active match, or `None` when there are no matches.
    pub fn current_index(&self) -> Option<usize> {
        if self.spans.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    /// The matched text of the active match, casing preserved.
    pub fn current_match(&self) -> Option<&str> {
        let span = self.spans.get(self.current)?;
        Some(&self.text[span.start..span.end])
    }

    /// Advance the active match, wrapping past the last one.
    pub fn next(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.spans.len();
    }

    /// Step the active match backwards, wrapping past the first one.
    pub fn previous(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        self.current = (self.current + self.spans.len() - 1) % self.spans.len();
    }

    /// The text with every match wrapped in a highlight marker; the active
    /// match carries the active marker. Non-matching text and matched
    /// casing are preserved verbatim.
    pub fn highlighted(&self) -> String {
        if self.spans.is_empty() {
            return self.text.clone();
        }

        let mut out = String::with_capacity(self.text.len() + self.spans.len() * 32);
        let mut cursor = 0;
        for (index, span) in self.spans.iter().enumerate() {
            out.push_str(&self.text[cursor..span.start]);
            if index == self.current {
                out.push_str(HIGHLIGHT_ACTIVE_OPEN);
            } else {
                out.push_str(HIGHLIGHT_OPEN);
            }
            out.push_str(&self.text[span.start..span.end]);
            out.push_str(HIGHLIGHT_CLOSE);
            cursor = span.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

/// Remove all highlight markers, reproducing the original text exactly.
pub fn strip_highlights(markup: &str) -> String {
    markup
        .replace(HIGHLIGHT_ACTIVE_OPEN, "")
        .replace(HIGHLIGHT_OPEN, "")
        .replace(HIGHLIGHT_CLOSE, "")
}
