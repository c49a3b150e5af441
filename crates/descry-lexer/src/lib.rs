//! descry Lexer - Descriptor tokenization using logos
//!
//! Splits a descriptor such as `FindByNameEqual` into words on case
//! boundaries. An upper-case run followed by a lower-case run gives its
//! last letter to the lower-case run, so `FindByID` yields `Find By ID` and
//! `HTTPServer` yields `HTTP Server`. Digit runs are words of their own.

mod token;

pub use token::*;

use std::fmt;

use descry_ast::Span;
use logos::Logos;

/// A word of a descriptor with its span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub span: Span,
}

impl Word {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        Keyword::from_word(&self.text)
    }

    pub fn is(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Tokenize a descriptor into words
pub fn tokenize(source: &str) -> Vec<Word> {
    let mut runs: Vec<(RunKind, Span)> = Vec::new();
    let mut lexer = RunKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        let kind = result.unwrap_or(RunKind::Other);
        runs.push((kind, span));
    }

    // Hand the last capital of an upper run to a following lower run
    for i in 0..runs.len().saturating_sub(1) {
        if runs[i].0 == RunKind::Upper && runs[i + 1].0 == RunKind::Lower {
            let (_, upper) = runs[i];
            let last = source[upper.start..upper.end]
                .char_indices()
                .last()
                .map(|(offset, _)| upper.start + offset)
                .unwrap_or(upper.start);
            runs[i].1 = Span::new(upper.start, last);
            runs[i + 1].1 = Span::new(last, runs[i + 1].1.end);
        }
    }

    runs.into_iter()
        .filter(|(kind, span)| *kind != RunKind::Other && !span.is_empty())
        .map(|(_, span)| Word::new(&source[span.start..span.end], span))
        .collect()
}

/// Render a word run the way diagnostics quote it: `[Name Equal]`
pub fn render(words: &[Word]) -> String {
    let texts: Vec<&str> = words.iter().map(Word::as_str).collect();
    format!("[{}]", texts.join(" "))
}

/// The span covering a word run, if it is not empty
pub fn span_of(words: &[Word]) -> Option<Span> {
    let first = words.first()?;
    let last = words.last()?;
    Some(first.span.merge(last.span))
}
