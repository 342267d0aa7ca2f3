#![cfg(test)]

use std::cell::Cell;

use crate::ff::CellLabel;
use crate::phrase::{Phrase, Sentence, TargetPhrase, TargetPhraseCollection};
use crate::span::Span;

/// Four-word sentence shared by lattice and feature tests.
pub fn test_sentence() -> Sentence {
    Sentence::new(1, "das haus ist klein")
}

/// A small option collection standing in for a phrase-table result.
pub fn test_options(text: &str) -> TargetPhraseCollection {
    TargetPhraseCollection::new(vec![TargetPhrase::terminal(text)])
}

/// A rule with `arity` non-terminals.
pub fn test_rule(arity: usize) -> TargetPhrase {
    TargetPhrase::new(Phrase::parse("the X house"), arity)
}

/// A child label that counts how often its coverage is read.
pub struct CountingLabel {
    pub span: Span,
    pub reads: Cell<usize>,
}

impl CountingLabel {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            span: Span::new(start, start + len - 1).unwrap(),
            reads: Cell::new(0),
        }
    }
}

impl CellLabel for CountingLabel {
    fn coverage(&self) -> Span {
        self.reads.set(self.reads.get() + 1);
        self.span
    }
}
