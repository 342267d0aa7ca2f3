//! Source and target word sequences.

use std::fmt;

use crate::span::Span;

/// An ordered run of words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Phrase {
    words: Vec<String>,
}

impl Phrase {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Split on ASCII whitespace.
    pub fn parse(text: &str) -> Self {
        Self::from_words(text.split_whitespace())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words covered by `span`, or `None` if it runs past the end.
    pub fn sub_phrase(&self, span: Span) -> Option<Phrase> {
        self.words
            .get(span.start()..=span.end())
            .map(|w| Phrase { words: w.to_vec() })
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

/// The sentence being decoded.
#[derive(Debug, Clone)]
pub struct Sentence {
    pub id: u64,
    pub phrase: Phrase,
}

impl Sentence {
    pub fn new(id: u64, text: &str) -> Self {
        Self {
            id,
            phrase: Phrase::parse(text),
        }
    }

    pub fn len(&self) -> usize {
        self.phrase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrase.is_empty()
    }
}

/// Target side of a translation rule.
///
/// `arity` counts the non-terminal gaps the rule leaves for child
/// derivations; a plain phrase pair has arity 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPhrase {
    pub words: Phrase,
    pub arity: usize,
}

impl TargetPhrase {
    pub fn new(words: Phrase, arity: usize) -> Self {
        Self { words, arity }
    }

    pub fn terminal(text: &str) -> Self {
        Self::new(Phrase::parse(text), 0)
    }
}

/// Translation options a phrase table returns for one source span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetPhraseCollection {
    phrases: Vec<TargetPhrase>,
}

impl TargetPhraseCollection {
    pub fn new(phrases: Vec<TargetPhrase>) -> Self {
        Self { phrases }
    }

    pub fn phrases(&self) -> &[TargetPhrase] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
