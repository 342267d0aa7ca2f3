use std::collections::HashMap;

use tracing::{debug, debug_span};

use crate::phrase::{Phrase, Sentence};
use crate::scores::ScoreBreakdown;
use crate::settings::settings;
use crate::span::Span;

use super::{InputPath, PathId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LatticeError {
    #[error("span {span} is outside a sentence of {len} words")]
    OutOfRange { span: Span, len: usize },
    #[error("span {span} added after a longer span of {previous_len} words")]
    OutOfOrder { span: Span, previous_len: usize },
    #[error("unknown predecessor {0}")]
    UnknownPredecessor(PathId),
    #[error("predecessor {predecessor} of {span} is not shorter")]
    PredecessorNotShorter { span: Span, predecessor: Span },
    #[error("predecessor {predecessor} is neither a prefix nor a suffix of {span}")]
    PredecessorOutside { span: Span, predecessor: Span },
}

/// All input paths of one sentence.
///
/// Paths are appended in non-decreasing span length and may only name an
/// already-added path as predecessor, so predecessors always precede the
/// paths that extend them. One lattice belongs to one worker.
pub struct InputPathLattice<'t> {
    source: Phrase,
    /// All paths, indexed by `PathId`.
    paths: Vec<InputPath<'t>>,
    /// by_span[span] = paths covering exactly `span`, in insertion order.
    by_span: HashMap<Span, Vec<PathId>>,
}

impl<'t> InputPathLattice<'t> {
    /// An empty lattice over `sentence`.
    pub fn new(sentence: &Sentence) -> Self {
        Self {
            source: sentence.phrase.clone(),
            paths: Vec::new(),
            by_span: HashMap::new(),
        }
    }

    /// Every span up to `max_span_length` words, shortest first. Each path
    /// `[s..e]` with `e > s` extends `[s..e-1]`.
    pub fn build(sentence: &Sentence, max_span_length: usize) -> Self {
        Self::build_with_scores(sentence, max_span_length, |_| None)
    }

    /// [`build`](Self::build) with the span limit from global settings.
    pub fn build_default(sentence: &Sentence) -> Self {
        Self::build(sentence, settings().lattice.max_span_length)
    }

    /// Like [`build`](Self::build), attaching `input_score(span)` to each path.
    pub fn build_with_scores<F>(
        sentence: &Sentence,
        max_span_length: usize,
        mut input_score: F,
    ) -> Self
    where
        F: FnMut(Span) -> Option<ScoreBreakdown>,
    {
        let word_count = sentence.len();
        let _span = debug_span!("build_input_paths", word_count, max_span_length).entered();
        let mut lattice = Self::new(sentence);
        for len in 1..=max_span_length.min(word_count) {
            for start in 0..=word_count - len {
                let span = Span::from_start_len(start, len);
                let predecessor = if len > 1 {
                    lattice.get(Span::from_start_len(start, len - 1))
                } else {
                    None
                };
                let score = input_score(span);
                lattice.push(span, predecessor, score);
            }
        }
        debug!(path_count = lattice.paths.len());
        lattice
    }

    /// Append a path, checking the construction contract: the predecessor
    /// must already exist, be shorter, and share a start or an end with `span`.
    pub fn add_path(
        &mut self,
        span: Span,
        predecessor: Option<PathId>,
        input_score: Option<ScoreBreakdown>,
    ) -> Result<PathId, LatticeError> {
        if span.end() >= self.source.len() {
            return Err(LatticeError::OutOfRange {
                span,
                len: self.source.len(),
            });
        }
        if let Some(last) = self.paths.last() {
            if last.span.len() > span.len() {
                return Err(LatticeError::OutOfOrder {
                    span,
                    previous_len: last.span.len(),
                });
            }
        }
        if let Some(pred_id) = predecessor {
            let pred = self
                .path(pred_id)
                .ok_or(LatticeError::UnknownPredecessor(pred_id))?;
            if pred.span.len() >= span.len() {
                return Err(LatticeError::PredecessorNotShorter {
                    span,
                    predecessor: pred.span,
                });
            }
            if !pred.span.is_prefix_of(&span) && !pred.span.is_suffix_of(&span) {
                return Err(LatticeError::PredecessorOutside {
                    span,
                    predecessor: pred.span,
                });
            }
        }
        Ok(self.push(span, predecessor, input_score))
    }

    fn push(
        &mut self,
        span: Span,
        predecessor: Option<PathId>,
        input_score: Option<ScoreBreakdown>,
    ) -> PathId {
        let id = PathId(self.paths.len() as u32);
        let phrase = self.source.sub_phrase(span).unwrap_or_default();
        self.paths
            .push(InputPath::new(id, span, phrase, predecessor, input_score));
        self.by_span.entry(span).or_default().push(id);
        id
    }

    /// Remove and return the most recently added path.
    ///
    /// No live path can name it as predecessor, so the rest of the lattice
    /// is untouched. Dropping the returned path releases its input score.
    pub fn pop(&mut self) -> Option<InputPath<'t>> {
        let path = self.paths.pop()?;
        if let Some(ids) = self.by_span.get_mut(&path.span) {
            ids.retain(|&id| id != path.id);
            if ids.is_empty() {
                self.by_span.remove(&path.span);
            }
        }
        Some(path)
    }

    pub fn source(&self) -> &Phrase {
        &self.source
    }

    pub fn path(&self, id: PathId) -> Option<&InputPath<'t>> {
        self.paths.get(id.index())
    }

    /// Mutable access for filling the translation cache.
    pub fn path_mut(&mut self, id: PathId) -> Option<&mut InputPath<'t>> {
        self.paths.get_mut(id.index())
    }

    /// First path covering exactly `span`.
    pub fn get(&self, span: Span) -> Option<PathId> {
        self.by_span.get(&span).and_then(|ids| ids.first().copied())
    }

    pub fn paths_for_span(&self, span: Span) -> &[PathId] {
        self.by_span.get(&span).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn paths_by_length(&self, len: usize) -> impl Iterator<Item = &InputPath<'t>> {
        self.paths.iter().filter(move |p| p.span.len() == len)
    }

    /// `id` followed by its predecessor, that one's predecessor, and so on.
    pub fn predecessor_chain(&self, id: PathId) -> impl Iterator<Item = &InputPath<'t>> {
        std::iter::successors(self.path(id), move |p| {
            p.predecessor.and_then(|prev| self.path(prev))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputPath<'t>> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
