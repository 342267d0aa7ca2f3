//! Input paths: one node per reachable source span, each caching the
//! translation options every phrase table returned for it.
//!
//! Paths live in a per-sentence [`InputPathLattice`] arena and point at their
//! predecessor by [`PathId`], so a path never owns the path it extends. The
//! only thing a path owns is its input-derived score.

mod lattice;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

use crate::ff::CellLabel;
use crate::phrase::{Phrase, TargetPhraseCollection};
use crate::scores::ScoreBreakdown;
use crate::span::Span;

pub use lattice::{InputPathLattice, LatticeError};

/// Stable index of a path within its lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathId(pub(crate) u32);

impl PathId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque identity of a phrase table, assigned by the table subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableId(pub u32);

/// Opaque table-internal handle (e.g. a trie node) that lets a table
/// resume lookup from this span when extending it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupHandle(pub u64);

/// One table's cached result for a path. Both parts are borrowed from the
/// table subsystem.
#[derive(Debug, Clone, Copy)]
pub struct CachedLookup<'t> {
    pub options: &'t TargetPhraseCollection,
    pub handle: LookupHandle,
}

pub struct InputPath<'t> {
    id: PathId,
    span: Span,
    phrase: Phrase,
    predecessor: Option<PathId>,
    input_score: Option<Box<ScoreBreakdown>>,
    translations: HashMap<TableId, CachedLookup<'t>>,
}

impl<'t> InputPath<'t> {
    pub(crate) fn new(
        id: PathId,
        span: Span,
        phrase: Phrase,
        predecessor: Option<PathId>,
        input_score: Option<ScoreBreakdown>,
    ) -> Self {
        Self {
            id,
            span,
            phrase,
            predecessor,
            input_score: input_score.map(Box::new),
            translations: HashMap::new(),
        }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Source words covered by this path.
    pub fn phrase(&self) -> &Phrase {
        &self.phrase
    }

    pub fn predecessor(&self) -> Option<PathId> {
        self.predecessor
    }

    pub fn input_score(&self) -> Option<&ScoreBreakdown> {
        self.input_score.as_deref()
    }

    /// Take ownership of the input score, leaving the path without one.
    pub fn into_input_score(self) -> Option<ScoreBreakdown> {
        self.input_score.map(|b| *b)
    }

    pub fn cached_lookup(&self, table: TableId) -> Option<CachedLookup<'t>> {
        self.translations.get(&table).copied()
    }

    /// `None` means `table` has not been consulted for this path yet.
    pub fn translation_options(&self, table: TableId) -> Option<&'t TargetPhraseCollection> {
        self.translations.get(&table).map(|c| c.options)
    }

    pub fn lookup_handle(&self, table: TableId) -> Option<LookupHandle> {
        self.translations.get(&table).map(|c| c.handle)
    }

    /// Cache `table`'s result for this path. A second call for the same
    /// table replaces the first.
    pub fn set_translation_options(
        &mut self,
        table: TableId,
        options: &'t TargetPhraseCollection,
        handle: LookupHandle,
    ) {
        self.translations
            .insert(table, CachedLookup { options, handle });
    }

    /// Tables with a cached entry, in ascending id order.
    pub fn cached_tables(&self) -> Vec<TableId> {
        let mut tables: Vec<TableId> = self.translations.keys().copied().collect();
        tables.sort();
        tables
    }

    pub fn debug_string(&self) -> String {
        self.to_string()
    }
}

impl CellLabel for InputPath<'_> {
    fn coverage(&self) -> Span {
        self.span
    }
}

impl fmt::Display for InputPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.id, self.span)?;
        match self.predecessor {
            Some(prev) => write!(f, "{prev}")?,
            None => f.write_str("-")?,
        }
        write!(f, " \"{}\" pt:", self.phrase)?;
        for table in self.cached_tables() {
            write!(f, " {}", table.0)?;
        }
        Ok(())
    }
}

impl fmt::Debug for InputPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputPath")
            .field("id", &self.id)
            .field("span", &self.span)
            .field("phrase", &self.phrase)
            .field("predecessor", &self.predecessor)
            .field("has_input_score", &self.input_score.is_some())
            .field("tables", &self.cached_tables())
            .finish()
    }
}
