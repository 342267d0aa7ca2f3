//! Search-space representation and feature-function scoring core for a
//! chart-based translation decoder.
//!
//! - [`input_path`]: per-sentence lattice of source spans with a per-table
//!   translation-option cache.
//! - [`ff`]: the feature-function contract, its registry, and the
//!   span-constraint feature.
//! - [`scores`]: the additive dense/sparse score accumulator.

pub mod ff;
pub mod input_path;
pub mod phrase;
pub mod scores;
pub mod settings;
pub mod span;
pub(crate) mod testutil;
pub mod trace_init;
