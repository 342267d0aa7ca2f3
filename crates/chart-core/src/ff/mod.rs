//! Feature-function contract.
//!
//! A feature function is built once from a configuration line, then shared
//! read-only across worker threads. It contributes scores in up to four
//! phases; every hook defaults to a no-op so a feature only implements the
//! phases it cares about.

mod config;
mod non_term_min_span;
mod registry;


use std::sync::Arc;

use crate::input_path::InputPath;
use crate::phrase::{Phrase, Sentence, TargetPhrase};
use crate::scores::ScoreBreakdown;
use crate::span::Span;

pub use config::{scan, scan_bool, ConfigError, FeatureLine};
pub use non_term_min_span::{NonTermMinSpan, NonTermMinSpanBuilder};
pub use registry::{FeatureFactory, FeatureRegistry, RegistryBuilder};

/// Identity and base configuration shared by every feature function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescriptor {
    name: Arc<str>,
    num_score_components: usize,
    tuneable: bool,
    verbose: u32,
}

impl FeatureDescriptor {
    pub fn new(name: &str, num_score_components: usize) -> Self {
        Self {
            name: Arc::from(name),
            num_score_components,
            tuneable: true,
            verbose: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Dense width, fixed at construction.
    pub fn num_score_components(&self) -> usize {
        self.num_score_components
    }

    pub fn tuneable(&self) -> bool {
        self.tuneable
    }

    pub fn verbose(&self) -> u32 {
        self.verbose
    }

    /// Apply one of the parameters every feature understands.
    ///
    /// Keys no handler claims end here and fail.
    pub fn set_base_parameter(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "name" => {
                if value.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        feature: self.name.to_string(),
                        key: key.to_string(),
                        value: value.to_string(),
                        reason: "name must not be empty".to_string(),
                    });
                }
                self.name = Arc::from(value);
            }
            "num-features" => {
                let requested: usize = scan(&self.name, key, value)?;
                if requested != self.num_score_components {
                    return Err(ConfigError::WidthMismatch {
                        feature: self.name.to_string(),
                        requested,
                        fixed: self.num_score_components,
                    });
                }
            }
            "tuneable" => self.tuneable = scan_bool(&self.name, key, value)?,
            "verbose" => self.verbose = scan(&self.name, key, value)?,
            _ => {
                return Err(ConfigError::UnknownParameter {
                    feature: self.name.to_string(),
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Builder-side configuration hook.
///
/// Implementors claim their own keys in `set_parameter` and forward the rest
/// to [`FeatureDescriptor::set_base_parameter`]. Only builders implement
/// this, so a constructed feature cannot be reconfigured.
pub trait FeatureConfigurator {
    fn descriptor_mut(&mut self) -> &mut FeatureDescriptor;

    fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.descriptor_mut().set_base_parameter(key, value)
    }

    fn read_parameters(&mut self, line: &FeatureLine) -> Result<(), ConfigError> {
        for (key, value) in line.params() {
            self.set_parameter(key, value)?;
        }
        Ok(())
    }
}

/// A non-terminal child of a rule application: the source span it covers
/// and its label.
pub trait CellLabel {
    fn coverage(&self) -> Span;

    fn non_terminal(&self) -> &str {
        "X"
    }
}

/// A left-to-right (phrase-based) partial hypothesis.
pub trait Hypothesis {
    fn source_span(&self) -> Span;
    fn target_phrase(&self) -> &TargetPhrase;
}

/// A chart hypothesis: a rule application with zero or more children.
pub trait ChartHypothesis {
    fn source_span(&self) -> Span;
    fn target_phrase(&self) -> &TargetPhrase;
    /// Source spans of the child hypotheses, left to right.
    fn child_spans(&self) -> Vec<Span>;
}

/// A scoring plugin.
///
/// Hooks take `&self`: evaluation never mutates configuration, and each call
/// writes into its own accumulator, so one instance serves all threads.
pub trait FeatureFunction: Send + Sync {
    fn descriptor(&self) -> &FeatureDescriptor;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    /// Context-free scores of a rule. Must write exactly
    /// `num_score_components` dense values or none.
    fn evaluate_in_isolation(
        &self,
        _source: &Phrase,
        _target: &TargetPhrase,
        _scores: &mut ScoreBreakdown,
        _estimated_future: &mut ScoreBreakdown,
    ) {
    }

    /// Scores depending on the sentence and on the spans of the rule's
    /// non-terminal children. `child_labels` is `None` for rules without
    /// non-terminals.
    #[allow(clippy::too_many_arguments)]
    fn evaluate_with_source_context(
        &self,
        _input: &Sentence,
        _input_path: &InputPath<'_>,
        _target: &TargetPhrase,
        _child_labels: Option<&[&dyn CellLabel]>,
        _scores: &mut ScoreBreakdown,
        _estimated_future: Option<&mut ScoreBreakdown>,
    ) {
    }

    fn evaluate_when_applied(&self, _hypo: &dyn Hypothesis, _accumulator: &mut ScoreBreakdown) {}

    fn evaluate_when_applied_chart(
        &self,
        _hypo: &dyn ChartHypothesis,
        _accumulator: &mut ScoreBreakdown,
    ) {
    }
}
