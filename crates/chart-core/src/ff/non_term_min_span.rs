use tracing::debug;

use crate::input_path::InputPath;
use crate::phrase::{Phrase, Sentence, TargetPhrase};
use crate::scores::ScoreBreakdown;

use super::config::{scan, ConfigError, FeatureLine};
use super::{
    CellLabel, ChartHypothesis, FeatureConfigurator, FeatureDescriptor, FeatureFunction,
    Hypothesis,
};

pub const FEATURE_TYPE: &str = "NonTermMinSpan";
const NUM_SCORE_COMPONENTS: usize = 2;
const DEFAULT_MIN_SPAN: usize = 2;

/// Constant scores written in isolation, independent of the rule.
const ISOLATION_DENSE: [f32; NUM_SCORE_COMPONENTS] = [1.5, 0.3];
const ISOLATION_SPARSE_NAME: &str = "sparse-name";
const ISOLATION_SPARSE_VALUE: f32 = 2.4;

/// Rejects rule applications whose non-terminal children cover fewer than
/// `min_span` source words.
///
/// A short child gets a dense score of negative infinity in the first
/// component; otherwise the feature stays silent in the context phase.
#[derive(Debug, Clone)]
pub struct NonTermMinSpan {
    descriptor: FeatureDescriptor,
    min_span: usize,
}

impl NonTermMinSpan {
    pub fn builder(name: &str) -> NonTermMinSpanBuilder {
        NonTermMinSpanBuilder {
            descriptor: FeatureDescriptor::new(name, NUM_SCORE_COMPONENTS),
            min_span: DEFAULT_MIN_SPAN,
        }
    }

    /// Build from a configuration line. `default_name` is used unless the
    /// line sets `name=`.
    pub fn from_line(line: &FeatureLine, default_name: &str) -> Result<Self, ConfigError> {
        let mut builder = Self::builder(default_name);
        builder.read_parameters(line)?;
        builder.build()
    }

    pub fn min_span(&self) -> usize {
        self.min_span
    }
}

pub struct NonTermMinSpanBuilder {
    descriptor: FeatureDescriptor,
    min_span: usize,
}

impl NonTermMinSpanBuilder {
    pub fn min_span(mut self, min_span: usize) -> Self {
        self.min_span = min_span;
        self
    }

    pub fn build(self) -> Result<NonTermMinSpan, ConfigError> {
        if self.min_span == 0 {
            return Err(ConfigError::InvalidValue {
                feature: self.descriptor.name().to_string(),
                key: "min-span".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(NonTermMinSpan {
            descriptor: self.descriptor,
            min_span: self.min_span,
        })
    }
}

impl FeatureConfigurator for NonTermMinSpanBuilder {
    fn descriptor_mut(&mut self) -> &mut FeatureDescriptor {
        &mut self.descriptor
    }

    fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if key == "min-span" {
            self.min_span = scan(self.descriptor.name(), key, value)?;
            Ok(())
        } else {
            self.descriptor.set_base_parameter(key, value)
        }
    }
}

impl FeatureFunction for NonTermMinSpan {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn evaluate_in_isolation(
        &self,
        _source: &Phrase,
        _target: &TargetPhrase,
        scores: &mut ScoreBreakdown,
        _estimated_future: &mut ScoreBreakdown,
    ) {
        scores.plus_equals_dense(&self.descriptor, &ISOLATION_DENSE);
        scores.plus_equals_sparse(
            &self.descriptor,
            ISOLATION_SPARSE_NAME,
            ISOLATION_SPARSE_VALUE,
        );
    }

    fn evaluate_with_source_context(
        &self,
        _input: &Sentence,
        _input_path: &InputPath<'_>,
        target: &TargetPhrase,
        child_labels: Option<&[&dyn CellLabel]>,
        scores: &mut ScoreBreakdown,
        _estimated_future: Option<&mut ScoreBreakdown>,
    ) {
        if target.arity == 0 && child_labels.is_none() {
            return;
        }
        let children = child_labels
            .expect("NonTermMinSpan needs child labels for rules with non-terminals");

        for (index, child) in children.iter().enumerate() {
            let coverage = child.coverage();
            if coverage.len() < self.min_span {
                debug!(
                    feature = self.descriptor.name(),
                    index,
                    label = child.non_terminal(),
                    %coverage,
                    min_span = self.min_span,
                    "child span too short"
                );
                let mut rejected = [0.0; NUM_SCORE_COMPONENTS];
                rejected[0] = f32::NEG_INFINITY;
                scores.plus_equals_dense(&self.descriptor, &rejected);
                return;
            }
        }
    }

    fn evaluate_when_applied(&self, _hypo: &dyn Hypothesis, _accumulator: &mut ScoreBreakdown) {}

    fn evaluate_when_applied_chart(
        &self,
        _hypo: &dyn ChartHypothesis,
        _accumulator: &mut ScoreBreakdown,
    ) {
    }
}
