use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::input_path::InputPath;
use crate::phrase::{Phrase, Sentence, TargetPhrase};
use crate::scores::ScoreBreakdown;
use crate::settings::Settings;

use super::config::{ConfigError, FeatureLine};
use super::non_term_min_span::{self, NonTermMinSpan};
use super::{CellLabel, ChartHypothesis, FeatureFunction, Hypothesis};

/// Builds a feature from its line. The second argument is the name to use
/// when the line has no `name=`.
pub type FeatureFactory = fn(&FeatureLine, &str) -> Result<Box<dyn FeatureFunction>, ConfigError>;

fn non_term_min_span_factory(
    line: &FeatureLine,
    default_name: &str,
) -> Result<Box<dyn FeatureFunction>, ConfigError> {
    Ok(Box::new(NonTermMinSpan::from_line(line, default_name)?))
}

/// Collects features during setup. Consumed by [`RegistryBuilder::build`].
pub struct RegistryBuilder {
    factories: HashMap<String, FeatureFactory>,
    /// Per-type counter for default names (`NonTermMinSpan0`, `NonTermMinSpan1`, ...).
    counters: HashMap<String, usize>,
    names: HashSet<String>,
    functions: Vec<Box<dyn FeatureFunction>>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        let mut builder = Self {
            factories: HashMap::new(),
            counters: HashMap::new(),
            names: HashSet::new(),
            functions: Vec::new(),
        };
        builder.register_factory(non_term_min_span::FEATURE_TYPE, non_term_min_span_factory);
        builder
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `feature_type` constructible from lines. Replaces any earlier
    /// factory for the same type.
    pub fn register_factory(&mut self, feature_type: &str, factory: FeatureFactory) {
        self.factories.insert(feature_type.to_string(), factory);
    }

    /// Parse a line and construct the feature it names.
    pub fn add_line(&mut self, line: &str) -> Result<&mut Self, ConfigError> {
        let line = FeatureLine::parse(line)?;
        let factory = *self
            .factories
            .get(&line.feature_type)
            .ok_or_else(|| ConfigError::UnknownFeature(line.feature_type.clone()))?;
        let index = self.counters.get(&line.feature_type).copied().unwrap_or(0);
        let default_name = format!("{}{}", line.feature_type, index);
        let ff = factory(&line, &default_name)?;
        self.add(ff)?;
        // Rejected lines leave the counter alone.
        self.counters.insert(line.feature_type, index + 1);
        Ok(self)
    }

    /// Add an already-constructed feature.
    pub fn add(&mut self, ff: Box<dyn FeatureFunction>) -> Result<&mut Self, ConfigError> {
        if !self.names.insert(ff.name().to_string()) {
            return Err(ConfigError::DuplicateName(ff.name().to_string()));
        }
        debug!(
            name = ff.name(),
            dense = ff.descriptor().num_score_components(),
            "feature registered"
        );
        self.functions.push(ff);
        Ok(self)
    }

    pub fn build(self) -> FeatureRegistry {
        FeatureRegistry {
            functions: self
                .functions
                .into_iter()
                .map(Arc::<dyn FeatureFunction>::from)
                .collect(),
        }
    }
}

/// The configured, immutable set of feature functions.
///
/// Cheap to clone; clones share the same instances.
#[derive(Clone, Default)]
pub struct FeatureRegistry {
    functions: Vec<Arc<dyn FeatureFunction>>,
}

impl FeatureRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Build every `[[feature]]` line in `settings`. Any bad line fails the
    /// whole setup.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        for feature in &settings.features {
            builder.add_line(&feature.line)?;
        }
        Ok(builder.build())
    }

    pub fn functions(&self) -> &[Arc<dyn FeatureFunction>] {
        &self.functions
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FeatureFunction>> {
        self.functions.iter().find(|ff| ff.name() == name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn evaluate_in_isolation(
        &self,
        source: &Phrase,
        target: &TargetPhrase,
        scores: &mut ScoreBreakdown,
        estimated_future: &mut ScoreBreakdown,
    ) {
        let _span =
            debug_span!("evaluate_in_isolation", features = self.functions.len()).entered();
        for ff in &self.functions {
            ff.evaluate_in_isolation(source, target, scores, estimated_future);
        }
    }

    pub fn evaluate_with_source_context(
        &self,
        input: &Sentence,
        input_path: &InputPath<'_>,
        target: &TargetPhrase,
        child_labels: Option<&[&dyn CellLabel]>,
        scores: &mut ScoreBreakdown,
        mut estimated_future: Option<&mut ScoreBreakdown>,
    ) {
        let _span = debug_span!(
            "evaluate_with_source_context",
            span = %input_path.span(),
            children = child_labels.map_or(0, <[_]>::len)
        )
        .entered();
        for ff in &self.functions {
            ff.evaluate_with_source_context(
                input,
                input_path,
                target,
                child_labels,
                scores,
                estimated_future.as_deref_mut(),
            );
        }
    }

    pub fn evaluate_when_applied(&self, hypo: &dyn Hypothesis, accumulator: &mut ScoreBreakdown) {
        for ff in &self.functions {
            ff.evaluate_when_applied(hypo, accumulator);
        }
    }

    pub fn evaluate_when_applied_chart(
        &self,
        hypo: &dyn ChartHypothesis,
        accumulator: &mut ScoreBreakdown,
    ) {
        for ff in &self.functions {
            ff.evaluate_when_applied_chart(hypo, accumulator);
        }
    }
}
