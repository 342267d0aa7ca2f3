//! Additive score accumulator shared by all feature functions.
//!
//! Dense scores are keyed by feature name and always have the width the
//! feature declared; sparse scores are keyed by `(feature, name)` so two
//! features may reuse a sparse name without colliding. Every write adds.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::ff::FeatureDescriptor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    dense: BTreeMap<Arc<str>, Vec<f32>>,
    sparse: BTreeMap<(Arc<str>, String), f32>,
}

impl ScoreBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a full dense vector for `ff`.
    ///
    /// Panics if `scores.len()` differs from the feature's declared width:
    /// that is a bug in the feature, not a runtime condition.
    pub fn plus_equals_dense(&mut self, ff: &FeatureDescriptor, scores: &[f32]) {
        let width = ff.num_score_components();
        assert_eq!(
            scores.len(),
            width,
            "feature {} wrote {} dense scores, declared {}",
            ff.name(),
            scores.len(),
            width
        );
        if width == 0 {
            return;
        }
        let slot = self
            .dense
            .entry(ff.shared_name())
            .or_insert_with(|| vec![0.0; width]);
        for (acc, s) in slot.iter_mut().zip(scores) {
            *acc += s;
        }
    }

    pub fn plus_equals_sparse(&mut self, ff: &FeatureDescriptor, name: &str, value: f32) {
        *self
            .sparse
            .entry((ff.shared_name(), name.to_string()))
            .or_insert(0.0) += value;
    }

    /// Merge another breakdown into this one.
    pub fn plus_equals(&mut self, other: &ScoreBreakdown) {
        for (name, scores) in &other.dense {
            let slot = self
                .dense
                .entry(Arc::clone(name))
                .or_insert_with(|| vec![0.0; scores.len()]);
            assert_eq!(slot.len(), scores.len(), "dense width mismatch for {name}");
            for (acc, s) in slot.iter_mut().zip(scores) {
                *acc += s;
            }
        }
        for (key, value) in &other.sparse {
            *self.sparse.entry(key.clone()).or_insert(0.0) += value;
        }
    }

    pub fn dense(&self, feature: &str) -> Option<&[f32]> {
        self.dense.get(feature).map(Vec::as_slice)
    }

    pub fn sparse(&self, feature: &str, name: &str) -> Option<f32> {
        self.sparse
            .get(&(Arc::<str>::from(feature), name.to_string()))
            .copied()
    }

    /// True if `feature` has written anything, dense or sparse.
    pub fn contributes(&self, feature: &str) -> bool {
        if self.dense.contains_key(feature) {
            return true;
        }
        // Keys sort by feature first, so the first key at or after
        // `(feature, "")` belongs to `feature` if any does.
        self.sparse
            .range((Arc::<str>::from(feature), String::new())..)
            .next()
            .is_some_and(|((f, _), _)| &**f == feature)
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty() && self.sparse.is_empty()
    }

    /// Log-linear total under `weights`.
    ///
    /// Components without a weight, or with weight zero, are skipped, so a
    /// negative-infinity score under a zero weight does not turn into NaN.
    pub fn weighted_sum(&self, weights: &Weights) -> f32 {
        let mut total = 0.0;
        for (name, scores) in &self.dense {
            let Some(w) = weights.dense.get(&**name) else {
                continue;
            };
            for (s, w) in scores.iter().zip(w) {
                if *w != 0.0 {
                    total += s * w;
                }
            }
        }
        for ((feature, name), value) in &self.sparse {
            if let Some(w) = weights.sparse.get(&sparse_key(feature, name)) {
                if *w != 0.0 {
                    total += value * w;
                }
            }
        }
        total
    }
}

fn sparse_key(feature: &str, name: &str) -> String {
    format!("{feature}_{name}")
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, scores) in &self.dense {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{name}=")?;
            for (i, s) in scores.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{s}")?;
            }
        }
        for ((feature, name), value) in &self.sparse {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}={value}", sparse_key(feature, name))?;
        }
        Ok(())
    }
}

/// Externally supplied model weights.
///
/// Dense weights are keyed by feature name; sparse weights by
/// `"<feature>_<name>"`, the same form `Display` prints.
#[derive(Debug, Clone, Default)]
pub struct Weights {
    pub dense: HashMap<String, Vec<f32>>,
    pub sparse: HashMap<String, f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(name: &str, width: usize) -> FeatureDescriptor {
        FeatureDescriptor::new(name, width)
    }

    #[test]
    fn test_dense_accumulates() {
        let ff = desc("A", 2);
        let mut sb = ScoreBreakdown::new();
        sb.plus_equals_dense(&ff, &[1.0, 2.0]);
        sb.plus_equals_dense(&ff, &[0.5, -1.0]);
        assert_eq!(sb.dense("A"), Some(&[1.5, 1.0][..]));
        assert!(sb.contributes("A"));
        assert!(!sb.contributes("B"));
    }

    #[test]
    #[should_panic(expected = "declared 2")]
    fn test_dense_width_mismatch_panics() {
        let ff = desc("A", 2);
        let mut sb = ScoreBreakdown::new();
        sb.plus_equals_dense(&ff, &[1.0]);
    }

    #[test]
    fn test_sparse_namespaced_per_feature() {
        let a = desc("A", 0);
        let b = desc("B", 0);
        let mut sb = ScoreBreakdown::new();
        sb.plus_equals_sparse(&a, "x", 1.0);
        sb.plus_equals_sparse(&b, "x", 3.0);
        sb.plus_equals_sparse(&a, "x", 1.0);
        assert_eq!(sb.sparse("A", "x"), Some(2.0));
        assert_eq!(sb.sparse("B", "x"), Some(3.0));
        assert_eq!(sb.sparse("A", "y"), None);
    }

    #[test]
    fn test_sparse_lookup_with_shared_prefixes() {
        let a = desc("A", 0);
        let ab = desc("AB", 0);
        let b = desc("B", 0);
        let mut sb = ScoreBreakdown::new();
        sb.plus_equals_sparse(&ab, "x", 1.0);
        sb.plus_equals_sparse(&b, "a", 2.0);
        assert!(!sb.contributes("A"));
        assert!(sb.contributes("AB"));
        assert!(sb.contributes("B"));
        assert_eq!(sb.sparse("A", "x"), None);
        assert_eq!(sb.sparse("AB", "x"), Some(1.0));

        sb.plus_equals_sparse(&a, "z", 3.0);
        assert!(sb.contributes("A"));
        assert_eq!(sb.sparse("A", "z"), Some(3.0));
        assert_eq!(sb.sparse("B", "z"), None);
    }

    #[test]
    fn test_merge() {
        let a = desc("A", 1);
        let mut left = ScoreBreakdown::new();
        left.plus_equals_dense(&a, &[1.0]);
        let mut right = ScoreBreakdown::new();
        right.plus_equals_dense(&a, &[2.0]);
        right.plus_equals_sparse(&a, "s", 0.5);
        left.plus_equals(&right);
        assert_eq!(left.dense("A"), Some(&[3.0][..]));
        assert_eq!(left.sparse("A", "s"), Some(0.5));
        assert_eq!(left.to_string(), "A=3 A_s=0.5");
    }

    #[test]
    fn test_weighted_sum_skips_zero_weights() {
        let a = desc("A", 2);
        let mut sb = ScoreBreakdown::new();
        sb.plus_equals_dense(&a, &[f32::NEG_INFINITY, 2.0]);
        sb.plus_equals_sparse(&a, "s", 4.0);

        let mut weights = Weights::default();
        weights.dense.insert("A".into(), vec![0.0, 0.5]);
        weights.sparse.insert("A_s".into(), 0.25);
        assert_eq!(sb.weighted_sum(&weights), 2.0);

        weights.dense.insert("A".into(), vec![1.0, 0.5]);
        assert_eq!(sb.weighted_sum(&weights), f32::NEG_INFINITY);
    }
}
