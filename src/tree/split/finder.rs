//! Exact threshold search for tree node splitting.

use crate::boosting::labels::AugmentedLabels;
use crate::boosting::strategy::{GradientSums, TreeBuildStrategy};
use crate::core::error::{Result, XGBoostError};
use crate::core::types::{DataSize, FeatureIndex, FeatureValue, Score};
use crate::tree::TreeConfig;
use ndarray::{Array1, ArrayView2};
use rayon::prelude::*;

/// Information about a chosen split point.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    /// Feature index for the split
    pub feature: FeatureIndex,
    /// Samples with `value <= threshold` go left
    pub threshold: FeatureValue,
    /// Split gain reported by the strategy
    pub gain: f64,
    /// Samples sent left
    pub left_count: DataSize,
    /// Samples sent right
    pub right_count: DataSize,
}

impl SplitInfo {
    /// Strictly better gain; ties keep the earlier candidate.
    pub fn is_better_than(&self, other: &SplitInfo) -> bool {
        self.gain > other.gain
    }
}

/// Searches the best (feature, threshold) pair for one node.
#[derive(Debug)]
pub struct SplitFinder<'a, S> {
    config: &'a TreeConfig,
    strategy: &'a S,
}

impl<'a, S: TreeBuildStrategy> SplitFinder<'a, S> {
    pub fn new(config: &'a TreeConfig, strategy: &'a S) -> Self {
        SplitFinder { config, strategy }
    }

    /// Best split of the samples `indices`, if any candidate is usable.
    ///
    /// Features are evaluated in parallel; the per-feature winners are then
    /// reduced in ascending feature order so the result does not depend on
    /// thread scheduling.
    pub fn find_best_split(
        &self,
        features: &ArrayView2<'_, FeatureValue>,
        labels: &AugmentedLabels,
        indices: &[usize],
    ) -> Result<Option<SplitInfo>> {
        if indices.len() < 2 * self.config.min_samples_leaf.max(1) {
            return Ok(None);
        }

        let node_labels = labels.select_rows(indices);
        let (row_gradient, row_hessian) = self.strategy.row_statistics(&node_labels.view())?;
        let parent = GradientSums::new(row_gradient.sum(), row_hessian.sum());

        let per_feature: Vec<Result<Option<SplitInfo>>> = (0..features.ncols())
            .into_par_iter()
            .map(|feature| {
                self.best_split_for_feature(features, indices, &row_gradient, &row_hessian, parent, feature)
            })
            .collect();

        let mut best: Option<SplitInfo> = None;
        for candidate in per_feature {
            if let Some(candidate) = candidate? {
                if best.as_ref().map_or(true, |b| candidate.is_better_than(b)) {
                    best = Some(candidate);
                }
            }
        }

        Ok(best)
    }

    /// Single pass over the node's samples sorted by `feature`.
    ///
    /// `row_gradient` and `row_hessian` are indexed by position within
    /// `indices`.
    fn best_split_for_feature(
        &self,
        features: &ArrayView2<'_, FeatureValue>,
        indices: &[usize],
        row_gradient: &Array1<Score>,
        row_hessian: &Array1<Score>,
        parent: GradientSums,
        feature: FeatureIndex,
    ) -> Result<Option<SplitInfo>> {
        let n = indices.len();
        let column = features.column(feature);

        // Positions within the node, ordered by feature value (stable)
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| column[indices[a]].total_cmp(&column[indices[b]]));

        let sorted_values: Vec<FeatureValue> = order.iter().map(|&p| column[indices[p]]).collect();
        let row_sums = |pos: usize| GradientSums::new(row_gradient[order[pos]], row_hessian[order[pos]]);

        // right_sums[i] holds the totals of sorted positions i..n
        let mut right_sums = vec![GradientSums::default(); n + 1];
        for pos in (0..n).rev() {
            right_sums[pos] = right_sums[pos + 1] + row_sums(pos);
        }

        let min_leaf = self.config.min_samples_leaf.max(1);
        let mut left_sums = GradientSums::default();
        let mut best: Option<(usize, f64)> = None;

        // `left_size` samples go left; equal values never straddle the cut
        for left_size in 1..n {
            left_sums += row_sums(left_size - 1);

            if left_size < min_leaf || n - left_size < min_leaf {
                continue;
            }
            if sorted_values[left_size - 1] == sorted_values[left_size] {
                continue;
            }

            match self
                .strategy
                .split_gain_from_sums(parent, left_sums, right_sums[left_size])
            {
                Ok(gain) if !gain.is_finite() => {
                    return Err(XGBoostError::numerical(format!(
                        "Non-finite split gain {} on feature {} at threshold {}",
                        gain,
                        feature,
                        sorted_values[left_size - 1]
                    )));
                }
                Ok(gain) => {
                    if best.map_or(true, |(_, best_gain)| gain > best_gain) {
                        best = Some((left_size, gain));
                    }
                }
                Err(e) if e.is_recoverable() => {
                    log::trace!(
                        "Skipping candidate on feature {} at threshold {}: {}",
                        feature,
                        sorted_values[left_size - 1],
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(best.map(|(left_size, gain)| SplitInfo {
            feature,
            threshold: sorted_values[left_size - 1],
            gain,
            left_count: left_size,
            right_count: n - left_size,
        }))
    }
}
