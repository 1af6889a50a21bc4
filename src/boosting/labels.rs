//! Augmented label blocks passed from the boosting loop to the tree builder.
//!
//! Every round hands the builder the ground truth together with the running
//! prediction for the same samples. Both halves are `n x k`; the packed form
//! used at array boundaries places truth in the left `k` columns and the
//! prediction in the right `k` columns.

use crate::core::error::{Result, XGBoostError};
use crate::core::types::Score;
use ndarray::{concatenate, s, Array2, ArrayView2, Axis};
use std::ops::Range;

/// Owned pair of truth and running prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedLabels {
    truth: Array2<Score>,
    prediction: Array2<Score>,
}

impl AugmentedLabels {
    /// Pairs `truth` with `prediction`; both must have the same shape.
    pub fn new(truth: Array2<Score>, prediction: Array2<Score>) -> Result<Self> {
        if truth.dim() != prediction.dim() {
            return Err(XGBoostError::shape_mismatch(
                format!("prediction of shape {:?}", truth.dim()),
                format!("{:?}", prediction.dim()),
            ));
        }
        Ok(AugmentedLabels { truth, prediction })
    }

    /// Builds labels from a packed `n x 2k` block.
    pub fn from_concatenated(block: ArrayView2<'_, Score>) -> Result<Self> {
        let (truth, prediction) = split_augmented(block)?;
        Ok(AugmentedLabels {
            truth: truth.to_owned(),
            prediction: prediction.to_owned(),
        })
    }

    /// Packs truth and prediction side by side into `n x 2k`.
    pub fn to_concatenated(&self) -> Array2<Score> {
        let mut packed = Array2::zeros((self.num_samples(), self.width()));
        let k = self.num_outputs();
        packed.slice_mut(s![.., ..k]).assign(&self.truth);
        packed.slice_mut(s![.., k..]).assign(&self.prediction);
        packed
    }

    pub fn truth(&self) -> ArrayView2<'_, Score> {
        self.truth.view()
    }

    pub fn prediction(&self) -> ArrayView2<'_, Score> {
        self.prediction.view()
    }

    /// Number of samples (rows).
    pub fn num_samples(&self) -> usize {
        self.truth.nrows()
    }

    /// Number of label columns `k`.
    pub fn num_outputs(&self) -> usize {
        self.truth.ncols()
    }

    /// Width of the packed form, always `2k`.
    pub fn width(&self) -> usize {
        2 * self.num_outputs()
    }

    /// Borrowed view of both halves.
    pub fn view(&self) -> LabelBlock<'_> {
        LabelBlock {
            truth: self.truth.view(),
            prediction: self.prediction.view(),
        }
    }

    /// Copies the given rows, in order, into a new label block.
    pub fn select_rows(&self, indices: &[usize]) -> AugmentedLabels {
        AugmentedLabels {
            truth: self.truth.select(Axis(0), indices),
            prediction: self.prediction.select(Axis(0), indices),
        }
    }

    /// Gives back the owned halves.
    pub fn into_parts(self) -> (Array2<Score>, Array2<Score>) {
        (self.truth, self.prediction)
    }
}

/// Borrowed truth/prediction pair over a contiguous range of samples.
#[derive(Debug, Clone, Copy)]
pub struct LabelBlock<'a> {
    truth: ArrayView2<'a, Score>,
    prediction: ArrayView2<'a, Score>,
}

impl<'a> LabelBlock<'a> {
    pub fn new(truth: ArrayView2<'a, Score>, prediction: ArrayView2<'a, Score>) -> Result<Self> {
        if truth.dim() != prediction.dim() {
            return Err(XGBoostError::shape_mismatch(
                format!("prediction of shape {:?}", truth.dim()),
                format!("{:?}", prediction.dim()),
            ));
        }
        Ok(LabelBlock { truth, prediction })
    }

    pub fn truth(&self) -> ArrayView2<'a, Score> {
        self.truth
    }

    pub fn prediction(&self) -> ArrayView2<'a, Score> {
        self.prediction
    }

    pub fn num_samples(&self) -> usize {
        self.truth.nrows()
    }

    pub fn num_outputs(&self) -> usize {
        self.truth.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.truth.nrows() == 0
    }

    /// Sub-block covering `rows`.
    pub fn slice_rows(&self, rows: Range<usize>) -> LabelBlock<'a> {
        LabelBlock {
            truth: self.truth.slice_move(s![rows.clone(), ..]),
            prediction: self.prediction.slice_move(s![rows, ..]),
        }
    }
}

/// Splits a packed `n x 2k` block into its `(truth, prediction)` halves.
///
/// An odd column count cannot be split and is rejected.
pub fn split_augmented(
    block: ArrayView2<'_, Score>,
) -> Result<(ArrayView2<'_, Score>, ArrayView2<'_, Score>)> {
    let width = block.ncols();
    if width % 2 != 0 {
        return Err(XGBoostError::shape_mismatch(
            "an even number of label columns",
            format!("{} columns", width),
        ));
    }

    let (truth, prediction) = block.split_at(Axis(1), width / 2);
    Ok((truth, prediction))
}

/// Packs `truth` and `prediction` side by side.
pub fn concat_augmented<'a>(
    truth: ArrayView2<'a, Score>,
    prediction: ArrayView2<'a, Score>,
) -> Result<Array2<Score>> {
    if truth.dim() != prediction.dim() {
        return Err(XGBoostError::shape_mismatch(
            format!("prediction of shape {:?}", truth.dim()),
            format!("{:?}", prediction.dim()),
        ));
    }

    concatenate(Axis(1), &[truth, prediction])
        .map_err(|e| XGBoostError::internal(format!("Failed to pack labels: {}", e)))
}
