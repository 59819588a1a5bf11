//! Error types shared by every loss in this crate.

use burn::tensor::{backend::Backend, Tensor};
use thiserror::Error;

/// Errors that can occur during loss evaluation.
///
/// Every check runs before any arithmetic, so a failed evaluation performs
/// no tensor work.
#[derive(Debug, Error)]
pub enum LossError {
    /// Logits and targets have different shapes.
    #[error("incompatible tensor shapes: logits shape {logits:?} does not match targets shape {targets:?}")]
    ShapeMismatch {
        logits: Vec<usize>,
        targets: Vec<usize>,
    },

    /// A positive-class weight cannot broadcast against the inputs.
    #[error("positive weight of length {len} cannot broadcast against logits shape {logits:?}")]
    WeightBroadcast { len: usize, logits: Vec<usize> },
}

/// A specialized `Result` type for loss evaluation.
pub type LossResult<T> = Result<T, LossError>;

pub(crate) fn check_equal_shapes<const D: usize, B: Backend>(
    logits: &Tensor<B, D>,
    targets: &Tensor<B, D>,
) -> LossResult<()> {
    let logits_dims = logits.dims();
    let target_dims = targets.dims();
    if logits_dims == target_dims {
        Ok(())
    } else {
        Err(LossError::ShapeMismatch {
            logits: logits_dims.to_vec(),
            targets: target_dims.to_vec(),
        })
    }
}

/// A weight broadcasts when it is a single value or matches the trailing
/// input dimension.
pub(crate) fn check_weight_broadcast<const D: usize, B: Backend>(
    weight: &Tensor<B, 1>,
    logits: &Tensor<B, D>,
) -> LossResult<()> {
    let len = weight.dims()[0];
    if len == 1 || len == logits.dims()[D - 1] {
        Ok(())
    } else {
        Err(LossError::WeightBroadcast {
            len,
            logits: logits.dims().to_vec(),
        })
    }
}
