//! Numerically stable binary cross-entropy from logits.
//!
//! The unreduced loss is the standard stable form:
//! ```text
//! bce = max(x, 0) - x * y + log(1 + exp(-|x|))
//! ```
//! which never exponentiates a large positive argument, so it stays finite
//! for logits far beyond the range where a naive `-log(sigmoid(x))` would
//! overflow.

use burn::tensor::{backend::Backend, Tensor};

use crate::error::{check_equal_shapes, LossResult};

/// Compute element-wise binary cross-entropy from logits.
///
/// Targets are expected in `[0, 1]`; soft labels are accepted. No reduction
/// is applied.
///
/// # Shapes
///
/// - logits: `[...dims]` (any shape)
/// - targets: `[...dims]` (same shape as logits)
/// - output: `[...dims]` (same shape as inputs)
pub fn bce_with_logits<const D: usize, B: Backend>(
    logits: Tensor<B, D>,
    targets: Tensor<B, D>,
) -> LossResult<Tensor<B, D>> {
    check_equal_shapes(&logits, &targets)?;
    Ok(bce_unchecked(logits, targets))
}

/// Stable BCE without the shape check, for callers that already validated.
pub(crate) fn bce_unchecked<const D: usize, B: Backend>(
    logits: Tensor<B, D>,
    targets: Tensor<B, D>,
) -> Tensor<B, D> {
    // max(x, 0) - x*y + log(1 + exp(-abs(x)))
    let term1 = logits.clone().clamp_min(0.0) - logits.clone() * targets;
    let term2 = (-logits.abs()).exp().add_scalar(1.0).log();
    term1 + term2
}

/// Stable BCE with a multiplicative weight on the positive term.
///
/// Standard `pos_weight` semantics: the weight scales only the
/// `-y * log(sigmoid(x))` term, leaving the negative term untouched:
/// ```text
/// bce = (1 - y) * x + (1 + (w - 1) * y) * (log(1 + exp(-|x|)) + max(-x, 0))
/// ```
/// With `w = 1` this reduces exactly to the unweighted form. The weight
/// broadcasts over the trailing input dimension; callers validate it with
/// `check_weight_broadcast` beforehand.
pub(crate) fn bce_pos_weighted_unchecked<const D: usize, B: Backend>(
    logits: Tensor<B, D>,
    targets: Tensor<B, D>,
    pos_weight: Tensor<B, 1>,
) -> Tensor<B, D> {
    let weight = pos_weight.unsqueeze::<D>();
    let log_weight = (targets.clone() * weight.sub_scalar(1.0)).add_scalar(1.0);
    let softplus_neg =
        (-logits.clone().abs()).exp().add_scalar(1.0).log() + (-logits.clone()).clamp_min(0.0);
    (targets.ones_like() - targets) * logits + log_weight * softplus_neg
}
