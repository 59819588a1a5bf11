//! Dice loss over flattened probabilities.
//!
//! Computes the Dice coefficient between `sigmoid(logits)` and the targets,
//! both flattened to a single vector, and returns its complement:
//! ```text
//! TP    = sum(prob * target)
//! score = (2 * TP + smooth) / (sum(prob) + sum(target) + smooth)
//! Loss  = 1 - score
//! ```
//! The whole batch contributes to one statistic, so the result is always a
//! single scalar.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{activation::sigmoid, backend::Backend, Tensor},
};

use crate::error::{check_equal_shapes, LossResult};

/// Configuration for creating a [Dice loss](DiceLoss).
#[derive(Config, Debug)]
pub struct DiceLossConfig {
    /// Laplace smoothing constant keeping the ratio defined when both
    /// probabilities and targets are all zero. Must be positive;
    /// non-positive values give undefined results. Default: 1.0
    #[config(default = 1.0)]
    pub smooth: f64,
}

impl DiceLossConfig {
    /// Initialize [Dice loss](DiceLoss).
    pub fn init(&self) -> DiceLoss {
        DiceLoss {
            smooth: self.smooth,
        }
    }
}

/// Dice loss computed from logits.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct DiceLoss {
    /// Laplace smoothing constant.
    pub smooth: f64,
}

impl Default for DiceLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for DiceLoss {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content.add("smooth", &self.smooth).optional()
    }
}

impl DiceLoss {
    /// Create a new Dice loss with default configuration.
    pub fn new() -> Self {
        DiceLossConfig::new().init()
    }

    /// Compute the criterion on the input tensor.
    ///
    /// # Shapes
    ///
    /// - logits: `[...dims]` (any shape)
    /// - targets: `[...dims]` (same shape as logits)
    /// - output: `[1]`
    pub fn forward<const D: usize, B: Backend>(
        &self,
        logits: Tensor<B, D>,
        targets: Tensor<B, D>,
    ) -> LossResult<Tensor<B, 1>> {
        check_equal_shapes(&logits, &targets)?;

        let probs: Tensor<B, 1> = sigmoid(logits).reshape([-1]);
        let targets: Tensor<B, 1> = targets.reshape([-1]);

        let intersection = (probs.clone() * targets.clone()).sum();
        let union = probs.sum() + targets.sum();

        let score = intersection.mul_scalar(2.0).add_scalar(self.smooth)
            / union.add_scalar(self.smooth);
        Ok(score.ones_like() - score)
    }
}
