//! Jaccard (IoU) loss over flattened probabilities.
//!
//! Computes the intersection-over-union between `sigmoid(logits)` and the
//! targets, both flattened to a single vector, and returns its complement:
//! ```text
//! TP    = sum(prob * target)
//! union = sum(prob) + sum(target) - TP
//! score = (TP + smooth) / (union + smooth)
//! Loss  = 1 - score
//! ```
//! Always returns a single scalar over the whole batch.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{activation::sigmoid, backend::Backend, Tensor},
};

use crate::error::{check_equal_shapes, LossResult};

/// Configuration for creating a [Jaccard loss](JaccardLoss).
#[derive(Config, Debug)]
pub struct JaccardLossConfig {
    /// Laplace smoothing constant keeping the ratio defined when both
    /// probabilities and targets are all zero. Must be positive;
    /// non-positive values give undefined results. Default: 1.0
    #[config(default = 1.0)]
    pub smooth: f64,
}

impl JaccardLossConfig {
    /// Initialize [Jaccard loss](JaccardLoss).
    pub fn init(&self) -> JaccardLoss {
        JaccardLoss {
            smooth: self.smooth,
        }
    }
}

/// Jaccard (IoU) loss computed from logits.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct JaccardLoss {
    /// Laplace smoothing constant.
    pub smooth: f64,
}

impl Default for JaccardLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for JaccardLoss {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content.add("smooth", &self.smooth).optional()
    }
}

impl JaccardLoss {
    /// Create a new Jaccard loss with default configuration.
    pub fn new() -> Self {
        JaccardLossConfig::new().init()
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

        let true_pos = (probs.clone() * targets.clone()).sum();
        // union = sum(p) + sum(t) - intersection
        let union = probs.sum() + targets.sum() - true_pos.clone();

        let score = true_pos.add_scalar(self.smooth) / union.add_scalar(self.smooth);
        Ok(score.ones_like() - score)
    }
}
