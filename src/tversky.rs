//! Tversky loss over flattened probabilities.
//!
//! Generalizes the Dice loss with independent penalties for false positives
//! and false negatives:
//! ```text
//! TP    = sum(prob * target)
//! FP    = sum((1 - target) * prob)
//! FN    = sum(target * (1 - prob))
//! score = (TP + smooth) / (TP + alpha * FP + beta * FN + smooth)
//! Loss  = 1 - score
//! ```
//! `alpha = beta = 0.5` recovers the Dice formulation; raising `beta`
//! trades precision for recall. Always returns a single scalar over the
//! whole batch.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{activation::sigmoid, backend::Backend, Tensor},
};

use crate::error::{check_equal_shapes, LossResult};

/// Configuration for creating a [Tversky loss](TverskyLoss).
#[derive(Config, Debug)]
pub struct TverskyLossConfig {
    /// Penalty for false positives. Default: 0.3
    #[config(default = 0.3)]
    pub alpha: f64,

    /// Penalty for false negatives; higher values favor recall.
    /// Default: 0.7
    #[config(default = 0.7)]
    pub beta: f64,

    /// Laplace smoothing constant keeping the ratio defined when both
    /// probabilities and targets are all zero. Must be positive;
    /// non-positive values give undefined results. Default: 1.0
    #[config(default = 1.0)]
    pub smooth: f64,
}

impl TverskyLossConfig {
    /// Initialize [Tversky loss](TverskyLoss).
    pub fn init(&self) -> TverskyLoss {
        TverskyLoss {
            alpha: self.alpha,
            beta: self.beta,
            smooth: self.smooth,
        }
    }
}

/// Tversky loss computed from logits.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct TverskyLoss {
    /// Penalty for false positives.
    pub alpha: f64,
    /// Penalty for false negatives.
    pub beta: f64,
    /// Laplace smoothing constant.
    pub smooth: f64,
}

impl Default for TverskyLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for TverskyLoss {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content
            .add("alpha", &self.alpha)
            .add("beta", &self.beta)
            .add("smooth", &self.smooth)
            .optional()
    }
}

impl TverskyLoss {
    /// Create a new Tversky loss with default configuration.
    pub fn new() -> Self {
        TverskyLossConfig::new().init()
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
        let false_pos = ((targets.ones_like() - targets.clone()) * probs.clone()).sum();
        let false_neg = (targets * (probs.ones_like() - probs)).sum();

        let denominator = true_pos.clone()
            + false_pos.mul_scalar(self.alpha)
            + false_neg.mul_scalar(self.beta);
        let score = true_pos.add_scalar(self.smooth) / denominator.add_scalar(self.smooth);
        Ok(score.ones_like() - score)
    }
}
