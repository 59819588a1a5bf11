//! Focal loss for imbalanced binary classification.
//!
//! Down-weights well-classified elements so that training concentrates on
//! hard examples. Computed from logits via the stable BCE identity:
//! ```text
//! bce   = max(x, 0) - x * y + log(1 + exp(-|x|))
//! pt    = exp(-bce)
//! focal = alpha * (1 - pt)^gamma * bce
//! ```

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    nn::loss::Reduction,
    tensor::{backend::Backend, Tensor},
};

use crate::{
    bce::bce_unchecked,
    error::{check_equal_shapes, LossResult},
};

/// Configuration for creating a [Focal loss](FocalLoss).
#[derive(Config, Debug)]
pub struct FocalLossConfig {
    /// Weighting factor for the rare class, in `[0, 1]`. Default: 0.25
    #[config(default = 0.25)]
    pub alpha: f64,

    /// Focusing exponent; higher values concentrate the loss on hard
    /// examples. Default: 2.0
    #[config(default = 2.0)]
    pub gamma: f64,
}

impl FocalLossConfig {
    /// Initialize [Focal loss](FocalLoss).
    pub fn init(&self) -> FocalLoss {
        FocalLoss {
            alpha: self.alpha,
            gamma: self.gamma,
        }
    }
}

/// Focal loss computed from logits.
///
/// With `gamma = 0` the focusing term vanishes and the loss degenerates to
/// plain alpha-weighted binary cross-entropy. Parameter ranges are not
/// validated: `alpha` outside `[0, 1]` or a negative `gamma` still
/// evaluate, with undefined usefulness.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct FocalLoss {
    /// Weighting factor for the rare class.
    pub alpha: f64,
    /// Focusing exponent.
    pub gamma: f64,
}

impl Default for FocalLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for FocalLoss {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content
            .add("alpha", &self.alpha)
            .add("gamma", &self.gamma)
            .optional()
    }
}

impl FocalLoss {
    /// Create a new focal loss with default configuration.
    pub fn new() -> Self {
        FocalLossConfig::new().init()
    }

    /// Compute the criterion on the input tensor with reduction.
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
        reduction: Reduction,
    ) -> LossResult<Tensor<B, 1>> {
        let loss = self.forward_no_reduction(logits, targets)?;
        Ok(match reduction {
            Reduction::Mean | Reduction::Auto => loss.mean(),
            Reduction::Sum => loss.sum(),
        })
    }

    /// Compute the criterion on the input tensor without reduction.
    ///
    /// # Shapes
    ///
    /// - logits: `[...dims]` (any shape)
    /// - targets: `[...dims]` (same shape as logits)
    /// - output: `[...dims]` (same shape as inputs)
    pub fn forward_no_reduction<const D: usize, B: Backend>(
        &self,
        logits: Tensor<B, D>,
        targets: Tensor<B, D>,
    ) -> LossResult<Tensor<B, D>> {
        check_equal_shapes(&logits, &targets)?;

        let bce = bce_unchecked(logits, targets);
        // pt = exp(-bce) recovers the probability of the correct class
        // without a second, less stable sigmoid pass.
        let pt = bce.clone().neg().exp();
        let modulating = (pt.ones_like() - pt).powf_scalar(self.gamma);
        Ok(modulating.mul_scalar(self.alpha) * bce)
    }
}
