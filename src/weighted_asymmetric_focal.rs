//! Asymmetric focal loss with an optional positive-class weight.
//!
//! Identical to [`AsymmetricFocalLoss`](crate::AsymmetricFocalLoss), except
//! that an optional multiplicative weight is applied to positive elements
//! before reduction:
//! ```text
//! loss = w * alpha * (1 - pt)^gamma_pos * bce    for y > 0.5
//! loss = (1 - alpha) * (1 - pt)^gamma_neg * bce  for y <= 0.5
//! ```
//! The weight lets a caller inject a class-balancing factor without
//! re-deriving the focal formula. It is off by default.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    nn::loss::Reduction,
    tensor::{backend::Backend, Tensor},
};

use crate::{
    bce::bce_unchecked,
    error::{check_equal_shapes, check_weight_broadcast, LossResult},
};

/// Configuration for creating a
/// [Weighted asymmetric focal loss](WeightedAsymmetricFocalLoss).
#[derive(Config, Debug)]
pub struct WeightedAsymmetricFocalLossConfig {
    /// Weighting factor for positive elements; negatives get `1 - alpha`.
    /// Default: 0.25
    #[config(default = 0.25)]
    pub alpha: f64,

    /// Focusing exponent for positive elements. Default: 0.5
    #[config(default = 0.5)]
    pub gamma_pos: f64,

    /// Focusing exponent for negative elements. Default: 2.0
    #[config(default = 2.0)]
    pub gamma_neg: f64,

    /// Optional multiplicative weight for positive elements. A one-element
    /// vector applies uniformly; a longer vector broadcasts over the
    /// trailing input dimension.
    pub pos_weight: Option<Vec<f64>>,
}

impl WeightedAsymmetricFocalLossConfig {
    /// Initialize
    /// [Weighted asymmetric focal loss](WeightedAsymmetricFocalLoss).
    pub fn init<B: Backend>(&self, device: &B::Device) -> WeightedAsymmetricFocalLoss<B> {
        WeightedAsymmetricFocalLoss {
            alpha: self.alpha,
            gamma_pos: self.gamma_pos,
            gamma_neg: self.gamma_neg,
            pos_weight: self
                .pos_weight
                .as_ref()
                .map(|weight| Tensor::from_floats(weight.as_slice(), device)),
        }
    }
}

/// Asymmetric focal loss with an optional positive-class weight.
///
/// The weight tensor is realigned to the device of the incoming logits on
/// every call; realigning an already-aligned weight is a no-op.
#[derive(Module, Debug)]
#[module(custom_display)]
pub struct WeightedAsymmetricFocalLoss<B: Backend> {
    /// Weighting factor for positive elements.
    pub alpha: f64,
    /// Focusing exponent for positive elements.
    pub gamma_pos: f64,
    /// Focusing exponent for negative elements.
    pub gamma_neg: f64,
    /// Optional multiplicative weight for positive elements.
    pub pos_weight: Option<Tensor<B, 1>>,
}

impl<B: Backend> ModuleDisplay for WeightedAsymmetricFocalLoss<B> {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content
            .add("alpha", &self.alpha)
            .add("gamma_pos", &self.gamma_pos)
            .add("gamma_neg", &self.gamma_neg)
            .optional()
    }
}

impl<B: Backend> WeightedAsymmetricFocalLoss<B> {
    /// Create a new weighted asymmetric focal loss with default
    /// configuration (no positive weight).
    pub fn new(device: &B::Device) -> Self {
        WeightedAsymmetricFocalLossConfig::new().init(device)
    }

    /// Compute the criterion on the input tensor with reduction.
    ///
    /// # Shapes
    ///
    /// - logits: `[...dims]` (any shape)
    /// - targets: `[...dims]` (same shape as logits)
    /// - output: `[1]`
    pub fn forward<const D: usize>(
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
    pub fn forward_no_reduction<const D: usize>(
        &self,
        logits: Tensor<B, D>,
        targets: Tensor<B, D>,
    ) -> LossResult<Tensor<B, D>> {
        check_equal_shapes(&logits, &targets)?;
        if let Some(weight) = &self.pos_weight {
            check_weight_broadcast(weight, &logits)?;
        }

        let device = logits.device();
        let bce = bce_unchecked(logits, targets.clone());
        let pt = bce.clone().neg().exp();
        let modulating = pt.ones_like() - pt;

        let mut pos = modulating
            .clone()
            .powf_scalar(self.gamma_pos)
            .mul_scalar(self.alpha)
            * bce.clone();
        if let Some(weight) = &self.pos_weight {
            pos = pos * weight.clone().to_device(&device).unsqueeze::<D>();
        }
        let neg = modulating
            .powf_scalar(self.gamma_neg)
            .mul_scalar(1.0 - self.alpha)
            * bce;

        let pos_mask = targets.greater_elem(0.5);
        Ok(neg.mask_where(pos_mask, pos))
    }
}
