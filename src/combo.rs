//! Combined BCE + Tversky loss.
//!
//! Weighted sum of a mean-reduced binary cross-entropy term and a
//! [`TverskyLoss`] term:
//! ```text
//! Loss = bce_weight * mean(bce) + tversky_weight * tversky
//! ```
//! The BCE term keeps the gradient smooth and well conditioned everywhere;
//! the Tversky term directly optimizes the overlap statistic but its
//! gradient degenerates when probability and target mass both vanish, so
//! the combination stabilizes training while targeting the evaluation
//! metric. The BCE term is deliberately the plain (non-focal) form.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{backend::Backend, Tensor},
};

use crate::{
    bce::{bce_pos_weighted_unchecked, bce_unchecked},
    error::{check_equal_shapes, check_weight_broadcast, LossResult},
    tversky::{TverskyLoss, TverskyLossConfig},
};

/// Configuration for creating a [Combo loss](ComboLoss).
#[derive(Config, Debug)]
pub struct ComboLossConfig {
    /// Weight of the cross-entropy term. Default: 1.0
    #[config(default = 1.0)]
    pub bce_weight: f64,

    /// Weight of the Tversky term. Default: 1.0
    #[config(default = 1.0)]
    pub tversky_weight: f64,

    /// False-positive penalty of the Tversky term. Default: 0.3
    #[config(default = 0.3)]
    pub alpha: f64,

    /// False-negative penalty of the Tversky term. Default: 0.7
    #[config(default = 0.7)]
    pub beta: f64,

    /// Optional positive-class weight for the cross-entropy term. A
    /// one-element vector applies uniformly; a longer vector broadcasts
    /// over the trailing input dimension.
    pub pos_weight: Option<Vec<f64>>,
}

impl ComboLossConfig {
    /// Initialize [Combo loss](ComboLoss).
    pub fn init<B: Backend>(&self, device: &B::Device) -> ComboLoss<B> {
        ComboLoss {
            bce_weight: self.bce_weight,
            tversky_weight: self.tversky_weight,
            pos_weight: self
                .pos_weight
                .as_ref()
                .map(|weight| Tensor::from_floats(weight.as_slice(), device)),
            tversky: TverskyLossConfig::new()
                .with_alpha(self.alpha)
                .with_beta(self.beta)
                .init(),
        }
    }
}

/// Combined BCE + Tversky loss computed from logits.
///
/// The positive weight, when present, follows the standard `pos_weight`
/// convention of weighted cross-entropy (it scales only the positive
/// log-term) and is realigned to the device of the incoming logits on every
/// call; realigning an already-aligned weight is a no-op.
#[derive(Module, Debug)]
#[module(custom_display)]
pub struct ComboLoss<B: Backend> {
    /// Weight of the cross-entropy term.
    pub bce_weight: f64,
    /// Weight of the Tversky term.
    pub tversky_weight: f64,
    /// Optional positive-class weight for the cross-entropy term.
    pub pos_weight: Option<Tensor<B, 1>>,
    /// Tversky criterion for the overlap term.
    pub tversky: TverskyLoss,
}

impl<B: Backend> ModuleDisplay for ComboLoss<B> {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content
            .add("bce_weight", &self.bce_weight)
            .add("tversky_weight", &self.tversky_weight)
            .add("tversky", &self.tversky)
            .optional()
    }
}

impl<B: Backend> ComboLoss<B> {
    /// Create a new combo loss with default configuration.
    pub fn new(device: &B::Device) -> Self {
        ComboLossConfig::new().init(device)
    }

    /// Compute the criterion on the input tensor.
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
    ) -> LossResult<Tensor<B, 1>> {
        check_equal_shapes(&logits, &targets)?;

        let bce = match &self.pos_weight {
            Some(weight) => {
                check_weight_broadcast(weight, &logits)?;
                let weight = weight.clone().to_device(&logits.device());
                bce_pos_weighted_unchecked(logits.clone(), targets.clone(), weight).mean()
            }
            None => bce_unchecked(logits.clone(), targets.clone()).mean(),
        };
        let tversky = self.tversky.forward(logits, targets)?;

        Ok(bce.mul_scalar(self.bce_weight) + tversky.mul_scalar(self.tversky_weight))
    }
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::{Autodiff, NdArray},
        tensor::{cast::ToElement, TensorData, Tolerance, Transaction},
    };

    use super::*;
    use crate::{bce::bce_with_logits, error::LossError, tests::TestBackend};

    fn sample_batch() -> ([[f32; 3]; 2], [[f32; 3]; 2]) {
        (
            [[1.2, -0.7, 3.0], [-2.5, 0.0, 0.4]],
            [[1.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
        )
    }

    #[test]
    fn combo_loss_bce_only_equals_mean_bce() {
        let device = Default::default();
        let loss = ComboLossConfig::new()
            .with_bce_weight(1.0)
            .with_tversky_weight(0.0)
            .init::<TestBackend>(&device);

        let (logits_values, target_values) = sample_batch();
        let logits =
            Tensor::<TestBackend, 2>::from_data(TensorData::from(logits_values), &device);
        let targets =
            Tensor::<TestBackend, 2>::from_data(TensorData::from(target_values), &device);

        let result = loss.forward(logits.clone(), targets.clone()).unwrap();
        let expected = bce_with_logits(logits, targets).unwrap().mean();

        let [result_data, expected_data] = Transaction::default()
            .register(result)
            .register(expected)
            .execute()
            .try_into()
            .expect("Correct amount of tensor data");

        result_data.assert_approx_eq::<f32>(&expected_data, Tolerance::default());
    }

    #[test]
    fn combo_loss_tversky_only_equals_tversky() {
        let device = Default::default();
        let loss = ComboLossConfig::new()
            .with_bce_weight(0.0)
            .with_tversky_weight(1.0)
            .with_alpha(0.3)
            .with_beta(0.7)
            .init::<TestBackend>(&device);
        let tversky = TverskyLossConfig::new().with_alpha(0.3).with_beta(0.7).init();

        let (logits_values, target_values) = sample_batch();
        let logits =
            Tensor::<TestBackend, 2>::from_data(TensorData::from(logits_values), &device);
        let targets =
            Tensor::<TestBackend, 2>::from_data(TensorData::from(target_values), &device);

        let result = loss.forward(logits.clone(), targets.clone()).unwrap();
        let expected = tversky.forward(logits, targets).unwrap();

        let [result_data, expected_data] = Transaction::default()
            .register(result)
            .register(expected)
            .execute()
            .try_into()
            .expect("Correct amount of tensor data");

        result_data.assert_approx_eq::<f32>(&expected_data, Tolerance::default());
    }

    #[test]
    fn combo_loss_is_weighted_sum_of_terms() {
        let device = Default::default();
        let combined = ComboLossConfig::new()
            .with_bce_weight(2.0)
            .with_tversky_weight(3.0)
            .init::<TestBackend>(&device);
        let bce_only = ComboLossConfig::new()
            .with_bce_weight(1.0)
            .with_tversky_weight(0.0)
            .init::<TestBackend>(&device);
        let tversky_only = ComboLossConfig::new()
            .with_bce_weight(0.0)
            .with_tversky_weight(1.0)
            .init::<TestBackend>(&device);

        let (logits_values, target_values) = sample_batch();
        let logits =
            Tensor::<TestBackend, 2>::from_data(TensorData::from(logits_values), &device);
        let targets =
            Tensor::<TestBackend, 2>::from_data(TensorData::from(target_values), &device);

        let result = combined.forward(logits.clone(), targets.clone()).unwrap();
        let expected = bce_only
            .forward(logits.clone(), targets.clone())
            .unwrap()
            .mul_scalar(2.0)
            + tversky_only.forward(logits, targets).unwrap().mul_scalar(3.0);

        let [result_data, expected_data] = Transaction::default()
            .register(result)
            .register(expected)
            .execute()
            .try_into()
            .expect("Correct amount of tensor data");

        result_data.assert_approx_eq::<f32>(&expected_data, Tolerance::default());
    }

    #[test]
    fn combo_loss_unit_pos_weight_equals_unweighted() {
        let device = Default::default();
        let weighted = ComboLossConfig::new()
            .with_pos_weight(Some(vec![1.0]))
            .init::<TestBackend>(&device);
        let unweighted = ComboLoss::<TestBackend>::new(&device);

        let (logits_values, target_values) = sample_batch();
        let logits =
            Tensor::<TestBackend, 2>::from_data(TensorData::from(logits_values), &device);
        let targets =
            Tensor::<TestBackend, 2>::from_data(TensorData::from(target_values), &device);

        let result = weighted.forward(logits.clone(), targets.clone()).unwrap();
        let expected = unweighted.forward(logits, targets).unwrap();

        let [result_data, expected_data] = Transaction::default()
            .register(result)
            .register(expected)
            .execute()
            .try_into()
            .expect("Correct amount of tensor data");

        result_data.assert_approx_eq::<f32>(&expected_data, Tolerance::absolute(1e-6));
    }

    #[test]
    fn combo_loss_pos_weight_raises_cost_of_missed_positives() {
        let device = Default::default();
        let weighted = ComboLossConfig::new()
            .with_pos_weight(Some(vec![5.0]))
            .init::<TestBackend>(&device);
        let unweighted = ComboLoss::<TestBackend>::new(&device);

        // Confident misses on positive targets.
        let logits =
            Tensor::<TestBackend, 1>::from_data(TensorData::from([-3.0, -2.0, -4.0]), &device);
        let targets =
            Tensor::<TestBackend, 1>::from_data(TensorData::from([1.0, 1.0, 1.0]), &device);

        let weighted_value = weighted
            .forward(logits.clone(), targets.clone())
            .unwrap()
            .into_scalar()
            .to_f64();
        let unweighted_value = unweighted
            .forward(logits, targets)
            .unwrap()
            .into_scalar()
            .to_f64();

        assert!(weighted_value > unweighted_value);
    }

    #[test]
    fn combo_loss_unbroadcastable_pos_weight_fails() {
        let device = Default::default();
        let loss = ComboLossConfig::new()
            .with_pos_weight(Some(vec![1.0, 2.0]))
            .init::<TestBackend>(&device);

        let logits = Tensor::<TestBackend, 2>::zeros([2, 3], &device);
        let targets = Tensor::<TestBackend, 2>::ones([2, 3], &device);

        assert!(matches!(
            loss.forward(logits, targets),
            Err(LossError::WeightBroadcast { len: 2, .. })
        ));
    }

    #[test]
    fn combo_loss_mismatched_shapes_fails() {
        let device = Default::default();
        let loss = ComboLoss::<TestBackend>::new(&device);

        let logits = Tensor::<TestBackend, 1>::from_data(
            TensorData::from([1.0, 2.0, 3.0, 4.0, 5.0]),
            &device,
        );
        let targets = Tensor::<TestBackend, 1>::from_data(
            TensorData::from([1.0, 0.0, 1.0, 0.0]),
            &device,
        );

        match loss.forward(logits, targets).unwrap_err() {
            LossError::ShapeMismatch { logits, targets } => {
                assert_eq!(logits, vec![5]);
                assert_eq!(targets, vec![4]);
            }
            other => panic!("Expected ShapeMismatch error, got: {other:?}"),
        }
    }

    #[test]
    fn combo_loss_backward_produces_finite_gradients() {
        type AutodiffBackend = Autodiff<NdArray>;

        let device = Default::default();
        let loss = ComboLoss::<AutodiffBackend>::new(&device);

        let logits = Tensor::<AutodiffBackend, 1>::from_data(
            TensorData::from([2.0, -2.0, 0.0]),
            &device,
        )
        .require_grad();
        let targets = Tensor::<AutodiffBackend, 1>::from_data(
            TensorData::from([1.0, 0.0, 1.0]),
            &device,
        );

        let result = loss.forward(logits.clone(), targets).unwrap();
        let grads = result.backward();
        let grad = logits.grad(&grads).expect("gradient for logits");

        let values = grad.into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn combo_loss_display_shows_term_weights() {
        let device = Default::default();
        let loss = ComboLossConfig::new()
            .with_bce_weight(0.5)
            .with_tversky_weight(2.0)
            .init::<TestBackend>(&device);

        let display_str = format!("{loss}");
        assert!(display_str.contains("ComboLoss"));
        assert!(display_str.contains("bce_weight: 0.5"));
        assert!(display_str.contains("tversky_weight: 2"));
    }
}
