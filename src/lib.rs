//! Binary classification loss functions for the Burn deep learning framework.
//!
//! This crate turns per-element pairs of raw (pre-sigmoid) logits and
//! binary-or-soft targets into training losses. All evaluators are
//! backend-agnostic, rank-generic, and differentiable end to end.
//!
//! ## Cross-entropy family
//!
//! - **[`bce_with_logits`]**: numerically stable element-wise binary
//!   cross-entropy, the shared primitive of the family
//! - **[`FocalLoss`]**: down-weights well-classified elements with a single
//!   focusing exponent
//! - **[`AsymmetricFocalLoss`]**: independent focusing exponents for
//!   positive and negative elements
//! - **[`WeightedAsymmetricFocalLoss`]**: asymmetric focusing plus an
//!   optional multiplicative weight on positive elements
//!
//! ## Overlap family
//!
//! - **[`DiceLoss`]**: complement of the Dice coefficient
//! - **[`JaccardLoss`]**: complement of intersection-over-union
//! - **[`TverskyLoss`]**: Dice generalized with independent false-positive
//!   and false-negative penalties
//!
//! ## Composite
//!
//! - **[`ComboLoss`]**: weighted sum of a plain BCE term and a Tversky
//!   term, pairing a well-conditioned gradient with a metric-aligned
//!   objective
//!
//! ## Key properties
//!
//! - **Stable by construction**: cross-entropy is computed as
//!   `max(x, 0) - x*y + log(1 + exp(-|x|))` and the focal probability is
//!   recovered through `pt = exp(-bce)`, so no path ever exponentiates a
//!   large positive logit
//! - **Pure evaluators**: configuration is immutable after `init`; the only
//!   per-call effect is the idempotent device realignment of an optional
//!   weight tensor
//! - **Fail fast**: shape and broadcast problems surface as
//!   [`LossError`] before any arithmetic
//!
//! ## Usage example
//!
//! ```rust
//! use burn::{nn::loss::Reduction, tensor::{backend::Backend, Tensor}};
//! use burn_binary_loss::{ComboLossConfig, FocalLossConfig, LossResult};
//!
//! fn training_losses<B: Backend>(
//!     logits: Tensor<B, 2>,
//!     targets: Tensor<B, 2>,
//! ) -> LossResult<Tensor<B, 1>> {
//!     let focal = FocalLossConfig::new().with_alpha(0.25).with_gamma(2.0).init();
//!     let combo = ComboLossConfig::new()
//!         .with_alpha(0.3)
//!         .with_beta(0.7)
//!         .init(&logits.device());
//!
//!     let focal_term = focal.forward(logits.clone(), targets.clone(), Reduction::Mean)?;
//!     let combo_term = combo.forward(logits, targets)?;
//!     Ok(focal_term + combo_term)
//! }
//! ```
//!
//! ## Reduction
//!
//! Cross-entropy-family losses take a [`Reduction`](burn::nn::loss::Reduction)
//! in `forward` (Mean/Auto and Sum) and expose `forward_no_reduction` for
//! the unreduced element-wise loss. Overlap losses and [`ComboLoss`] are
//! whole-batch statistics and always return a single scalar.

mod asymmetric_focal;
mod bce;
mod combo;
mod dice;
mod error;
mod focal;
mod jaccard;
mod tversky;
mod weighted_asymmetric_focal;

pub use asymmetric_focal::{AsymmetricFocalLoss, AsymmetricFocalLossConfig};
pub use bce::bce_with_logits;
pub use combo::{ComboLoss, ComboLossConfig};
pub use dice::{DiceLoss, DiceLossConfig};
pub use error::{LossError, LossResult};
pub use focal::{FocalLoss, FocalLossConfig};
pub use jaccard::{JaccardLoss, JaccardLossConfig};
pub use tversky::{TverskyLoss, TverskyLossConfig};
pub use weighted_asymmetric_focal::{
    WeightedAsymmetricFocalLoss, WeightedAsymmetricFocalLossConfig,
};
