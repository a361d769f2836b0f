//! # Tensor Backend
//!
//! The [`Backend`] trait is the only thing the pipeline knows about tensors.
//! Datasets slice along the batch dimension with it, and predictions are split
//! back into per-sample rows with it. Tokenizers and models pick the concrete
//! tensor type.
//!
//! ## Feature Flags
//!
//! - `candle`: implements [`Backend`] for `candle_core::Tensor`
//! - `burn`: implements [`Backend`] for every `burn::tensor::Tensor<B, D, K>`
//!
//! Without either feature the trait can still be implemented for any custom
//! tensor type.

mod core_trait;

#[cfg_attr(docsrs, doc(cfg(feature = "candle")))]
#[cfg(feature = "candle")]
/// [`Backend`] for candle's `Tensor`, built on `narrow`.
pub mod candle;

#[cfg_attr(docsrs, doc(cfg(feature = "burn")))]
#[cfg(feature = "burn")]
/// [`Backend`] for burn tensors of any rank and element kind.
///
/// Out-of-range slices are reported as errors before burn would panic.
pub mod burn;

pub use core_trait::*;

#[cfg(test)]
pub(crate) mod mock_tensor;
