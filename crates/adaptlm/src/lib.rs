//! # Adaptlm
//!
//! A uniform **load / predict** interface over pretrained sequence-to-sequence
//! models, built on a small callback-driven inference loop.
//!
//! ## Overview
//!
//! Text goes in, is tokenized into fixed-length padded tensors, batched, and
//! run through a [`Learner`]. For every batch a short pipeline of hooks turns
//! the positional tensors into named inputs, routes them to the model, and
//! optionally replaces the default forward computation with generation.
//! The resulting token sequences are decoded back to text in input order.
//!
//! Key components include:
//!
//! - A tensor abstraction layer supporting various backends
//! - Positional datasets and ordered batch loaders
//! - The staged callback pipeline and the learner that drives it
//! - The [`AdaptiveModel`] contract and the translation models built on it
//!
//! ## Architecture
//!
//! ### Assumptions
//! Regardless of backend used, adaptlm reserves two dimensions with special meanings:
//!  - The `0th` dimension is reserved as the batch dimension
//!  - The `1st` dimension is reserved as the sequence dimension
//!
//! ### Callback stages
//!
//! ```text
//! Assemble -> Augment -> Route -> Intercept -> [Module::forward]
//! ```
//!
//! [`BatchAssembler`] names the positional tensors, [`InputRouter`] exposes them
//! as a dictionary or a sequence, and [`GenerationInterceptor`] generates and
//! cancels the rest of the batch so the default forward never runs. Only loops
//! that register the interceptor bypass the forward computation.
//!
//! ### Models
//!
//! Each concrete model owns its own [`Learner`], so binding a model to one
//! never affects another. Loading is asynchronous; inference is synchronous
//! and processes batches strictly in loader order.
//!
//! ## Features
//!
//! - **candle** - Enables the candle backend and the hub-backed T5 translator
//! - **burn** - Enables the burn backend
//!
//! ## Errors
//!
//! Every fallible operation returns [`AdaptError`]. Nothing is retried and a
//! failure in any batch aborts the whole call.

mod tensor;

pub mod adaptive;
pub mod backend;
pub mod callback;
pub mod data;
pub mod error;
pub mod generation;
pub mod inputs;
pub mod learner;
pub mod model;
pub mod translation;

#[cfg(feature = "candle")]
pub mod hub;

#[cfg(test)]
pub(crate) mod test_utils;

/// Constants for client reference
pub use tensor::constant;

pub use adaptive::{AdaptiveModel, TextInput};
pub use callback::{BatchAssembler, Callback, Control, GenerationInterceptor, InputRouter, Stage};
pub use data::{DataLoader, TensorDataset};
pub use error::{AdaptError, Result};
pub use generation::GenerationRequest;
pub use learner::{Learner, Predictions};
pub use translation::{EasyTranslator, TransformersTranslator, TranslationOptions};
