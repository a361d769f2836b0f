//! # Callback Pipeline
//!
//! The per-batch hooks that turn a positional batch into a model call.
//!
//! ## Stages
//!
//! Hooks are grouped into named [`Stage`]s which run in a fixed order for
//! every batch:
//!
//! 1. [`Stage::Assemble`] - [`BatchAssembler`] names the positional tensors
//! 2. [`Stage::Augment`] - room for hooks that pull extra fields out of the batch
//! 3. [`Stage::Route`] - [`InputRouter`] exposes the names as a dictionary or a sequence
//! 4. [`Stage::Intercept`] - hooks such as [`GenerationInterceptor`] that replace
//!    the default forward computation
//!
//! Within a stage, the learner's built-in hooks run first, then per-call hooks in
//! registration order. A hook that returns [`Control::CancelBatch`] stops the
//! remaining hooks and the default forward computation for that batch only.

mod assemble;
mod core_trait;
mod generate;
mod route;

pub use assemble::BatchAssembler;
pub use core_trait::*;
pub use generate::GenerationInterceptor;
pub use route::InputRouter;
