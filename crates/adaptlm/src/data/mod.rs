//! # Data
//!
//! Positional datasets and the loader that cuts them into batches.
//!
//! A [`TensorDataset`] is an ordered tuple of tensors that share the batch
//! dimension. A [`DataLoader`] walks it in order (never shuffled) and yields
//! [`Batch`] values, which the learner hands to the callback pipeline.

mod batch;
mod dataset;
mod loader;

pub use batch::Batch;
pub use dataset::TensorDataset;
pub use loader::{BatchIter, DataLoader};
