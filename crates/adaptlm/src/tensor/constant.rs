//! Dimensions with a fixed meaning for every tensor in the pipeline.

/// Samples are stacked along this dimension; loaders slice it and
/// predictions are split along it
pub const BATCH_DIM: usize = 0;

/// Token positions run along this dimension in id and mask tensors
pub const SEQ_DIM: usize = 1;
