use std::fmt::Debug;
use crate::error::Result;

/// The backend trait that must be fulfilled by any tensor type flowing through the pipeline
pub trait Backend: Debug + Clone + Send + Sync + 'static {
    /// Return the shape of this tensor
    fn shape(&self) -> Vec<usize>;

    /// Slice a given `dimension` from `start` to `start + len`
    fn slice(&self, dimension: usize, start: usize, len: usize) -> Result<Self>;

    /// Slice a tensor into a vector of size `1` tensors along the supplied `dim`.
    ///
    /// The sliced dimension is kept, so a `(batch, seq)` tensor yields `batch`
    /// tensors of shape `(1, seq)`.
    fn vectorize_dim(&self, dim: usize) -> Result<Vec<Self>>;

    /// Size of the given dimension, `None` when the tensor has fewer dimensions
    fn dim_size(&self, dim: usize) -> Option<usize> {
        self.shape().get(dim).copied()
    }
}
