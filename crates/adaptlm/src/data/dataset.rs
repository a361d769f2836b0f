use crate::backend::Backend;
use crate::error::{AdaptError, Result};
use crate::tensor::operations::{batch_len, slice_batch};

/// # TensorDataset
///
/// An ordered tuple of tensors sharing the same size along the batch dimension.
/// Sample `i` is the `i`th slice of every tensor.
#[derive(Debug, Clone)]
pub struct TensorDataset<B> {
    tensors: Vec<B>,
    len: usize,
}

impl<B> TensorDataset<B>
where B: Backend
{
    /// Creates a dataset from positional tensors.
    ///
    /// # Errors
    ///
    /// Fails with [`AdaptError::InvalidArgument`] when no tensors are given or
    /// when their batch dimensions disagree.
    pub fn new(tensors: Vec<B>) -> Result<Self> {
        let first = tensors.first().ok_or_else(|| {
            AdaptError::InvalidArgument("a dataset needs at least one tensor".to_string())
        })?;
        let len = batch_len(first)?;

        for (position, tensor) in tensors.iter().enumerate().skip(1) {
            let other = batch_len(tensor)?;
            if other != len {
                return Err(AdaptError::InvalidArgument(format!(
                    "tensor {} has {} samples, expected {}", position, other, len
                )));
            }
        }

        Ok(Self { tensors, len })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of positional tensors per sample
    pub fn arity(&self) -> usize {
        self.tensors.len()
    }

    /// Samples `start..start + len` of every tensor, in positional order
    pub(crate) fn slice(&self, start: usize, len: usize) -> Result<Vec<B>> {
        self.tensors
            .iter()
            .map(|t| slice_batch(t, start, len))
            .collect()
    }
}
