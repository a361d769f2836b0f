//! The burn implementation for backend provision.
//! Burn tensors carry their rank as a const generic, so a single blanket
//! implementation covers every rank.
use super::Backend;
use crate::error::{AdaptError, Result};
use burn::prelude::{Backend as BurnBackend, Tensor};
use burn::tensor::BasicOps;
use std::fmt::Debug;

impl<B, const D: usize, K> Backend for Tensor<B, D, K>
where
    B: BurnBackend,
    K: BasicOps<B> + Debug + Send + Sync + 'static,
{
    fn shape(&self) -> Vec<usize> {
        Tensor::shape(self).dims.to_vec()
    }

    fn slice(&self, dimension: usize, start: usize, len: usize) -> Result<Self> {
        let dims = self.dims();
        if dimension >= D || start + len > dims[dimension] {
            return Err(AdaptError::tensor(anyhow::anyhow!(
                "cannot slice {}..{} of dimension {} in shape {:?}",
                start, start + len, dimension, dims
            )));
        }
        Ok(self.clone().narrow(dimension, start, len))
    }

    fn vectorize_dim(&self, dim: usize) -> Result<Vec<Self>> {
        if dim >= D {
            return Err(AdaptError::tensor(anyhow::anyhow!(
                "dimension {} out of range for tensor of rank {}", dim, D
            )));
        }
        let size = self.dims()[dim];
        if size == 0 {
            return Ok(vec![]);
        }
        Ok(self.clone().chunk(size, dim))
    }
}
