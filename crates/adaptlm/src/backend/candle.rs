use super::Backend;
use crate::error::{AdaptError, Result};
use candle_core::Tensor;

impl Backend for Tensor {
    fn shape(&self) -> Vec<usize> {
        self.dims().to_vec()
    }

    fn slice(&self, dimension: usize, start: usize, len: usize) -> Result<Self> {
        self.narrow(dimension, start, len).map_err(AdaptError::tensor)
    }

    fn vectorize_dim(&self, dim: usize) -> Result<Vec<Self>> {
        let dims = self.dims();

        if dim >= dims.len() {
            return Err(AdaptError::tensor(anyhow::anyhow!(
                "dimension {} out of range for tensor of rank {}", dim, dims.len()
            )));
        }

        let dim_size = dims[dim];
        let mut result = Vec::with_capacity(dim_size);

        for i in 0..dim_size {
            result.push(self.narrow(dim, i, 1).map_err(AdaptError::tensor)?);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn ids() -> Tensor {
        Tensor::new(&[[1u32, 2, 3], [4, 5, 6], [7, 8, 9]], &Device::Cpu).unwrap()
    }

    #[test]
    fn test_shape() {
        assert_eq!(Backend::shape(&ids()), vec![3, 3]);
    }

    #[test]
    fn test_slice_batch_dimension() {
        let sliced = Backend::slice(&ids(), 0, 1, 2).unwrap();
        assert_eq!(sliced.to_vec2::<u32>().unwrap(), vec![vec![4, 5, 6], vec![7, 8, 9]]);
    }

    #[test]
    fn test_vectorize_dim_keeps_order() {
        let rows = ids().vectorize_dim(0).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].dims(), &[1, 3]);
        assert_eq!(rows[2].to_vec2::<u32>().unwrap(), vec![vec![7, 8, 9]]);
    }

    #[test]
    fn test_vectorize_dim_out_of_range() {
        assert!(ids().vectorize_dim(4).is_err());
    }
}
