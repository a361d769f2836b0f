use crate::backend::Backend;
use crate::error::{AdaptError, Result};
use super::constant::BATCH_DIM;

/// Returns the size of the batch dimension of `tensor`.
///
/// # Errors
///
/// Fails with [`AdaptError::InvalidArgument`] when the tensor is a scalar.
pub(crate) fn batch_len<B>(tensor: &B) -> Result<usize>
where B: Backend
{
    tensor.dim_size(BATCH_DIM).ok_or_else(|| {
        AdaptError::InvalidArgument("tensor has no batch dimension".to_string())
    })
}

/// Cuts `len` samples starting at `start` out of the batch dimension.
///
/// # Parameters
///
/// * `tensor` - Tensor of shape `(batch, ...)`
/// * `start` - First sample to keep
/// * `len` - Number of samples to keep
///
/// # Returns
///
/// A tensor of shape `(len, ...)`
pub(crate) fn slice_batch<B>(tensor: &B, start: usize, len: usize) -> Result<B>
where B: Backend
{
    tensor.slice(BATCH_DIM, start, len)
}

/// Splits a tensor into individual samples along the batch dimension.
///
/// Each returned tensor keeps a leading batch dimension of size `1`.
/// Order follows the original batch order.
pub(crate) fn slice_tensor_by_batch_dimension<B>(tensor: &B) -> Result<Vec<B>>
where B: Backend
{
    tensor.vectorize_dim(BATCH_DIM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock_tensor::MockTensor;

    #[test]
    fn test_batch_len() {
        assert_eq!(batch_len(&MockTensor::row_indexed(4, 2)).unwrap(), 4);
        assert!(batch_len(&MockTensor::new(vec![], vec![7])).is_err());
    }

    #[test]
    fn test_slice_batch() {
        let t = MockTensor::row_indexed(5, 3);
        let sliced = slice_batch(&t, 3, 2).unwrap();
        assert_eq!(sliced.shape(), vec![2, 3]);
        assert_eq!(sliced.data(), &[3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn test_slice_tensor_by_batch_dimension_preserves_order() {
        let rows = slice_tensor_by_batch_dimension(&MockTensor::row_indexed(3, 1)).unwrap();
        let values: Vec<i64> = rows.iter().map(|r| r.data()[0]).collect();
        assert_eq!(values, vec![0, 1, 2]);
    }
}
