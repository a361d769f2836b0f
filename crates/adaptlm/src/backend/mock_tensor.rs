use crate::backend::Backend;
use crate::error::{AdaptError, Result};

// A simple row-major mock tensor for testing
#[derive(Clone, Debug, PartialEq)]
pub struct MockTensor {
    pub(crate) shape: Vec<usize>,
    pub(crate) data: Vec<i64>,
}

impl MockTensor {
    pub fn new(shape: Vec<usize>, data: Vec<i64>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len(), "shape does not match data");
        Self { shape, data }
    }

    /// Builds a `(rows, cols)` tensor from nested rows
    pub fn from_rows(rows: &[Vec<i64>]) -> Self {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self::new(vec![rows.len(), cols], data)
    }

    /// A `(rows, cols)` tensor where every element of row `i` is `i`
    pub fn row_indexed(rows: usize, cols: usize) -> Self {
        let data = (0..rows).flat_map(|r| std::iter::repeat_n(r as i64, cols)).collect();
        Self::new(vec![rows, cols], data)
    }

    pub fn data(&self) -> &[i64] {
        &self.data
    }
}

impl Backend for MockTensor {
    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn slice(&self, dimension: usize, start: usize, len: usize) -> Result<Self> {
        if dimension >= self.shape.len() || start + len > self.shape[dimension] {
            return Err(AdaptError::tensor(anyhow::anyhow!(
                "cannot slice {}..{} of dimension {} in {:?}", start, start + len, dimension, self.shape
            )));
        }
        let outer: usize = self.shape[..dimension].iter().product();
        let inner: usize = self.shape[dimension + 1..].iter().product();
        let dim = self.shape[dimension];

        let mut data = Vec::with_capacity(outer * len * inner);
        for o in 0..outer {
            let base = o * dim * inner;
            data.extend_from_slice(&self.data[base + start * inner..base + (start + len) * inner]);
        }

        let mut shape = self.shape.clone();
        shape[dimension] = len;
        Ok(MockTensor::new(shape, data))
    }

    fn vectorize_dim(&self, dim: usize) -> Result<Vec<Self>> {
        let size = self.dim_size(dim).ok_or_else(|| {
            AdaptError::tensor(anyhow::anyhow!("dimension {} out of range for {:?}", dim, self.shape))
        })?;
        (0..size).map(|i| self.slice(dim, i, 1)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_rows() {
        let t = MockTensor::from_rows(&[vec![1, 2], vec![3, 4], vec![5, 6]]);
        let sliced = t.slice(0, 1, 2).unwrap();
        assert_eq!(sliced.shape(), vec![2, 2]);
        assert_eq!(sliced.data(), &[3, 4, 5, 6]);
    }

    #[test]
    fn test_slice_columns() {
        let t = MockTensor::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]);
        let sliced = t.slice(1, 1, 2).unwrap();
        assert_eq!(sliced.data(), &[2, 3, 5, 6]);
    }

    #[test]
    fn test_vectorize_dim_keeps_dimension() {
        let rows = MockTensor::row_indexed(3, 2).vectorize_dim(0).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].shape(), vec![1, 2]);
        assert_eq!(rows[2].data(), &[2, 2]);
    }
}
