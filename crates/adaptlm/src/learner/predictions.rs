use crate::backend::Backend;
use crate::error::Result;
use crate::tensor::operations::slice_tensor_by_batch_dimension;

/// # Predictions
///
/// Outputs gathered by [`Learner::get_preds`](super::Learner::get_preds), in loader order.
#[derive(Debug, Clone)]
pub struct Predictions<B> {
    /// One prediction tensor per batch
    pub preds: Vec<B>,

    /// Target tensors of every batch; empty vectors during pure inference
    pub targets: Vec<Vec<B>>,
}

impl<B> Predictions<B>
where B: Backend
{
    pub fn new() -> Self {
        Self { preds: vec![], targets: vec![] }
    }

    pub(crate) fn push(&mut self, pred: B, targets: Vec<B>) {
        self.preds.push(pred);
        self.targets.push(targets);
    }

    /// Number of batches collected
    pub fn n_batches(&self) -> usize {
        self.preds.len()
    }

    /// Splits every batch prediction into per-sample rows.
    ///
    /// Rows keep a leading dimension of size `1` and follow input order
    /// across batches.
    pub fn into_rows(self) -> Result<Vec<B>> {
        let mut rows = Vec::new();
        for pred in self.preds.iter() {
            rows.extend(slice_tensor_by_batch_dimension(pred)?);
        }
        Ok(rows)
    }
}

impl<B> Default for Predictions<B>
where B: Backend
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock_tensor::MockTensor;

    #[test]
    fn test_into_rows_preserves_order_across_batches() {
        let mut preds = Predictions::new();
        preds.push(MockTensor::from_rows(&[vec![0, 0], vec![1, 1]]), vec![]);
        // Batches may generate different lengths
        preds.push(MockTensor::from_rows(&[vec![2, 2, 2]]), vec![]);

        assert_eq!(preds.n_batches(), 2);
        let rows = preds.into_rows().unwrap();
        let firsts: Vec<i64> = rows.iter().map(|r| r.data()[0]).collect();
        assert_eq!(firsts, vec![0, 1, 2]);
        assert_eq!(rows[2].shape(), vec![1, 3]);
    }
}
