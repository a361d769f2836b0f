use crate::backend::Backend;
use crate::error::{AdaptError, Result};
use super::{Batch, TensorDataset};

/// # DataLoader
///
/// Cuts a [`TensorDataset`] into batches of at most `batch_size` samples.
///
/// Batches are produced in dataset order and the last batch may be short.
/// Iteration state lives in the [`BatchIter`] returned by [`DataLoader::iter`],
/// so the loader itself can be walked any number of times.
#[derive(Debug, Clone)]
pub struct DataLoader<B> {
    dataset: TensorDataset<B>,
    batch_size: usize,
}

impl<B> DataLoader<B>
where B: Backend
{
    /// Creates a loader over `dataset`.
    ///
    /// # Errors
    ///
    /// Fails with [`AdaptError::InvalidArgument`] when `batch_size` is zero.
    pub fn new(dataset: TensorDataset<B>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(AdaptError::InvalidArgument("batch size must be at least 1".to_string()));
        }
        Ok(Self { dataset, batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn dataset(&self) -> &TensorDataset<B> {
        &self.dataset
    }

    /// Number of batches one pass over the dataset yields
    pub fn n_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    /// Grabs the first batch and drops the iteration state used to produce it.
    ///
    /// Returns `Ok(None)` for an empty dataset.
    pub fn one_batch(&self) -> Result<Option<Batch<B>>> {
        self.iter().next().transpose()
    }

    /// Iterates over the batches in dataset order
    pub fn iter(&self) -> BatchIter<'_, B> {
        BatchIter {
            loader: self,
            next_index: 0,
        }
    }
}

/// Iterator over the batches of a [`DataLoader`].
pub struct BatchIter<'a, B> {
    loader: &'a DataLoader<B>,
    next_index: usize,
}

impl<B> Iterator for BatchIter<'_, B>
where B: Backend
{
    type Item = Result<Batch<B>>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.loader.dataset.len();
        let start = self.next_index * self.loader.batch_size;
        if start >= total {
            return None;
        }
        let len = self.loader.batch_size.min(total - start);
        let index = self.next_index;
        self.next_index += 1;

        Some(self.loader.dataset.slice(start, len).map(|tensors| Batch::new(index, tensors)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.loader.n_batches().saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl<'a, B> IntoIterator for &'a DataLoader<B>
where B: Backend
{
    type Item = Result<Batch<B>>;
    type IntoIter = BatchIter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
