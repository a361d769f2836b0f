use crate::backend::Backend;

/// # Batch
///
/// One group of aligned tensors produced by a [`DataLoader`](super::DataLoader).
///
/// The tensors keep the positional order of the dataset they were cut from.
/// How many of them are model inputs is decided once per run by the
/// assembler, the rest are treated as targets.
#[derive(Debug, Clone)]
pub struct Batch<B> {
    /// Position of this batch within its loader
    index: usize,

    /// The tensors, in dataset order
    tensors: Vec<B>,
}

impl<B> Batch<B>
where B: Backend
{
    pub fn new(index: usize, tensors: Vec<B>) -> Self {
        Self { index, tensors }
    }

    /// Position of this batch within its loader
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of tensors in the batch
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn tensors(&self) -> &[B] {
        &self.tensors
    }

    /// Splits the batch into `(inputs, targets)` with `n_inp` inputs.
    ///
    /// When `n_inp` exceeds the batch length every tensor is an input.
    pub fn split(self, n_inp: usize) -> (Vec<B>, Vec<B>) {
        let mut inputs = self.tensors;
        let targets = if n_inp < inputs.len() {
            inputs.split_off(n_inp)
        } else {
            vec![]
        };
        (inputs, targets)
    }
}
