use crate::backend::Backend;
use crate::data::DataLoader;
use crate::error::Result;
use crate::inputs::{RoutedInputs, StructuredInputs};
use crate::model::Module;

/// Named position of a hook within the per-batch lifecycle.
///
/// Variants are declared in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Positional batch to named inputs
    Assemble,
    /// Extra fields derived from the batch after assembly
    Augment,
    /// Named inputs to the shape the model is called with
    Route,
    /// Replacement of the default forward computation
    Intercept,
}

/// What the learner does after a hook returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Run the next hook, then the default forward computation
    Continue,
    /// Skip the remaining hooks and the default forward computation for this batch
    CancelBatch,
}

/// Bookkeeping that lives for one pass over a loader.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// How many leading batch tensors are model inputs; the rest are targets
    pub n_inp: Option<usize>,
}

/// # BatchState
///
/// Iteration-scoped state that hooks observe and mutate.
///
/// A fresh `BatchState` is built for every batch and dropped once its
/// prediction has been collected.
#[derive(Debug, Clone)]
pub struct BatchState<B> {
    index: usize,

    /// Input tensors of the batch, in positional order
    pub xb: Vec<B>,

    /// Target tensors of the batch, empty during inference
    pub yb: Vec<B>,

    /// Named inputs published by the assembler
    pub inputs: Option<StructuredInputs<B>>,

    /// Inputs as exposed to the model computation
    pub routed: Option<RoutedInputs<B>>,

    /// Prediction for this batch
    pub pred: Option<B>,
}

impl<B> BatchState<B>
where B: Backend
{
    pub fn new(index: usize, xb: Vec<B>, yb: Vec<B>) -> Self {
        Self {
            index,
            xb,
            yb,
            inputs: None,
            routed: None,
            pred: None,
        }
    }

    /// Position of the batch within its loader
    pub fn index(&self) -> usize {
        self.index
    }
}

/// # Callback
///
/// A hook into the learner's batch-processing lifecycle.
///
/// Every method has a no-op default so a hook only implements the points it
/// cares about. Hooks take `&self`: anything they need to remember across
/// batches belongs in [`RunState`] or [`BatchState`].
///
/// # Type Parameters
///
/// * `B` - The tensor type flowing through the pipeline
/// * `M` - The model bound to the learner
pub trait Callback<B, M>: Send + Sync
where B: Backend, M: Module<B>
{
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    /// Stage this hook runs in
    fn stage(&self) -> Stage {
        Stage::Intercept
    }

    /// Runs once per pass, before the first batch.
    fn before_validate(&self, _loader: &DataLoader<B>, _run: &mut RunState) -> Result<()> {
        Ok(())
    }

    /// Runs for every batch, before the default forward computation.
    fn before_batch(&self, _state: &mut BatchState<B>, _model: &M) -> Result<Control> {
        Ok(Control::Continue)
    }
}
