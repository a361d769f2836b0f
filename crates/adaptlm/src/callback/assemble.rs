use log::debug;

use crate::backend::Backend;
use crate::data::DataLoader;
use crate::error::{AdaptError, Result};
use crate::inputs::StructuredInputs;
use crate::model::Module;
use super::{BatchState, Callback, Control, RunState, Stage};

/// # BatchAssembler
///
/// Turns the positional inputs of a batch into [`StructuredInputs`].
///
/// Position `0` becomes `input_ids`, position `1` becomes `attention_mask`
/// and position `2`, when present, becomes `token_type_ids`. Hooks that need
/// more fields from the batch should run in [`Stage::Augment`].
///
/// Before the first batch of a pass it peeks at one batch to record how many
/// positional tensors are inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchAssembler;

impl BatchAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Builds the named structure for one batch.
    ///
    /// # Errors
    ///
    /// Fails with [`AdaptError::MalformedBatch`] when fewer than two tensors are given.
    pub fn assemble<B>(&self, xb: &[B]) -> Result<StructuredInputs<B>>
    where B: Backend
    {
        match xb {
            [input_ids, attention_mask] => Ok(StructuredInputs::new(
                input_ids.clone(),
                attention_mask.clone(),
                None,
            )),
            [input_ids, attention_mask, token_type_ids, ..] => Ok(StructuredInputs::new(
                input_ids.clone(),
                attention_mask.clone(),
                Some(token_type_ids.clone()),
            )),
            _ => Err(AdaptError::MalformedBatch(xb.len())),
        }
    }
}

impl<B, M> Callback<B, M> for BatchAssembler
where B: Backend, M: Module<B>
{
    fn name(&self) -> &'static str {
        "BatchAssembler"
    }

    fn stage(&self) -> Stage {
        Stage::Assemble
    }

    fn before_validate(&self, loader: &DataLoader<B>, run: &mut RunState) -> Result<()> {
        if let Some(batch) = loader.one_batch()? {
            debug!("Discovered {} positional inputs per batch", batch.len());
            run.n_inp = Some(batch.len());
        }
        Ok(())
    }

    fn before_batch(&self, state: &mut BatchState<B>, _model: &M) -> Result<Control> {
        state.inputs = Some(self.assemble(&state.xb)?);
        Ok(Control::Continue)
    }
}
