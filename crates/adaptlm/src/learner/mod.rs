//! # Learner
//!
//! The minimal execution engine shared by every concrete model.
//!
//! A [`Learner`] owns the structural callback wiring (assembler and router)
//! and a slot for exactly one model. [`Learner::get_preds`] runs every batch of
//! a loader through the pipeline and gathers the predictions in loader order.
//!
//! ## Per-batch lifecycle
//!
//! ```text
//! ASSEMBLING -> (AUGMENTING) -> ROUTING -> INTERCEPTING -> [forward] -> COLLECTING
//! ```
//!
//! A hook returning [`Control::CancelBatch`] skips everything up to
//! collection. Any error aborts the whole pass and nothing gathered so far
//! is returned.

mod predictions;

pub use predictions::Predictions;

use std::marker::PhantomData;

use log::{debug, info};

use crate::backend::Backend;
use crate::callback::{BatchAssembler, BatchState, Callback, Control, InputRouter, RunState};
use crate::data::DataLoader;
use crate::error::{AdaptError, Result};
use crate::inputs::RoutedInputs;
use crate::model::Module;

/// # Learner
///
/// A reusable inference-only execution context.
///
/// The assembler and router are built once and survive model swaps; binding a
/// different model with [`Learner::set_model`] only replaces the model slot.
///
/// # Type Parameters
///
/// * `B` - The tensor type flowing through the pipeline
/// * `M` - The model type bound to the learner
pub struct Learner<B, M> {
    model: Option<M>,
    assembler: BatchAssembler,
    router: InputRouter,
    _marker: PhantomData<B>,
}

impl<B, M> Learner<B, M>
where B: Backend, M: Module<B>
{
    /// Creates a learner with no model bound and positional routing.
    pub fn new() -> Self {
        Self {
            model: None,
            assembler: BatchAssembler::new(),
            router: InputRouter::default(),
            _marker: PhantomData,
        }
    }

    /// Creates a learner with `model` already bound.
    pub fn with_model(model: M) -> Self {
        let mut learner = Self::new();
        learner.model = Some(model);
        learner
    }

    /// Binds `model`, returning the previously bound one.
    pub fn set_model(&mut self, model: M) -> Option<M> {
        self.model.replace(model)
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    /// Selects whether hooks and the model see named or positional inputs.
    pub fn set_as_dict(&mut self, as_dict: bool) {
        self.router.set_as_dict(as_dict);
    }

    pub fn as_dict(&self) -> bool {
        self.router.as_dict()
    }

    /// Runs every batch of `loader` through the pipeline and gathers the predictions.
    ///
    /// `hooks` are registered for this pass only, after the learner's own
    /// assembler and router.
    ///
    /// # Errors
    ///
    /// * [`AdaptError::Misconfigured`] when no model is bound, before any batch is touched
    /// * [`AdaptError::MissingPrediction`] when a batch is cancelled without a prediction
    /// * Any error raised by a hook or by the model, unchanged
    pub fn get_preds(&self, loader: &DataLoader<B>, hooks: &[&dyn Callback<B, M>]) -> Result<Predictions<B>> {
        let model = self.model.as_ref().ok_or(AdaptError::Misconfigured)?;

        let mut pipeline: Vec<&dyn Callback<B, M>> = Vec::with_capacity(hooks.len() + 2);
        pipeline.push(&self.assembler);
        pipeline.push(&self.router);
        pipeline.extend_from_slice(hooks);
        // Stable: built-ins stay ahead of per-call hooks within a stage
        pipeline.sort_by_key(|cb| cb.stage());

        let mut run = RunState::default();
        for cb in pipeline.iter() {
            cb.before_validate(loader, &mut run)?;
        }

        info!(
            "Running {} batches of up to {} samples ({} tensors each) through {} hooks",
            loader.n_batches(),
            loader.batch_size(),
            loader.dataset().arity(),
            pipeline.len()
        );

        let mut predictions = Predictions::new();
        for batch in loader.iter() {
            let batch = batch?;
            let index = batch.index();
            let n_inp = run.n_inp.unwrap_or(batch.len());
            let (xb, yb) = batch.split(n_inp);

            let mut state = BatchState::new(index, xb, yb);
            let cancelled = Self::run_hooks(&pipeline, &mut state, model)?;

            if !cancelled {
                let routed = state
                    .routed
                    .take()
                    .unwrap_or_else(|| RoutedInputs::Positional(state.xb.clone()));
                state.pred = Some(model.forward(&routed)?);
                state.routed = Some(routed);
            }

            let pred = state.pred.take().ok_or(AdaptError::MissingPrediction(index))?;
            debug!("Collected prediction for batch {} (cancelled: {})", index, cancelled);
            predictions.push(pred, state.yb);
        }

        Ok(predictions)
    }

    /// Runs the hooks for one batch, returning whether the batch was cancelled.
    fn run_hooks(pipeline: &[&dyn Callback<B, M>], state: &mut BatchState<B>, model: &M) -> Result<bool> {
        for cb in pipeline {
            if cb.before_batch(state, model)? == Control::CancelBatch {
                debug!("{} cancelled batch {}", cb.name(), state.index());
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<B, M> Default for Learner<B, M>
where B: Backend, M: Module<B>
{
    fn default() -> Self {
        Self::new()
    }
}
