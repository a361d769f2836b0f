use crate::backend::Backend;
use crate::error::Result;
use crate::inputs::RoutedInputs;
use crate::model::Module;
use super::{BatchState, Callback, Control, Stage};

/// # InputRouter
///
/// Exposes the assembled inputs to the model computation either as the named
/// structure or as a sequence of tensors in key order.
///
/// The `as_dict` flag is configuration, not per-batch state: it is set when a
/// concrete model is constructed and read on every batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputRouter {
    as_dict: bool,
}

impl InputRouter {
    pub fn new(as_dict: bool) -> Self {
        Self { as_dict }
    }

    pub fn as_dict(&self) -> bool {
        self.as_dict
    }

    pub fn set_as_dict(&mut self, as_dict: bool) {
        self.as_dict = as_dict;
    }
}

impl<B, M> Callback<B, M> for InputRouter
where B: Backend, M: Module<B>
{
    fn name(&self) -> &'static str {
        "InputRouter"
    }

    fn stage(&self) -> Stage {
        Stage::Route
    }

    fn before_batch(&self, state: &mut BatchState<B>, _model: &M) -> Result<Control> {
        let routed = match &state.inputs {
            Some(inputs) if self.as_dict => RoutedInputs::Named(inputs.clone()),
            Some(inputs) => RoutedInputs::Positional(inputs.clone().into_values()),
            // Nothing assembled, the raw batch is all there is
            None => RoutedInputs::Positional(state.xb.clone()),
        };
        state.routed = Some(routed);
        Ok(Control::Continue)
    }
}
