use log::debug;

use crate::backend::Backend;
use crate::error::{AdaptError, Result};
use crate::generation::GenerationRequest;
use crate::model::Seq2SeqModel;
use super::{BatchState, Callback, Control, Stage};

/// # GenerationInterceptor
///
/// Replaces the default forward computation with a call to the model's
/// `generate`.
///
/// For every batch it reads `input_ids` and `attention_mask` from the
/// dictionary-routed inputs, generates with the configured request, stores
/// the token sequences as the batch prediction and cancels the rest of the
/// batch. The learner's default forward never runs for a batch this hook has
/// seen.
///
/// Only loops that register this hook bypass the default computation.
#[derive(Debug, Clone)]
pub struct GenerationInterceptor {
    request: GenerationRequest,
}

impl GenerationInterceptor {
    pub fn new(request: GenerationRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

impl<B, M> Callback<B, M> for GenerationInterceptor
where B: Backend, M: Seq2SeqModel<B>
{
    fn name(&self) -> &'static str {
        "GenerationInterceptor"
    }

    fn stage(&self) -> Stage {
        Stage::Intercept
    }

    fn before_batch(&self, state: &mut BatchState<B>, model: &M) -> Result<Control> {
        let inputs = state
            .routed
            .as_ref()
            .and_then(|routed| routed.as_named())
            .ok_or(AdaptError::RoutingMismatch { hook: "GenerationInterceptor" })?;

        debug!(
            "Generating for batch {} with {} beams, length {}..={}",
            state.index(),
            self.request.num_beams,
            self.request.min_length,
            self.request.max_length
        );

        let pred = model.generate(&inputs.input_ids, &inputs.attention_mask, &self.request)?;
        state.pred = Some(pred);

        Ok(Control::CancelBatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock_tensor::MockTensor;
    use crate::inputs::{RoutedInputs, StructuredInputs};
    use crate::test_utils::{MockSeq2Seq, PAD};

    fn named_state() -> BatchState<MockTensor> {
        let ids = MockTensor::from_rows(&[vec![10, 11, PAD]]);
        let mask = MockTensor::from_rows(&[vec![1, 1, 0]]);
        let mut state = BatchState::new(0, vec![ids.clone(), mask.clone()], vec![]);
        state.routed = Some(RoutedInputs::Named(StructuredInputs::new(ids, mask, None)));
        state
    }

    #[test]
    fn test_generates_and_cancels() {
        let model = MockSeq2Seq::default();
        let hook = GenerationInterceptor::new(GenerationRequest::greedy(10));
        let mut state = named_state();

        let control = hook.before_batch(&mut state, &model).unwrap();

        assert_eq!(control, Control::CancelBatch);
        assert!(state.pred.is_some());
        assert_eq!(model.generate_calls(), 1);
        assert_eq!(model.forward_calls(), 0);
    }

    #[test]
    fn test_passes_request_through() {
        let model = MockSeq2Seq::default();
        let request = GenerationRequest::default().num_beams(3).min_length(1).max_length(7).with_extra("length_penalty", 2.0);
        let hook = GenerationInterceptor::new(request.clone());
        let mut state = named_state();

        hook.before_batch(&mut state, &model).unwrap();
        assert_eq!(model.last_request(), Some(request));
    }

    #[test]
    fn test_positional_inputs_rejected() {
        let model = MockSeq2Seq::default();
        let hook = GenerationInterceptor::new(GenerationRequest::default());
        let mut state = named_state();
        state.routed = Some(RoutedInputs::Positional(state.xb.clone()));

        let err = hook.before_batch(&mut state, &model).unwrap_err();
        assert!(matches!(err, AdaptError::RoutingMismatch { .. }));
        assert_eq!(model.generate_calls(), 0);
    }

    #[test]
    fn test_generation_error_propagates() {
        let model = MockSeq2Seq::default();
        let hook = GenerationInterceptor::new(GenerationRequest::default().num_beams(0));
        let mut state = named_state();

        let err = hook.before_batch(&mut state, &model).unwrap_err();
        assert!(matches!(err, AdaptError::Generation(_)));
        assert!(state.pred.is_none());
    }
}
