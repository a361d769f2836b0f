use std::sync::Mutex;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::t5::{self, T5ForConditionalGeneration};
use log::{debug, info};

use crate::error::{AdaptError, Result};
use crate::generation::GenerationRequest;
use crate::inputs::RoutedInputs;
use crate::model::{FromPretrained, ModelFamily, Module, Seq2SeqModel};
use super::resolve::resolve_file;
use super::search::{beam_search, greedy, SearchParams};

/// # T5Generator
///
/// A T5 checkpoint with its generation loop.
///
/// The underlying network keeps per-call state, so calls are serialized
/// through a lock. Every input row is encoded and decoded on its own with its
/// padding stripped by the attention mask.
pub struct T5Generator {
    model: Mutex<T5ForConditionalGeneration>,
    device: Device,
    pad_token: u32,
    eos_token: u32,
    decoder_start_token: u32,
}

impl T5Generator {
    /// Builds the generator from a parsed config and a weights builder.
    pub fn new(mut config: t5::Config, vb: VarBuilder, device: Device) -> Result<Self> {
        // Decoding always replays the whole prefix
        config.use_cache = false;
        let model = T5ForConditionalGeneration::load(vb, &config).map_err(AdaptError::tensor)?;

        Ok(Self {
            model: Mutex::new(model),
            device,
            pad_token: config.pad_token_id as u32,
            eos_token: config.eos_token_id as u32,
            decoder_start_token: config.decoder_start_token_id.unwrap_or(config.pad_token_id) as u32,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, T5ForConditionalGeneration>> {
        self.model
            .lock()
            .map_err(|_| AdaptError::generation(anyhow::anyhow!("model lock poisoned by an earlier panic")))
    }

    /// The unmasked ids of one row as a `(1, len)` tensor.
    fn unpadded_row(&self, input_ids: &Tensor, attention_mask: &Tensor, row: usize) -> Result<Tensor> {
        let to_ids = |t: &Tensor| {
            t.get(row)
                .and_then(|r| r.to_dtype(DType::U32))
                .and_then(|r| r.to_vec1::<u32>())
                .map_err(AdaptError::tensor)
        };
        let ids = to_ids(input_ids)?;
        let mask = to_ids(attention_mask)?;

        let kept: Vec<u32> = ids
            .into_iter()
            .zip(mask)
            .filter(|(_, m)| *m != 0)
            .map(|(id, _)| id)
            .collect();
        if kept.is_empty() {
            return Err(AdaptError::InvalidArgument(format!("row {} has no unmasked tokens", row)));
        }

        let len = kept.len();
        Tensor::from_vec(kept, (1, len), &self.device).map_err(AdaptError::tensor)
    }

    /// Next-token logits for every sequence, all sharing one encoder output.
    fn step(
        model: &mut T5ForConditionalGeneration,
        encoder_output: &Tensor,
        sequences: &[Vec<u32>],
        device: &Device,
    ) -> candle_core::Result<Tensor> {
        let n = sequences.len();
        let len = sequences.first().map(Vec::len).unwrap_or(0);
        let decoder_ids = Tensor::from_vec(sequences.concat(), (n, len), device)?;
        let encoder_output = encoder_output.repeat((n, 1, 1))?;

        model.clear_kv_cache();
        model
            .decode(&decoder_ids, &encoder_output)?
            .to_dtype(DType::F32)
    }
}

/// Right-pads `rows` with `pad` to the longest row, returning the flat data
/// and the shared width.
fn right_pad(rows: Vec<Vec<u32>>, pad: u32) -> (Vec<u32>, usize) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let data = rows
        .into_iter()
        .flat_map(|mut tokens| {
            tokens.resize(width, pad);
            tokens
        })
        .collect();
    (data, width)
}

impl Module<Tensor> for T5Generator {
    /// Encoder hidden states of shape `(batch, seq, d_model)`.
    fn forward(&self, inputs: &RoutedInputs<Tensor>) -> Result<Tensor> {
        let input_ids = inputs
            .input_ids()
            .ok_or_else(|| AdaptError::InvalidArgument("batch has no input ids".to_string()))?;

        let mut model = self.lock()?;
        model.clear_kv_cache();
        model.encode(input_ids).map_err(AdaptError::tensor)
    }
}

impl Seq2SeqModel<Tensor> for T5Generator {
    fn family(&self) -> ModelFamily {
        ModelFamily::T5
    }

    fn generate(&self, input_ids: &Tensor, attention_mask: &Tensor, request: &GenerationRequest) -> Result<Tensor> {
        let params = SearchParams::from_request(request, self.decoder_start_token, self.eos_token)?;
        let rows = input_ids.dim(0).map_err(AdaptError::tensor)?;

        let mut model = self.lock()?;
        let mut outputs = Vec::with_capacity(rows);
        for row in 0..rows {
            let ids = self.unpadded_row(input_ids, attention_mask, row)?;

            model.clear_kv_cache();
            let encoder_output = model.encode(&ids).map_err(AdaptError::generation)?;

            let step = |sequences: &[Vec<u32>]| {
                Self::step(&mut model, &encoder_output, sequences, &self.device).map_err(AdaptError::generation)
            };
            let tokens = if params.num_beams == 1 {
                greedy(&params, step)?
            } else {
                beam_search(&params, step)?
            };

            debug!("Row {} generated {} tokens", row, tokens.len());
            outputs.push(tokens);
        }

        let (data, width) = right_pad(outputs, self.pad_token);
        Tensor::from_vec(data, (rows, width), &self.device).map_err(AdaptError::tensor)
    }
}

#[async_trait]
impl FromPretrained for T5Generator {
    async fn from_pretrained(identifier: &str) -> Result<Self> {
        let config_path = resolve_file(identifier, "config.json").await?;
        let raw = std::fs::read(&config_path).map_err(|e| AdaptError::resolution(identifier, e))?;
        let value: serde_json::Value =
            serde_json::from_slice(&raw).map_err(|e| AdaptError::resolution(identifier, e))?;

        let model_type = value.get("model_type").and_then(|v| v.as_str()).unwrap_or_default();
        if ModelFamily::from_model_type(model_type) != ModelFamily::T5 {
            return Err(AdaptError::resolution(
                identifier,
                anyhow::anyhow!("expected a t5 checkpoint, found model_type '{}'", model_type),
            ));
        }
        let config: t5::Config = serde_json::from_value(value).map_err(|e| AdaptError::resolution(identifier, e))?;

        let weights = resolve_file(identifier, "model.safetensors").await?;
        let device = Device::Cpu;
        info!("Loading T5 weights for '{}' from {}", identifier, weights.display());
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device) }
            .map_err(|e| AdaptError::resolution(identifier, e))?;

        Self::new(config, vb, device)
    }
}
