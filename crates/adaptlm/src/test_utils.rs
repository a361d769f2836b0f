//! Mock collaborators shared by the unit tests.
//!
//! The mock tokenizer maps every byte to `byte + OFFSET`. The mock model
//! "translates" by upper-casing the unmasked bytes, wrapped in the decoder
//! start token and EOS, so decoded outputs are easy to predict.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::backend::mock_tensor::MockTensor;
use crate::error::{AdaptError, Result};
use crate::generation::GenerationRequest;
use crate::inputs::RoutedInputs;
use crate::model::{
    DecodeOptions, EncodeOptions, Encoding, FromPretrained, ModelFamily, Module, Padding,
    Seq2SeqModel, Tokenizer,
};

pub(crate) const PAD: i64 = 0;
pub(crate) const EOS: i64 = 1;
pub(crate) const OFFSET: i64 = 3;

static MODEL_LOADS: Mutex<BTreeMap<String, usize>> = Mutex::new(BTreeMap::new());

/// How many times a mock model was loaded for `identifier`
pub(crate) fn load_count(identifier: &str) -> usize {
    MODEL_LOADS.lock().unwrap().get(identifier).copied().unwrap_or(0)
}

#[derive(Debug, Default)]
pub(crate) struct MockTokenizer {
    encode_calls: AtomicUsize,
}

impl MockTokenizer {
    pub(crate) fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }
}

impl Tokenizer<MockTensor> for MockTokenizer {
    fn batch_encode_plus(&self, texts: &[String], options: &EncodeOptions) -> Result<Encoding<MockTensor>> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);

        let mut rows: Vec<Vec<i64>> = texts
            .iter()
            .map(|text| {
                let mut ids: Vec<i64> = text.bytes().map(|b| b as i64 + OFFSET).collect();
                if options.add_special_tokens {
                    ids.push(EOS);
                }
                ids.truncate(options.max_length);
                ids
            })
            .collect();

        let width = match options.padding {
            Padding::MaxLength => options.max_length,
            Padding::Longest => rows.iter().map(Vec::len).max().unwrap_or(0),
            Padding::DoNotPad => {
                let width = rows.first().map(Vec::len).unwrap_or(0);
                if rows.iter().any(|r| r.len() != width) {
                    return Err(AdaptError::Tokenization(anyhow::anyhow!("unpadded rows differ in length")));
                }
                width
            }
        };

        let masks: Vec<Vec<i64>> = rows
            .iter()
            .map(|r| (0..width).map(|i| (i < r.len()) as i64).collect())
            .collect();
        for row in rows.iter_mut() {
            row.resize(width, PAD);
        }

        Ok(Encoding {
            input_ids: MockTensor::from_rows(&rows),
            attention_mask: MockTensor::from_rows(&masks),
            token_type_ids: None,
        })
    }

    fn decode(&self, token_ids: &MockTensor, options: &DecodeOptions) -> Result<String> {
        let mut text = String::new();
        for &id in token_ids.data() {
            match id {
                PAD if options.skip_special_tokens => {}
                EOS if options.skip_special_tokens => {}
                PAD => text.push_str("<pad>"),
                EOS => text.push_str("</s>"),
                id => text.push(((id - OFFSET) as u8) as char),
            }
        }
        Ok(text)
    }
}

#[async_trait]
impl FromPretrained for MockTokenizer {
    async fn from_pretrained(identifier: &str) -> Result<Self> {
        if identifier.starts_with("missing") {
            return Err(AdaptError::resolution(identifier, anyhow::anyhow!("no such model")));
        }
        Ok(Self::default())
    }
}

#[derive(Debug)]
pub(crate) struct MockSeq2Seq {
    family: ModelFamily,
    forward_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
    dropped_rows: usize,
}

impl Default for MockSeq2Seq {
    fn default() -> Self {
        Self::with_family(ModelFamily::Bart)
    }
}

impl MockSeq2Seq {
    pub(crate) fn with_family(family: ModelFamily) -> Self {
        Self {
            family,
            forward_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            dropped_rows: 0,
        }
    }

    /// Makes `generate` lose the last `n` rows of every batch
    pub(crate) fn dropping_rows(mut self, n: usize) -> Self {
        self.dropped_rows = n;
        self
    }

    pub(crate) fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Module<MockTensor> for MockSeq2Seq {
    fn forward(&self, inputs: &RoutedInputs<MockTensor>) -> Result<MockTensor> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        inputs
            .input_ids()
            .cloned()
            .ok_or_else(|| AdaptError::InvalidArgument("no inputs".to_string()))
    }
}

impl Seq2SeqModel<MockTensor> for MockSeq2Seq {
    fn family(&self) -> ModelFamily {
        self.family.clone()
    }

    fn generate(&self, input_ids: &MockTensor, attention_mask: &MockTensor, request: &GenerationRequest) -> Result<MockTensor> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        request.validate()?;

        let ids = input_ids.vectorize_dim(0)?;
        let masks = attention_mask.vectorize_dim(0)?;

        let mut rows: Vec<Vec<i64>> = ids
            .iter()
            .zip(masks.iter())
            .map(|(ids, mask)| {
                let mut out = vec![PAD];
                out.extend(
                    ids.data()
                        .iter()
                        .zip(mask.data())
                        .filter(|(id, m)| **m == 1 && **id >= OFFSET)
                        .map(|(id, _)| (((id - OFFSET) as u8).to_ascii_uppercase() as i64) + OFFSET),
                );
                out.push(EOS);
                out.truncate(request.max_length);
                out
            })
            .collect();
        rows.truncate(rows.len().saturating_sub(self.dropped_rows));

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in rows.iter_mut() {
            row.resize(width, PAD);
        }
        Ok(MockTensor::from_rows(&rows))
    }
}

#[async_trait]
impl FromPretrained for MockSeq2Seq {
    async fn from_pretrained(identifier: &str) -> Result<Self> {
        if identifier.starts_with("missing") {
            return Err(AdaptError::resolution(identifier, anyhow::anyhow!("no such model")));
        }
        if identifier.contains("slow") {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        *MODEL_LOADS.lock().unwrap().entry(identifier.to_string()).or_default() += 1;
        let family = if identifier.contains("t5") { ModelFamily::T5 } else { ModelFamily::Bart };
        Ok(Self::with_family(family))
    }
}
