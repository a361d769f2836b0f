//! # Translation
//!
//! Sequence-to-sequence translation on top of the callback pipeline.
//!
//! [`TransformersTranslator`] tokenizes the input, batches it, and runs every
//! batch through its [`Learner`] with a [`GenerationInterceptor`] registered,
//! so the model's `generate` replaces the default forward computation.
//! [`EasyTranslator`] caches translators by model identifier.
//!
//! ```text
//! IDLE -> TOKENIZING -> BATCHING -> (per batch) -> DECODING -> DONE
//! ```

mod registry;

pub use registry::*;

use async_trait::async_trait;
use log::{debug, info};

use crate::adaptive::{AdaptiveModel, TextInput};
use crate::backend::Backend;
use crate::constant::SEQ_DIM;
use crate::callback::GenerationInterceptor;
use crate::data::{DataLoader, TensorDataset};
use crate::error::{AdaptError, Result};
use crate::generation::GenerationRequest;
use crate::learner::Learner;
use crate::model::{DecodeOptions, EncodeOptions, FromPretrained, Seq2SeqModel, Tokenizer};

/// Task description placed in front of every input for families that need one
pub const DEFAULT_TASK_PREFIX: &str = "translate English to German";

/// Number of texts per batch
pub const DEFAULT_MINI_BATCH_SIZE: usize = 32;

/// # TranslationOptions
///
/// Per-call parameters of [`TransformersTranslator::predict`].
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOptions {
    /// Task prefix, only applied to families that use one (T5)
    pub prefix: String,

    pub mini_batch_size: usize,

    /// Parameters forwarded to the model's `generate` for every batch
    pub generation: GenerationRequest,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_TASK_PREFIX.to_string(),
            mini_batch_size: DEFAULT_MINI_BATCH_SIZE,
            generation: GenerationRequest::default(),
        }
    }
}

impl TranslationOptions {
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn mini_batch_size(mut self, mini_batch_size: usize) -> Self {
        self.mini_batch_size = mini_batch_size;
        self
    }

    pub fn generation(mut self, generation: GenerationRequest) -> Self {
        self.generation = generation;
        self
    }
}

/// # TransformersTranslator
///
/// Translates text with a pretrained sequence-to-sequence model.
///
/// The translator owns its tokenizer and its own [`Learner`]; the learner is
/// switched to dictionary routing at construction because generation needs
/// `input_ids` and `attention_mask` by name.
///
/// # Type Parameters
///
/// * `B` - The tensor type produced by the tokenizer and the model
/// * `T` - The tokenizer
/// * `M` - The generating model
pub struct TransformersTranslator<B, T, M> {
    tokenizer: T,
    learner: Learner<B, M>,
}

impl<B, T, M> TransformersTranslator<B, T, M>
where B: Backend, T: Tokenizer<B>, M: Seq2SeqModel<B>
{
    /// Creates a translator with `model` bound to a fresh learner.
    pub fn new(tokenizer: T, model: M) -> Self {
        Self::with_learner(tokenizer, Learner::with_model(model))
    }

    /// Creates a translator around an existing learner.
    ///
    /// The learner may have no model yet; `predict` fails with
    /// [`AdaptError::Misconfigured`] until one is bound.
    pub fn with_learner(tokenizer: T, mut learner: Learner<B, M>) -> Self {
        learner.set_as_dict(true);
        Self { tokenizer, learner }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Encodes `texts` into a `(input_ids, attention_mask)` dataset.
    fn tokenize(&self, texts: &[String]) -> Result<TensorDataset<B>> {
        let encoding = self.tokenizer.batch_encode_plus(texts, &EncodeOptions::default())?;
        debug!(
            "Encoded {} texts to {:?} tokens each",
            texts.len(),
            encoding.input_ids.dim_size(SEQ_DIM)
        );
        // Generation only needs ids and mask; token types are dropped
        TensorDataset::new(vec![encoding.input_ids, encoding.attention_mask])
    }
}

#[async_trait]
impl<B, T, M> AdaptiveModel for TransformersTranslator<B, T, M>
where
    B: Backend,
    T: Tokenizer<B> + FromPretrained,
    M: Seq2SeqModel<B> + FromPretrained,
{
    type Tensor = B;
    type Model = M;
    type Options = TranslationOptions;
    type Output = Vec<String>;

    async fn load(identifier: &str) -> Result<Self> {
        let tokenizer = T::from_pretrained(identifier).await?;
        let model = M::from_pretrained(identifier).await?;
        Ok(Self::new(tokenizer, model))
    }

    /// Translates `text`, one output per input in the same order.
    ///
    /// # Parameters
    ///
    /// * `text` - A single text or a batch of texts
    /// * `options` - Prefix, batch size and generation parameters
    ///
    /// # Returns
    ///
    /// The decoded translations with special tokens removed.
    ///
    /// # Errors
    ///
    /// * [`AdaptError::Misconfigured`] when no model is bound, before any tokenization
    /// * [`AdaptError::InvalidArgument`] for empty input or a zero batch size
    /// * [`AdaptError::Generation`] when the model rejects the generation parameters
    fn predict(&self, text: TextInput, options: &TranslationOptions) -> Result<Vec<String>> {
        let model = self.learner.model().ok_or(AdaptError::Misconfigured)?;

        if options.mini_batch_size == 0 {
            return Err(AdaptError::InvalidArgument("`mini_batch_size` must be at least 1".to_string()));
        }
        let mut texts = text.into_vec();
        if texts.is_empty() {
            return Err(AdaptError::InvalidArgument("no text to translate".to_string()));
        }

        if model.family().uses_task_prefix() {
            texts = texts
                .into_iter()
                .map(|t| format!("{}: {}", options.prefix, t))
                .collect();
        }

        let dataset = self.tokenize(&texts)?;
        let loader = DataLoader::new(dataset, options.mini_batch_size)?;

        info!("Running translator on {} text sequences", loader.dataset().len());
        info!("Batch size = {}", options.mini_batch_size);

        let interceptor = GenerationInterceptor::new(options.generation.clone());
        let preds = self.learner.get_preds(&loader, &[&interceptor])?;

        let rows = preds.into_rows()?;
        if rows.len() != texts.len() {
            return Err(AdaptError::generation(anyhow::anyhow!(
                "model returned {} rows for {} input texts", rows.len(), texts.len()
            )));
        }

        let decode = DecodeOptions::default();
        rows.iter().map(|row| self.tokenizer.decode(row, &decode)).collect()
    }

    fn train(&mut self) -> Result<()> {
        Err(AdaptError::NotImplemented {
            model: "TransformersTranslator",
            operation: "train",
        })
    }

    fn evaluate(&self) -> Result<()> {
        Err(AdaptError::NotImplemented {
            model: "TransformersTranslator",
            operation: "evaluate",
        })
    }

    fn learner(&self) -> &Learner<B, M> {
        &self.learner
    }

    fn learner_mut(&mut self) -> &mut Learner<B, M> {
        &mut self.learner
    }
}
