use std::fmt;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::Result;
use crate::generation::GenerationRequest;
use crate::inputs::RoutedInputs;

/// Architecture family of a pretrained model.
///
/// Some families expect a task description in front of every input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    T5,
    Bart,
    Marian,
    Other(String),
}

impl ModelFamily {
    /// Maps a `model_type` string from a model config to a family.
    pub fn from_model_type(model_type: &str) -> Self {
        match model_type.to_ascii_lowercase().as_str() {
            "t5" | "mt5" => ModelFamily::T5,
            "bart" | "mbart" => ModelFamily::Bart,
            "marian" => ModelFamily::Marian,
            other => ModelFamily::Other(other.to_string()),
        }
    }

    /// Whether inputs must be prefixed with a task description, e.g.
    /// `"translate English to German: Hello"`.
    pub fn uses_task_prefix(&self) -> bool {
        matches!(self, ModelFamily::T5)
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::T5 => write!(f, "t5"),
            ModelFamily::Bart => write!(f, "bart"),
            ModelFamily::Marian => write!(f, "marian"),
            ModelFamily::Other(name) => write!(f, "{}", name),
        }
    }
}

/// # Module
///
/// The default per-batch computation of a model.
///
/// The learner calls [`Module::forward`] for every batch that no hook has
/// cancelled, and records its output as the batch prediction.
pub trait Module<B>: Send + Sync
where B: Backend
{
    /// Runs the model on the routed inputs of one batch.
    fn forward(&self, inputs: &RoutedInputs<B>) -> Result<B>;
}

/// # Seq2SeqModel
///
/// A pretrained model with a generation head.
pub trait Seq2SeqModel<B>: Module<B>
where B: Backend
{
    /// The architecture family, used to pick prompt conventions.
    fn family(&self) -> ModelFamily;

    /// Generates token sequences for a batch.
    ///
    /// # Parameters
    ///
    /// * `input_ids` - Tensor of shape `(batch, seq)`
    /// * `attention_mask` - Tensor of shape `(batch, seq)`, `1` for real tokens
    /// * `request` - Beam, length and stopping parameters plus passthrough extras
    ///
    /// # Returns
    ///
    /// A tensor of shape `(batch, generated)` holding token ids, one row per input row.
    ///
    /// # Errors
    ///
    /// Invalid parameter combinations and runtime failures surface as
    /// [`crate::AdaptError::Generation`]. Callers do not retry.
    fn generate(&self, input_ids: &B, attention_mask: &B, request: &GenerationRequest) -> Result<B>;
}

/// # FromPretrained
///
/// Construction from a hub identifier or a local directory.
#[async_trait]
pub trait FromPretrained: Sized {
    /// Loads the component named by `identifier`.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::AdaptError::Resolution`] when the identifier cannot be resolved.
    async fn from_pretrained(identifier: &str) -> Result<Self>;
}
