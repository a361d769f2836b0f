//! # Adaptive models
//!
//! The uniform `load` / `predict` / `train` / `evaluate` contract every
//! concrete task model implements, on top of a [`Learner`] it owns.

use async_trait::async_trait;

use crate::backend::Backend;
use crate::callback::Callback;
use crate::data::DataLoader;
use crate::error::Result;
use crate::learner::{Learner, Predictions};
use crate::model::Module;

/// Text handed to [`AdaptiveModel::predict`].
///
/// A single string behaves exactly like a one-element batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Single(String),
    Batch(Vec<String>),
}

impl TextInput {
    /// Normalizes the input into a list, keeping the caller's order.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TextInput::Single(text) => vec![text],
            TextInput::Batch(texts) => texts,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TextInput::Single(_) => 1,
            TextInput::Batch(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Single(text)
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Single(text.to_string())
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Batch(texts)
    }
}

impl From<Vec<&str>> for TextInput {
    fn from(texts: Vec<&str>) -> Self {
        TextInput::Batch(texts.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TextInput {
    fn from(texts: &[&str]) -> Self {
        TextInput::Batch(texts.iter().map(|t| t.to_string()).collect())
    }
}

/// # AdaptiveModel
///
/// A task model that can be loaded by identifier and run over text.
///
/// Implementors own exactly one [`Learner`]; the provided methods forward to
/// it so callers can rebind the model or run raw loaders without reaching
/// into the implementation.
///
/// # Associated Types
///
/// * `Tensor` - The tensor type flowing through the learner
/// * `Model` - The network bound to the learner
/// * `Options` - Per-call parameters accepted by `predict`
/// * `Output` - What `predict` returns
#[async_trait]
pub trait AdaptiveModel: Sized + Send + Sync {
    type Tensor: Backend;
    type Model: Module<Self::Tensor>;
    type Options: Send + Sync;
    type Output: Send;

    /// Builds the tokenizer and model named by `identifier`.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::AdaptError::Resolution`] when the identifier cannot be resolved.
    async fn load(identifier: &str) -> Result<Self>;

    /// Runs inference over `text`.
    ///
    /// Output order and length follow the input. Any failure aborts the
    /// whole call.
    fn predict(&self, text: TextInput, options: &Self::Options) -> Result<Self::Output>;

    /// Fine-tunes the model.
    fn train(&mut self) -> Result<()>;

    /// Scores the model against labelled data.
    fn evaluate(&self) -> Result<()>;

    fn learner(&self) -> &Learner<Self::Tensor, Self::Model>;

    fn learner_mut(&mut self) -> &mut Learner<Self::Tensor, Self::Model>;

    /// Binds a different model to the learner, returning the previous one.
    fn set_model(&mut self, model: Self::Model) -> Option<Self::Model> {
        self.learner_mut().set_model(model)
    }

    /// Selects named or positional inputs for the model call.
    fn set_as_dict(&mut self, as_dict: bool) {
        self.learner_mut().set_as_dict(as_dict);
    }

    /// Runs `loader` through the learner with the extra `hooks`.
    fn get_preds(
        &self,
        loader: &DataLoader<Self::Tensor>,
        hooks: &[&dyn Callback<Self::Tensor, Self::Model>],
    ) -> Result<Predictions<Self::Tensor>> {
        self.learner().get_preds(loader, hooks)
    }
}
