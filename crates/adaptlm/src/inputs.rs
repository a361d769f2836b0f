//! Named and positional views of a batch's model inputs.

use crate::backend::Backend;

/// Key for the token ids of a batch
pub const INPUT_IDS: &str = "input_ids";

/// Key for the attention mask of a batch
pub const ATTENTION_MASK: &str = "attention_mask";

/// Key for the optional token type ids of a batch
pub const TOKEN_TYPE_IDS: &str = "token_type_ids";

/// # StructuredInputs
///
/// The named-field reinterpretation of a positional batch.
///
/// Key `i` always corresponds to batch position `i`: `input_ids` is position
/// `0`, `attention_mask` position `1` and `token_type_ids`, when present,
/// position `2`. Iteration follows that order.
#[derive(Debug, Clone)]
pub struct StructuredInputs<B> {
    pub input_ids: B,
    pub attention_mask: B,
    pub token_type_ids: Option<B>,
}

impl<B> StructuredInputs<B>
where B: Backend
{
    pub fn new(input_ids: B, attention_mask: B, token_type_ids: Option<B>) -> Self {
        Self { input_ids, attention_mask, token_type_ids }
    }

    /// Keys present in this structure, in positional order
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = vec![INPUT_IDS, ATTENTION_MASK];
        if self.token_type_ids.is_some() {
            keys.push(TOKEN_TYPE_IDS);
        }
        keys
    }

    /// Looks up a tensor by key
    pub fn get(&self, key: &str) -> Option<&B> {
        match key {
            INPUT_IDS => Some(&self.input_ids),
            ATTENTION_MASK => Some(&self.attention_mask),
            TOKEN_TYPE_IDS => self.token_type_ids.as_ref(),
            _ => None,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        if self.token_type_ids.is_some() { 3 } else { 2 }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Borrowed tensors in positional order
    pub fn values(&self) -> Vec<&B> {
        let mut values = vec![&self.input_ids, &self.attention_mask];
        if let Some(token_type_ids) = &self.token_type_ids {
            values.push(token_type_ids);
        }
        values
    }

    /// Owned tensors in positional order
    pub fn into_values(self) -> Vec<B> {
        let mut values = vec![self.input_ids, self.attention_mask];
        values.extend(self.token_type_ids);
        values
    }
}

/// # RoutedInputs
///
/// How the structured inputs are exposed to the model computation.
#[derive(Debug, Clone)]
pub enum RoutedInputs<B> {
    /// Tensors in positional order, for models called with positional arguments
    Positional(Vec<B>),

    /// The named structure itself, for models called with keyword inputs
    Named(StructuredInputs<B>),
}

impl<B> RoutedInputs<B>
where B: Backend
{
    /// The named structure, when routed as a dictionary
    pub fn as_named(&self) -> Option<&StructuredInputs<B>> {
        match self {
            RoutedInputs::Named(inputs) => Some(inputs),
            RoutedInputs::Positional(_) => None,
        }
    }

    /// The token ids regardless of routing mode
    pub fn input_ids(&self) -> Option<&B> {
        match self {
            RoutedInputs::Named(inputs) => Some(&inputs.input_ids),
            RoutedInputs::Positional(values) => values.first(),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, RoutedInputs::Named(_))
    }
}
