use crate::backend::Backend;
use crate::error::Result;

/// Longest input the translator feeds to a tokenizer, in tokens.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 512;

/// How a batch of encodings is padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Pad every sequence to `max_length`
    MaxLength,
    /// Pad to the longest sequence in the batch
    Longest,
    /// Leave sequences unpadded; only valid when they already agree in length
    DoNotPad,
}

/// Options for [`Tokenizer::batch_encode_plus`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    /// Sequences are truncated to this many tokens
    pub max_length: usize,
    pub padding: Padding,
    /// Add the model's special tokens (e.g. EOS)
    pub add_special_tokens: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_INPUT_LENGTH,
            padding: Padding::MaxLength,
            add_special_tokens: true,
        }
    }
}

/// Options for [`Tokenizer::decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub skip_special_tokens: bool,
    /// Remove spaces before punctuation and contractions
    pub clean_up_tokenization_spaces: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            skip_special_tokens: true,
            clean_up_tokenization_spaces: false,
        }
    }
}

/// The tensors produced by encoding a batch of texts.
///
/// Every tensor has shape `(texts, padded_len)`.
#[derive(Debug, Clone)]
pub struct Encoding<B> {
    pub input_ids: B,
    pub attention_mask: B,
    pub token_type_ids: Option<B>,
}

/// # Tokenizer
///
/// Text to tensor conversion for one pretrained model.
pub trait Tokenizer<B>: Send + Sync
where B: Backend
{
    /// Encodes `texts` into fixed-length padded tensors, one row per text in input order.
    fn batch_encode_plus(&self, texts: &[String], options: &EncodeOptions) -> Result<Encoding<B>>;

    /// Decodes one generated sequence back into text.
    ///
    /// `token_ids` is either rank 1 or a single row of shape `(1, len)`.
    fn decode(&self, token_ids: &B, options: &DecodeOptions) -> Result<String>;
}

/// Removes the spaces a word-piece detokenizer leaves before punctuation
/// and English contractions.
pub fn clean_up_tokenization(text: &str) -> String {
    const REPLACEMENTS: [(&str, &str); 10] = [
        (" .", "."),
        (" ?", "?"),
        (" !", "!"),
        (" ,", ","),
        (" ' ", "'"),
        (" n't", "n't"),
        (" 'm", "'m"),
        (" 's", "'s"),
        (" 've", "'ve"),
        (" 're", "'re"),
    ];

    REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}
