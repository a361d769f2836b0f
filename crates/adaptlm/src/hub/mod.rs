//! # Hub
//!
//! Pretrained components backed by `tokenizers` and `candle-transformers`,
//! loaded from the Hugging Face hub or a local directory.
//!
//! Only T5 checkpoints are supported for generation. Identifiers that name
//! an existing local directory are read from disk; anything else is fetched
//! through the hub cache.

mod resolve;
mod search;
mod t5;
mod tokenizer;

pub use resolve::resolve_file;
pub use t5::T5Generator;
pub use tokenizer::HfTokenizer;

use candle_core::Tensor;

use crate::translation::TransformersTranslator;

/// A translator over a T5 checkpoint
pub type T5Translator = TransformersTranslator<Tensor, HfTokenizer, T5Generator>;
