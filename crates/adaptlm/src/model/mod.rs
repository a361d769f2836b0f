//! # Pretrained-model interfaces
//!
//! The pipeline never owns a tokenizer or a network itself. It talks to them
//! through the traits in this module:
//!
//! * [`Module`] - the default forward computation the learner runs when no hook
//!   cancels a batch
//! * [`Seq2SeqModel`] - a module that can also generate token sequences
//! * [`Tokenizer`] - batch encoding into padded tensors and decoding back to text
//! * [`FromPretrained`] - construction from a model identifier or local path
//!
//! With the `candle` feature enabled, [`crate::hub`] provides implementations
//! backed by `tokenizers` and `candle-transformers`.

mod core_trait;
mod tokenizer;

pub use core_trait::*;
pub use tokenizer::*;
