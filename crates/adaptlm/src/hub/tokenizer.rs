use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use tokenizers::{PaddingParams, PaddingStrategy, TruncationParams};

use crate::error::{AdaptError, Result};
use crate::model::{
    clean_up_tokenization, DecodeOptions, EncodeOptions, Encoding, FromPretrained, Padding, Tokenizer,
};
use super::resolve::resolve_file;

fn tokenization(err: tokenizers::Error) -> AdaptError {
    AdaptError::Tokenization(anyhow::Error::msg(err))
}

/// # HfTokenizer
///
/// A `tokenizer.json` tokenizer producing `u32` id and mask tensors.
#[derive(Debug, Clone)]
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
    device: Device,
}

impl HfTokenizer {
    pub fn new(inner: tokenizers::Tokenizer) -> Self {
        Self { inner, device: Device::Cpu }
    }

    /// A tokenizer configured for one encode call
    fn configured(&self, options: &EncodeOptions) -> Result<tokenizers::Tokenizer> {
        let mut tokenizer = self.inner.clone();

        let padding = match options.padding {
            Padding::DoNotPad => None,
            padding => {
                let mut params = self.inner.get_padding().cloned().unwrap_or_else(|| self.default_padding());
                params.strategy = match padding {
                    Padding::Longest => PaddingStrategy::BatchLongest,
                    _ => PaddingStrategy::Fixed(options.max_length),
                };
                Some(params)
            }
        };
        tokenizer.with_padding(padding);

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: options.max_length,
                ..Default::default()
            }))
            .map_err(tokenization)?;

        Ok(tokenizer)
    }

    fn default_padding(&self) -> PaddingParams {
        let mut params = PaddingParams::default();
        if let Some(pad_id) = self.inner.token_to_id("<pad>") {
            params.pad_id = pad_id;
            params.pad_token = "<pad>".to_string();
        }
        params
    }

    fn to_tensor(&self, rows: Vec<Vec<u32>>) -> Result<Tensor> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return Err(AdaptError::Tokenization(anyhow::anyhow!(
                "encoded rows differ in length, pad the batch"
            )));
        }
        let n = rows.len();
        let data: Vec<u32> = rows.into_iter().flatten().collect();
        Tensor::from_vec(data, (n, width), &self.device).map_err(AdaptError::tensor)
    }
}

impl Tokenizer<Tensor> for HfTokenizer {
    fn batch_encode_plus(&self, texts: &[String], options: &EncodeOptions) -> Result<Encoding<Tensor>> {
        let encodings = self
            .configured(options)?
            .encode_batch(texts.to_vec(), options.add_special_tokens)
            .map_err(tokenization)?;

        let ids = encodings.iter().map(|e| e.get_ids().to_vec()).collect();
        let masks = encodings.iter().map(|e| e.get_attention_mask().to_vec()).collect();
        let type_ids = encodings.iter().map(|e| e.get_type_ids().to_vec()).collect();

        Ok(Encoding {
            input_ids: self.to_tensor(ids)?,
            attention_mask: self.to_tensor(masks)?,
            token_type_ids: Some(self.to_tensor(type_ids)?),
        })
    }

    fn decode(&self, token_ids: &Tensor, options: &DecodeOptions) -> Result<String> {
        let ids = token_ids
            .flatten_all()
            .and_then(|t| t.to_dtype(DType::U32))
            .and_then(|t| t.to_vec1::<u32>())
            .map_err(AdaptError::tensor)?;

        let text = self.inner.decode(&ids, options.skip_special_tokens).map_err(tokenization)?;
        if options.clean_up_tokenization_spaces {
            Ok(clean_up_tokenization(&text))
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl FromPretrained for HfTokenizer {
    async fn from_pretrained(identifier: &str) -> Result<Self> {
        let path = resolve_file(identifier, "tokenizer.json").await?;
        let inner = tokenizers::Tokenizer::from_file(&path)
            .map_err(|e| AdaptError::resolution(identifier, anyhow::Error::msg(e)))?;
        Ok(Self::new(inner))
    }
}
