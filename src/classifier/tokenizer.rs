use crate::error::ClassifierError;
use candle_core::{Device, Tensor};
use std::path::Path;
use tokenizers::{Encoding, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

/// Token ids plus the matching padding mask for one batch
pub struct EncodedBatch {
    /// `(batch, seq_len)` u32 token ids
    pub input_ids: Tensor,
    /// `(batch, seq_len)` u8, 1 where the position is padding
    pub padding_mask: Tensor,
}

/// Tokenizer configured for batched classification input
pub struct BatchTokenizer {
    tokenizer: Tokenizer,
}

impl BatchTokenizer {
    /// Loads `tokenizer.json`, padding each batch to its longest member and
    /// truncating to `max_length` tokens
    pub fn from_file(path: &Path, max_length: usize) -> Result<Self, ClassifierError> {
        let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
            ClassifierError::Tokenizer(format!("failed to load {}: {}", path.display(), e))
        })?;

        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        Ok(Self { tokenizer })
    }

    pub fn encode_batch(
        &self,
        texts: &[String],
        device: &Device,
    ) -> Result<EncodedBatch, ClassifierError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        let batch = encodings_to_tensors(&encodings, device)?;
        ::log::trace!(
            "Tokenized {} texts, shape: {:?}",
            texts.len(),
            batch.input_ids.shape()
        );
        Ok(batch)
    }
}

fn encodings_to_tensors(
    encodings: &[Encoding],
    device: &Device,
) -> Result<EncodedBatch, ClassifierError> {
    let batch_size = encodings.len();
    let seq_len = encodings.first().map(|e| e.get_ids().len()).unwrap_or(0);

    let mut input_ids = Vec::with_capacity(batch_size * seq_len);
    let mut padding_mask = Vec::with_capacity(batch_size * seq_len);

    for encoding in encodings {
        if encoding.get_ids().len() != seq_len {
            return Err(ClassifierError::Tokenizer(format!(
                "ragged batch: expected {} tokens, got {}",
                seq_len,
                encoding.get_ids().len()
            )));
        }
        input_ids.extend_from_slice(encoding.get_ids());
        padding_mask.extend(
            encoding
                .get_attention_mask()
                .iter()
                .map(|&attend| u8::from(attend == 0)),
        );
    }

    Ok(EncodedBatch {
        input_ids: Tensor::from_vec(input_ids, (batch_size, seq_len), device)?,
        padding_mask: Tensor::from_vec(padding_mask, (batch_size, seq_len), device)?,
    })
}
