use crate::classifier::SequenceClassifier;
use crate::classifier::tokenizer::BatchTokenizer;
use crate::config::{ClassifierConfig, DeviceConfig};
use crate::error::ClassifierError;
use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder, linear};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// The parts of a sequence-classification `config.json` that size the head
#[derive(Debug, Deserialize)]
struct HeadConfig {
    dim: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

impl HeadConfig {
    fn num_labels(&self) -> usize {
        if self.id2label.is_empty() {
            2
        } else {
            self.id2label.len()
        }
    }
}

/// DistilBERT with a sequence-classification head, run on candle
pub struct DistilBertClassifier {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: BatchTokenizer,
    device: Device,
}

impl DistilBertClassifier {
    /// Loads weights from `model_dir` (config.json + model.safetensors) and the
    /// tokenizer named by the configuration
    pub fn load(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let device = create_device(config.device)?;
        let model_dir = config.model_dir.as_path();

        let config_path = model_dir.join("config.json");
        let model_config: DistilBertConfig = read_json(&config_path)?;
        let head_config: HeadConfig = read_json(&config_path)?;

        let weights_path = model_dir.join("model.safetensors");
        if !weights_path.exists() {
            return Err(ClassifierError::ModelLoading(format!(
                "weights not found at {}",
                weights_path.display()
            )));
        }
        // SAFETY: the weights file is opened read-only and not modified while mapped
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? };

        let model = DistilBertModel::load(vb.clone(), &model_config)?;
        let pre_classifier = linear(head_config.dim, head_config.dim, vb.pp("pre_classifier"))?;
        let classifier = linear(head_config.dim, head_config.num_labels(), vb.pp("classifier"))?;

        let tokenizer =
            BatchTokenizer::from_file(&config.tokenizer_path(), config.max_sequence_length)?;

        ::log::info!(
            "Loaded classifier from {} ({} labels, device {:?})",
            model_dir.display(),
            head_config.num_labels(),
            device
        );

        Ok(Self {
            model,
            pre_classifier,
            classifier,
            tokenizer,
            device,
        })
    }

    /// Per-item class logits, shape `(batch, num_labels)`
    pub fn logits(&self, texts: &[String]) -> Result<Tensor, ClassifierError> {
        let batch = self.tokenizer.encode_batch(texts, &self.device)?;
        let (batch_size, seq_len) = batch.padding_mask.dims2()?;

        // Broadcast over heads and query positions inside attention
        let mask = batch.padding_mask.reshape((batch_size, 1, 1, seq_len))?;
        let hidden = self.model.forward(&batch.input_ids, &mask)?;

        let first_token = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&first_token)?.relu()?;
        Ok(self.classifier.forward(&pooled)?)
    }
}

impl SequenceClassifier for DistilBertClassifier {
    fn predict(&self, texts: &[String]) -> Result<Vec<usize>, ClassifierError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let classes = self.logits(texts)?.argmax(D::Minus1)?.to_vec1::<u32>()?;
        Ok(classes.into_iter().map(|class| class as usize).collect())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ClassifierError> {
    let file = File::open(path).map_err(|e| {
        ClassifierError::ModelLoading(format!("failed to open {}: {}", path.display(), e))
    })?;
    serde_json::from_reader(file).map_err(|e| {
        ClassifierError::ModelLoading(format!("failed to parse {}: {}", path.display(), e))
    })
}

fn create_device(config: DeviceConfig) -> Result<Device, ClassifierError> {
    match config {
        DeviceConfig::Cpu => Ok(Device::Cpu),
        DeviceConfig::Cuda => Ok(Device::new_cuda(0)?),
        DeviceConfig::Auto => Ok(Device::cuda_if_available(0)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_config_labels() {
        let head: HeadConfig = serde_json::from_str(
            r#"{ "dim": 768, "id2label": { "0": "OTHER", "1": "PRODUCT" }, "n_layers": 6 }"#,
        )
        .unwrap();
        assert_eq!(head.dim, 768);
        assert_eq!(head.num_labels(), 2);

        let head: HeadConfig = serde_json::from_str(r#"{ "dim": 32 }"#).unwrap();
        assert_eq!(head.num_labels(), 2);
    }

    #[test]
    fn test_missing_model_dir_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClassifierConfig {
            model_dir: dir.path().join("absent"),
            device: DeviceConfig::Cpu,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            DistilBertClassifier::load(&config),
            Err(ClassifierError::ModelLoading(_))
        ));
    }

    #[test]
    fn test_cpu_device() {
        assert!(matches!(create_device(DeviceConfig::Cpu), Ok(Device::Cpu)));
    }
}
