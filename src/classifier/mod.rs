//! Batched product-name classification
//!
//! [`BatchClassifier`] splits candidates into fixed-size chunks and keeps the
//! ones a [`SequenceClassifier`] labels with the positive class. The model is
//! frozen: it is only ever run forward.

pub mod distilbert;
pub mod tokenizer;

pub use distilbert::DistilBertClassifier;

use crate::error::ClassifierError;

/// Default number of candidates per inference call
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// A frozen two-class sequence classifier
pub trait SequenceClassifier {
    /// Predicted class index for every text, in input order
    fn predict(&self, texts: &[String]) -> Result<Vec<usize>, ClassifierError>;
}

impl<M: SequenceClassifier + ?Sized> SequenceClassifier for &M {
    fn predict(&self, texts: &[String]) -> Result<Vec<usize>, ClassifierError> {
        (**self).predict(texts)
    }
}

/// Runs candidates through a model in chunks of at most `batch_size`
pub struct BatchClassifier<M> {
    model: M,
    batch_size: usize,
    positive_class: usize,
}

impl<M: SequenceClassifier> BatchClassifier<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            batch_size: DEFAULT_BATCH_SIZE,
            positive_class: 1,
        }
    }

    /// Set the chunk size; zero is treated as one
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the class index that counts as a product name
    pub fn with_positive_class(mut self, positive_class: usize) -> Self {
        self.positive_class = positive_class;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the candidates predicted positive, in their original order
    ///
    /// A chunk that fails is logged and contributes nothing; the remaining
    /// chunks are still classified.
    pub fn classify(&self, candidates: &[String]) -> Vec<String> {
        let mut positives = Vec::new();
        if candidates.is_empty() {
            return positives;
        }

        for (chunk_index, chunk) in candidates.chunks(self.batch_size).enumerate() {
            let offset = chunk_index * self.batch_size;
            match self.predict_chunk(chunk) {
                Ok(classes) => positives.extend(
                    chunk
                        .iter()
                        .zip(classes)
                        .filter(|(_, class)| *class == self.positive_class)
                        .map(|(text, _)| text.clone()),
                ),
                Err(e) => {
                    ::log::error!(
                        "Classification failed for candidates {}..{}: {}",
                        offset,
                        offset + chunk.len(),
                        e
                    );
                }
            }
        }

        ::log::debug!(
            "Classifier kept {} of {} candidates",
            positives.len(),
            candidates.len()
        );
        positives
    }

    fn predict_chunk(&self, chunk: &[String]) -> Result<Vec<usize>, ClassifierError> {
        let classes = self.model.predict(chunk)?;
        if classes.len() != chunk.len() {
            return Err(ClassifierError::PredictionCount {
                expected: chunk.len(),
                actual: classes.len(),
            });
        }
        Ok(classes)
    }
}
