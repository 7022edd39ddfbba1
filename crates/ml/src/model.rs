use serde::Deserialize;
use thiserror::Error;

use crate::vocab::PAD_ID;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model has no embedding rows")]
    EmptyEmbeddings,
    #[error("embedding row {row} has {got} dims, expected {expected}")]
    EmbeddingWidth {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("dense row {row} has {got} weights, expected {expected}")]
    DenseWidth {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("dense bias has {got} entries, expected {expected}")]
    BiasWidth { got: usize, expected: usize },
    #[error("model outputs {model} scores but the label vocabulary has {labels} entries")]
    LabelWidthMismatch { model: usize, labels: usize },
}

/// The trained sequence classifier, treated as a black box: same encoding in,
/// same probability vector out, no branching on intent semantics.
pub trait IntentModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// One probability-like score per label, aligned with the label
    /// vocabulary the model was trained with.
    fn infer(&self, encoding: &[u32]) -> Vec<f32>;
}

/// Shipped model artifact: mean of non-padding token embeddings, one dense
/// layer, softmax.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingBagModel {
    dims: usize,
    /// Indexed by token id; row `PAD_ID` is reserved for padding.
    embeddings: Vec<Vec<f32>>,
    /// `[labels][dims]`.
    dense_weights: Vec<Vec<f32>>,
    dense_bias: Vec<f32>,
}

impl EmbeddingBagModel {
    pub fn output_width(&self) -> usize {
        self.dense_weights.len()
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.embeddings.is_empty() {
            return Err(ArtifactError::EmptyEmbeddings);
        }
        for (row, embedding) in self.embeddings.iter().enumerate() {
            if embedding.len() != self.dims {
                return Err(ArtifactError::EmbeddingWidth {
                    row,
                    got: embedding.len(),
                    expected: self.dims,
                });
            }
        }
        for (row, weights) in self.dense_weights.iter().enumerate() {
            if weights.len() != self.dims {
                return Err(ArtifactError::DenseWidth {
                    row,
                    got: weights.len(),
                    expected: self.dims,
                });
            }
        }
        if self.dense_bias.len() != self.dense_weights.len() {
            return Err(ArtifactError::BiasWidth {
                got: self.dense_bias.len(),
                expected: self.dense_weights.len(),
            });
        }
        Ok(())
    }

    fn pooled_embedding(&self, encoding: &[u32]) -> Vec<f32> {
        let mut pooled = vec![0.0_f32; self.dims];
        let mut count = 0_usize;

        for &id in encoding {
            if id == PAD_ID {
                continue;
            }
            if let Some(embedding) = self.embeddings.get(id as usize) {
                for (slot, value) in pooled.iter_mut().zip(embedding) {
                    *slot += value;
                }
                count += 1;
            }
        }

        if count > 0 {
            for value in &mut pooled {
                *value /= count as f32;
            }
        }
        pooled
    }
}

impl IntentModel for EmbeddingBagModel {
    fn name(&self) -> &'static str {
        "embedding-bag-softmax-v1"
    }

    fn infer(&self, encoding: &[u32]) -> Vec<f32> {
        let pooled = self.pooled_embedding(encoding);

        let mut logits: Vec<f32> = self
            .dense_weights
            .iter()
            .zip(&self.dense_bias)
            .map(|(weights, bias)| {
                weights
                    .iter()
                    .zip(&pooled)
                    .map(|(weight, value)| weight * value)
                    .sum::<f32>()
                    + bias
            })
            .collect();

        softmax(&mut logits);
        logits
    }
}

fn softmax(values: &mut [f32]) {
    if values.is_empty() {
        return;
    }
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0_f32;
    for value in values.iter_mut() {
        *value = (*value - max).exp();
        sum += *value;
    }
    if sum > 0.0 {
        for value in values.iter_mut() {
            *value /= sum;
        }
    }
}
