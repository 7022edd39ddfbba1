mod model;
mod vocab;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use triage_core::LabelVocabulary;

pub use model::{ArtifactError, EmbeddingBagModel, IntentModel};
pub use vocab::{Vocabulary, PAD_ID};

/// Wraps the externally supplied classifier artifacts: vocabulary encoder,
/// ordered label vocabulary, and the trained model. Loaded once at startup;
/// read-only and shareable across concurrent requests afterwards.
///
/// All intent decisions live in the resolver; this adapter only turns
/// normalized text into a probability vector.
#[derive(Clone)]
pub struct ClassifierAdapter {
    vocabulary: Vocabulary,
    labels: LabelVocabulary,
    model: Arc<dyn IntentModel>,
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("vocabulary", &self.vocabulary)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl ClassifierAdapter {
    /// Reads `vocab.json`, `labels.json`, and `model.json` from
    /// `artifacts_dir`. Any missing or malformed artifact is a fatal startup
    /// error, never a per-request one.
    pub fn load(artifacts_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = artifacts_dir.as_ref();

        let vocabulary: Vocabulary = read_json(&dir.join("vocab.json"))?;
        let label_names: Vec<String> = read_json(&dir.join("labels.json"))?;
        let labels = LabelVocabulary::from_names(&label_names)
            .context("invalid label vocabulary artifact")?;

        let model: EmbeddingBagModel = read_json(&dir.join("model.json"))?;
        model.validate().context("model artifact failed validation")?;
        if model.output_width() != labels.len() {
            return Err(ArtifactError::LabelWidthMismatch {
                model: model.output_width(),
                labels: labels.len(),
            })
            .context("model and label artifacts disagree");
        }

        Ok(Self {
            vocabulary,
            labels,
            model: Arc::new(model),
        })
    }

    /// Assembles an adapter from parts, mainly so tests can inject a mock
    /// model behind the same interface.
    pub fn from_parts(
        vocabulary: Vocabulary,
        labels: LabelVocabulary,
        model: Arc<dyn IntentModel>,
    ) -> Self {
        Self {
            vocabulary,
            labels,
            model,
        }
    }

    pub fn labels(&self) -> &LabelVocabulary {
        &self.labels
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Encodes already-normalized text and runs inference. May be
    /// computationally heavy; callers on an async path should treat it as
    /// blocking.
    pub fn classify(&self, normalized_text: &str) -> Vec<f32> {
        self.model.infer(&self.vocabulary.encode(normalized_text))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading artifact at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing artifact at {}", path.display()))
}
