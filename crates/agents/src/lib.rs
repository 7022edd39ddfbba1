use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, instrument};
use triage_core::{
    Intent, KeywordSets, LabelVocabulary, ResolveParams, Resolver, ResponseBank, TriageOutcome,
};
use triage_ml::ClassifierAdapter;
use triage_observability::AppMetrics;

/// Runs the full per-message pipeline: normalize, classify, resolve, select
/// a reply. Holds only read-only artifacts behind `Arc`, so cloning is cheap
/// and concurrent use needs no coordination.
#[derive(Clone)]
pub struct TriageAgent {
    adapter: Arc<ClassifierAdapter>,
    resolver: Arc<Resolver>,
    responses: Arc<ResponseBank>,
    params: ResolveParams,
    metrics: Arc<AppMetrics>,
}

impl TriageAgent {
    pub fn new(
        adapter: Arc<ClassifierAdapter>,
        keywords: KeywordSets,
        responses: ResponseBank,
        params: ResolveParams,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        let resolver = Arc::new(Resolver::new(adapter.labels().clone(), keywords));
        Self {
            adapter,
            resolver,
            responses: Arc::new(responses),
            params,
            metrics,
        }
    }

    pub fn labels(&self) -> &LabelVocabulary {
        self.resolver.labels()
    }

    pub fn params(&self) -> ResolveParams {
        self.params
    }

    #[instrument(skip(self, text))]
    pub async fn handle_message(&self, text: String) -> Result<TriageOutcome> {
        let started = Instant::now();
        self.metrics.inc_request();

        let normalized = triage_core::normalize(&text);

        // Inference can be heavy; keep it off the async accept path.
        let adapter = self.adapter.clone();
        let probs = tokio::task::spawn_blocking(move || adapter.classify(&normalized)).await?;
        self.metrics.inc_inference();

        let resolution = self.resolver.resolve(&text, &probs, &self.params);
        if resolution.intent == Intent::Fallback {
            self.metrics.inc_fallback();
        }

        let reply = self.responses.select_reply(resolution.intent).to_string();

        self.metrics.observe_latency(started.elapsed());
        info!(
            intent = resolution.intent.as_label(),
            confidence = resolution.confidence,
            model = self.adapter.model_name(),
            "message triaged"
        );

        Ok(TriageOutcome {
            intent: resolution.intent,
            confidence: resolution.confidence,
            reply,
        })
    }
}
