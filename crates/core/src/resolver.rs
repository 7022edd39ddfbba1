use std::collections::HashSet;

use crate::keywords::KeywordSets;
use crate::models::{Intent, LabelVocabulary, Resolution};
use crate::normalize::normalize;

/// Tunable thresholds for the confidence gate and the order/refund
/// disambiguation margin.
#[derive(Debug, Clone, Copy)]
pub struct ResolveParams {
    /// Minimum top probability below which the message goes to fallback.
    pub min_conf: f32,
    /// Probability distance under which order/refund are "too close to call"
    /// and keyword evidence decides.
    pub margin: f32,
}

impl Default for ResolveParams {
    fn default() -> Self {
        Self {
            min_conf: 0.35,
            margin: 0.15,
        }
    }
}

/// Turns a classifier probability vector plus the message text into a final
/// `(intent, confidence)` decision. Stateless and side-effect-free; safe to
/// share across any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Resolver {
    labels: LabelVocabulary,
    keywords: KeywordSets,
}

impl Resolver {
    pub fn new(labels: LabelVocabulary, keywords: KeywordSets) -> Self {
        Self { labels, keywords }
    }

    pub fn labels(&self) -> &LabelVocabulary {
        &self.labels
    }

    pub fn resolve(&self, text: &str, probs: &[f32], params: &ResolveParams) -> Resolution {
        let normalized = normalize(text);
        let tokens: HashSet<&str> = normalized.split_whitespace().collect();

        let Some((top_idx, top_prob)) = argmax(probs) else {
            return Resolution {
                intent: Intent::Fallback,
                confidence: 0.0,
            };
        };
        let Some(mut top_intent) = self.labels.get(top_idx) else {
            return Resolution {
                intent: Intent::Fallback,
                confidence: top_prob,
            };
        };
        let mut top_prob = top_prob;

        // Margin disambiguation only exists when the loaded vocabulary has
        // both labels; the pair was resolved once at startup.
        if let Some((order_idx, refund_idx)) = self.labels.order_refund_pair() {
            let order_prob = probs.get(order_idx).copied().unwrap_or(0.0);
            let refund_prob = probs.get(refund_idx).copied().unwrap_or(0.0);

            if (order_prob - refund_prob).abs() < params.margin {
                // Refund evidence wins over order evidence when both are
                // present. Asymmetric on purpose; observed behavior.
                if self.keywords.has_refund_word(&tokens) {
                    top_intent = Intent::RefundQuery;
                    top_prob = refund_prob;
                } else if self.keywords.has_order_word(&tokens) {
                    top_intent = Intent::OrderStatus;
                    top_prob = order_prob;
                }
            }
        }

        if !self.keywords.has_domain_word(&tokens) || top_prob < params.min_conf {
            return Resolution {
                intent: Intent::Fallback,
                confidence: top_prob,
            };
        }

        Resolution {
            intent: top_intent,
            confidence: top_prob,
        }
    }
}

fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &prob) in probs.iter().enumerate() {
        match best {
            Some((_, best_prob)) if prob <= best_prob => {}
            _ => best = Some((index, prob)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_vocabulary() -> LabelVocabulary {
        LabelVocabulary::from_names(&[
            "order_status",
            "product_details",
            "refund_query",
            "tech_support",
        ])
        .unwrap()
    }

    fn resolver() -> Resolver {
        Resolver::new(full_vocabulary(), KeywordSets::default())
    }

    #[test]
    fn no_domain_word_always_falls_back() {
        let resolution = resolver().resolve(
            "hello there",
            &[0.9, 0.05, 0.03, 0.02],
            &ResolveParams::default(),
        );
        assert_eq!(resolution.intent, Intent::Fallback);
        assert!((resolution.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn low_confidence_falls_back_even_with_domain_word() {
        let resolution = resolver().resolve(
            "where is my order",
            &[0.2, 0.1, 0.1, 0.1],
            &ResolveParams::default(),
        );
        assert_eq!(resolution.intent, Intent::Fallback);
        assert!((resolution.confidence - 0.2).abs() < 1e-6);
    }

    #[test]
    fn refund_evidence_wins_inside_the_margin() {
        // order 0.40 vs refund 0.48: gap 0.08 < margin 0.15, and the text
        // carries both a refund and an order keyword.
        let resolution = resolver().resolve(
            "refund my order please",
            &[0.40, 0.06, 0.48, 0.06],
            &ResolveParams::default(),
        );
        assert_eq!(resolution.intent, Intent::RefundQuery);
        assert!((resolution.confidence - 0.48).abs() < 1e-6);
    }

    #[test]
    fn order_evidence_applies_when_no_refund_word() {
        let resolution = resolver().resolve(
            "status please",
            &[0.40, 0.06, 0.48, 0.06],
            &ResolveParams::default(),
        );
        assert_eq!(resolution.intent, Intent::OrderStatus);
        assert!((resolution.confidence - 0.40).abs() < 1e-6);
    }

    #[test]
    fn close_scores_without_keyword_evidence_keep_the_model_choice() {
        let resolution = resolver().resolve(
            "the app keeps showing an error",
            &[0.40, 0.06, 0.48, 0.52],
            &ResolveParams::default(),
        );
        assert_eq!(resolution.intent, Intent::TechSupport);
        assert!((resolution.confidence - 0.52).abs() < 1e-6);
    }

    #[test]
    fn disambiguation_is_skipped_without_the_label_pair() {
        let labels = LabelVocabulary::from_names(&["product_details", "tech_support"]).unwrap();
        let resolver = Resolver::new(labels, KeywordSets::default());
        // "refund" is a domain word too, so the gate passes and the raw
        // argmax stands even though refund keywords are present.
        let resolution = resolver.resolve("refund", &[0.7, 0.3], &ResolveParams::default());
        assert_eq!(resolution.intent, Intent::ProductDetails);
    }

    #[test]
    fn custom_params_are_honored() {
        let params = ResolveParams {
            min_conf: 0.6,
            margin: 0.0,
        };
        let resolution = resolver().resolve("track my package", &[0.5, 0.1, 0.2, 0.2], &params);
        assert_eq!(resolution.intent, Intent::Fallback);

        let params = ResolveParams {
            min_conf: 0.35,
            margin: 0.0,
        };
        let resolution = resolver().resolve("track my package", &[0.5, 0.1, 0.2, 0.2], &params);
        assert_eq!(resolution.intent, Intent::OrderStatus);
    }

    #[test]
    fn empty_text_falls_back() {
        let resolution = resolver().resolve("", &[0.9, 0.05, 0.03, 0.02], &ResolveParams::default());
        assert_eq!(resolution.intent, Intent::Fallback);
    }

    #[test]
    fn empty_probability_vector_falls_back_with_zero_confidence() {
        let resolution = resolver().resolve("where is my order", &[], &ResolveParams::default());
        assert_eq!(resolution.intent, Intent::Fallback);
        assert_eq!(resolution.confidence, 0.0);
    }

    #[test]
    fn scores_need_not_sum_to_one() {
        let resolution = resolver().resolve(
            "track my package",
            &[3.0, 0.2, 0.1, 0.4],
            &ResolveParams::default(),
        );
        assert_eq!(resolution.intent, Intent::OrderStatus);
        assert!((resolution.confidence - 3.0).abs() < 1e-6);
    }
}
