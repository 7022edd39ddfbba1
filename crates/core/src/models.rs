use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed vocabulary of support intents. `Fallback` is resolver-only: the
/// classifier never emits it, so it is rejected when parsing label artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    OrderStatus,
    RefundQuery,
    ProductDetails,
    TechSupport,
    Fallback,
}

impl Intent {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "order_status" => Some(Self::OrderStatus),
            "refund_query" => Some(Self::RefundQuery),
            "product_details" => Some(Self::ProductDetails),
            "tech_support" => Some(Self::TechSupport),
            "fallback" => Some(Self::Fallback),
            _ => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::OrderStatus => "order_status",
            Self::RefundQuery => "refund_query",
            Self::ProductDetails => "product_details",
            Self::TechSupport => "tech_support",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("label vocabulary is empty")]
    Empty,
    #[error("unknown intent label {0:?} in label vocabulary")]
    Unknown(String),
    #[error("reserved label \"fallback\" cannot appear in the classifier vocabulary")]
    ReservedFallback,
}

/// Ordered label vocabulary aligned 1:1 with the classifier's probability
/// vector. The order/refund index pair for margin disambiguation is resolved
/// once here rather than looked up per request.
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    labels: Vec<Intent>,
    order_refund_pair: Option<(usize, usize)>,
}

impl LabelVocabulary {
    pub fn new(labels: Vec<Intent>) -> Result<Self, LabelError> {
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }
        if labels.contains(&Intent::Fallback) {
            return Err(LabelError::ReservedFallback);
        }

        let position = |wanted: Intent| labels.iter().position(|label| *label == wanted);
        let order_refund_pair = match (position(Intent::OrderStatus), position(Intent::RefundQuery))
        {
            (Some(order), Some(refund)) => Some((order, refund)),
            _ => None,
        };

        Ok(Self {
            labels,
            order_refund_pair,
        })
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, LabelError> {
        let labels = names
            .iter()
            .map(|name| {
                Intent::parse(name.as_ref()).ok_or_else(|| LabelError::Unknown(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Intent> {
        self.labels.get(index).copied()
    }

    /// `(order_status index, refund_query index)` when both labels exist.
    pub fn order_refund_pair(&self) -> Option<(usize, usize)> {
        self.order_refund_pair
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.labels.iter().map(|label| label.as_label()).collect()
    }
}

/// Final decision for one message. Created per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    pub intent: Intent,
    pub confidence: f32,
}

/// Resolution plus the selected reply, as handed to the serving boundary.
#[derive(Debug, Clone, Serialize)]
pub struct TriageOutcome {
    pub intent: Intent,
    pub confidence: f32,
    pub reply: String,
}
