use std::collections::HashSet;

use serde::Deserialize;

const REFUND_KEYWORDS: &[&str] = &[
    "refund",
    "money",
    "return",
    "returned",
    "cash",
    "credit",
    "credited",
    "amount",
    "repay",
    "reimbursement",
    "reverse",
    "reversed",
    "chargeback",
];

const ORDER_KEYWORDS: &[&str] = &[
    "order", "track", "delivery", "arrive", "arrived", "shipped", "dispatch", "dispatched",
    "package", "status",
];

const DOMAIN_KEYWORDS: &[&str] = &[
    "order",
    "track",
    "delivery",
    "arrive",
    "arrived",
    "package",
    "dispatch",
    "dispatched",
    "shipped",
    "refund",
    "money",
    "return",
    "credited",
    "otp",
    "account",
    "login",
    "password",
    "price",
    "cost",
    "warranty",
    "product",
    "website",
    "loading",
    "error",
    "support",
    "help",
    "model",
    "details",
    "information",
    "item",
    "app",
    "features",
    "specifications",
    "logging",
    "material",
    "issue",
    "problem",
    "wrong",
    "failed",
    "not",
    "working",
    "cant",
    "cannot",
    "unable",
    "crash",
    "crashed",
    "stuck",
    "hang",
    "hanging",
    "slow",
    "bug",
    "glitch",
];

/// Static lexical evidence used by the resolver. Loaded once at startup and
/// read-only afterwards; `Default` carries the shipped word lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordSets {
    pub domain: HashSet<String>,
    pub refund: HashSet<String>,
    pub order: HashSet<String>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        let to_set = |words: &[&str]| words.iter().map(|word| word.to_string()).collect();
        Self {
            domain: to_set(DOMAIN_KEYWORDS),
            refund: to_set(REFUND_KEYWORDS),
            order: to_set(ORDER_KEYWORDS),
        }
    }
}

impl KeywordSets {
    pub fn has_domain_word(&self, tokens: &HashSet<&str>) -> bool {
        intersects(&self.domain, tokens)
    }

    pub fn has_refund_word(&self, tokens: &HashSet<&str>) -> bool {
        intersects(&self.refund, tokens)
    }

    pub fn has_order_word(&self, tokens: &HashSet<&str>) -> bool {
        intersects(&self.order, tokens)
    }
}

fn intersects(keywords: &HashSet<String>, tokens: &HashSet<&str>) -> bool {
    tokens.iter().any(|token| keywords.contains(*token))
}
