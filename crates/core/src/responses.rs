use std::collections::HashMap;

use rand::Rng;
use serde::Deserialize;

use crate::models::Intent;

const SUPPORT_EMAIL: &str = "support@yourcompany.com";
const SUPPORT_PHONE: &str = "+1-800-123-4567";
const ORDER_LINK: &str = "https://yourcompany.com/track-order";
const REFUND_LINK: &str = "https://yourcompany.com/refund";
const PRODUCT_LINK: &str = "https://yourcompany.com/products";
const ACCOUNT_LINK: &str = "https://yourcompany.com/account";
const HELP_LINK: &str = "https://yourcompany.com/help";

const LAST_RESORT_REPLY: &str = "I'm not sure how to help with that.";

/// Pre-authored reply variants per intent. Selection is uniform random among
/// an intent's candidates so repeated identical questions do not read like a
/// broken record.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ResponseBank {
    replies: HashMap<Intent, Vec<String>>,
}

impl Default for ResponseBank {
    fn default() -> Self {
        let mut replies = HashMap::new();

        replies.insert(
            Intent::OrderStatus,
            vec![format!(
                "You can track the current status of your order using this link:\n\
                 {ORDER_LINK}\n\n\
                 If your order is delayed or the status has not updated, you may:\n\
                 • Contact our support team at {SUPPORT_EMAIL}\n\
                 • Call us at {SUPPORT_PHONE} for immediate assistance."
            )],
        );
        replies.insert(
            Intent::RefundQuery,
            vec![format!(
                "You can review our refund policy and submit a refund request here:\n\
                 {REFUND_LINK}\n\n\
                 If you are eligible, you will receive an email confirmation within 24-48 hours.\n\
                 For further assistance, contact {SUPPORT_EMAIL} or call {SUPPORT_PHONE}."
            )],
        );
        replies.insert(
            Intent::ProductDetails,
            vec![format!(
                "You can find detailed information, specifications, and pricing for our products here:\n\
                 {PRODUCT_LINK}\n\n\
                 If you need further help, contact {SUPPORT_EMAIL} or visit {HELP_LINK}."
            )],
        );
        replies.insert(
            Intent::TechSupport,
            vec![format!(
                "For technical issues related to login, OTP, or app problems, please visit:\n\
                 {ACCOUNT_LINK}\n\n\
                 If the problem continues, you may:\n\
                 • Email our technical team at {SUPPORT_EMAIL}\n\
                 • Call {SUPPORT_PHONE} for urgent support."
            )],
        );
        replies.insert(
            Intent::Fallback,
            vec![format!(
                "I can assist you with order tracking, refunds, product information, or technical support.\n\n\
                 Please visit our help center at {HELP_LINK}\n\
                 Or contact us at {SUPPORT_EMAIL}."
            )],
        );

        Self { replies }
    }
}

impl ResponseBank {
    pub fn candidates(&self, intent: Intent) -> &[String] {
        self.replies
            .get(&intent)
            .or_else(|| self.replies.get(&Intent::Fallback))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Picks one of the intent's candidates with the thread RNG. An intent
    /// missing from the bank maps to the fallback candidates.
    pub fn select_reply(&self, intent: Intent) -> &str {
        self.select_reply_with(intent, &mut rand::rng())
    }

    /// Same as `select_reply` with an injected randomness source, so callers
    /// can pin the choice with a seeded RNG.
    pub fn select_reply_with<R: Rng + ?Sized>(&self, intent: Intent, rng: &mut R) -> &str {
        let candidates = self.candidates(intent);
        if candidates.is_empty() {
            return LAST_RESORT_REPLY;
        }
        &candidates[rng.random_range(0..candidates.len())]
    }
}
