use std::collections::HashMap;

use serde::Deserialize;

pub const PAD_ID: u32 = 0;

/// Token-to-id vocabulary with the fixed-length encoding rules the model was
/// trained against: unknown tokens map to `oov_id` or are dropped, then the
/// sequence is zero-padded or truncated at the end to `max_len`.
#[derive(Debug, Clone, Deserialize)]
pub struct Vocabulary {
    tokens: HashMap<String, u32>,
    max_len: usize,
    #[serde(default)]
    oov_id: Option<u32>,
}

impl Vocabulary {
    pub fn new(tokens: HashMap<String, u32>, max_len: usize, oov_id: Option<u32>) -> Self {
        Self {
            tokens,
            max_len,
            oov_id,
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn encode(&self, normalized_text: &str) -> Vec<u32> {
        let mut ids = Vec::with_capacity(self.max_len);

        for token in normalized_text.split_whitespace() {
            let id = match self.tokens.get(token) {
                Some(&id) => Some(id),
                None => self.oov_id,
            };
            if let Some(id) = id {
                ids.push(id);
            }
            if ids.len() == self.max_len {
                break;
            }
        }

        ids.resize(self.max_len, PAD_ID);
        ids
    }
}
