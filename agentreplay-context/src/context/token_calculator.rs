// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Token estimation.
//!
//! The default estimate is `ceil(chars / 4)`, counting Unicode scalar values.
//! This is a crude stand-in for a real tokenizer: it ignores vocabulary,
//! whitespace and byte-pair merges entirely, and every budget computed from
//! it inherits that error. Swap in a real tokenizer by implementing
//! [`TokenEstimator`].

/// Default characters per token.
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Maps text to an approximate token count.
pub trait TokenEstimator: Send + Sync {
    /// Estimate the number of tokens in `text`. Must not fail.
    fn estimate(&self, text: &str) -> usize;

    /// Estimate tokens for multiple strings.
    fn estimate_all(&self, texts: &[&str]) -> usize {
        texts.iter().map(|t| self.estimate(t)).sum()
    }
}

/// Character-ratio token calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCalculator {
    chars_per_token: usize,
}

impl Default for TokenCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCalculator {
    /// Create a new token calculator with the default ratio.
    pub fn new() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }

    /// Create a calculator with a custom ratio. A ratio of zero is treated as one.
    pub fn with_ratio(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }

    /// Characters per token used by this calculator.
    pub fn chars_per_token(&self) -> usize {
        self.chars_per_token
    }

    /// Check if text fits within a token budget.
    pub fn fits_budget(&self, text: &str, budget: usize) -> bool {
        self.estimate(text) <= budget
    }

    /// Calculate remaining budget after text.
    pub fn remaining_budget(&self, text: &str, total_budget: usize) -> usize {
        total_budget.saturating_sub(self.estimate(text))
    }
}

impl TokenEstimator for TokenCalculator {
    fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        text.chars().count().div_ceil(self.chars_per_token)
    }
}

/// Estimate tokens with the default ratio.
pub fn estimate_tokens(text: &str) -> usize {
    TokenCalculator::new().estimate(text)
}
