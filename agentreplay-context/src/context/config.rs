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

//! Context configuration.
//!
//! ```toml
//! token_budget = 4000
//! mode = "compact"
//! chars_per_token = 4
//!
//! [compact]
//! narrative_max_length = 200
//! include_files = true
//! separator = " | "
//! ```

use super::packer::TokenBudget;
use super::render::{CompactOptions, RenderMode};
use super::token_calculator::DEFAULT_CHARS_PER_TOKEN;
use crate::error::{ContextError, ContextResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for context assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Default token budget when the caller does not pass one.
    ///
    /// Signed so that a negative value in a config file is reported instead
    /// of failing deserialization with an opaque range error.
    #[serde(default = "default_token_budget")]
    pub token_budget: i64,

    /// Default rendering mode.
    #[serde(default)]
    pub mode: RenderMode,

    /// Characters per token for the built-in estimator.
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: usize,

    /// Compact rendering options.
    #[serde(default)]
    pub compact: CompactOptions,
}

fn default_token_budget() -> i64 {
    8000
}

fn default_chars_per_token() -> usize {
    DEFAULT_CHARS_PER_TOKEN
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
            mode: RenderMode::default(),
            chars_per_token: default_chars_per_token(),
            compact: CompactOptions::default(),
        }
    }
}

impl ContextConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> ContextResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ContextResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "Loaded context configuration");
        Ok(config)
    }

    /// Check invariants the assembler relies on.
    pub fn validate(&self) -> ContextResult<()> {
        self.budget()?;
        if self.chars_per_token == 0 {
            return Err(ContextError::InvalidConfig(
                "chars_per_token must be at least 1".to_string(),
            ));
        }
        if self.compact.separator.is_empty() {
            return Err(ContextError::InvalidConfig(
                "compact.separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Default budget as a validated [`TokenBudget`].
    pub fn budget(&self) -> ContextResult<TokenBudget> {
        TokenBudget::try_from(self.token_budget)
    }

    /// Set the default token budget.
    pub fn with_token_budget(mut self, budget: i64) -> Self {
        self.token_budget = budget;
        self
    }

    /// Set the default rendering mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the compact rendering options.
    pub fn with_compact(mut self, compact: CompactOptions) -> Self {
        self.compact = compact;
        self
    }
}
