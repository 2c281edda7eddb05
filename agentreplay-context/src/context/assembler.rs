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

//! Context assembler.

use super::config::ContextConfig;
use super::packer::{AssemblyResult, BudgetPacker, Candidates, TokenBudget};
use super::render::{RenderMode, Renderer};
use super::token_calculator::{TokenCalculator, TokenEstimator};
use crate::error::ContextResult;
use std::sync::Arc;

/// Entry point for request handlers.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads behind an `Arc` and called concurrently.
#[derive(Clone)]
pub struct ContextAssembler {
    config: ContextConfig,
    default_budget: TokenBudget,
    renderer: Renderer,
    estimator: Arc<dyn TokenEstimator>,
}

impl std::fmt::Debug for ContextAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAssembler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContextAssembler {
    /// Create an assembler using the built-in character-ratio estimator.
    pub fn new(config: ContextConfig) -> ContextResult<Self> {
        let estimator = Arc::new(TokenCalculator::with_ratio(config.chars_per_token));
        Self::with_estimator(config, estimator)
    }

    /// Create an assembler with a caller-supplied estimator.
    pub fn with_estimator(
        config: ContextConfig,
        estimator: Arc<dyn TokenEstimator>,
    ) -> ContextResult<Self> {
        config.validate()?;
        let default_budget = config.budget()?;
        Ok(Self {
            renderer: Renderer::new(config.compact.clone()),
            default_budget,
            config,
            estimator,
        })
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Packer bound to this assembler's renderer and estimator.
    pub fn packer(&self) -> BudgetPacker<'_> {
        BudgetPacker::new(&self.renderer, self.estimator.as_ref())
    }

    /// Tokens charged for the observations heading.
    pub fn heading_cost(&self) -> usize {
        self.packer().heading_cost()
    }

    /// Assemble with the configured mode.
    pub fn assemble(&self, candidates: &Candidates<'_>, budget: TokenBudget) -> AssemblyResult {
        self.assemble_with_mode(candidates, self.config.mode, budget)
    }

    /// Assemble with an explicit mode.
    pub fn assemble_with_mode(
        &self,
        candidates: &Candidates<'_>,
        mode: RenderMode,
        budget: TokenBudget,
    ) -> AssemblyResult {
        self.packer().pack(candidates, mode, budget)
    }

    /// Assemble with the configured mode and budget.
    pub fn assemble_default(&self, candidates: &Candidates<'_>) -> AssemblyResult {
        self.assemble(candidates, self.default_budget)
    }

    /// Assemble from a signed budget as received at a protocol boundary.
    ///
    /// Fails with [`ContextError::NegativeBudget`](crate::ContextError::NegativeBudget)
    /// before any rendering takes place.
    pub fn try_assemble(
        &self,
        candidates: &Candidates<'_>,
        mode: RenderMode,
        max_tokens: i64,
    ) -> ContextResult<AssemblyResult> {
        let budget = TokenBudget::try_from(max_tokens)?;
        Ok(self.assemble_with_mode(candidates, mode, budget))
    }
}
