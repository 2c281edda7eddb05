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

//! Budget packing.
//!
//! Single greedy pass over the candidates, in the order given:
//!
//! 1. The summary (if any) goes in when its cost, heading and trailing blank
//!    line included, is strictly below the budget. It is never cut.
//! 2. If any observation was offered, the observations heading is charged
//!    unconditionally. Its cost is not checked against the budget.
//! 3. Observations go in one by one until the first that would push the total
//!    over the budget. Packing stops there; later, smaller observations are
//!    not tried.
//!
//! Because of step 2, `tokens_used` can exceed the budget by at most the
//! heading cost, and only when the budget is smaller than that cost.

use super::composer::{SectionComposer, OBSERVATIONS_HEADING, SUMMARY_HEADING};
use super::render::{RenderMode, Renderer};
use super::token_calculator::TokenEstimator;
use crate::error::{ContextError, ContextResult};
use crate::observation::{Observation, ObservationId};
use crate::session_summary::SessionSummary;
use serde::{Deserialize, Serialize};

/// Upper bound on the tokens an assembly may use.
///
/// Zero is a valid budget; negative values are rejected when converting from
/// a signed integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenBudget(usize);

impl TokenBudget {
    pub fn new(tokens: usize) -> Self {
        Self(tokens)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for TokenBudget {
    fn from(tokens: usize) -> Self {
        Self(tokens)
    }
}

impl TryFrom<i64> for TokenBudget {
    type Error = ContextError;

    fn try_from(tokens: i64) -> ContextResult<Self> {
        usize::try_from(tokens)
            .map(Self)
            .map_err(|_| ContextError::NegativeBudget(tokens))
    }
}

/// Records offered for one assembly, already filtered and ordered by priority.
#[derive(Debug, Clone, Copy)]
pub struct Candidates<'a> {
    /// Optional session summary, placed before any observation.
    pub summary: Option<&'a SessionSummary>,
    /// Observations, highest priority first.
    pub observations: &'a [Observation],
}

impl<'a> Candidates<'a> {
    pub fn new(observations: &'a [Observation]) -> Self {
        Self {
            summary: None,
            observations,
        }
    }

    pub fn with_summary(mut self, summary: &'a SessionSummary) -> Self {
        self.summary = Some(summary);
        self
    }
}

/// Rendered text of one record and its estimated cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub text: String,
    pub tokens: usize,
}

/// Outcome of one assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyResult {
    /// Final composed text.
    pub text: String,
    /// Estimated tokens charged, headings included.
    pub tokens_used: usize,
    /// Budget the assembly ran against.
    pub budget: usize,
    /// Number of observations offered.
    pub observations_offered: usize,
    /// Number of observations included.
    pub observations_included: usize,
    /// IDs of included observations, in output order.
    pub included_ids: Vec<ObservationId>,
    /// Whether the summary made it in.
    pub summary_included: bool,
    /// Whether packing stopped before the last offered observation.
    pub truncated: bool,
}

impl AssemblyResult {
    /// True when neither a summary nor any observation was included.
    pub fn is_empty(&self) -> bool {
        !self.summary_included && self.observations_included == 0
    }
}

/// Greedy, order-preserving allocator.
pub struct BudgetPacker<'a> {
    renderer: &'a Renderer,
    estimator: &'a dyn TokenEstimator,
    composer: SectionComposer,
}

impl<'a> BudgetPacker<'a> {
    pub fn new(renderer: &'a Renderer, estimator: &'a dyn TokenEstimator) -> Self {
        Self {
            renderer,
            estimator,
            composer: SectionComposer,
        }
    }

    /// Tokens charged for the observations heading.
    pub fn heading_cost(&self) -> usize {
        self.estimator.estimate(OBSERVATIONS_HEADING)
    }

    /// Pack `candidates` into at most `budget` tokens (see module docs for the
    /// heading exception).
    pub fn pack(
        &self,
        candidates: &Candidates<'_>,
        mode: RenderMode,
        budget: TokenBudget,
    ) -> AssemblyResult {
        let max_tokens = budget.get();
        let mut tokens_used = 0;

        let summary = candidates
            .summary
            .and_then(|s| self.pack_summary(s, mode, max_tokens));
        if let Some(item) = &summary {
            tokens_used += item.tokens;
        }

        let offered = candidates.observations.len();
        let mut included: Vec<(RenderedItem, &ObservationId)> = Vec::new();
        let mut truncated = false;

        if offered > 0 {
            tokens_used += self.heading_cost();
            let separator = mode.item_separator();

            for (index, obs) in candidates.observations.iter().enumerate() {
                let text = self.renderer.render_observation(obs, mode);
                let tokens = self.estimator.estimate(&format!("{}{}", text, separator));

                if tokens_used + tokens > max_tokens {
                    tracing::trace!(
                        index,
                        item_tokens = tokens,
                        tokens_used,
                        budget = max_tokens,
                        "Observation does not fit, stopping"
                    );
                    truncated = true;
                    break;
                }

                tokens_used += tokens;
                included.push((RenderedItem { text, tokens }, &obs.id));
            }
        }

        let item_texts: Vec<&str> = included.iter().map(|(item, _)| item.text.as_str()).collect();
        let text = self.composer.compose(
            summary.as_ref().map(|s| s.text.as_str()),
            (offered > 0).then_some(item_texts.as_slice()),
            mode,
        );

        let result = AssemblyResult {
            text,
            tokens_used,
            budget: max_tokens,
            observations_offered: offered,
            observations_included: included.len(),
            included_ids: included.iter().map(|(_, id)| (*id).clone()).collect(),
            summary_included: summary.is_some(),
            truncated,
        };

        tracing::debug!(
            mode = ?mode,
            budget = max_tokens,
            tokens_used = result.tokens_used,
            offered = result.observations_offered,
            included = result.observations_included,
            summary_included = result.summary_included,
            "Context assembled"
        );

        result
    }

    fn pack_summary(
        &self,
        summary: &SessionSummary,
        mode: RenderMode,
        max_tokens: usize,
    ) -> Option<RenderedItem> {
        let body = self.renderer.render_summary(summary, mode);
        if body.is_empty() {
            return None;
        }

        let tokens = self
            .estimator
            .estimate(&format!("{}{}\n\n", SUMMARY_HEADING, body));
        if tokens < max_tokens {
            Some(RenderedItem { text: body, tokens })
        } else {
            tracing::trace!(
                summary_tokens = tokens,
                budget = max_tokens,
                "Summary does not fit, omitting"
            );
            None
        }
    }
}
