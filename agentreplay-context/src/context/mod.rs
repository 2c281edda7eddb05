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

//! Context Assembly for Prompt Injection
//!
//! Selects, renders and joins session records into one text block that fits
//! a token budget.
//!
//! # Pipeline
//!
//! ```text
//! candidates ──► Renderer ──► BudgetPacker ──► SectionComposer ──► text
//!  (ordered)     (per item)   (accept/stop)    (headings, joins)
//! ```
//!
//! - **Token estimate**: `ceil(chars / 4)` behind [`TokenEstimator`]
//! - **Modes**: compact (one line per record) or verbose (markdown blocks)
//! - **Packing**: strict priority order, stop at the first item that does not fit
//!
//! Nothing is cached between calls; every assembly is a pure function of its
//! inputs.

mod assembler;
mod composer;
mod config;
mod packer;
mod render;
mod token_calculator;

pub use assembler::ContextAssembler;
pub use composer::{SectionComposer, OBSERVATIONS_HEADING, SUMMARY_HEADING};
pub use config::ContextConfig;
pub use packer::{AssemblyResult, BudgetPacker, Candidates, RenderedItem, TokenBudget};
pub use render::{truncate_chars, CompactOptions, RenderMode, Renderer};
pub use token_calculator::{
    estimate_tokens, TokenCalculator, TokenEstimator, DEFAULT_CHARS_PER_TOKEN,
};
