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

//! Agentreplay Context
//!
//! Assembles session observations and summaries into a single text block
//! that fits a token budget, ready to be injected into an agent prompt.
//!
//! The record store, filtering and ranking live elsewhere: this crate
//! receives candidates already narrowed and ordered, and decides which of
//! them fit, in what form, and where to stop.
//!
//! # Example
//!
//! ```rust
//! use agentreplay_context::{
//!     Candidates, ContextAssembler, ContextConfig, Observation, ObservationType,
//!     SessionSummary, TokenBudget,
//! };
//!
//! let assembler = ContextAssembler::new(ContextConfig::default()).unwrap();
//!
//! let summary = SessionSummary::builder("session-1", "my-project")
//!     .completed("Added retry logic to the uploader")
//!     .build();
//! let observations = vec![
//!     Observation::builder("session-1", "my-project")
//!         .observation_type(ObservationType::Decision)
//!         .title("Retry with exponential backoff")
//!         .add_fact("Max 5 attempts")
//!         .build(),
//! ];
//!
//! let candidates = Candidates::new(&observations).with_summary(&summary);
//! let result = assembler.assemble(&candidates, TokenBudget::new(500));
//!
//! assert!(result.summary_included);
//! assert_eq!(result.observations_included, 1);
//! assert!(result.text.starts_with("## Summary\nDone: Added retry logic"));
//! ```

pub mod context;
pub mod error;
pub mod observation;
pub mod observation_types;
pub mod session_summary;

pub use context::{
    estimate_tokens, AssemblyResult, BudgetPacker, Candidates, CompactOptions, ContextAssembler,
    ContextConfig, RenderMode, Renderer, TokenBudget, TokenCalculator, TokenEstimator,
};
pub use error::{ContextError, ContextResult};
pub use observation::{parse_string_list, Observation, ObservationBuilder, ObservationId};
pub use observation_types::{ObservationType, UnknownObservationType};
pub use session_summary::{SessionSummary, SessionSummaryBuilder, SummarySlot};
