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

//! Session Summary
//!
//! End-of-session synthesis across six free-text slots:
//! - Original user request
//! - What was investigated
//! - What was learned
//! - What was completed
//! - Next steps
//! - Free-form notes
//!
//! Every slot is optional. A slot holding only whitespace counts as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the free-text slots of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySlot {
    Request,
    Investigated,
    Learned,
    Completed,
    NextSteps,
    Notes,
}

impl SummarySlot {
    /// All slots in rendering order.
    pub const ALL: [SummarySlot; 6] = [
        SummarySlot::Request,
        SummarySlot::Investigated,
        SummarySlot::Learned,
        SummarySlot::Completed,
        SummarySlot::NextSteps,
        SummarySlot::Notes,
    ];

    /// Human-readable heading.
    pub fn heading(&self) -> &'static str {
        match self {
            SummarySlot::Request => "Request",
            SummarySlot::Investigated => "Investigated",
            SummarySlot::Learned => "Learned",
            SummarySlot::Completed => "Completed",
            SummarySlot::NextSteps => "Next Steps",
            SummarySlot::Notes => "Notes",
        }
    }
}

/// End-of-session summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique summary identifier.
    pub id: String,
    /// Session this summary belongs to.
    pub session_id: String,
    /// Project name.
    pub project: String,
    /// Original user request that started the session.
    #[serde(default)]
    pub request: Option<String>,
    /// What was investigated/explored during the session.
    #[serde(default)]
    pub investigated: Option<String>,
    /// Key discoveries and learnings.
    #[serde(default)]
    pub learned: Option<String>,
    /// What was accomplished.
    #[serde(default)]
    pub completed: Option<String>,
    /// Pending work.
    #[serde(default)]
    pub next_steps: Option<String>,
    /// Anything else worth keeping.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the summary was created.
    pub created_at: DateTime<Utc>,
}

impl SessionSummary {
    /// Create a new session summary builder.
    pub fn builder(session_id: impl Into<String>, project: impl Into<String>) -> SessionSummaryBuilder {
        SessionSummaryBuilder::new(session_id, project)
    }

    /// Text of a slot, if present and non-blank.
    pub fn slot(&self, slot: SummarySlot) -> Option<&str> {
        let value = match slot {
            SummarySlot::Request => &self.request,
            SummarySlot::Investigated => &self.investigated,
            SummarySlot::Learned => &self.learned,
            SummarySlot::Completed => &self.completed,
            SummarySlot::NextSteps => &self.next_steps,
            SummarySlot::Notes => &self.notes,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Slots holding text, in rendering order.
    pub fn filled_slots(&self) -> impl Iterator<Item = (SummarySlot, &str)> + '_ {
        SummarySlot::ALL
            .into_iter()
            .filter_map(move |slot| self.slot(slot).map(|text| (slot, text)))
    }

    /// True when no slot holds text.
    pub fn is_empty(&self) -> bool {
        self.filled_slots().next().is_none()
    }
}

/// Builder for session summaries.
pub struct SessionSummaryBuilder {
    id: String,
    session_id: String,
    project: String,
    request: Option<String>,
    investigated: Option<String>,
    learned: Option<String>,
    completed: Option<String>,
    next_steps: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl SessionSummaryBuilder {
    /// Create a new builder with a generated ID.
    pub fn new(session_id: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            project: project.into(),
            request: None,
            investigated: None,
            learned: None,
            completed: None,
            next_steps: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Override the generated ID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn request(mut self, request: impl Into<String>) -> Self {
        self.request = Some(request.into());
        self
    }

    pub fn investigated(mut self, investigated: impl Into<String>) -> Self {
        self.investigated = Some(investigated.into());
        self
    }

    pub fn learned(mut self, learned: impl Into<String>) -> Self {
        self.learned = Some(learned.into());
        self
    }

    pub fn completed(mut self, completed: impl Into<String>) -> Self {
        self.completed = Some(completed.into());
        self
    }

    pub fn next_steps(mut self, next_steps: impl Into<String>) -> Self {
        self.next_steps = Some(next_steps.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = ts;
        self
    }

    /// Build the summary.
    pub fn build(self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            session_id: self.session_id,
            project: self.project,
            request: self.request,
            investigated: self.investigated,
            learned: self.learned,
            completed: self.completed,
            next_steps: self.next_steps,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}
