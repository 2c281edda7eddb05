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

//! Observation records
//!
//! An observation is one captured unit of work from an agent session. The
//! capture pipeline produces them and the record store hands them to the
//! assembler already filtered and ordered; nothing here mutates them.
//!
//! # List Encoding
//!
//! Stores that keep list columns as text hand us fields like
//! `"[\"src/lib.rs\",\"src/main.rs\"]"` instead of a JSON array. All four list
//! fields (`facts`, `concepts`, `files_read`, `files_modified`) accept either
//! form on deserialization. A string that does not parse as an array of
//! strings decodes to an empty list.

use crate::observation_types::ObservationType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for an observation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationId(pub String);

impl ObservationId {
    /// Generate a new unique ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Default for ObservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A structured observation captured during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique observation identifier.
    pub id: ObservationId,
    /// Session this observation belongs to.
    pub session_id: String,
    /// Kind of observation.
    #[serde(rename = "type")]
    pub observation_type: ObservationType,
    /// Short action description.
    pub title: String,
    /// One-sentence explanation.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Free-text context: what, how, why.
    #[serde(default)]
    pub narrative: Option<String>,
    /// Concise factual statements, most important first.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub facts: Vec<String>,
    /// Concept tags.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub concepts: Vec<String>,
    /// Files that were read.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub files_read: Vec<String>,
    /// Files that were modified.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub files_modified: Vec<String>,
    /// Project name.
    pub project: String,
    /// Position of the prompt that produced this observation within its session.
    #[serde(default)]
    pub prompt_number: Option<u32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Tokens spent by the capture pipeline discovering this observation.
    #[serde(default)]
    pub discovery_tokens: Option<u64>,
}

impl Observation {
    /// Create a new observation builder.
    pub fn builder(session_id: impl Into<String>, project: impl Into<String>) -> ObservationBuilder {
        ObservationBuilder::new(session_id, project)
    }

    /// Subtitle, if present and non-blank.
    pub fn subtitle_text(&self) -> Option<&str> {
        non_blank(self.subtitle.as_deref())
    }

    /// Narrative, if present and non-blank.
    pub fn narrative_text(&self) -> Option<&str> {
        non_blank(self.narrative.as_deref())
    }

    /// Files modified followed by files read, keeping the first occurrence of
    /// any path that appears in both.
    pub fn all_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for path in self.files_modified.iter().chain(self.files_read.iter()) {
            if !files.contains(&path.as_str()) {
                files.push(path);
            }
        }
        files
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// Builder for creating observations.
pub struct ObservationBuilder {
    id: ObservationId,
    session_id: String,
    observation_type: ObservationType,
    title: String,
    subtitle: Option<String>,
    narrative: Option<String>,
    facts: Vec<String>,
    concepts: Vec<String>,
    files_read: Vec<String>,
    files_modified: Vec<String>,
    project: String,
    prompt_number: Option<u32>,
    created_at: DateTime<Utc>,
    discovery_tokens: Option<u64>,
}

impl ObservationBuilder {
    /// Create a new observation builder with a generated ID.
    pub fn new(session_id: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            id: ObservationId::new(),
            session_id: session_id.into(),
            observation_type: ObservationType::default(),
            title: String::new(),
            subtitle: None,
            narrative: None,
            facts: Vec::new(),
            concepts: Vec::new(),
            files_read: Vec::new(),
            files_modified: Vec::new(),
            project: project.into(),
            prompt_number: None,
            created_at: Utc::now(),
            discovery_tokens: None,
        }
    }

    /// Override the generated ID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = ObservationId::from_string(id);
        self
    }

    /// Set the observation type.
    pub fn observation_type(mut self, t: ObservationType) -> Self {
        self.observation_type = t;
        self
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the subtitle.
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the narrative.
    pub fn narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self
    }

    /// Add a fact.
    pub fn add_fact(mut self, fact: impl Into<String>) -> Self {
        self.facts.push(fact.into());
        self
    }

    /// Set all facts.
    pub fn facts(mut self, facts: Vec<String>) -> Self {
        self.facts = facts;
        self
    }

    /// Add a concept.
    pub fn add_concept(mut self, concept: impl Into<String>) -> Self {
        self.concepts.push(concept.into());
        self
    }

    /// Set all concepts.
    pub fn concepts(mut self, concepts: Vec<String>) -> Self {
        self.concepts = concepts;
        self
    }

    /// Add a file that was read.
    pub fn add_file_read(mut self, path: impl Into<String>) -> Self {
        self.files_read.push(path.into());
        self
    }

    /// Add a file that was modified.
    pub fn add_file_modified(mut self, path: impl Into<String>) -> Self {
        self.files_modified.push(path.into());
        self
    }

    /// Set the prompt number within the session.
    pub fn prompt_number(mut self, n: u32) -> Self {
        self.prompt_number = Some(n);
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = ts;
        self
    }

    /// Set the discovery token cost.
    pub fn discovery_tokens(mut self, tokens: u64) -> Self {
        self.discovery_tokens = Some(tokens);
        self
    }

    /// Build the observation.
    pub fn build(self) -> Observation {
        Observation {
            id: self.id,
            session_id: self.session_id,
            observation_type: self.observation_type,
            title: self.title,
            subtitle: self.subtitle,
            narrative: self.narrative,
            facts: self.facts,
            concepts: self.concepts,
            files_read: self.files_read,
            files_modified: self.files_modified,
            project: self.project,
            prompt_number: self.prompt_number,
            created_at: self.created_at,
            discovery_tokens: self.discovery_tokens,
        }
    }
}

/// Parse a JSON-encoded array of strings.
///
/// Blank input and anything that is not a JSON array yield an empty list.
/// Non-string elements are kept in their JSON text form.
pub fn parse_string_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.into_iter().filter_map(value_to_item).collect(),
        Ok(_) => {
            tracing::warn!(input = raw, "String-encoded list is not a JSON array, treating as empty");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable string-encoded list, treating as empty");
            Vec::new()
        }
    }
}

fn value_to_item(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Accepts a native array, a JSON-encoded string, or null.
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().filter_map(value_to_item).collect(),
        Value::String(s) => parse_string_list(&s),
        _ => Vec::new(),
    })
}
