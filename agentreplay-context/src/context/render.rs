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

//! Record rendering.
//!
//! Turns one observation or summary into text. Rendering knows nothing about
//! budgets and never fails: absent fields are skipped rather than rendered as
//! empty placeholders.
//!
//! # Compact
//!
//! One line per record:
//!
//! ```text
//! [DECISION] Title | narrative... | Facts: f1; f2; f3 | [c1, c2]
//! Done: ... | Learned: ... | Next: ...
//! ```
//!
//! # Verbose
//!
//! A markdown block per record with the full narrative and every list.

use crate::observation::Observation;
use crate::session_summary::{SessionSummary, SummarySlot};
use serde::{Deserialize, Serialize};

/// Rendering style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One truncated line per record.
    #[default]
    Compact,
    /// Full markdown block per record.
    Verbose,
}

impl RenderMode {
    /// Text placed after each rendered observation.
    pub fn item_separator(&self) -> &'static str {
        match self {
            RenderMode::Compact => "\n",
            RenderMode::Verbose => "\n\n",
        }
    }
}

/// Options for compact rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactOptions {
    /// Narratives longer than this many characters are truncated.
    #[serde(default = "default_narrative_max_length")]
    pub narrative_max_length: usize,

    /// Whether to render the facts segment.
    #[serde(default = "default_true")]
    pub include_facts: bool,

    /// Whether to render the concepts segment.
    #[serde(default = "default_true")]
    pub include_concepts: bool,

    /// Whether to render the files segment.
    #[serde(default)]
    pub include_files: bool,

    /// Text placed between segments.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Number of leading facts shown.
    #[serde(default = "default_max_facts")]
    pub max_facts: usize,

    /// Ceiling for the summary `Done:` segment.
    #[serde(default = "default_completed_max_length")]
    pub completed_max_length: usize,

    /// Ceiling for the summary `Learned:` segment.
    #[serde(default = "default_learned_max_length")]
    pub learned_max_length: usize,

    /// Ceiling for the summary `Next:` segment.
    #[serde(default = "default_next_steps_max_length")]
    pub next_steps_max_length: usize,
}

fn default_narrative_max_length() -> usize {
    200
}

fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    " | ".to_string()
}

fn default_max_facts() -> usize {
    3
}

fn default_completed_max_length() -> usize {
    150
}

fn default_learned_max_length() -> usize {
    150
}

fn default_next_steps_max_length() -> usize {
    100
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            narrative_max_length: default_narrative_max_length(),
            include_facts: true,
            include_concepts: true,
            include_files: false,
            separator: default_separator(),
            max_facts: default_max_facts(),
            completed_max_length: default_completed_max_length(),
            learned_max_length: default_learned_max_length(),
            next_steps_max_length: default_next_steps_max_length(),
        }
    }
}

impl CompactOptions {
    /// Set the narrative truncation length.
    pub fn narrative_max_length(mut self, len: usize) -> Self {
        self.narrative_max_length = len;
        self
    }

    /// Toggle the facts, concepts and files segments.
    pub fn segments(mut self, facts: bool, concepts: bool, files: bool) -> Self {
        self.include_facts = facts;
        self.include_concepts = concepts;
        self.include_files = files;
        self
    }

    /// Set the segment separator.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// Cut `text` to `max_len` characters, ending in `...` when shortened.
///
/// Text at or under the limit is returned unchanged. Longer text keeps its
/// first `max_len - 3` characters.
pub fn truncate_chars(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Stateless renderer for observations and summaries.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: CompactOptions,
}

impl Renderer {
    /// Create a renderer with the given compact options.
    pub fn new(options: CompactOptions) -> Self {
        Self { options }
    }

    /// Compact options in effect.
    pub fn options(&self) -> &CompactOptions {
        &self.options
    }

    /// Render one observation.
    pub fn render_observation(&self, obs: &Observation, mode: RenderMode) -> String {
        match mode {
            RenderMode::Compact => self.observation_compact(obs),
            RenderMode::Verbose => self.observation_verbose(obs),
        }
    }

    /// Render one summary. Returns an empty string when nothing in the
    /// summary applies to the mode.
    pub fn render_summary(&self, summary: &SessionSummary, mode: RenderMode) -> String {
        match mode {
            RenderMode::Compact => self.summary_compact(summary),
            RenderMode::Verbose => self.summary_verbose(summary),
        }
    }

    fn observation_compact(&self, obs: &Observation) -> String {
        let opts = &self.options;
        let mut segments = vec![format!("[{}] {}", obs.observation_type.label(), obs.title)];

        if let Some(narrative) = obs.narrative_text() {
            segments.push(truncate_chars(narrative, opts.narrative_max_length));
        }

        if opts.include_facts && !obs.facts.is_empty() {
            let facts: Vec<&str> = obs
                .facts
                .iter()
                .take(opts.max_facts)
                .map(String::as_str)
                .collect();
            segments.push(format!("Facts: {}", facts.join("; ")));
        }

        if opts.include_concepts && !obs.concepts.is_empty() {
            segments.push(format!("[{}]", obs.concepts.join(", ")));
        }

        if opts.include_files {
            let files = obs.all_files();
            if !files.is_empty() {
                segments.push(format!("Files: {}", files.join(", ")));
            }
        }

        segments.join(opts.separator.as_str())
    }

    fn observation_verbose(&self, obs: &Observation) -> String {
        let mut blocks = Vec::new();

        let mut heading = format!("### [{}] {}", obs.observation_type.label(), obs.title);
        if let Some(subtitle) = obs.subtitle_text() {
            heading.push_str(&format!("\n*{}*", subtitle));
        }
        blocks.push(heading);

        if let Some(narrative) = obs.narrative_text() {
            blocks.push(narrative.to_string());
        }

        let mut details = Vec::new();
        if !obs.facts.is_empty() {
            details.push(bulleted("**Facts:**", &obs.facts));
        }
        if !obs.concepts.is_empty() {
            let concepts: Vec<String> = obs.concepts.iter().map(|c| format!("`{}`", c)).collect();
            details.push(format!("**Concepts:** {}", concepts.join(", ")));
        }
        if !obs.files_read.is_empty() {
            details.push(bulleted("**Files read:**", &obs.files_read));
        }
        if !obs.files_modified.is_empty() {
            details.push(bulleted("**Files modified:**", &obs.files_modified));
        }
        if !details.is_empty() {
            blocks.push(details.join("\n"));
        }

        let mut meta = vec![
            format!("Project: {}", obs.project),
            format!("Type: {}", obs.observation_type),
        ];
        if let Some(n) = obs.prompt_number {
            meta.push(format!("Seq: {}", n));
        }
        meta.push(obs.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        blocks.push(format!("_{}_", meta.join(" · ")));

        blocks.join("\n\n")
    }

    fn summary_compact(&self, summary: &SessionSummary) -> String {
        let opts = &self.options;
        let labeled = [
            ("Done", SummarySlot::Completed, opts.completed_max_length),
            ("Learned", SummarySlot::Learned, opts.learned_max_length),
            ("Next", SummarySlot::NextSteps, opts.next_steps_max_length),
        ];

        labeled
            .iter()
            .filter_map(|(label, slot, max_len)| {
                summary
                    .slot(*slot)
                    .map(|text| format!("{}: {}", label, truncate_chars(text, *max_len)))
            })
            .collect::<Vec<_>>()
            .join(opts.separator.as_str())
    }

    fn summary_verbose(&self, summary: &SessionSummary) -> String {
        summary
            .filled_slots()
            .map(|(slot, text)| format!("#### {}\n{}", slot.heading(), text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn bulleted(label: &str, items: &[String]) -> String {
    let mut out = label.to_string();
    for item in items {
        out.push_str("\n- ");
        out.push_str(item);
    }
    out
}
