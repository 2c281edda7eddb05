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

//! Section composition.

use super::render::RenderMode;

/// Heading line of the summary section, as costed by the packer.
pub const SUMMARY_HEADING: &str = "## Summary\n";

/// Heading line of the observations section, as costed by the packer.
pub const OBSERVATIONS_HEADING: &str = "## Observations\n";

/// Joins packed content into the final text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionComposer;

impl SectionComposer {
    /// Compose the summary block and the observations block.
    ///
    /// A `None` summary, or an empty one, leaves out the summary block
    /// entirely. `observations` is `Some` whenever the caller offered at least
    /// one observation; the heading is emitted even if no item made it in.
    pub fn compose(
        &self,
        summary: Option<&str>,
        observations: Option<&[&str]>,
        mode: RenderMode,
    ) -> String {
        let mut sections = Vec::with_capacity(2);

        if let Some(body) = summary.filter(|b| !b.is_empty()) {
            sections.push(format!("{}{}", SUMMARY_HEADING, body));
        }

        if let Some(items) = observations {
            let mut block = OBSERVATIONS_HEADING.trim_end().to_string();
            if !items.is_empty() {
                block.push('\n');
                block.push_str(&items.join(mode.item_separator()));
            }
            sections.push(block);
        }

        sections.join("\n\n")
    }
}
