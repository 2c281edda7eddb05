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

//! Observation Type Taxonomy
//!
//! The closed set of kinds an observation can take. The capture pipeline
//! assigns one of these to every observation it emits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of work an observation records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationType {
    /// Something found out about the codebase or environment.
    #[default]
    Discovery,
    /// A choice made about design or approach.
    Decision,
    /// Code written or changed.
    Implementation,
    /// A bug, failure or blocker encountered.
    Issue,
    /// A lesson worth carrying into later sessions.
    Learning,
    /// A pointer to external material.
    Reference,
}

/// Returned when a string names no known observation type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown observation type: {0}")]
pub struct UnknownObservationType(pub String);

impl ObservationType {
    /// All observation types, in declaration order.
    pub const ALL: [ObservationType; 6] = [
        ObservationType::Discovery,
        ObservationType::Decision,
        ObservationType::Implementation,
        ObservationType::Issue,
        ObservationType::Learning,
        ObservationType::Reference,
    ];

    /// Lowercase name used for storage and metadata lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationType::Discovery => "discovery",
            ObservationType::Decision => "decision",
            ObservationType::Implementation => "implementation",
            ObservationType::Issue => "issue",
            ObservationType::Learning => "learning",
            ObservationType::Reference => "reference",
        }
    }

    /// Uppercase tag used in rendered headings, e.g. `DECISION`.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for ObservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ObservationType {
    type Err = UnknownObservationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discovery" => Ok(ObservationType::Discovery),
            "decision" => Ok(ObservationType::Decision),
            "implementation" => Ok(ObservationType::Implementation),
            "issue" => Ok(ObservationType::Issue),
            "learning" => Ok(ObservationType::Learning),
            "reference" => Ok(ObservationType::Reference),
            _ => Err(UnknownObservationType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "implementation".parse::<ObservationType>().unwrap(),
            ObservationType::Implementation
        );
        assert_eq!(
            " DECISION ".parse::<ObservationType>().unwrap(),
            ObservationType::Decision
        );
        assert_eq!(
            "refactoring".parse::<ObservationType>(),
            Err(UnknownObservationType("refactoring".to_string()))
        );
    }

    #[test]
    fn test_round_trip_names() {
        for t in ObservationType::ALL {
            assert_eq!(t.as_str().parse::<ObservationType>().unwrap(), t);
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(ObservationType::Issue.label(), "ISSUE");
        assert_eq!(ObservationType::Learning.to_string(), "learning");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ObservationType::Reference).unwrap();
        assert_eq!(json, "\"reference\"");
        let parsed: ObservationType = serde_json::from_str("\"discovery\"").unwrap();
        assert_eq!(parsed, ObservationType::Discovery);
    }
}
