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

//! Context assembly error types
//!
//! Only boundary contract violations surface here. Malformed record data
//! (missing fields, unparseable lists) degrades to empty values instead.

use thiserror::Error;

/// Result type for context assembly operations
pub type ContextResult<T> = Result<T, ContextError>;

/// Errors that can occur at the assembly boundary
#[derive(Debug, Error)]
pub enum ContextError {
    /// A negative token budget was supplied
    #[error("Token budget must not be negative, got {0}")]
    NegativeBudget(i64),

    /// Configuration failed validation
    #[error("Invalid context configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse context configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
