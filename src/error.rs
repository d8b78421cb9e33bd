// error.rs
// Copyright 2025 Patrick Meade
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use thiserror::Error;

/// Convenience alias for results produced by the juni library.
pub type Result<T> = std::result::Result<T, JuniError>;

/// Common errors returned by the juni library.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JuniError {
    /// Raised when the element at the given input position orders before
    /// its predecessor under the active comparison and direction
    #[error("not sorted by score: element {0} orders before its predecessor")]
    NotSorted(usize),

    /// Raised when the comparison could not order two scores (e.g., NaN)
    #[error("incomparable scores: element {0} has no ordering against its predecessor")]
    Incomparable(usize),

    /// Raised when a strategy breaks the `length + 1` ranks contract
    #[error("strategy contract violation: {0}")]
    StrategyContract(String),

    /// Raised when a ranking is configured with an unusable value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when a strategy name is unknown
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Raised when a rank lookup exhausts the sequence without a match
    #[error("value not found in ranking")]
    NotFound,
}

// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
