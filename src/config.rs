// config.rs
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

use serde::{Deserialize, Serialize};

use crate::error::{JuniError, Result};
use crate::strategy::StandardStrategy;

/// The rank-affecting settings of a ranking, in a form that can be loaded
/// from a configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    /// Convention used to number tied elements.
    pub strategy: StandardStrategy,

    /// Rank given to the first element.
    pub start: f64,

    /// Whether the sequence is sorted by ascending score.
    pub reverse: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            strategy: StandardStrategy::Competition,
            start: 0.0,
            reverse: false,
        }
    }
}

impl RankingConfig {
    pub fn new(strategy: StandardStrategy, start: f64, reverse: bool) -> Self {
        Self {
            strategy,
            start,
            reverse,
        }
    }

    /// Ensure the settings can produce ranks.
    pub fn validate(&self) -> Result<()> {
        _check_start(self.start)
    }
}

/// Ensure the start rank is a finite number.
pub(crate) fn _check_start(start: f64) -> Result<()> {
    // NaN and infinities would poison every rank after them
    if !start.is_finite() {
        return Err(JuniError::InvalidConfig(format!(
            "start rank must be finite, got {start}"
        )));
    }

    // yep, good to go
    Ok(())
}

// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
