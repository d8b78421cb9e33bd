// strategy.rs
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

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{JuniError, Result};

/// Assigns ranks to a run of tied elements.
///
/// Given the rank in effect when the tie group began (`start`) and the
/// number of tied elements (`length`), a strategy yields exactly
/// `length + 1` values: one rank per tied element, in order, followed by
/// the rank the next group starts from.
///
/// A payload rank of `None` withholds the rank from that element. The
/// trailing next rank must always be present.
///
/// Any `Fn(f64, usize) -> impl IntoIterator<Item = Option<f64>>` is a
/// strategy, so custom conventions can be supplied as closures.
pub trait Strategy {
    type Ranks: Iterator<Item = Option<f64>>;

    fn assign(&self, start: f64, length: usize) -> Self::Ranks;
}

impl<F, R> Strategy for F
where
    F: Fn(f64, usize) -> R,
    R: IntoIterator<Item = Option<f64>>,
{
    type Ranks = R::IntoIter;

    fn assign(&self, start: f64, length: usize) -> Self::Ranks {
        self(start, length).into_iter()
    }
}

/// The named conventions for numbering tied elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardStrategy {
    /// Standard competition ranking ("1224" ranking)
    #[default]
    Competition,

    /// Modified competition ranking ("1334" ranking)
    ModifiedCompetition,

    /// Dense ranking ("1223" ranking)
    Dense,

    /// Ordinal ranking ("1234" ranking)
    Ordinal,

    /// Fractional ranking ("1 2.5 2.5 4" ranking)
    Fractional,
}

impl StandardStrategy {
    pub const ALL: [StandardStrategy; 5] = [
        StandardStrategy::Competition,
        StandardStrategy::ModifiedCompetition,
        StandardStrategy::Dense,
        StandardStrategy::Ordinal,
        StandardStrategy::Fractional,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StandardStrategy::Competition => "competition",
            StandardStrategy::ModifiedCompetition => "modified_competition",
            StandardStrategy::Dense => "dense",
            StandardStrategy::Ordinal => "ordinal",
            StandardStrategy::Fractional => "fractional",
        }
    }

    /// Lazily produces the `length + 1` ranks for a tie group beginning
    /// at `start`.
    ///
    /// ```rust
    /// use juni::StandardStrategy;
    ///
    /// let ranks: Vec<_> = StandardStrategy::Fractional.ranks(1.0, 2).collect();
    /// assert_eq!(ranks, vec![Some(1.5), Some(1.5), Some(3.0)]);
    /// ```
    pub fn ranks(&self, start: f64, length: usize) -> StandardRanks {
        StandardRanks {
            strategy: *self,
            start,
            length,
            position: 0,
        }
    }

    fn payload(&self, start: f64, length: usize, position: usize) -> f64 {
        let length = length as f64;
        match self {
            StandardStrategy::Competition | StandardStrategy::Dense => start,
            StandardStrategy::ModifiedCompetition => start + length - 1.0,
            StandardStrategy::Ordinal => start + position as f64,
            // average of the tied positions start..=start + length - 1
            StandardStrategy::Fractional => (2.0 * start + length - 1.0) / 2.0,
        }
    }

    fn next_rank(&self, start: f64, length: usize) -> f64 {
        match self {
            StandardStrategy::Dense => start + 1.0,
            _ => start + length as f64,
        }
    }
}

impl Strategy for StandardStrategy {
    type Ranks = StandardRanks;

    fn assign(&self, start: f64, length: usize) -> Self::Ranks {
        self.ranks(start, length)
    }
}

impl fmt::Display for StandardStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StandardStrategy {
    type Err = JuniError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "competition" | "1224" => Ok(StandardStrategy::Competition),
            "modified_competition" | "1334" => Ok(StandardStrategy::ModifiedCompetition),
            "dense" | "1223" => Ok(StandardStrategy::Dense),
            "ordinal" | "1234" => Ok(StandardStrategy::Ordinal),
            "fractional" => Ok(StandardStrategy::Fractional),
            _ => Err(JuniError::UnknownStrategy(s.to_string())),
        }
    }
}

/// The lazy rank sequence of a [`StandardStrategy`]: `length` payload ranks
/// followed by the next rank.
#[derive(Debug, Clone)]
pub struct StandardRanks {
    strategy: StandardStrategy,
    start: f64,
    length: usize,
    position: usize,
}

impl Iterator for StandardRanks {
    type Item = Option<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position > self.length {
            return None;
        }
        let position = self.position;
        self.position += 1;

        let rank = if position == self.length {
            self.strategy.next_rank(self.start, self.length)
        } else {
            self.strategy.payload(self.start, self.length, position)
        };
        Some(Some(rank))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.length + 1).saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StandardRanks {}

impl FusedIterator for StandardRanks {}

// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
