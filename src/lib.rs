// lib.rs
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

//! Rank assignment for score-sorted sequences.
//!
//! [`Ranking`] walks a sequence that is already sorted by score and pairs
//! every element with a rank. Runs of tied scores are numbered by a
//! [`Strategy`]: one of the [`StandardStrategy`] conventions, or any closure
//! honoring the same contract.
//!
//! ```rust
//! use juni::{Ranking, StandardStrategy};
//!
//! let sorted_scores = [100, 90, 90, 80, 70];
//! for ranked in Ranking::new(sorted_scores).strategy(StandardStrategy::Dense) {
//!     let (rank, score) = ranked?;
//!     println!("{}. {}", rank.unwrap_or_default() + 1.0, score);
//! }
//! # Ok::<(), juni::JuniError>(())
//! ```

pub mod config;
pub mod error;
pub mod ranking;
pub mod score;
pub mod strategy;

pub use config::RankingConfig;
pub use error::{JuniError, Result};
pub use ranking::{Ranking, RankingIter};
pub use score::{Compare, NaturalOrder, Score};
pub use strategy::{StandardRanks, StandardStrategy, Strategy};
