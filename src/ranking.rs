// ranking.rs
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

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::config::{_check_start, RankingConfig};
use crate::error::{JuniError, Result};
use crate::score::{Compare, NaturalOrder, Score, directed};
use crate::strategy::{StandardStrategy, Strategy};

/// Assigns ranks to the elements of a score-sorted sequence.
///
/// `Ranking` looks like `enumerate`, but produces a rank instead of an index
/// for each element. Elements with equal scores form a tie group whose ranks
/// are decided by the [`Strategy`] (competition ranking by default).
///
/// The sequence must already be sorted by descending score, or by ascending
/// score when ranked in [`reverse`](Ranking::reverse). Ordering violations
/// are reported when the scan reaches them.
///
/// ```rust
/// use juni::{Ranking, StandardStrategy};
///
/// let scores = [10, 8, 8, 6];
/// let ranks = Ranking::new(scores).ranks()?;
/// assert_eq!(ranks, vec![Some(0.0), Some(1.0), Some(1.0), Some(3.0)]);
///
/// let ranks = Ranking::new(scores)
///     .strategy(StandardStrategy::Dense)
///     .start(1.0)
///     .ranks()?;
/// assert_eq!(ranks, vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]);
/// # Ok::<(), juni::JuniError>(())
/// ```
pub struct Ranking<I, S, K, C = NaturalOrder, St = StandardStrategy> {
    items: I,
    key: K,
    compare: C,
    strategy: St,
    start: f64,
    reverse: bool,
    no_score: Option<S>,
}

impl<I, T> Ranking<I, T, fn(&T) -> T>
where
    I: Iterator<Item = T>,
    T: Clone,
{
    /// Ranks the elements by their own value.
    pub fn new<Src>(items: Src) -> Self
    where
        Src: IntoIterator<IntoIter = I>,
    {
        Ranking::by_key(items, T::clone as fn(&T) -> T)
    }
}

impl<I, T, S, K> Ranking<I, S, K>
where
    I: Iterator<Item = T>,
    K: FnMut(&T) -> S,
{
    /// Ranks the elements by the score `key` extracts from each of them.
    ///
    /// The key is called exactly once per element, in input order.
    pub fn by_key<Src>(items: Src, key: K) -> Self
    where
        Src: IntoIterator<IntoIter = I>,
    {
        Self {
            items: items.into_iter(),
            key,
            compare: NaturalOrder,
            strategy: StandardStrategy::Competition,
            start: 0.0,
            reverse: false,
            no_score: None,
        }
    }
}

impl<I, S, K, C, St> Ranking<I, S, K, C, St> {
    /// Numbers tie groups with `strategy`.
    pub fn strategy<St2>(self, strategy: St2) -> Ranking<I, S, K, C, St2>
    where
        St2: Strategy,
    {
        Ranking {
            items: self.items,
            key: self.key,
            compare: self.compare,
            strategy,
            start: self.start,
            reverse: self.reverse,
            no_score: self.no_score,
        }
    }

    /// Orders scores with `compare` instead of their natural order.
    pub fn compare_by<F>(self, compare: F) -> Ranking<I, S, K, F, St>
    where
        F: FnMut(&S, &S) -> Ordering,
    {
        Ranking {
            items: self.items,
            key: self.key,
            compare,
            strategy: self.strategy,
            start: self.start,
            reverse: self.reverse,
            no_score: self.no_score,
        }
    }

    /// Sets the rank of the first element. Must be finite.
    pub fn start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Ranks a sequence sorted by ascending score.
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Leaves elements scoring `no_score` unranked, in addition to scores
    /// that are absent (e.g., `None`).
    pub fn no_score(mut self, no_score: S) -> Self {
        self.no_score = Some(no_score);
        self
    }

    /// Applies the strategy, start rank and direction of `config`.
    pub fn with_config(self, config: &RankingConfig) -> Result<Ranking<I, S, K, C, StandardStrategy>> {
        config.validate()?;
        Ok(self
            .strategy(config.strategy)
            .start(config.start)
            .reverse(config.reverse))
    }
}

impl<I, T, S, K, C, St> Ranking<I, S, K, C, St>
where
    I: Iterator<Item = T>,
    K: FnMut(&T) -> S,
    S: Score + PartialEq,
    C: Compare<S>,
    St: Strategy,
{
    /// Collects the rank of every element, in input order.
    pub fn ranks(self) -> Result<Vec<Option<f64>>> {
        self.iter_ranks().collect()
    }

    /// Collects every element, in input order, once the whole sequence has
    /// been verified to be sorted.
    pub fn values(self) -> Result<Vec<T>> {
        self.iter_values().collect()
    }

    pub fn iter_ranks(self) -> impl Iterator<Item = Result<Option<f64>>> {
        self.into_iter().map(|ranked| ranked.map(|(rank, _)| rank))
    }

    pub fn iter_values(self) -> impl Iterator<Item = Result<T>> {
        self.into_iter().map(|ranked| ranked.map(|(_, item)| item))
    }

    /// Looks up the rank of the first element equal to `value`.
    ///
    /// The scan stops at the match, so elements after it are never scored.
    /// Returns `Ok(None)` when the matching element is unranked.
    pub fn rank_of(self, value: &T) -> Result<Option<f64>>
    where
        T: PartialEq,
    {
        for ranked in self {
            let (rank, item) = ranked?;
            if &item == value {
                return Ok(rank);
            }
        }
        Err(JuniError::NotFound)
    }
}

impl<I, T, S, K, C, St> IntoIterator for Ranking<I, S, K, C, St>
where
    I: Iterator<Item = T>,
    K: FnMut(&T) -> S,
    S: Score + PartialEq,
    C: Compare<S>,
    St: Strategy,
{
    type Item = Result<(Option<f64>, T)>;
    type IntoIter = RankingIter<I, S, K, C, St>;

    fn into_iter(self) -> Self::IntoIter {
        RankingIter {
            fault: _check_start(self.start).err(),
            items: self.items,
            key: self.key,
            compare: self.compare,
            strategy: self.strategy,
            reverse: self.reverse,
            no_score: self.no_score,
            rank: self.start,
            group: Group::Idle,
            ready: VecDeque::new(),
            index: 0,
            finished: false,
        }
    }
}

/// Scored elements waiting for their rank.
enum Group<T, S> {
    Idle,
    /// Consecutive elements with equal scores, with the latest score.
    Accumulating { score: S, members: Vec<T> },
}

/// The lazy `(rank, element)` stream of a [`Ranking`].
///
/// Each element is held back only until the next element (or the end of
/// the input) shows whether it ties with what follows. After the first error
/// the stream ends.
pub struct RankingIter<I, S, K, C, St>
where
    I: Iterator,
{
    fault: Option<JuniError>,
    items: I,
    key: K,
    compare: C,
    strategy: St,
    reverse: bool,
    no_score: Option<S>,
    /// Rank the next group starts from.
    rank: f64,
    group: Group<I::Item, S>,
    ready: VecDeque<(Option<f64>, I::Item)>,
    index: usize,
    finished: bool,
}

impl<I, T, S, K, C, St> RankingIter<I, S, K, C, St>
where
    I: Iterator<Item = T>,
    K: FnMut(&T) -> S,
    S: Score + PartialEq,
    C: Compare<S>,
    St: Strategy,
{
    /// Pulls one element from the input and files it.
    fn advance(&mut self) -> Result<()> {
        let Some(item) = self.items.next() else {
            self.finished = true;
            return self.flush();
        };
        let index = self.index;
        self.index += 1;

        let score = (self.key)(&item);
        if score.is_absent() || self.no_score.as_ref() == Some(&score) {
            self.flush()?;
            trace!(index, "passing unscored element through");
            self.ready.push_back((None, item));
            return Ok(());
        }

        let (held, mut members) = match std::mem::replace(&mut self.group, Group::Idle) {
            Group::Idle => {
                self.group = Group::Accumulating {
                    score,
                    members: vec![item],
                };
                return Ok(());
            }
            Group::Accumulating { score: held, members } => (held, members),
        };

        match directed(&mut self.compare, self.reverse, &held, &score) {
            None => Err(JuniError::Incomparable(index)),
            Some(Ordering::Less) => Err(JuniError::NotSorted(index)),
            Some(Ordering::Equal) => {
                members.push(item);
                self.group = Group::Accumulating { score, members };
                Ok(())
            }
            Some(Ordering::Greater) => {
                self.resolve(members)?;
                self.group = Group::Accumulating {
                    score,
                    members: vec![item],
                };
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.group, Group::Idle) {
            Group::Idle => Ok(()),
            Group::Accumulating { members, .. } => self.resolve(members),
        }
    }

    /// Ranks a finished group and moves the counter past it.
    fn resolve(&mut self, members: Vec<T>) -> Result<()> {
        let start = self.rank;
        let length = members.len();

        // a lone element takes the current rank whatever the strategy
        if length == 1 {
            self.ready
                .extend(members.into_iter().map(|member| (Some(start), member)));
            self.rank = start + 1.0;
            return Ok(());
        }

        let mut ranks = self.strategy.assign(start, length);
        let mut resolved = Vec::with_capacity(length);
        for member in members {
            let Some(rank) = ranks.next() else {
                return Err(JuniError::StrategyContract(format!(
                    "expected {} ranks for {length} tied elements starting at {start}, got {}",
                    length + 1,
                    resolved.len()
                )));
            };
            resolved.push((rank, member));
        }

        let Some(Some(next)) = ranks.next() else {
            return Err(JuniError::StrategyContract(format!(
                "no next rank after {length} tied elements starting at {start}"
            )));
        };
        if ranks.next().is_some() {
            return Err(JuniError::StrategyContract(format!(
                "more than {} ranks for {length} tied elements starting at {start}",
                length + 1
            )));
        }

        trace!(start, length, next, "resolved tie group");
        self.ready.extend(resolved);
        self.rank = next;
        Ok(())
    }
}

impl<I, T, S, K, C, St> Iterator for RankingIter<I, S, K, C, St>
where
    I: Iterator<Item = T>,
    K: FnMut(&T) -> S,
    S: Score + PartialEq,
    C: Compare<S>,
    St: Strategy,
{
    type Item = Result<(Option<f64>, T)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.fault.take() {
            self.finished = true;
            return Some(Err(err));
        }

        loop {
            if let Some(ranked) = self.ready.pop_front() {
                return Some(Ok(ranked));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.advance() {
                debug!(error = %err, "ranking aborted");
                self.finished = true;
                self.group = Group::Idle;
                self.ready.clear();
                return Some(Err(err));
            }
        }
    }
}

impl<I, T, S, K, C, St> FusedIterator for RankingIter<I, S, K, C, St>
where
    I: Iterator<Item = T>,
    K: FnMut(&T) -> S,
    S: Score + PartialEq,
    C: Compare<S>,
    St: Strategy,
{
}

// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::iter;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Player {
        name: &'static str,
        points: u32,
    }

    fn ranks_with<St: Strategy>(scores: &[i32], strategy: St) -> Vec<Option<f64>> {
        Ranking::new(scores.iter().copied())
            .strategy(strategy)
            .ranks()
            .expect("sorted input")
    }

    fn ranked(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|&v| Some(v)).collect()
    }

    #[test]
    fn test_always_succeed() {
        assert!(true);
    }

    #[test]
    fn test_standard_strategies() {
        let scores = [5, 4, 4, 3];
        assert_eq!(
            ranks_with(&scores, StandardStrategy::Competition),
            ranked(&[0.0, 1.0, 1.0, 3.0])
        );
        assert_eq!(
            ranks_with(&scores, StandardStrategy::ModifiedCompetition),
            ranked(&[0.0, 2.0, 2.0, 3.0])
        );
        assert_eq!(
            ranks_with(&scores, StandardStrategy::Dense),
            ranked(&[0.0, 1.0, 1.0, 2.0])
        );
        assert_eq!(
            ranks_with(&scores, StandardStrategy::Ordinal),
            ranked(&[0.0, 1.0, 2.0, 3.0])
        );
        assert_eq!(
            ranks_with(&scores, StandardStrategy::Fractional),
            ranked(&[0.0, 1.5, 1.5, 3.0])
        );
    }

    #[test]
    fn test_fractional_long_tie() {
        assert_eq!(
            ranks_with(&[5, 4, 4, 4, 4, 3], StandardStrategy::Fractional),
            ranked(&[0.0, 2.5, 2.5, 2.5, 2.5, 5.0])
        );
    }

    #[test]
    fn test_multiple_tie_groups() {
        assert_eq!(
            ranks_with(
                &[5, 5, 5, 3, 3, 3, 2, 2, 1, 1, 1, 1],
                StandardStrategy::Competition
            ),
            ranked(&[0.0, 0.0, 0.0, 3.0, 3.0, 3.0, 6.0, 6.0, 8.0, 8.0, 8.0, 8.0])
        );
    }

    #[test]
    fn test_tie_at_end_of_input() {
        assert_eq!(
            ranks_with(&[3, 2, 2], StandardStrategy::Dense),
            ranked(&[0.0, 1.0, 1.0])
        );
    }

    #[test]
    fn test_start() {
        let ranks = Ranking::new([5, 4, 4, 3]).start(10.0).ranks().unwrap();
        assert_eq!(ranks, ranked(&[10.0, 11.0, 11.0, 13.0]));
    }

    #[test]
    fn test_empty_input() {
        let ranks = Ranking::new(Vec::<i32>::new()).ranks().unwrap();
        assert!(ranks.is_empty());
    }

    #[test]
    fn test_unsorted() {
        let err = Ranking::new([5, 4, 4, 5]).ranks().expect_err("not sorted");
        assert_eq!(err, JuniError::NotSorted(3));
    }

    #[test]
    fn test_unsorted_is_reported_lazily() {
        let mut ranking = Ranking::new([5, 4, 4, 5]).into_iter();
        assert_eq!(ranking.next(), Some(Ok((Some(0.0), 5))));
        assert_eq!(ranking.next(), Some(Err(JuniError::NotSorted(3))));
        assert_eq!(ranking.next(), None);
        assert_eq!(ranking.next(), None);
    }

    #[test]
    fn test_reverse() {
        let ranks = Ranking::new([1, 121, 121, 432])
            .reverse(true)
            .ranks()
            .unwrap();
        assert_eq!(ranks, ranked(&[0.0, 1.0, 1.0, 3.0]));

        let err = Ranking::new([1, 121, 121, 432])
            .ranks()
            .expect_err("ascending without reverse");
        assert_eq!(err, JuniError::NotSorted(1));
    }

    #[test]
    fn test_absent_scores() {
        let ranks = Ranking::new([Some(100), Some(50), Some(50), None, None])
            .ranks()
            .unwrap();
        assert_eq!(
            ranks,
            vec![Some(0.0), Some(1.0), Some(1.0), None, None]
        );

        let ranks = Ranking::new([None::<i32>]).ranks().unwrap();
        assert_eq!(ranks, vec![None]);
    }

    #[test]
    fn test_custom_no_score() {
        let ranks = Ranking::new([100, 50, 50, -1, -1])
            .no_score(-1)
            .ranks()
            .unwrap();
        assert_eq!(
            ranks,
            vec![Some(0.0), Some(1.0), Some(1.0), None, None]
        );
    }

    #[test]
    fn test_unscored_element_splits_groups() {
        let ranks = Ranking::new([Some(50), None, Some(50)]).ranks().unwrap();
        assert_eq!(ranks, vec![Some(0.0), None, Some(1.0)]);

        // no ordering is checked across an unscored element
        let ranks = Ranking::new([Some(50), None, Some(60)]).ranks().unwrap();
        assert_eq!(ranks, vec![Some(0.0), None, Some(1.0)]);
    }

    #[test]
    fn test_withholding_strategy() {
        let withhold = |start: f64, length: usize| {
            iter::repeat_n(None, length).chain(iter::once(Some(start)))
        };
        assert_eq!(
            ranks_with(&[100, 80, 80, 70], withhold),
            vec![Some(0.0), None, None, Some(1.0)]
        );
    }

    #[test]
    fn test_lone_element_ignores_strategy() {
        let always_seven = |_start: f64, length: usize| vec![Some(7.0); length + 1];
        assert_eq!(
            ranks_with(&[9, 8, 8, 3], always_seven),
            ranked(&[0.0, 7.0, 7.0, 7.0])
        );
    }

    #[test]
    fn test_strategy_yielding_too_few_ranks() {
        let short = |start: f64, _length: usize| vec![Some(start)];
        let err = Ranking::new([5, 4, 4])
            .strategy(short)
            .ranks()
            .expect_err("short strategy");
        assert!(matches!(err, JuniError::StrategyContract(_)));
    }

    #[test]
    fn test_strategy_without_next_rank() {
        let no_next = |start: f64, length: usize| vec![Some(start); length];
        let err = Ranking::new([5, 4, 4])
            .strategy(no_next)
            .ranks()
            .expect_err("missing next rank");
        assert!(matches!(err, JuniError::StrategyContract(_)));

        let withheld_next = |start: f64, length: usize| {
            iter::repeat_n(Some(start), length).chain(iter::once(None))
        };
        let err = Ranking::new([5, 4, 4])
            .strategy(withheld_next)
            .ranks()
            .expect_err("withheld next rank");
        assert!(matches!(err, JuniError::StrategyContract(_)));
    }

    #[test]
    fn test_strategy_yielding_too_many_ranks() {
        let long = |start: f64, length: usize| vec![Some(start); length + 2];
        let err = Ranking::new([5, 4, 4])
            .strategy(long)
            .ranks()
            .expect_err("long strategy");
        assert!(matches!(err, JuniError::StrategyContract(_)));
    }

    #[test]
    fn test_incomparable_scores() {
        let err = Ranking::new([3.0, f64::NAN])
            .ranks()
            .expect_err("NaN has no ordering");
        assert_eq!(err, JuniError::Incomparable(1));
    }

    #[test]
    fn test_by_key() {
        let players = vec![
            Player { name: "alice", points: 30 },
            Player { name: "bob", points: 20 },
            Player { name: "carol", points: 20 },
            Player { name: "dave", points: 10 },
        ];
        let ranked: Vec<_> = Ranking::by_key(players, |p: &Player| p.points)
            .strategy(StandardStrategy::Dense)
            .start(1.0)
            .into_iter()
            .map(|r| r.map(|(rank, player)| (rank, player.name)))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            ranked,
            vec![
                (Some(1.0), "alice"),
                (Some(2.0), "bob"),
                (Some(2.0), "carol"),
                (Some(3.0), "dave"),
            ]
        );
    }

    #[test]
    fn test_key_called_once_per_element() {
        let mut calls = 0;
        let ranks = Ranking::by_key([5, 4, 4, 3], |x: &i32| {
            calls += 1;
            *x
        })
        .ranks()
        .unwrap();
        assert_eq!(ranks.len(), 4);
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_compare_by() {
        let ranks = Ranking::new([1, 2, 2, 3])
            .compare_by(|a: &i32, b: &i32| b.cmp(a))
            .ranks()
            .unwrap();
        assert_eq!(ranks, ranked(&[0.0, 1.0, 1.0, 3.0]));

        let words = ["banana", "cherry", "fig", "kiwi"];
        let err = Ranking::by_key(words, |w: &&str| w.len())
            .ranks()
            .expect_err("lengths are not descending");
        assert_eq!(err, JuniError::NotSorted(3));
    }

    #[test]
    fn test_stops_early_on_unbounded_input() {
        let countdown = (0..).map(|x: i64| -x);
        let first: Vec<_> = Ranking::new(countdown)
            .into_iter()
            .take(3)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(first, vec![(Some(0.0), 0), (Some(1.0), -1), (Some(2.0), -2)]);
    }

    #[test]
    fn test_pulls_one_element_ahead() {
        let mut pulled = 0;
        let source = [5, 4, 3].into_iter().inspect(|_| pulled += 1);
        let first = Ranking::new(source).into_iter().next();
        assert_eq!(first, Some(Ok((Some(0.0), 5))));
        assert_eq!(pulled, 2);
    }

    #[test]
    fn test_values() {
        let values = Ranking::new([5, 4, 4, 3]).values().unwrap();
        assert_eq!(values, vec![5, 4, 4, 3]);

        Ranking::new([3, 4]).values().expect_err("not sorted");
    }

    #[test]
    fn test_iter_ranks() {
        let mut ranks = Ranking::new([5, 4, 4, 3])
            .strategy(StandardStrategy::ModifiedCompetition)
            .iter_ranks();
        assert_eq!(ranks.next(), Some(Ok(Some(0.0))));
        assert_eq!(ranks.next(), Some(Ok(Some(2.0))));
    }

    #[test]
    fn test_rank_of() {
        let rank = Ranking::new([5, 4, 4, 3]).rank_of(&3).unwrap();
        assert_eq!(rank, Some(3.0));

        let rank = Ranking::new([5, 4, 4, 3])
            .strategy(StandardStrategy::Fractional)
            .rank_of(&4)
            .unwrap();
        assert_eq!(rank, Some(1.5));

        let err = Ranking::new([5, 4, 4, 3]).rank_of(&7).expect_err("absent");
        assert_eq!(err, JuniError::NotFound);

        let rank = Ranking::new([Some(5), None]).rank_of(&None).unwrap();
        assert_eq!(rank, None);
    }

    #[test]
    fn test_rank_of_stops_at_match() {
        // the unsorted tail is never reached
        let rank = Ranking::new([5, 4, 9]).rank_of(&5).unwrap();
        assert_eq!(rank, Some(0.0));
    }

    #[test]
    fn test_with_config() {
        let config = RankingConfig::new(StandardStrategy::Dense, 1.0, false);
        let ranks = Ranking::new([5, 4, 4, 3])
            .with_config(&config)
            .unwrap()
            .ranks()
            .unwrap();
        assert_eq!(ranks, ranked(&[1.0, 2.0, 2.0, 3.0]));

        let config = RankingConfig::new(StandardStrategy::Dense, f64::NAN, false);
        let err = Ranking::new([5, 4, 4, 3]).with_config(&config).err();
        assert!(matches!(err, Some(JuniError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_finite_start_fails_first() {
        let mut ranking = Ranking::new([1]).start(f64::INFINITY).into_iter();
        assert!(matches!(
            ranking.next(),
            Some(Err(JuniError::InvalidConfig(_)))
        ));
        assert_eq!(ranking.next(), None);
    }
}
