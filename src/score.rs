// score.rs
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

/// The comparable projection of an element.
///
/// Scores that can carry an absence marker report it through
/// [`Score::is_absent`]; elements with an absent score are emitted unranked.
/// `Option<T>` is absent when `None`. Plain values are never absent, so a
/// custom score type only needs an empty `impl Score for MyScore {}`.
pub trait Score {
    fn is_absent(&self) -> bool {
        false
    }
}

impl<T> Score for Option<T> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T: Score + ?Sized> Score for &T {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

macro_rules! present_scores {
    ($($ty:ty),* $(,)?) => {
        $(impl Score for $ty {})*
    };
}

present_scores!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String,
);

/// Orders two scores.
///
/// `None` means the scores have no ordering, which aborts the scan with an
/// incomparable-scores error.
pub trait Compare<S: ?Sized> {
    fn compare(&mut self, left: &S, right: &S) -> Option<Ordering>;
}

/// Compares scores by their `PartialOrd` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<S: PartialOrd + ?Sized> Compare<S> for NaturalOrder {
    fn compare(&mut self, left: &S, right: &S) -> Option<Ordering> {
        left.partial_cmp(right)
    }
}

impl<S: ?Sized, F> Compare<S> for F
where
    F: FnMut(&S, &S) -> Ordering,
{
    fn compare(&mut self, left: &S, right: &S) -> Option<Ordering> {
        Some(self(left, right))
    }
}

/// Compares `left` (the preceding score) against `right`, inverting the
/// result when the sequence is ranked in reverse.
///
/// A well-sorted sequence always answers `Greater` or `Equal`.
pub(crate) fn directed<S, C>(compare: &mut C, reverse: bool, left: &S, right: &S) -> Option<Ordering>
where
    S: ?Sized,
    C: Compare<S>,
{
    let ordering = compare.compare(left, right)?;
    Some(if reverse { ordering.reverse() } else { ordering })
}

// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------------------------
