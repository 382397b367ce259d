//! Sets of integers stored as sorted, disjoint, inclusive intervals.
//!
//! Used both for token-type sets (parser) and code-point sets (lexer).
//! Adjacent intervals are merged on insertion, so two sets holding the same
//! elements compare equal and hash identically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive interval `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        (i64::from(self.end) - i64::from(self.start) + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, value: i32) -> bool {
        self.start <= value && value <= self.end
    }

    /// Overlapping or touching.
    fn merges_with(&self, other: &Interval) -> bool {
        i64::from(self.start) <= i64::from(other.end) + 1
            && i64::from(other.start) <= i64::from(self.end) + 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(value: i32) -> Self {
        Self::range(value, value)
    }

    pub fn range(start: i32, end: i32) -> Self {
        let mut set = Self::new();
        set.add_range(start, end);
        set
    }

    pub fn add(&mut self, value: i32) {
        self.add_range(value, value);
    }

    /// Adds `start..=end`. Inverted bounds are ignored.
    pub fn add_range(&mut self, start: i32, end: i32) {
        if end < start {
            return;
        }
        let mut merged = Interval::new(start, end);
        let lo = self
            .intervals
            .partition_point(|iv| i64::from(iv.end) + 1 < i64::from(merged.start));
        let mut hi = lo;
        while hi < self.intervals.len() && self.intervals[hi].merges_with(&merged) {
            merged.start = merged.start.min(self.intervals[hi].start);
            merged.end = merged.end.max(self.intervals[hi].end);
            hi += 1;
        }
        self.intervals.splice(lo..hi, std::iter::once(merged));
    }

    pub fn add_all(&mut self, other: &IntervalSet) {
        for iv in &other.intervals {
            self.add_range(iv.start, iv.end);
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        let idx = self.intervals.partition_point(|iv| iv.end < value);
        self.intervals.get(idx).is_some_and(|iv| iv.contains(value))
    }

    /// True when any element of `start..=end` is already present.
    pub fn intersects_range(&self, start: i32, end: i32) -> bool {
        if end < start {
            return false;
        }
        let idx = self.intervals.partition_point(|iv| iv.end < start);
        self.intervals.get(idx).is_some_and(|iv| iv.start <= end)
    }

    /// Elements of `min..=max` not in this set.
    pub fn complement(&self, min: i32, max: i32) -> IntervalSet {
        IntervalSet::range(min, max).subtract(self)
    }

    pub fn subtract(&self, other: &IntervalSet) -> IntervalSet {
        let mut result = IntervalSet::new();
        for iv in &self.intervals {
            let mut start = i64::from(iv.start);
            let end = i64::from(iv.end);
            for cut in &other.intervals {
                let (cut_start, cut_end) = (i64::from(cut.start), i64::from(cut.end));
                if cut_end < start || cut_start > end {
                    continue;
                }
                if cut_start > start {
                    result.add_range(start as i32, (cut_start - 1) as i32);
                }
                start = start.max(cut_end + 1);
                if start > end {
                    break;
                }
            }
            if start <= end {
                result.add_range(start as i32, end as i32);
            }
        }
        result
    }

    pub fn or(&self, other: &IntervalSet) -> IntervalSet {
        let mut result = self.clone();
        result.add_all(other);
        result
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of elements, not intervals.
    pub fn len(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    pub fn min_element(&self) -> Option<i32> {
        self.intervals.first().map(|iv| iv.start)
    }

    pub fn max_element(&self) -> Option<i32> {
        self.intervals.last().map(|iv| iv.end)
    }

    /// The single element, if the set holds exactly one.
    pub fn single_element(&self) -> Option<i32> {
        match self.intervals.as_slice() {
            [iv] if iv.start == iv.end => Some(iv.start),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.intervals.iter().flat_map(|iv| iv.start..=iv.end)
    }
}

impl FromIterator<i32> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        let mut set = IntervalSet::new();
        for v in iter {
            set.add(v);
        }
        set
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.intervals.len() != 1 {
            f.write_str("{")?;
        }
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if iv.start == iv.end {
                write!(f, "{}", iv.start)?;
            } else {
                write!(f, "{}..{}", iv.start, iv.end)?;
            }
        }
        if self.intervals.len() != 1 {
            f.write_str("}")?;
        }
        Ok(())
    }
}
