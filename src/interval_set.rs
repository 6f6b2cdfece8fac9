/// A half-open span of time `[begin, end)`, in seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    pub begin: f64,
    pub end: f64,
}

impl Interval {
    pub fn length(&self) -> f64 {
        self.end - self.begin
    }

    /// The portion of this interval inside the closed span `[lo, hi]`,
    /// or None if the two don't even touch.
    fn clip(&self, lo: f64, hi: f64) -> Option<Interval> {
        let begin = self.begin.max(lo);
        let end = self.end.min(hi);
        (begin <= end).then_some(Interval { begin, end })
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntervalError {
    Inverted { begin: f64, end: f64 },
}

impl std::fmt::Display for IntervalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inverted { begin, end } => {
                write!(f, "interval ends at {} before it begins at {}", end, begin)
            }
        }
    }
}

impl std::error::Error for IntervalError {}

/// A collection of intervals that reduces itself to the minimal disjoint
/// cover of its contents, lazily, the next time anything needs to look at it.
#[derive(Debug, Clone)]
pub struct IntervalSet {
    items: Vec<Interval>,
    merged: bool,
}

impl Default for IntervalSet {
    fn default() -> Self {
        // an empty set is vacuously merged
        Self {
            items: vec![],
            merged: true,
        }
    }
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `[begin, end)`. Rejects inverted ranges instead of swapping or
    /// clamping, so bookkeeping mistakes upstream surface immediately.
    /// NaN endpoints fail the same check.
    pub fn add(&mut self, begin: f64, end: f64) -> Result<(), IntervalError> {
        if !(begin <= end) {
            return Err(IntervalError::Inverted { begin, end });
        }
        self.items.push(Interval { begin, end });
        self.merged = false;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_merged(&self) -> bool {
        self.merged
    }

    /// Fold overlapping or touching intervals into their union. Idempotent;
    /// a no-op until the next `add`.
    pub fn merge(&mut self) {
        if self.merged {
            return;
        }
        self.items.sort_by(|a, b| a.begin.total_cmp(&b.begin));
        let mut folded: Vec<Interval> = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            match folded.last_mut() {
                // touching counts as overlapping
                Some(last) if item.begin <= last.end => {
                    last.end = last.end.max(item.end);
                }
                _ => folded.push(item),
            }
        }
        self.items = folded;
        self.merged = true;
    }

    /// The merged form. Call `merge()` first if the set may be dirty.
    pub fn as_slice(&self) -> &[Interval] {
        debug_assert!(self.merged, "as_slice called on an unmerged IntervalSet");
        &self.items
    }

    /// The stored intervals intersecting the closed span `[lo, hi]`, sliced
    /// at the span's boundaries so that only the portion inside contributes
    /// to any length sum. Intervals that merely touch the span come back
    /// with zero length.
    pub fn overlap(&mut self, lo: f64, hi: f64) -> Vec<Interval> {
        self.merge();
        self.overlap_merged(lo, hi).collect()
    }

    pub(crate) fn overlap_merged(&self, lo: f64, hi: f64) -> impl Iterator<Item = Interval> + '_ {
        debug_assert!(self.merged, "overlap_merged called on an unmerged IntervalSet");
        // merged intervals are sorted with strictly increasing ends, so we
        // can binary-search the first candidate and stop at the first miss
        let first = self.items.partition_point(|iv| iv.end < lo);
        self.items[first..].iter().map_while(move |iv| iv.clip(lo, hi))
    }

    /// Every sub-range of `[lo, hi]` not covered by a stored interval.
    pub fn complement(&mut self, lo: f64, hi: f64) -> Vec<Interval> {
        self.merge();
        let mut gaps = vec![];
        let mut cursor = lo;
        for iv in &self.items {
            if iv.begin >= hi {
                break;
            }
            if iv.begin > cursor {
                gaps.push(Interval {
                    begin: cursor,
                    end: iv.begin,
                });
            }
            cursor = cursor.max(iv.end);
        }
        if cursor < hi {
            gaps.push(Interval {
                begin: cursor,
                end: hi,
            });
        }
        gaps
    }
}
