use crate::interval_set::{Interval, IntervalError, IntervalSet};

/// Computes where a time point lands after a collection of intervals is cut
/// out of the timeline.
///
/// The `anchor` is the reference point the cut material is measured against:
/// the total removed length between the anchor and the query point is
/// subtracted when the point sits at or after the anchor, added when it sits
/// before. The anchor itself always maps to itself.
///
/// Queries take `&mut self` because the cut set re-merges lazily after
/// insertions. To share a tree across threads, finish inserting, call
/// [`merge`](TrimmingTree::merge) once, and hand out immutable references
/// to a wrapper that uses the pre-merged form (see
/// [`Defragmentation`](crate::Defragmentation)).
#[derive(Debug, Clone, Default)]
pub struct TrimmingTree {
    anchor: f64,
    ndigits: Option<i32>,
    cut: IntervalSet,
}

impl TrimmingTree {
    pub fn new(anchor: f64) -> Self {
        Self {
            anchor,
            ndigits: None,
            cut: IntervalSet::new(),
        }
    }

    /// Like [`new`](TrimmingTree::new), but every answer is rounded to
    /// `ndigits` decimal digits. Rounding is applied to the final answer
    /// only, never to intermediate sums, and rounds halves away from zero
    /// (`f64::round` semantics).
    pub fn with_precision(anchor: f64, ndigits: i32) -> Self {
        Self {
            anchor,
            ndigits: Some(ndigits),
            cut: IntervalSet::new(),
        }
    }

    pub fn anchor(&self) -> f64 {
        self.anchor
    }

    /// Mark `[start, start + duration)` for removal.
    pub fn add_segment(&mut self, start: f64, duration: f64) -> Result<(), IntervalError> {
        self.cut.add(start, start + duration)
    }

    /// Mark `[begin, end)` for removal.
    pub fn add_interval(&mut self, begin: f64, end: f64) -> Result<(), IntervalError> {
        self.cut.add(begin, end)
    }

    /// Force the lazy merge of the cut set now rather than on first query.
    pub fn merge(&mut self) {
        self.cut.merge();
    }

    /// Map `point` to its position on the timeline that remains after all
    /// marked intervals are deleted.
    pub fn trim(&mut self, point: f64) -> f64 {
        self.cut.merge();
        self.trim_merged(point)
    }

    /// Both ends of `[start, end)` mapped independently. The result is
    /// shorter than the input exactly when cut material lies inside it.
    pub fn trim_interval(&mut self, start: f64, end: f64) -> (f64, f64) {
        self.cut.merge();
        (self.trim_merged(start), self.trim_merged(end))
    }

    /// `trim_interval` for a `(start, duration)` pair, re-expressed the
    /// same way.
    pub fn trim_segment(&mut self, start: f64, duration: f64) -> (f64, f64) {
        let (start_, end_) = self.trim_interval(start, start + duration);
        (start_, end_ - start_)
    }

    /// Query path for pre-merged trees, so an immutable owner can answer
    /// from `&self`. The cut set must already be merged.
    pub(crate) fn trim_merged(&self, point: f64) -> f64 {
        let (lo, hi) = if point < self.anchor {
            (point, self.anchor)
        } else {
            (self.anchor, point)
        };
        // overlap_merged slices straddling intervals at the span boundaries,
        // so a cut partially outside [lo, hi] contributes only the inside part
        let delta: f64 = self
            .cut
            .overlap_merged(lo, hi)
            .map(|iv: Interval| iv.length())
            .sum();
        let answer = if point >= self.anchor {
            point - delta
        } else {
            point + delta
        };
        match self.ndigits {
            Some(ndigits) => round_to(answer, ndigits),
            None => answer,
        }
    }
}

fn round_to(value: f64, ndigits: i32) -> f64 {
    let scale = 10f64.powi(ndigits);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_identity() {
        let mut tree = TrimmingTree::new(0.0);
        for point in [-3.0, 0.0, 0.5, 100.0] {
            assert_eq!(tree.trim(point), point);
        }
    }

    #[test]
    fn anchor_maps_to_itself() {
        for anchor in [-10.0, 0.0, 7.5] {
            let mut tree = TrimmingTree::new(anchor);
            tree.add_interval(anchor - 5.0, anchor + 5.0).unwrap();
            assert_eq!(tree.trim(anchor), anchor);
        }
    }

    #[test]
    fn single_cut_shifts_later_points() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_interval(10.0, 15.0).unwrap();
        assert_eq!(tree.trim(20.0), 15.0);
        assert_eq!(tree.trim(5.0), 5.0);
    }

    #[test]
    fn touching_cuts_merge_before_counting() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_interval(10.0, 15.0).unwrap();
        tree.add_interval(15.0, 20.0).unwrap();
        assert_eq!(tree.trim(25.0), 15.0);
    }

    #[test]
    fn duplicate_cuts_count_once() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_interval(10.0, 15.0).unwrap();
        tree.add_interval(10.0, 15.0).unwrap();
        tree.add_interval(12.0, 14.0).unwrap();
        assert_eq!(tree.trim(20.0), 15.0);
    }

    #[test]
    fn cut_covering_whole_span_collapses_to_anchor() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_interval(0.0, 30.0).unwrap();
        assert_eq!(tree.trim(30.0), 0.0);

        let mut tree = TrimmingTree::new(30.0);
        tree.add_interval(0.0, 30.0).unwrap();
        assert_eq!(tree.trim(0.0), 30.0);
    }

    #[test]
    fn point_before_anchor_moves_toward_it() {
        // cut entirely between the point and the anchor
        let mut tree = TrimmingTree::new(50.0);
        tree.add_interval(10.0, 20.0).unwrap();
        assert_eq!(tree.trim(5.0), 15.0);
        // point inside the cut itself: only the part of the cut between the
        // point and the anchor counts
        assert_eq!(tree.trim(15.0), 20.0);
        // point past the cut, nothing between it and the anchor
        assert_eq!(tree.trim(25.0), 25.0);
    }

    #[test]
    fn cut_straddling_the_point_counts_the_inside_part_only() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_interval(10.0, 20.0).unwrap();
        assert_eq!(tree.trim(15.0), 10.0);
    }

    #[test]
    fn cut_straddling_the_anchor_counts_the_inside_part_only() {
        let mut tree = TrimmingTree::new(10.0);
        tree.add_interval(5.0, 15.0).unwrap();
        assert_eq!(tree.trim(20.0), 15.0);
        assert_eq!(tree.trim(0.0), 5.0);
    }

    #[test]
    fn cut_touching_the_point_contributes_nothing() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_interval(20.0, 30.0).unwrap();
        assert_eq!(tree.trim(20.0), 20.0);
    }

    #[test]
    fn monotone_across_scattered_cuts() {
        let mut tree = TrimmingTree::new(3.0);
        tree.add_interval(-5.0, -2.0).unwrap();
        tree.add_interval(1.0, 2.0).unwrap();
        tree.add_interval(6.0, 10.0).unwrap();
        let points = [-8.0, -4.0, -1.0, 0.0, 1.5, 3.0, 5.0, 7.0, 12.0];
        let trimmed: Vec<f64> = points.iter().map(|&p| tree.trim(p)).collect();
        for pair in trimmed.windows(2) {
            assert!(pair[0] <= pair[1], "order reversed: {:?}", trimmed);
        }
    }

    #[test]
    fn interval_and_segment_agree_with_points() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_segment(10.0, 5.0).unwrap();
        assert_eq!(tree.trim_interval(5.0, 20.0), (5.0, 15.0));
        let (start, duration) = tree.trim_segment(5.0, 15.0);
        assert_eq!(start, tree.trim(5.0));
        assert_eq!(start + duration, tree.trim(20.0));
    }

    #[test]
    fn zero_length_cut_changes_nothing() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_interval(5.0, 5.0).unwrap();
        assert_eq!(tree.trim(10.0), 10.0);
        assert_eq!(tree.trim(5.0), 5.0);
    }

    #[test]
    fn rounding_applies_to_the_final_answer_only() {
        let mut tree = TrimmingTree::with_precision(0.0, 2);
        tree.add_interval(1.0 / 3.0, 2.0 / 3.0).unwrap();
        // 1 - 1/3 = 0.6666... rounds to 0.67; rounding the interval ends
        // first would have given 1 - (0.67 - 0.33) = 0.66
        assert_eq!(tree.trim(1.0), 0.67);
        let mut exact = TrimmingTree::new(0.0);
        exact.add_interval(1.0 / 3.0, 2.0 / 3.0).unwrap();
        assert_ne!(exact.trim(1.0), 0.67);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(-0.125, 2), -0.13);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn add_after_query_invalidates_the_merge_cache() {
        let mut tree = TrimmingTree::new(0.0);
        tree.add_interval(10.0, 15.0).unwrap();
        assert_eq!(tree.trim(20.0), 15.0);
        tree.add_interval(15.0, 18.0).unwrap();
        assert_eq!(tree.trim(20.0), 12.0);
    }

    #[test]
    fn rejects_inverted_input() {
        let mut tree = TrimmingTree::new(0.0);
        assert!(tree.add_interval(5.0, 3.0).is_err());
        assert!(tree.add_segment(5.0, -1.0).is_err());
    }
}
