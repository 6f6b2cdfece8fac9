use crate::interval_set::{IntervalError, IntervalSet};
use crate::trimmer::TrimmingTree;

/// Whether a transform can rewrite raw samples, so callers can branch on
/// capability instead of invoking the operation speculatively.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleSupport {
    Supported,
    Unsupported,
}

#[derive(Debug)]
pub enum TransformError {
    Unsupported(&'static str),
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(what) => write!(f, "{} is not implemented by this transform", what),
        }
    }
}

impl std::error::Error for TransformError {}

/// A timeline edit as seen by metadata: it can always translate timestamps
/// recorded against the original timeline into post-edit coordinates, and
/// may or may not be able to apply the edit to raw samples.
pub trait AudioTransform {
    fn sample_support(&self) -> SampleSupport {
        SampleSupport::Unsupported
    }

    /// Apply the edit to decoded samples. Transforms that only do timestamp
    /// algebra fail loudly here rather than hand the input back unchanged.
    fn transform_samples(
        &self,
        _samples: &[f32],
        _sampling_rate: u32,
    ) -> Result<Vec<f32>, TransformError> {
        Err(TransformError::Unsupported("sample-level editing"))
    }

    /// Translate an `(offset, duration)` recorded before the edit into the
    /// post-edit coordinate space. `duration: None` means a bare point.
    fn reverse_timestamps(&self, offset: f64, duration: Option<f64>) -> (f64, Option<f64>);
}

/// Compacts a timeline down to a set of kept segments: everything between
/// them is cut, and timestamps are remapped accordingly.
///
/// Built once from `(offset, duration)` pairs of the regions to keep and
/// immutable afterwards; the removed set is the complement of the kept
/// regions over the whole real line, anchored at 0 with full precision.
#[derive(Debug, Clone)]
pub struct Defragmentation {
    segments: Vec<(f64, f64)>,
    trimmer: TrimmingTree,
}

impl Defragmentation {
    pub fn new(kept: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, IntervalError> {
        let mut kept_set = IntervalSet::new();
        for (offset, duration) in kept {
            kept_set.add(offset, offset + duration)?;
        }
        kept_set.merge();
        let segments = kept_set
            .as_slice()
            .iter()
            .map(|iv| (iv.begin, iv.length()))
            .collect();
        let mut trimmer = TrimmingTree::new(0.0);
        for gap in kept_set.complement(f64::NEG_INFINITY, f64::INFINITY) {
            trimmer.add_interval(gap.begin, gap.end)?;
        }
        // pre-merge so queries work from &self
        trimmer.merge();
        Ok(Self { segments, trimmer })
    }

    /// The kept regions in canonical form: disjoint, sorted by offset.
    pub fn segments(&self) -> &[(f64, f64)] {
        &self.segments
    }

    /// Where a point recorded on the original timeline lands after
    /// defragmentation.
    pub fn reverse_timestamp(&self, offset: f64) -> f64 {
        self.trimmer.trim_merged(offset)
    }

    /// `reverse_timestamp` for both ends of a segment, re-expressed as
    /// `(offset, duration)`.
    pub fn reverse_segment(&self, offset: f64, duration: f64) -> (f64, f64) {
        let start = self.trimmer.trim_merged(offset);
        let end = self.trimmer.trim_merged(offset + duration);
        (start, end - start)
    }
}

impl AudioTransform for Defragmentation {
    fn reverse_timestamps(&self, offset: f64, duration: Option<f64>) -> (f64, Option<f64>) {
        match duration {
            None => (self.reverse_timestamp(offset), None),
            Some(duration) => {
                let (offset_, duration_) = self.reverse_segment(offset, duration);
                (offset_, Some(duration_))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_kept_segments() {
        let defrag = Defragmentation::new(vec![(20.0, 10.0), (0.0, 6.0), (4.0, 6.0)]).unwrap();
        assert_eq!(defrag.segments(), &[(0.0, 10.0), (20.0, 10.0)]);
    }

    #[test]
    fn gap_between_kept_regions_is_cut() {
        let defrag = Defragmentation::new(vec![(0.0, 10.0), (20.0, 10.0)]).unwrap();
        assert_eq!(defrag.reverse_timestamp(25.0), 15.0);
        assert_eq!(defrag.reverse_segment(20.0, 10.0), (10.0, 10.0));
    }

    #[test]
    fn leading_gap_shifts_everything_to_zero() {
        let defrag = Defragmentation::new(vec![(5.0, 10.0)]).unwrap();
        assert_eq!(defrag.reverse_timestamp(5.0), 0.0);
        assert_eq!(defrag.reverse_timestamp(15.0), 10.0);
        assert_eq!(defrag.reverse_segment(7.0, 2.0), (2.0, 2.0));
    }

    #[test]
    fn segment_spanning_a_gap_shrinks() {
        let defrag = Defragmentation::new(vec![(0.0, 10.0), (20.0, 10.0)]).unwrap();
        let (offset, duration) = defrag.reverse_segment(5.0, 20.0);
        assert_eq!(offset, 5.0);
        assert_eq!(duration, 10.0);
    }

    #[test]
    fn reverse_timestamps_mirrors_both_forms() {
        let defrag = Defragmentation::new(vec![(0.0, 10.0), (20.0, 10.0)]).unwrap();
        assert_eq!(defrag.reverse_timestamps(25.0, None), (15.0, None));
        assert_eq!(
            defrag.reverse_timestamps(20.0, Some(10.0)),
            (10.0, Some(10.0))
        );
    }

    #[test]
    fn rejects_negative_durations() {
        assert!(Defragmentation::new(vec![(0.0, -1.0)]).is_err());
    }

    #[test]
    fn sample_editing_fails_loudly() {
        let defrag = Defragmentation::new(vec![(0.0, 10.0)]).unwrap();
        assert_eq!(defrag.sample_support(), SampleSupport::Unsupported);
        let result = defrag.transform_samples(&[0.0; 16], 16000);
        assert!(matches!(result, Err(TransformError::Unsupported(_))));
    }
}
