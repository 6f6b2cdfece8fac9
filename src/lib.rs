mod interval_set;
mod trimmer;

pub mod activity;
pub mod defrag;
pub mod manifest;
pub mod workflow;

pub use defrag::{AudioTransform, Defragmentation, SampleSupport, TransformError};
pub use interval_set::{Interval, IntervalError, IntervalSet};
pub use manifest::{ManifestError, SupervisionSegment, SupervisionSet};
pub use trimmer::TrimmingTree;
