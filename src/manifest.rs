//! YAML manifests of supervision segments: timestamped annotation regions
//! tied to a recording, the metadata a timeline edit has to rewrite.

#[derive(Debug, Clone, PartialEq)]
pub struct SupervisionSegment {
    pub id: String,
    pub recording_id: String,
    pub start: f64,
    pub duration: f64,
    pub channel: u32,
}

merde::derive! {
    impl (Deserialize) for struct SupervisionSegment { id, recording_id, start, duration, channel }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SupervisionSet(Vec<SupervisionSegment>);

merde::derive! {
    impl (Deserialize) for struct SupervisionSet transparent
}

#[derive(Debug)]
pub enum ManifestError {
    Deserialize(merde::MerdeError<'static>),
    NotUtf8(std::str::Utf8Error),
    UnreadableFile(std::io::Error),
    NegativeDuration { id: String, duration: f64 },
}

impl From<merde::MerdeError<'_>> for ManifestError {
    fn from(value: merde::MerdeError<'_>) -> Self {
        use merde::IntoStatic;
        Self::Deserialize(value.into_static())
    }
}

impl From<std::str::Utf8Error> for ManifestError {
    fn from(value: std::str::Utf8Error) -> Self {
        Self::NotUtf8(value)
    }
}

#[rustfmt::skip]
impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deserialize(e)
                => write!(f, "{}", e),
            Self::NotUtf8(e)
                => write!(f, "{}", e),
            Self::UnreadableFile(e)
                => write!(f, "{}", e),
            Self::NegativeDuration { id, duration }
                => write!(f, "segment {:?} has negative duration {}", id, duration),
        }
    }
}

impl std::error::Error for ManifestError {}

impl SupervisionSet {
    /// Collect segments into a set, keeping their order.
    pub fn from_segments(
        segments: impl IntoIterator<Item = SupervisionSegment>,
    ) -> Result<Self, ManifestError> {
        let set = Self(segments.into_iter().collect());
        set.validate()?;
        Ok(set)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ManifestError> {
        let bytes = std::fs::read(path.as_ref()).map_err(ManifestError::UnreadableFile)?;
        let text = std::str::from_utf8(&bytes)?;
        Self::load_from_str(text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ManifestError> {
        let set: Self = merde::yaml::from_str(text)?;
        set.validate()?;
        Ok(set)
    }

    // malformed segments should surface at load time, not on first query
    fn validate(&self) -> Result<(), ManifestError> {
        for segment in &self.0 {
            if !(segment.duration >= 0.0) {
                return Err(ManifestError::NegativeDuration {
                    id: segment.id.clone(),
                    duration: segment.duration,
                });
            }
        }
        Ok(())
    }

    pub fn segments(&self) -> &[SupervisionSegment] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SupervisionSegment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `(offset, duration)` pairs of the segments, e.g. as the kept
    /// regions of a [`Defragmentation`](crate::Defragmentation).
    pub fn extents(&self) -> Vec<(f64, f64)> {
        self.0.iter().map(|s| (s.start, s.duration)).collect()
    }
}

impl IntoIterator for SupervisionSet {
    type Item = SupervisionSegment;
    type IntoIter = std::vec::IntoIter<SupervisionSegment>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
