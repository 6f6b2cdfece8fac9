//! The seam between an activity-detection model and the trimming pipeline.
//! The crate ships no model; callers implement [`ActivityDetector`] and get
//! back supervision segments keyed the same way across runs.

use crate::manifest::SupervisionSegment;

/// A region of detected activity on one channel, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activity {
    pub start: f64,
    pub duration: f64,
}

pub trait ActivityDetector {
    fn name(&self) -> &str;

    /// Sampling rate the detector expects its input at. Resampling is the
    /// caller's job.
    fn sampling_rate(&self) -> u32;

    fn detect(&mut self, track: &[f32]) -> Vec<Activity>;
}

/// Decoded audio for one recording, one mono track per channel.
#[derive(Debug, Clone)]
pub struct Recording {
    pub id: String,
    pub tracks: Vec<Vec<f32>>,
}

/// Run a detector over every channel of a recording and label the results
/// `{recording_id}-{detector_name}-{channel}-{number:05}`.
pub fn detect_activity_segments(
    recording: &Recording,
    detector: &mut dyn ActivityDetector,
) -> Vec<SupervisionSegment> {
    let mut result = vec![];
    for (channel, track) in recording.tracks.iter().enumerate() {
        let activities = detector.detect(track);
        log::debug!(
            "{}: {} activities on channel {}",
            recording.id,
            activities.len(),
            channel
        );
        for (number, activity) in activities.into_iter().enumerate() {
            result.push(SupervisionSegment {
                id: format!(
                    "{}-{}-{}-{:05}",
                    recording.id,
                    detector.name(),
                    channel,
                    number
                ),
                recording_id: recording.id.clone(),
                start: activity.start,
                duration: activity.duration,
                channel: channel as u32,
            });
        }
    }
    result
}
