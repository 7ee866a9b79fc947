use crate::Error;
use std::time::Duration;

/// Change notifications raised by a media primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback started or resumed.
    Play,
    /// Playback paused, including when the stream ended.
    Pause,
    /// The playback position moved.
    TimeUpdate(Duration),
    /// The media duration became known or changed.
    LoadedMetadata(Duration),
    /// The stream reached its end without looping.
    Ended,
    /// The primitive reported an error.
    Error(String),
}

/// The playback element the controls drive.
///
/// Implementations own decoding, buffering and timing; the controls only call
/// these methods and react to [`MediaEvent`]s.
pub trait MediaPrimitive {
    fn play(&self);

    fn pause(&self);

    fn paused(&self) -> bool;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Jumps to `position`.
    fn seek(&self, position: Duration) -> Result<(), Error>;

    /// Media length, `None` until metadata is available.
    fn duration(&self) -> Option<Duration>;

    /// Volume multiplier in `0.0..=1.0`.
    fn volume(&self) -> f64;

    /// Sets the volume; values outside `0.0..=1.0` are clamped.
    fn set_volume(&self, volume: f64);

    fn muted(&self) -> bool;

    fn set_muted(&self, muted: bool);

    /// Replaces the media source and reloads it.
    fn set_source(&self, uri: &url::Url) -> Result<(), Error>;

    /// Drains the notifications raised since the last call.
    fn poll_events(&self) -> Vec<MediaEvent>;
}
