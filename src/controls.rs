//! Control-bar behaviour, independent of how it is drawn.
//!
//! [`PlayerControls`] forwards every interaction to a [`MediaPrimitive`] and
//! keeps the displayed state (icons, labels, sliders) in step with the
//! notifications it raises.

use crate::icon::Icon;
use crate::media::{MediaEvent, MediaPrimitive};
use crate::range::RangeInput;
use crate::time::format_time;
use std::time::Duration;
use url::Url;

/// Volume restored by unmuting when nothing audible was remembered.
const FALLBACK_VOLUME: f64 = 1.0;

#[derive(Debug)]
pub struct PlayerControls<M> {
    media: M,
    play_icon: Icon,
    volume_icon: Icon,
    progress: RangeInput,
    volume: RangeInput,
    previous_volume: f64,
    current_time: String,
    duration: String,
    last_error: Option<String>,
}

impl<M: MediaPrimitive> PlayerControls<M> {
    pub fn new(media: M) -> Self {
        let volume = media.volume();
        let play_icon = if media.paused() {
            Icon::Play
        } else {
            Icon::Pause
        };
        let volume_icon = if media.muted() || volume <= 0.0 {
            Icon::VolumeMute
        } else {
            Icon::VolumeUp
        };
        let duration = media.duration().map(format_time);
        Self {
            media,
            play_icon,
            volume_icon,
            progress: RangeInput::progress(),
            volume: RangeInput::volume(volume),
            previous_volume: if volume > 0.0 { volume } else { FALLBACK_VOLUME },
            current_time: format_time(Duration::ZERO),
            duration: duration.unwrap_or_else(|| format_time(Duration::ZERO)),
            last_error: None,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn play_icon(&self) -> Icon {
        self.play_icon
    }

    pub fn volume_icon(&self) -> Icon {
        self.volume_icon
    }

    pub fn progress(&self) -> &RangeInput {
        &self.progress
    }

    pub fn volume(&self) -> &RangeInput {
        &self.volume
    }

    pub fn current_time_label(&self) -> &str {
        &self.current_time
    }

    pub fn duration_label(&self) -> &str {
        &self.duration
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The title is hidden while the player is fullscreen.
    pub fn title_visible(&self, fullscreen: bool) -> bool {
        !fullscreen
    }

    pub fn play(&mut self) {
        self.media.play();
    }

    pub fn pause(&mut self) {
        self.media.pause();
    }

    /// Play/pause button: acts on the primitive's state and flips the icon
    /// without waiting for the notification.
    pub fn toggle_play_pause(&mut self) {
        if self.media.paused() {
            self.media.play();
            self.play_icon = Icon::Pause;
        } else {
            self.media.pause();
            self.play_icon = Icon::Play;
        }
    }

    /// Pauses and rewinds to the start.
    pub fn stop(&mut self) {
        self.media.pause();
        self.seek(Duration::ZERO);
        self.play_icon = Icon::Play;
    }

    /// Jumps ahead, never past the end. Does nothing until the duration is
    /// known.
    pub fn seek_forward(&mut self, step: Duration) {
        let Some(duration) = self.media.duration() else {
            log::debug!("seek forward ignored, duration unknown");
            return;
        };
        let target = self.media.position().saturating_add(step).min(duration);
        self.seek(target);
    }

    /// Jumps back, never before the start.
    pub fn seek_backward(&mut self, step: Duration) {
        let target = self.media.position().saturating_sub(step);
        self.seek(target);
    }

    /// Seeks to `percentage` of the duration, when the duration is known and
    /// non-zero.
    pub fn seek_to_percentage(&mut self, percentage: f64) {
        if !percentage.is_finite() {
            return;
        }
        let Some(duration) = self.media.duration().filter(|d| !d.is_zero()) else {
            return;
        };
        let fraction = percentage.clamp(0.0, 100.0) / 100.0;
        self.seek(duration.mul_f64(fraction));
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.media.set_volume(volume);
    }

    /// The user dragged the progress slider.
    pub fn input_progress(&mut self, value: f64) {
        self.progress.set_value(value);
        self.seek_to_percentage(self.progress.value());
    }

    /// The user dragged the volume slider.
    pub fn input_volume(&mut self, value: f64) {
        self.volume.set_value(value);
        let volume = self.volume.value();
        self.set_volume(volume);
        if volume > 0.0 && self.media.muted() {
            self.media.set_muted(false);
        }
        self.volume_icon = if volume == 0.0 {
            Icon::VolumeMute
        } else {
            Icon::VolumeUp
        };
    }

    /// Volume icon: silences the media while remembering the slider volume,
    /// or restores it.
    pub fn toggle_mute(&mut self) {
        let audible = self.volume.value() > 0.0 && !self.media.muted();
        if audible {
            self.previous_volume = self.volume.value();
            self.set_volume(0.0);
            self.volume.set_value(0.0);
            self.volume_icon = Icon::VolumeMute;
        } else {
            if self.previous_volume <= 0.0 {
                self.previous_volume = FALLBACK_VOLUME;
            }
            self.media.set_muted(false);
            self.set_volume(self.previous_volume);
            self.volume.set_value(self.previous_volume);
            self.volume_icon = Icon::VolumeUp;
        }
    }

    /// Swaps the media source; the time display starts over.
    pub fn set_source(&mut self, uri: &Url) -> Result<(), crate::Error> {
        self.media.set_source(uri)?;
        self.progress.set_value(0.0);
        self.current_time = format_time(Duration::ZERO);
        self.duration = format_time(Duration::ZERO);
        self.play_icon = if self.media.paused() {
            Icon::Play
        } else {
            Icon::Pause
        };
        Ok(())
    }

    /// Applies a single notification from the media primitive.
    pub fn handle_event(&mut self, event: &MediaEvent) {
        match event {
            MediaEvent::Play => self.play_icon = Icon::Pause,
            MediaEvent::Pause | MediaEvent::Ended => self.play_icon = Icon::Play,
            MediaEvent::TimeUpdate(position) => self.update_progress(*position),
            MediaEvent::LoadedMetadata(duration) => self.duration = format_time(*duration),
            MediaEvent::Error(message) => {
                log::error!("media error: {message}");
                self.last_error = Some(message.clone());
            }
        }
    }

    /// Drains and applies pending notifications, returning them for callers
    /// that forward them further.
    pub fn sync(&mut self) -> Vec<MediaEvent> {
        let events = self.media.poll_events();
        for event in &events {
            self.handle_event(event);
        }
        events
    }

    fn update_progress(&mut self, position: Duration) {
        let Some(duration) = self.media.duration().filter(|d| !d.is_zero()) else {
            return;
        };
        self.progress
            .set_value(position.as_secs_f64() / duration.as_secs_f64() * 100.0);
        self.current_time = format_time(position);
    }

    fn seek(&mut self, position: Duration) {
        if let Err(err) = self.media.seek(position) {
            log::warn!("seek to {position:?} failed: {err}");
        }
    }
}
