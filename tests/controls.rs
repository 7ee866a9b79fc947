//! Drives the public control API against a scripted media primitive.

use gpui_video_controls::{
    Error, Icon, MediaEvent, MediaPrimitive, PlayerControls, PlayerOptions, Url,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Shared state so the test keeps a view of the media after handing it over.
#[derive(Debug, Default)]
struct Script {
    playing: bool,
    position: Duration,
    duration: Option<Duration>,
    volume: f64,
    muted: bool,
    pending: Vec<MediaEvent>,
    calls: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct ScriptedMedia(Rc<RefCell<Script>>);

impl ScriptedMedia {
    fn new(duration: Option<Duration>) -> Self {
        let media = Self::default();
        {
            let mut script = media.0.borrow_mut();
            script.duration = duration;
            script.volume = 1.0;
        }
        media
    }

    /// Simulates the playback clock advancing and the element reporting it.
    fn advance_to(&self, position: Duration) {
        let mut script = self.0.borrow_mut();
        script.position = position;
        script.pending.push(MediaEvent::TimeUpdate(position));
    }

    fn load_metadata(&self, duration: Duration) {
        let mut script = self.0.borrow_mut();
        script.duration = Some(duration);
        script.pending.push(MediaEvent::LoadedMetadata(duration));
    }

    fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }
}

impl MediaPrimitive for ScriptedMedia {
    fn play(&self) {
        let mut script = self.0.borrow_mut();
        script.playing = true;
        script.calls.push("play".into());
        script.pending.push(MediaEvent::Play);
    }

    fn pause(&self) {
        let mut script = self.0.borrow_mut();
        script.playing = false;
        script.calls.push("pause".into());
        script.pending.push(MediaEvent::Pause);
    }

    fn paused(&self) -> bool {
        !self.0.borrow().playing
    }

    fn position(&self) -> Duration {
        self.0.borrow().position
    }

    fn seek(&self, position: Duration) -> Result<(), Error> {
        let mut script = self.0.borrow_mut();
        script.position = position;
        script.calls.push(format!("seek {}", position.as_secs_f64()));
        script.pending.push(MediaEvent::TimeUpdate(position));
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.0.borrow().duration
    }

    fn volume(&self) -> f64 {
        self.0.borrow().volume
    }

    fn set_volume(&self, volume: f64) {
        self.0.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn muted(&self) -> bool {
        self.0.borrow().muted
    }

    fn set_muted(&self, muted: bool) {
        self.0.borrow_mut().muted = muted;
    }

    fn set_source(&self, uri: &Url) -> Result<(), Error> {
        if uri.scheme() == "bogus" {
            return Err(Error::Uri);
        }
        let mut script = self.0.borrow_mut();
        script.duration = None;
        script.position = Duration::ZERO;
        script.calls.push(format!("load {uri}"));
        Ok(())
    }

    fn poll_events(&self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.0.borrow_mut().pending)
    }
}

#[test]
fn playback_session_keeps_display_in_step() {
    let media = ScriptedMedia::new(None);
    let mut controls = PlayerControls::new(media.clone());
    assert_eq!(controls.duration_label(), "0:00");

    media.load_metadata(Duration::from_secs(200));
    controls.sync();
    assert_eq!(controls.duration_label(), "3:20");

    controls.toggle_play_pause();
    controls.sync();
    assert_eq!(controls.play_icon(), Icon::Pause);

    media.advance_to(Duration::from_secs(50));
    controls.sync();
    assert_eq!(controls.progress().value(), 25.0);
    assert_eq!(controls.current_time_label(), "0:50");

    controls.seek_forward(Duration::from_secs(10));
    controls.sync();
    assert_eq!(controls.current_time_label(), "1:00");
    assert_eq!(controls.progress().value(), 30.0);

    controls.stop();
    controls.sync();
    assert_eq!(controls.play_icon(), Icon::Play);
    assert_eq!(controls.current_time_label(), "0:00");

    assert_eq!(
        media.calls(),
        vec!["play", "seek 60", "pause", "seek 0"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
}

#[test]
fn progress_drag_before_metadata_does_not_seek() {
    let media = ScriptedMedia::new(None);
    let mut controls = PlayerControls::new(media.clone());

    controls.input_progress(80.0);
    assert!(media.calls().is_empty());

    media.load_metadata(Duration::from_secs(10));
    controls.sync();
    controls.input_progress(80.0);
    assert_eq!(media.calls(), vec!["seek 8".to_string()]);
}

#[test]
fn mute_round_trip_through_slider() {
    let media = ScriptedMedia::new(Some(Duration::from_secs(30)));
    let mut controls = PlayerControls::new(media.clone());

    controls.input_volume(0.25);
    controls.toggle_mute();
    assert_eq!(media.volume(), 0.0);
    assert_eq!(controls.volume_icon(), Icon::VolumeMute);

    // Dragging the slider up while silent restores sound without the icon.
    controls.input_volume(0.5);
    assert_eq!(controls.volume_icon(), Icon::VolumeUp);
    assert!((media.volume() - 0.5).abs() < 1e-9);

    controls.toggle_mute();
    controls.toggle_mute();
    assert!((media.volume() - 0.5).abs() < 1e-9);
}

#[test]
fn failed_source_switch_keeps_display() {
    let media = ScriptedMedia::new(Some(Duration::from_secs(30)));
    let mut controls = PlayerControls::new(media.clone());
    media.advance_to(Duration::from_secs(15));
    controls.sync();

    let bogus = Url::parse("bogus://nowhere").unwrap();
    assert!(matches!(controls.set_source(&bogus), Err(Error::Uri)));
    assert_eq!(controls.current_time_label(), "0:15");

    let next = Url::parse("https://example.com/next.mp4").unwrap();
    controls.set_source(&next).unwrap();
    assert_eq!(controls.current_time_label(), "0:00");
    assert_eq!(media.calls(), vec![format!("load {next}")]);
}

#[test]
fn options_feed_the_seek_step() {
    let options = PlayerOptions::from_toml_str(
        "src = \"https://example.com/a.mp4\"\nseek-step-secs = 2.5",
    )
    .unwrap();
    let media = ScriptedMedia::new(Some(Duration::from_secs(30)));
    let mut controls = PlayerControls::new(media.clone());

    media.advance_to(Duration::from_secs(10));
    controls.seek_backward(options.seek_step);
    assert_eq!(media.position(), Duration::from_millis(7500));
}
