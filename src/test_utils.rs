//! In-memory media primitive for behaviour tests.

use crate::Error;
use crate::media::{MediaEvent, MediaPrimitive};
use std::cell::{Cell, RefCell};
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub(crate) struct FakeMedia {
    paused: Cell<bool>,
    position: Cell<Duration>,
    duration: Cell<Option<Duration>>,
    volume: Cell<f64>,
    muted: Cell<bool>,
    source: RefCell<Option<Url>>,
    seeks: RefCell<Vec<Duration>>,
    events: RefCell<Vec<MediaEvent>>,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            paused: Cell::new(true),
            position: Cell::new(Duration::ZERO),
            duration: Cell::new(None),
            volume: Cell::new(1.0),
            muted: Cell::new(false),
            source: RefCell::new(None),
            seeks: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
        }
    }
}

impl FakeMedia {
    pub(crate) fn with_duration(duration: Duration) -> Self {
        let media = Self::default();
        media.duration.set(Some(duration));
        media
    }

    pub(crate) fn set_position(&self, position: Duration) {
        self.position.set(position);
    }

    pub(crate) fn seeks(&self) -> Vec<Duration> {
        self.seeks.borrow().clone()
    }

    pub(crate) fn source(&self) -> Option<Url> {
        self.source.borrow().clone()
    }

    pub(crate) fn push_event(&self, event: MediaEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl MediaPrimitive for FakeMedia {
    fn play(&self) {
        self.paused.set(false);
    }

    fn pause(&self) {
        self.paused.set(true);
    }

    fn paused(&self) -> bool {
        self.paused.get()
    }

    fn position(&self) -> Duration {
        self.position.get()
    }

    fn seek(&self, position: Duration) -> Result<(), Error> {
        self.seeks.borrow_mut().push(position);
        self.position.set(position);
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration.get()
    }

    fn volume(&self) -> f64 {
        self.volume.get()
    }

    fn set_volume(&self, volume: f64) {
        self.volume.set(volume.clamp(0.0, 1.0));
    }

    fn muted(&self) -> bool {
        self.muted.get()
    }

    fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }

    fn set_source(&self, uri: &Url) -> Result<(), Error> {
        *self.source.borrow_mut() = Some(uri.clone());
        self.duration.set(None);
        self.position.set(Duration::ZERO);
        Ok(())
    }

    fn poll_events(&self) -> Vec<MediaEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}
