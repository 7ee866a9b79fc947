use crate::Error;
use crate::config::PlayerOptions;
use crate::media::{MediaEvent, MediaPrimitive};
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Playback flags applied when a video is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoOptions {
    pub autoplay: bool,
    pub looping: bool,
    pub muted: bool,
}

impl From<&PlayerOptions> for VideoOptions {
    fn from(options: &PlayerOptions) -> Self {
        Self {
            autoplay: options.autoplay,
            looping: options.looping,
            muted: options.muted,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Frame(gst::Sample);

impl Frame {
    pub fn empty() -> Self {
        Self(gst::Sample::builder().build())
    }

    pub fn readable(&self) -> Option<gst::BufferMap<'_, gst::buffer::Readable>> {
        self.0.buffer().and_then(|x| x.map_readable().ok())
    }
}

#[derive(Debug)]
pub(crate) struct Internal {
    pub(crate) bus: gst::Bus,
    pub(crate) source: gst::Pipeline,
    pub(crate) sink_pad: gst::Pad,
    pub(crate) alive: Arc<AtomicBool>,
    pub(crate) worker: Option<std::thread::JoinHandle<()>>,

    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) duration: Option<Duration>,
    pub(crate) last_position: Option<Duration>,
    pub(crate) pending: Vec<MediaEvent>,

    pub(crate) frame: Arc<Mutex<Frame>>,
    pub(crate) upload_frame: Arc<AtomicBool>,
    pub(crate) autoplay: bool,
    pub(crate) looping: bool,
    pub(crate) is_eos: bool,
}

impl Internal {
    pub(crate) fn seek(&mut self, position: Duration) -> Result<(), Error> {
        self.source.seek_simple(
            gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
            gst::ClockTime::from_nseconds(position.as_nanos() as u64),
        )?;
        if self.is_eos && self.duration.is_none_or(|d| position < d) {
            self.is_eos = false;
        }
        Ok(())
    }

    pub(crate) fn restart_stream(&mut self) -> Result<(), Error> {
        self.is_eos = false;
        self.seek(Duration::ZERO)?;
        self.set_state(gst::State::Playing)
    }

    pub(crate) fn set_state(&self, state: gst::State) -> Result<(), Error> {
        self.source.set_state(state)?;
        Ok(())
    }

    pub(crate) fn paused(&self) -> bool {
        let (_, current, pending) = self.source.state(gst::ClockTime::ZERO);
        match pending {
            gst::State::VoidPending => current != gst::State::Playing,
            pending => pending != gst::State::Playing,
        }
    }

    pub(crate) fn position(&self) -> Duration {
        Duration::from_nanos(
            self.source
                .query_position::<gst::ClockTime>()
                .map_or(0, |pos| pos.nseconds()),
        )
    }

    /// Re-reads duration and frame size once the pipeline has prerolled.
    fn refresh_metadata(&mut self) -> Option<MediaEvent> {
        if let Some(caps) = self.sink_pad.current_caps() {
            match gst_video::VideoInfo::from_caps(&caps) {
                Ok(info) => {
                    self.width = info.width() as i32;
                    self.height = info.height() as i32;
                }
                Err(err) => log::warn!("unreadable video caps: {err}"),
            }
        }

        let queried = query_duration(&self.source);
        metadata_event(&mut self.duration, queried)
    }
}

fn query_duration(pipeline: &gst::Pipeline) -> Option<Duration> {
    pipeline
        .query_duration::<gst::ClockTime>()
        .map(|d| Duration::from_nanos(d.nseconds()))
}

/// Records a queried duration, yielding `LoadedMetadata` only when it differs
/// from the one already known.
fn metadata_event(known: &mut Option<Duration>, queried: Option<Duration>) -> Option<MediaEvent> {
    let duration = queried?;
    if *known == Some(duration) {
        return None;
    }
    *known = Some(duration);
    Some(MediaEvent::LoadedMetadata(duration))
}

/// A multimedia video loaded from a URI (e.g., a local file path or HTTP stream).
///
/// Decoding, buffering and audio/video sync are left to GStreamer's `playbin`;
/// this handle only exposes its controls and notifications.
#[derive(Debug, Clone)]
pub struct Video(pub(crate) Arc<RwLock<Internal>>);

impl Drop for Video {
    fn drop(&mut self) {
        // Only cleanup if this is the last reference
        if Arc::strong_count(&self.0) == 1 {
            if let Some(mut inner) = self.0.try_write() {
                if let Err(err) = inner.source.set_state(gst::State::Null) {
                    log::error!("failed to stop pipeline: {err}");
                }

                inner.alive.store(false, Ordering::SeqCst);
                if let Some(worker) = inner.worker.take() {
                    if let Err(err) = worker.join() {
                        match err.downcast_ref::<String>() {
                            Some(e) => log::error!("Video thread panicked: {e}"),
                            None => log::error!("Video thread panicked with unknown reason"),
                        }
                    }
                }
            }
        }
    }
}

impl Video {
    /// Opens `uri` paused, with default options.
    pub fn new(uri: &url::Url) -> Result<Self, Error> {
        Self::with_options(uri, VideoOptions::default())
    }

    /// Opens `uri`, applying autoplay, loop and mute flags.
    pub fn with_options(uri: &url::Url, options: VideoOptions) -> Result<Self, Error> {
        gst::init()?;

        let pipeline = format!(
            "playbin uri=\"{}\" video-sink=\"videoscale ! videoconvert ! appsink name=gpui_video drop=true caps=video/x-raw,format=NV12,pixel-aspect-ratio=1/1\"",
            uri.as_str()
        );
        let pipeline = gst::parse::launch(pipeline.as_ref())?
            .downcast::<gst::Pipeline>()
            .map_err(|_| Error::Cast)?;

        let video_sink: gst::Element = pipeline.property("video-sink");
        let bin = video_sink
            .pads()
            .first()
            .cloned()
            .and_then(|pad| pad.dynamic_cast::<gst::GhostPad>().ok())
            .and_then(|pad| pad.parent_element())
            .and_then(|parent| parent.downcast::<gst::Bin>().ok())
            .ok_or(Error::Cast)?;
        let video_sink = bin
            .by_name("gpui_video")
            .and_then(|sink| sink.downcast::<gst_app::AppSink>().ok())
            .ok_or(Error::Cast)?;

        Self::from_gst_pipeline(pipeline, video_sink, options)
    }

    /// Creates a new video based on an existing GStreamer pipeline and appsink.
    ///
    /// The appsink must produce NV12 frames.
    pub fn from_gst_pipeline(
        pipeline: gst::Pipeline,
        video_sink: gst_app::AppSink,
        options: VideoOptions,
    ) -> Result<Self, Error> {
        gst::init()?;

        macro_rules! cleanup {
            ($expr:expr) => {
                $expr.map_err(|e| {
                    let _ = pipeline.set_state(gst::State::Null);
                    e
                })
            };
        }

        let sink_pad = cleanup!(video_sink.static_pad("sink").ok_or(Error::Caps))?;

        if pipeline.find_property("mute").is_some() {
            pipeline.set_property("mute", options.muted);
        }

        // Preroll to learn the frame size without starting playback.
        cleanup!(pipeline.set_state(gst::State::Paused))?;
        cleanup!(pipeline.state(gst::ClockTime::from_seconds(5)).0)?;

        let caps = cleanup!(sink_pad.current_caps().ok_or(Error::Caps))?;
        let info = cleanup!(gst_video::VideoInfo::from_caps(&caps).map_err(|_| Error::Caps))?;

        // The preroll's metadata is announced by the first `poll_events`.
        let mut duration = None;
        let pending = metadata_event(&mut duration, query_duration(&pipeline))
            .into_iter()
            .collect();

        let frame = Arc::new(Mutex::new(Frame::empty()));
        let upload_frame = Arc::new(AtomicBool::new(false));
        let alive = Arc::new(AtomicBool::new(true));

        let frame_ref = Arc::clone(&frame);
        let upload_frame_ref = Arc::clone(&upload_frame);
        let alive_ref = Arc::clone(&alive);
        let pipeline_ref = pipeline.clone();

        let worker = std::thread::spawn(move || {
            while alive_ref.load(Ordering::Acquire) {
                // Nothing new within the timeout is not an error, just no frame this tick.
                let sample = if pipeline_ref.state(gst::ClockTime::ZERO).1 != gst::State::Playing
                {
                    video_sink.try_pull_preroll(gst::ClockTime::from_mseconds(16))
                } else {
                    video_sink.try_pull_sample(gst::ClockTime::from_mseconds(16))
                };
                let Some(sample) = sample else {
                    continue;
                };
                if sample.buffer().is_none() {
                    log::error!("video sample without buffer");
                    continue;
                }

                *frame_ref.lock() = Frame(sample);
                upload_frame_ref.store(true, Ordering::SeqCst);
            }
        });

        let bus = cleanup!(pipeline.bus().ok_or(Error::Cast))?;

        let internal = Internal {
            bus,
            source: pipeline,
            sink_pad,
            alive,
            worker: Some(worker),

            width: info.width() as i32,
            height: info.height() as i32,
            duration,
            last_position: None,
            pending,

            frame,
            upload_frame,
            autoplay: options.autoplay,
            looping: options.looping,
            is_eos: false,
        };
        // Dropping the handle on failure tears the pipeline and worker down.
        let video = Video(Arc::new(RwLock::new(internal)));
        if options.autoplay {
            video.read().set_state(gst::State::Playing)?;
        }

        Ok(video)
    }

    pub(crate) fn read(&self) -> parking_lot::RwLockReadGuard<'_, Internal> {
        self.0.read()
    }

    pub(crate) fn write(&self) -> parking_lot::RwLockWriteGuard<'_, Internal> {
        self.0.write()
    }

    /// Get the size/resolution of the video as `(width, height)`.
    pub fn size(&self) -> (i32, i32) {
        let inner = self.read();
        (inner.width, inner.height)
    }

    /// Get if the stream ended or not.
    pub fn eos(&self) -> bool {
        self.read().is_eos
    }

    /// Get if the media will loop or not.
    pub fn looping(&self) -> bool {
        self.read().looping
    }

    /// Set if the media will loop or not.
    pub fn set_looping(&self, looping: bool) {
        self.write().looping = looping;
    }

    /// Get the underlying GStreamer pipeline.
    pub fn pipeline(&self) -> gst::Pipeline {
        self.read().source.clone()
    }

    /// Consumes the "new frame" flag set by the worker.
    pub fn take_frame_ready(&self) -> bool {
        self.read().upload_frame.swap(false, Ordering::SeqCst)
    }

    /// Get the current NV12 frame data if available.
    pub fn current_frame_data(&self) -> Option<(Vec<u8>, u32, u32)> {
        let inner = self.read();

        if let Some(readable) = inner.frame.lock().readable() {
            let data = readable.as_slice().to_vec();
            if !data.is_empty() {
                return Some((data, inner.width as u32, inner.height as u32));
            }
        }

        None
    }

    fn on_end_of_stream(&self, events: &mut Vec<MediaEvent>) {
        let mut inner = self.write();
        if inner.looping {
            if let Err(err) = inner.restart_stream() {
                log::error!("failed to loop stream: {err}");
                events.push(MediaEvent::Error(err.to_string()));
            }
            return;
        }
        inner.is_eos = true;
        if let Err(err) = inner.set_state(gst::State::Paused) {
            log::error!("failed to pause at end of stream: {err}");
        }
        events.push(MediaEvent::Ended);
    }
}

impl MediaPrimitive for Video {
    fn play(&self) {
        let mut inner = self.write();
        let result = if inner.is_eos {
            inner.restart_stream()
        } else {
            inner.set_state(gst::State::Playing)
        };
        if let Err(err) = result {
            log::error!("failed to start playback: {err}");
        }
    }

    fn pause(&self) {
        if let Err(err) = self.read().set_state(gst::State::Paused) {
            log::error!("failed to pause playback: {err}");
        }
    }

    fn paused(&self) -> bool {
        self.read().paused()
    }

    fn position(&self) -> Duration {
        self.read().position()
    }

    fn seek(&self, position: Duration) -> Result<(), Error> {
        self.write().seek(position)
    }

    fn duration(&self) -> Option<Duration> {
        self.read().duration
    }

    fn volume(&self) -> f64 {
        self.read().source.property("volume")
    }

    fn set_volume(&self, volume: f64) {
        self.read()
            .source
            .set_property("volume", volume.clamp(0.0, 1.0));
    }

    fn muted(&self) -> bool {
        self.read().source.property("mute")
    }

    fn set_muted(&self, muted: bool) {
        self.read().source.set_property("mute", muted);
    }

    fn set_source(&self, uri: &url::Url) -> Result<(), Error> {
        let mut inner = self.write();
        if inner.source.find_property("uri").is_none() {
            return Err(Error::Uri);
        }

        inner.set_state(gst::State::Ready)?;
        inner.source.set_property("uri", uri.as_str());
        inner.duration = None;
        inner.last_position = None;
        inner.pending.clear();
        inner.is_eos = false;
        *inner.frame.lock() = Frame::empty();
        inner.upload_frame.store(true, Ordering::SeqCst);

        let target = if inner.autoplay {
            gst::State::Playing
        } else {
            gst::State::Paused
        };
        inner.set_state(target)?;
        log::debug!("loading {uri}");
        Ok(())
    }

    fn poll_events(&self) -> Vec<MediaEvent> {
        let mut events = std::mem::take(&mut self.write().pending);
        let bus = self.read().bus.clone();

        while let Some(msg) = bus.pop_filtered(&[
            gst::MessageType::Error,
            gst::MessageType::Eos,
            gst::MessageType::StateChanged,
            gst::MessageType::DurationChanged,
            gst::MessageType::AsyncDone,
        ]) {
            match msg.view() {
                gst::MessageView::Error(err) => {
                    log::error!("GStreamer error: {}", err.error());
                    events.push(MediaEvent::Error(err.error().to_string()));
                }
                gst::MessageView::Eos(_) => self.on_end_of_stream(&mut events),
                gst::MessageView::StateChanged(change) => {
                    let inner = self.read();
                    if msg.src() != Some(inner.source.upcast_ref::<gst::Object>()) {
                        continue;
                    }
                    match (change.old(), change.current()) {
                        (old, gst::State::Playing) if old != gst::State::Playing => {
                            events.push(MediaEvent::Play)
                        }
                        (gst::State::Playing, gst::State::Paused) => {
                            events.push(MediaEvent::Pause)
                        }
                        _ => {}
                    }
                }
                gst::MessageView::DurationChanged(_) | gst::MessageView::AsyncDone(_) => {
                    if let Some(event) = self.write().refresh_metadata() {
                        events.push(event);
                    }
                }
                _ => {}
            }
        }

        let mut inner = self.write();
        let position = inner.position();
        if inner.last_position != Some(position) {
            inner.last_position = Some(position);
            events.push(MediaEvent::TimeUpdate(position));
        }

        events
    }
}
