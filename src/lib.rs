//! # GPUI Video Controls
//!
//! A themeable control bar for GPUI video players. Playback itself is left to
//! a GStreamer `playbin`; this crate only draws the controls and forwards
//! interactions to it.
//!
//! ## Features
//!
//! - Play/pause, stop, skip backward/forward and fullscreen buttons
//! - Progress slider with current and total time labels
//! - Volume slider with a mute toggle that remembers the previous level
//! - Color overrides loaded from code or a TOML file
//! - Playback notifications re-emitted as GPUI events
//!
//! ## Example
//!
//! ```no_run
//! use gpui::{App, AppContext, Application, WindowOptions};
//! use gpui_video_controls::{PlayerOptions, VideoPlayerView};
//!
//! Application::new().run(|cx: &mut App| {
//!     let options = PlayerOptions::from_source("./video.mp4").unwrap();
//!     cx.open_window(WindowOptions::default(), |_, cx| {
//!         cx.new(|cx| VideoPlayerView::new(options, cx).unwrap())
//!     })
//!     .unwrap();
//! });
//! ```
//!
//! The control logic is available without a window through
//! [`PlayerControls`], which works with any [`MediaPrimitive`].

mod config;
mod controls;
mod element;
mod error;
mod icon;
mod media;
mod range;
mod theme;
mod time;
mod video;
mod video_player;

#[cfg(test)]
mod test_utils;

pub use config::{DEFAULT_SEEK_STEP_SECS, PlayerOptions};
pub use controls::PlayerControls;
pub use element::{VideoElement, video};
pub use error::Error;
pub use icon::Icon;
pub use media::{MediaEvent, MediaPrimitive};
pub use range::RangeInput;
pub use theme::{Color, Theme};
pub use time::format_time;
pub use video::{Video, VideoOptions};
pub use video_player::{VideoPlayerEvent, VideoPlayerView};

// Re-export commonly used types
pub use url::Url;
pub use gstreamer as gst;
