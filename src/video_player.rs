use crate::Error;
use crate::config::PlayerOptions;
use crate::controls::PlayerControls;
use crate::element::video;
use crate::icon::Icon;
use crate::media::MediaEvent;
use crate::range::RangeInput;
use crate::theme::{Theme, style};
use crate::video::Video;
use gpui::{
    BoxShadow, ClickEvent, Context, DispatchPhase, Div, EventEmitter, FontWeight, Hsla,
    InteractiveElement, IntoElement, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent,
    ParentElement, Pixels, Point, Render, Stateful, StatefulInteractiveElement, Styled, Task,
    Window, div, point, px, relative,
};
use std::time::Duration;

/// How often the media is polled for notifications while nothing repaints.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Events that can be emitted by the video player.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoPlayerEvent {
    Play,
    Pause,
    /// Video reached end of stream.
    Ended,
    /// Duration became known.
    MetadataLoaded(Duration),
    /// Error occurred during playback.
    Error(String),
}

impl VideoPlayerEvent {
    fn from_media(event: &MediaEvent) -> Option<Self> {
        match event {
            MediaEvent::Play => Some(Self::Play),
            MediaEvent::Pause => Some(Self::Pause),
            MediaEvent::Ended => Some(Self::Ended),
            MediaEvent::LoadedMetadata(duration) => Some(Self::MetadataLoaded(*duration)),
            MediaEvent::Error(message) => Some(Self::Error(message.clone())),
            MediaEvent::TimeUpdate(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slider {
    Progress,
    Volume,
}

impl Slider {
    fn id(self) -> &'static str {
        match self {
            Slider::Progress => "progress-slider",
            Slider::Volume => "volume-slider",
        }
    }
}

/// Maps a pointer position onto a horizontal track, as a `0.0..=1.0` fraction.
fn slider_ratio(bounds: gpui::Bounds<Pixels>, position: Point<Pixels>) -> Option<f64> {
    let width = f32::from(bounds.size.width);
    if width <= 0.0 {
        return None;
    }
    let ratio = f32::from(position.x - bounds.origin.x) / width;
    ratio.is_finite().then(|| ratio.clamp(0.0, 1.0) as f64)
}

/// A video surface with a title and a custom control bar.
pub struct VideoPlayerView {
    controls: PlayerControls<Video>,
    options: PlayerOptions,
    progress_bounds: Option<gpui::Bounds<Pixels>>,
    volume_bounds: Option<gpui::Bounds<Pixels>>,
    dragging: Option<Slider>,
    _poll: Task<()>,
}

impl VideoPlayerView {
    /// Opens `options.src` and wires the controls to it.
    pub fn new(options: PlayerOptions, cx: &mut Context<Self>) -> Result<Self, Error> {
        let video = Video::with_options(&options.src, (&options).into())?;
        Ok(Self::from_video(video, options, cx))
    }

    /// Wraps an already opened video.
    pub fn from_video(video: Video, options: PlayerOptions, cx: &mut Context<Self>) -> Self {
        let poll = cx.spawn(async move |this, cx| {
            loop {
                cx.background_executor().timer(POLL_INTERVAL).await;
                let updated = this.update(cx, |this, cx| {
                    if this.drain_events(cx) {
                        cx.notify();
                    }
                });
                if updated.is_err() {
                    break;
                }
            }
        });

        Self {
            controls: PlayerControls::new(video),
            options,
            progress_bounds: None,
            volume_bounds: None,
            dragging: None,
            _poll: poll,
        }
    }

    pub fn controls(&self) -> &PlayerControls<Video> {
        &self.controls
    }

    pub fn video(&self) -> &Video {
        self.controls.media()
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn play(&mut self, cx: &mut Context<Self>) {
        self.controls.play();
        cx.notify();
    }

    pub fn pause(&mut self, cx: &mut Context<Self>) {
        self.controls.pause();
        cx.notify();
    }

    pub fn stop(&mut self, cx: &mut Context<Self>) {
        self.controls.stop();
        cx.notify();
    }

    pub fn seek_forward(&mut self, step: Duration, cx: &mut Context<Self>) {
        self.controls.seek_forward(step);
        cx.notify();
    }

    pub fn seek_backward(&mut self, step: Duration, cx: &mut Context<Self>) {
        self.controls.seek_backward(step);
        cx.notify();
    }

    pub fn set_volume(&mut self, volume: f64, cx: &mut Context<Self>) {
        self.controls.set_volume(volume);
        cx.notify();
    }

    pub fn seek_to_percentage(&mut self, percentage: f64, cx: &mut Context<Self>) {
        self.controls.seek_to_percentage(percentage);
        cx.notify();
    }

    pub fn toggle_fullscreen(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        window.toggle_fullscreen();
        cx.notify();
    }

    pub fn set_source(&mut self, uri: &url::Url, cx: &mut Context<Self>) -> Result<(), Error> {
        self.controls.set_source(uri)?;
        self.options.src = uri.clone();
        cx.notify();
        Ok(())
    }

    /// Applies pending media notifications and re-emits them to observers.
    fn drain_events(&mut self, cx: &mut Context<Self>) -> bool {
        let events = self.controls.sync();
        for event in events.iter().filter_map(VideoPlayerEvent::from_media) {
            cx.emit(event);
        }
        !events.is_empty()
    }

    fn slider_bounds(&self, slider: Slider) -> Option<gpui::Bounds<Pixels>> {
        match slider {
            Slider::Progress => self.progress_bounds,
            Slider::Volume => self.volume_bounds,
        }
    }

    fn slider_bounds_mut(&mut self, slider: Slider) -> &mut Option<gpui::Bounds<Pixels>> {
        match slider {
            Slider::Progress => &mut self.progress_bounds,
            Slider::Volume => &mut self.volume_bounds,
        }
    }

    fn input_slider(&mut self, slider: Slider, position: Point<Pixels>) {
        let Some(ratio) = self
            .slider_bounds(slider)
            .and_then(|bounds| slider_ratio(bounds, position))
        else {
            return;
        };
        match slider {
            Slider::Progress => {
                let mut range = *self.controls.progress();
                self.controls.input_progress(range.set_ratio(ratio));
            }
            Slider::Volume => {
                let mut range = *self.controls.volume();
                self.controls.input_volume(range.set_ratio(ratio));
            }
        }
    }

    fn begin_drag(&mut self, slider: Slider, position: Point<Pixels>, cx: &mut Context<Self>) {
        self.dragging = Some(slider);
        self.input_slider(slider, position);
        cx.notify();
    }

    fn drag_to(&mut self, position: Point<Pixels>, cx: &mut Context<Self>) {
        if let Some(slider) = self.dragging {
            self.input_slider(slider, position);
            cx.notify();
        }
    }

    fn end_drag(&mut self, position: Point<Pixels>, cx: &mut Context<Self>) {
        self.drag_to(position, cx);
        self.dragging = None;
    }

    fn icon_button(
        &self,
        id: &'static str,
        icon: Icon,
        color: Option<Hsla>,
        cx: &mut Context<Self>,
        on_click: impl Fn(&mut Self, &mut Window, &mut Context<Self>) + 'static,
    ) -> Stateful<Div> {
        let mut button = div()
            .id(id)
            .cursor_pointer()
            .text_size(px(style::ICON_SIZE))
            .child(icon.glyph());
        if let Some(color) = color {
            button = button.text_color(color);
        }
        button.on_click(cx.listener(move |this, _: &ClickEvent, window, cx| {
            on_click(this, window, cx);
            cx.notify();
        }))
    }

    fn render_slider(
        &self,
        slider: Slider,
        range: &RangeInput,
        accent: Hsla,
        cx: &mut Context<Self>,
    ) -> Stateful<Div> {
        let ratio = range.ratio() as f32;
        let thumb = style::SLIDER_THUMB_SIZE;
        let handle = cx.entity();

        let track = div()
            .relative()
            .w_full()
            .h(px(style::SLIDER_TRACK_HEIGHT))
            .rounded_full()
            .bg(Hsla::from(style::SLIDER_TRACK_COLOR))
            .child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .h_full()
                    .w(relative(ratio))
                    .rounded_full()
                    .bg(accent),
            )
            .child(
                div()
                    .absolute()
                    .top(px((style::SLIDER_TRACK_HEIGHT - thumb) / 2.0))
                    .left(relative(ratio))
                    .ml(px(-thumb / 2.0))
                    .size(px(thumb))
                    .rounded_full()
                    .bg(accent),
            );

        div()
            .flex()
            .items_center()
            .h(px(style::SLIDER_HEIGHT))
            .on_children_prepainted(move |bounds, _window, cx| {
                let bounds = bounds.first().copied();
                handle.update(cx, |this, _| {
                    *this.slider_bounds_mut(slider) = bounds;
                });
            })
            .child(track)
            .id(slider.id())
            .cursor_pointer()
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |this, event: &MouseDownEvent, _window, cx| {
                    this.begin_drag(slider, event.position, cx);
                }),
            )
    }

    fn render_control_bar(&self, theme: &Theme, cx: &mut Context<Self>) -> Div {
        let icon_color = theme.icon_color.map(Hsla::from);
        let accent = Hsla::from(theme.slider_color.unwrap_or(style::DEFAULT_SLIDER_COLOR));
        let step = self.options.seek_step;

        let icons = div()
            .flex()
            .justify_center()
            .gap(px(style::ICON_GAP))
            .child(self.icon_button(
                "play-pause",
                self.controls.play_icon(),
                icon_color,
                cx,
                |this, _, _| this.controls.toggle_play_pause(),
            ))
            .child(self.icon_button("stop", Icon::Stop, icon_color, cx, |this, _, _| {
                this.controls.stop()
            }))
            .child(
                self.icon_button("backward", Icon::Backward, icon_color, cx, move |this, _, _| {
                    this.controls.seek_backward(step)
                }),
            )
            .child(
                self.icon_button("forward", Icon::Forward, icon_color, cx, move |this, _, _| {
                    this.controls.seek_forward(step)
                }),
            )
            .child(
                self.icon_button("fullscreen", Icon::Expand, icon_color, cx, |_, window, _| {
                    window.toggle_fullscreen()
                }),
            );

        let time_label = |text: &str| {
            div()
                .font_weight(FontWeight::BOLD)
                .min_w(px(style::TIME_LABEL_MIN_WIDTH))
                .child(text.to_string())
        };

        let progress = div()
            .flex()
            .items_center()
            .gap(px(style::CONTROL_BAR_GAP))
            .child(time_label(self.controls.current_time_label()))
            .child(
                self.render_slider(Slider::Progress, self.controls.progress(), accent, cx)
                    .flex_grow(),
            )
            .child(time_label(self.controls.duration_label()));

        let volume = div()
            .flex()
            .items_center()
            .justify_center()
            .gap(px(style::CONTROL_BAR_GAP))
            .child("Volume:")
            .child(self.icon_button(
                "volume",
                self.controls.volume_icon(),
                icon_color,
                cx,
                |this, _, _| this.controls.toggle_mute(),
            ))
            .child(
                self.render_slider(Slider::Volume, self.controls.volume(), accent, cx)
                    .w(px(style::VOLUME_SLIDER_WIDTH)),
            );

        div()
            .absolute()
            .bottom_0()
            .left_0()
            .w_full()
            .flex()
            .flex_col()
            .gap(px(style::CONTROL_BAR_GAP))
            .p(px(style::CONTROL_BAR_PADDING))
            .bg(Hsla::from(style::CONTROL_BAR_BACKGROUND))
            .child(icons)
            .child(progress)
            .child(volume)
    }
}

impl EventEmitter<VideoPlayerEvent> for VideoPlayerView {}

impl Render for VideoPlayerView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        // Frames requested by the video element re-render us while playing.
        self.drain_events(cx);

        if self.dragging.is_some() {
            let handle = cx.entity();
            window.on_mouse_event(move |event: &MouseMoveEvent, phase, window, cx| {
                if phase != DispatchPhase::Capture {
                    return;
                }
                handle.update(cx, |this, cx| this.drag_to(event.position, cx));
                window.refresh();
            });

            let handle = cx.entity();
            window.on_mouse_event(move |event: &MouseUpEvent, phase, window, cx| {
                if phase != DispatchPhase::Capture || event.button != MouseButton::Left {
                    return;
                }
                handle.update(cx, |this, cx| this.end_drag(event.position, cx));
                window.refresh();
            });
        }

        let theme = self.options.theme.unwrap_or_default();
        let text_color = Hsla::from(theme.text_color.unwrap_or(style::DEFAULT_TEXT_COLOR));

        let mut surface = div()
            .w_full()
            .child(video(self.video().clone()).id("video").fill_width());
        if let Some(glow) = theme.background_color {
            surface = surface.shadow(vec![BoxShadow {
                color: glow.into(),
                offset: point(px(0.0), px(0.0)),
                blur_radius: px(style::GLOW_BLUR),
                spread_radius: px(style::GLOW_SPREAD),
            }]);
        }

        let mut root = div()
            .relative()
            .w_full()
            .flex()
            .flex_col()
            .text_color(text_color);
        if self.controls.title_visible(window.is_fullscreen()) {
            root = root.child(
                div()
                    .flex()
                    .justify_center()
                    .mb(px(style::TITLE_MARGIN_BOTTOM))
                    .child(
                        div()
                            .text_3xl()
                            .font_weight(FontWeight::BOLD)
                            .text_color(Hsla::from(style::TITLE_COLOR))
                            .child(self.options.title.clone()),
                    ),
            );
        }
        root = root.child(surface);
        if self.options.controls {
            root = root.child(self.render_control_bar(&theme, cx));
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui::{Bounds, size};

    fn track() -> Bounds<Pixels> {
        Bounds {
            origin: point(px(100.0), px(10.0)),
            size: size(px(200.0), px(16.0)),
        }
    }

    #[test]
    fn pointer_maps_to_track_fraction() {
        let ratio = slider_ratio(track(), point(px(150.0), px(12.0))).unwrap();
        assert!((ratio - 0.25).abs() < 1e-6);
    }

    #[test]
    fn pointer_outside_track_is_clamped() {
        assert_eq!(slider_ratio(track(), point(px(20.0), px(0.0))), Some(0.0));
        assert_eq!(slider_ratio(track(), point(px(900.0), px(0.0))), Some(1.0));
    }

    #[test]
    fn empty_track_has_no_ratio() {
        let empty = Bounds {
            origin: point(px(0.0), px(0.0)),
            size: size(px(0.0), px(16.0)),
        };
        assert_eq!(slider_ratio(empty, point(px(5.0), px(5.0))), None);
    }

    #[test]
    fn time_updates_are_not_forwarded() {
        assert_eq!(
            VideoPlayerEvent::from_media(&MediaEvent::TimeUpdate(Duration::from_secs(1))),
            None
        );
        assert_eq!(
            VideoPlayerEvent::from_media(&MediaEvent::Ended),
            Some(VideoPlayerEvent::Ended)
        );
    }
}
