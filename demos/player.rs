use gpui::{
    App, Application, Context, Entity, Render, Subscription, Window, WindowOptions, div,
    prelude::*, px, rgb,
};
use gpui_video_controls::{PlayerOptions, VideoPlayerEvent, VideoPlayerView};
use std::path::{Path, PathBuf};

struct PlayerExample {
    player: Entity<VideoPlayerView>,
    _events: Subscription,
}

impl PlayerExample {
    fn new(player: Entity<VideoPlayerView>, cx: &mut Context<Self>) -> Self {
        let events = cx.subscribe(&player, |_, _, event: &VideoPlayerEvent, _| match event {
            VideoPlayerEvent::Error(message) => log::error!("playback failed: {message}"),
            event => log::info!("{event:?}"),
        });
        Self {
            player,
            _events: events,
        }
    }
}

impl Render for PlayerExample {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .size_full()
            .bg(rgb(0x1e1e1e))
            .flex()
            .justify_center()
            .child(div().w(px(640.0)).my(px(20.0)).child(self.player.clone()))
    }
}

// `cargo run --example player -- [options.toml | video file or URL]`
fn load_options(arg: Option<String>) -> Result<PlayerOptions, gpui_video_controls::Error> {
    let default_config = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/player.toml");
    match arg {
        Some(arg) if arg.ends_with(".toml") => PlayerOptions::load_from_path(Path::new(&arg)),
        Some(source) => PlayerOptions::from_source(&source),
        None => PlayerOptions::load_from_path(&default_config),
    }
}

fn main() {
    env_logger::init();
    let options = load_options(std::env::args().nth(1)).expect("invalid player options");

    Application::new().run(move |cx: &mut App| {
        cx.open_window(
            WindowOptions {
                focus: true,
                ..Default::default()
            },
            |_, cx| {
                let player =
                    cx.new(|cx| VideoPlayerView::new(options, cx).expect("failed to open video"));
                cx.new(|cx| PlayerExample::new(player, cx))
            },
        )
        .unwrap();
        cx.activate(true);
    });
}
