/// Glyphs shown on the control bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Play,
    Pause,
    Stop,
    Backward,
    Forward,
    Expand,
    VolumeUp,
    VolumeMute,
}

impl Icon {
    /// Text rendered for the icon.
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Play => "▶",
            Icon::Pause => "⏸",
            Icon::Stop => "⏹",
            Icon::Backward => "⏪",
            Icon::Forward => "⏩",
            Icon::Expand => "⛶",
            Icon::VolumeUp => "🔊",
            Icon::VolumeMute => "🔇",
        }
    }

    /// Stable identifier, also used to build element ids.
    pub fn name(self) -> &'static str {
        match self {
            Icon::Play => "play",
            Icon::Pause => "pause",
            Icon::Stop => "stop",
            Icon::Backward => "backward",
            Icon::Forward => "forward",
            Icon::Expand => "expand",
            Icon::VolumeUp => "volume-up",
            Icon::VolumeMute => "volume-mute",
        }
    }
}
