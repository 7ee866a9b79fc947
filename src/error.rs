use gstreamer as gst;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Glib(#[from] glib::Error),
    #[error("{0}")]
    Bool(#[from] glib::BoolError),
    #[error("{0}")]
    StateChange(#[from] gst::StateChangeError),
    #[error("failed to cast gstreamer element")]
    Cast,
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("invalid URI")]
    Uri,
    #[error("video source is required")]
    MissingSource,
    #[error("failed to get media capabilities")]
    Caps,
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("invalid player options: {0}")]
    Config(#[from] toml::de::Error),
}
