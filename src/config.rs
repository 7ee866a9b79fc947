//! Player options, built in code or loaded from a TOML file.
//!
//! ```toml
//! src = "file:///videos/big_buck_bunny.mp4"
//! autoplay = false
//! loop = false
//! muted = false
//!
//! [theme]
//! background-color = "#B5828C"
//! text-color = "#FFF"
//! icon-color = "#A6F1E0"
//! slider-color = "#DE3163"
//! ```

use crate::Error;
use crate::theme::{Theme, style};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SEEK_STEP_SECS: f64 = 10.0;

/// Everything needed to build a player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    pub src: Url,
    pub title: String,
    pub theme: Option<Theme>,
    pub autoplay: bool,
    /// Whether the custom control bar is shown.
    pub controls: bool,
    pub looping: bool,
    pub muted: bool,
    /// Jump used by the backward and forward buttons.
    pub seek_step: Duration,
}

impl PlayerOptions {
    pub fn new(src: Url) -> Self {
        Self {
            src,
            title: style::TITLE.to_string(),
            theme: None,
            autoplay: false,
            controls: true,
            looping: false,
            muted: false,
            seek_step: Duration::from_secs_f64(DEFAULT_SEEK_STEP_SECS),
        }
    }

    /// Parses a source given either as a URL or as a file path.
    pub fn from_source(src: &str) -> Result<Self, Error> {
        Ok(Self::new(parse_source(src)?))
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn controls(mut self, controls: bool) -> Self {
        self.controls = controls;
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn seek_step(mut self, step: Duration) -> Self {
        self.seek_step = step;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let file: OptionsFile = toml::from_str(content)?;
        file.try_into()
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OptionsFile {
    #[serde(default)]
    src: String,
    title: Option<String>,
    theme: Option<Theme>,
    #[serde(default)]
    autoplay: bool,
    controls: Option<bool>,
    #[serde(default, rename = "loop")]
    looping: bool,
    #[serde(default)]
    muted: bool,
    seek_step_secs: Option<f64>,
}

impl TryFrom<OptionsFile> for PlayerOptions {
    type Error = Error;

    fn try_from(file: OptionsFile) -> Result<Self, Self::Error> {
        let mut options = PlayerOptions::from_source(&file.src)?
            .autoplay(file.autoplay)
            .controls(file.controls.unwrap_or(true))
            .looping(file.looping)
            .muted(file.muted);
        if let Some(title) = file.title {
            options.title = title;
        }
        options.theme = file.theme;
        // Out-of-range steps keep the default.
        if let Some(step) = file
            .seek_step_secs
            .filter(|s| *s > 0.0)
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
        {
            options.seek_step = step;
        }
        Ok(options)
    }
}

fn parse_source(src: &str) -> Result<Url, Error> {
    let src = src.trim();
    if src.is_empty() {
        return Err(Error::MissingSource);
    }
    if let Ok(url) = Url::parse(src) {
        // A bare Windows drive letter parses as a one-letter scheme.
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }
    let path = Path::new(src);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Url::from_file_path(&path).map_err(|_| Error::Uri)
}
