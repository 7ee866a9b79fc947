//! Cosmetic overrides applied on top of the default player look.

use crate::Error;
use serde::Deserialize;
use std::str::FromStr;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
    /// `rgba(r, g, b, a)` where `a` is in `0.0..=1.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_string());
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return match hex.len() {
                3 => {
                    let short = |i: usize| {
                        u8::from_str_radix(&hex[i..i + 1], 16)
                            .map(|v| v * 17)
                            .map_err(|_| invalid())
                    };
                    Ok(Self {
                        r: short(0)?,
                        g: short(1)?,
                        b: short(2)?,
                        a: 1.0,
                    })
                }
                6 => Ok(Self {
                    r: channel(0)?,
                    g: channel(2)?,
                    b: channel(4)?,
                    a: 1.0,
                }),
                8 => Ok(Self {
                    r: channel(0)?,
                    g: channel(2)?,
                    b: channel(4)?,
                    a: channel(6)? as f32 / 255.0,
                }),
                _ => Err(invalid()),
            };
        }

        let (args, with_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let args = args.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != if with_alpha { 4 } else { 3 } {
            return Err(invalid());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
        let a = if with_alpha {
            let a = parts[3].parse::<f32>().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(invalid());
            }
            a
        } else {
            1.0
        };
        Ok(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for gpui::Rgba {
    fn from(c: Color) -> Self {
        gpui::Rgba {
            r: c.r as f32 / 255.0,
            g: c.g as f32 / 255.0,
            b: c.b as f32 / 255.0,
            a: c.a,
        }
    }
}

impl From<Color> for gpui::Hsla {
    fn from(c: Color) -> Self {
        gpui::Rgba::from(c).into()
    }
}

/// Optional color overrides. Unset fields keep the built-in look.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Theme {
    /// Glow drawn around the video surface.
    pub background_color: Option<Color>,
    /// Text color of the whole player.
    pub text_color: Option<Color>,
    /// Color of every control icon.
    pub icon_color: Option<Color>,
    /// Accent of the progress and volume sliders.
    pub slider_color: Option<Color>,
}

/// Fixed look of the player, before theme overrides.
pub(crate) mod style {
    use super::Color;

    pub const TITLE: &str = "Video Player";
    pub const TITLE_COLOR: Color = Color::rgb(0xB5828C);
    pub const TITLE_MARGIN_BOTTOM: f32 = 10.0;
    pub const CONTROL_BAR_BACKGROUND: Color = Color::rgb(0x000000).with_alpha(0.5);
    pub const CONTROL_BAR_PADDING: f32 = 10.0;
    pub const CONTROL_BAR_GAP: f32 = 10.0;
    pub const ICON_SIZE: f32 = 20.0;
    pub const ICON_GAP: f32 = 20.0;
    pub const TIME_LABEL_MIN_WIDTH: f32 = 40.0;
    pub const VOLUME_SLIDER_WIDTH: f32 = 100.0;
    pub const SLIDER_HEIGHT: f32 = 16.0;
    pub const SLIDER_TRACK_HEIGHT: f32 = 4.0;
    pub const SLIDER_THUMB_SIZE: f32 = 12.0;
    pub const DEFAULT_TEXT_COLOR: Color = Color::rgb(0xFFFFFF);
    pub const DEFAULT_SLIDER_COLOR: Color = Color::rgb(0x3B82F6);
    pub const SLIDER_TRACK_COLOR: Color = Color::rgb(0xFFFFFF).with_alpha(0.3);
    pub const GLOW_BLUR: f32 = 20.0;
    pub const GLOW_SPREAD: f32 = 5.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_hex() {
        let c: Color = "#B5828C".parse().unwrap();
        assert_eq!(c, Color::rgb(0xB5828C));
    }

    #[test]
    fn parses_short_hex_and_alpha_hex() {
        let c: Color = "#fff".parse().unwrap();
        assert_eq!(c, Color::rgb(0xFFFFFF));

        let c: Color = "#00000080".parse().unwrap();
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_functional_notation() {
        let c: Color = "rgba(0, 0, 0, 0.5)".parse().unwrap();
        assert_eq!(c, Color::rgb(0).with_alpha(0.5));

        let c: Color = "rgb(222,49,99)".parse().unwrap();
        assert_eq!(c, Color::rgb(0xDE3163));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "B5828C", "#12345", "#ggg", "rgb(1,2)", "rgba(1,2,3,2)", "red"] {
            assert!(
                matches!(bad.parse::<Color>(), Err(Error::InvalidColor(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn theme_fields_are_optional() {
        let theme: Theme = toml::from_str("icon-color = \"#A6F1E0\"").unwrap();
        assert_eq!(theme.icon_color, Some(Color::rgb(0xA6F1E0)));
        assert!(theme.background_color.is_none());
        assert!(theme.text_color.is_none());
        assert!(theme.slider_color.is_none());
    }

    #[test]
    fn converts_to_gpui_color() {
        let rgba = gpui::Rgba::from(Color::rgb(0xFF0000).with_alpha(0.25));
        assert_eq!(rgba.r, 1.0);
        assert_eq!(rgba.g, 0.0);
        assert_eq!(rgba.a, 0.25);
    }
}
