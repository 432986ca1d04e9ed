//! Color values for the color book
//!
//! Brand scales store colors as opaque CSS strings; only the color book needs
//! to understand them, to derive preset colors from a base color by HSLA
//! adjustment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::DocumentError;

/// A color in HSLA space.
///
/// `h` is in degrees `[0, 360)`, `s` and `l` are percentages `[0, 100]`,
/// `a` is `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Build from RGB channels in `[0, 1]`.
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;

        if delta.abs() < f32::EPSILON {
            return Self::new(0.0, 0.0, l * 100.0, a);
        }

        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Self::new(h * 60.0, s * 100.0, l * 100.0, a)
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::from_rgba(r, g, b, 1.0)
    }

    /// RGBA channels in `[0, 1]`.
    pub fn to_rgba(&self) -> [f32; 4] {
        let s = self.s / 100.0;
        let l = self.l / 100.0;
        if s <= 0.0 {
            return [l, l, l, self.a];
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = self.h.rem_euclid(360.0) / 360.0;

        [
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            self.a,
        ]
    }

    /// Apply a color book preset to this color.
    pub fn adjusted(self, adjustment: &HslaAdjustment) -> Self {
        Self {
            h: (self.h + adjustment.hue_adjustment).rem_euclid(360.0),
            s: (self.s + adjustment.saturation_adjustment).clamp(0.0, 100.0),
            l: (self.l + adjustment.lightness_adjustment).clamp(0.0, 100.0),
            a: adjustment.alpha.clamp(0.0, 1.0),
        }
    }

    /// Format as a CSS `hsla()` value, e.g. `hsla(210, 50%, 40%, 1)`.
    pub fn to_css(&self) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            fmt_number(self.h),
            fmt_number(self.s),
            fmt_number(self.l),
            fmt_number(self.a)
        )
    }

    /// Parse a CSS color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb()`/`rgba()` or `hsl()`/`hsla()`.
    pub fn parse(input: &str) -> Result<Self, DocumentError> {
        parse_css_color(&input.trim().to_ascii_lowercase()).ok_or_else(|| {
            trace!("Hsla::parse - rejected `{}`", input);
            DocumentError::InvalidColor(input.to_string())
        })
    }
}

fn parse_css_color(s: &str) -> Option<Hsla> {
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let (name, inner) = s.strip_suffix(')')?.split_once('(')?;
    let args = split_args(inner);

    match name.trim() {
        "rgb" | "rgba" => parse_rgb_args(&args),
        "hsl" | "hsla" => parse_hsl_args(&args),
        _ => None,
    }
}

impl FromStr for Hsla {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// A named color book preset: deltas applied to the book's base color.
///
/// `alpha` is absolute, not a delta.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HslaAdjustment {
    #[serde(default)]
    pub hue_adjustment: f32,
    #[serde(default)]
    pub saturation_adjustment: f32,
    #[serde(default)]
    pub lightness_adjustment: f32,
    #[serde(default = "default_alpha")]
    pub alpha: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Default for HslaAdjustment {
    fn default() -> Self {
        Self {
            hue_adjustment: 0.0,
            saturation_adjustment: 0.0,
            lightness_adjustment: 0.0,
            alpha: default_alpha(),
        }
    }
}

impl HslaAdjustment {
    pub fn new(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            hue_adjustment: hue,
            saturation_adjustment: saturation,
            lightness_adjustment: lightness,
            alpha,
        }
    }

    pub fn apply(&self, base: Hsla) -> Hsla {
        base.adjusted(self)
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Round to two decimals and drop trailing zeros.
fn fmt_number(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    let mut s = format!("{rounded:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn parse_hex(hex: &str) -> Option<Hsla> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expand = |i: usize| -> Option<f32> {
        let c = u8::from_str_radix(&hex[i..i + 1], 16).ok()?;
        Some((c * 17) as f32 / 255.0)
    };
    let pair = |i: usize| -> Option<f32> {
        Some(u8::from_str_radix(&hex[i..i + 2], 16).ok()? as f32 / 255.0)
    };

    match hex.len() {
        3 => Some(Hsla::from_rgba(expand(0)?, expand(1)?, expand(2)?, 1.0)),
        4 => Some(Hsla::from_rgba(expand(0)?, expand(1)?, expand(2)?, expand(3)?)),
        6 => Some(Hsla::from_rgba(pair(0)?, pair(2)?, pair(4)?, 1.0)),
        8 => Some(Hsla::from_rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        _ => None,
    }
}

fn split_args(inner: &str) -> Vec<&str> {
    inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_alpha(arg: Option<&&str>) -> Option<f32> {
    let alpha = match arg {
        None => Some(1.0),
        Some(a) => match a.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok().map(|v| v / 100.0),
            None => a.parse::<f32>().ok(),
        },
    };
    alpha.map(|a| a.clamp(0.0, 1.0))
}

fn parse_rgb_args(args: &[&str]) -> Option<Hsla> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let channel = |a: &str| -> Option<f32> {
        let v = match a.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? * 2.55,
            None => a.parse::<f32>().ok()?,
        };
        Some(v.clamp(0.0, 255.0) / 255.0)
    };
    Some(Hsla::from_rgba(
        channel(args[0])?,
        channel(args[1])?,
        channel(args[2])?,
        parse_alpha(args.get(3))?,
    ))
}

fn parse_hsl_args(args: &[&str]) -> Option<Hsla> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let h: f32 = args[0].trim_end_matches("deg").parse().ok()?;
    let s: f32 = args[1].trim_end_matches('%').parse().ok()?;
    let l: f32 = args[2].trim_end_matches('%').parse().ok()?;
    Some(Hsla::new(
        h.rem_euclid(360.0),
        s.clamp(0.0, 100.0),
        l.clamp(0.0, 100.0),
        parse_alpha(args.get(3))?,
    ))
}
