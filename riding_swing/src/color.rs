//! Fill colours for the map.

use std::fmt;

use crate::config::{MarginBand, ProjectionErrors};

/// Simple RGB colour.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Parses a `#rrggbb` (or `rrggbb`) hex string.
    pub fn parse_hex(s: &str) -> Result<Rgb, ProjectionErrors> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ProjectionErrors::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ProjectionErrors::InvalidColor(s.to_string()))
        };
        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Blends the colour toward white: each channel becomes
    /// `(1 - factor) * c + factor * 255`, truncated.
    pub fn lighten(self, factor: f64) -> Rgb {
        let f = factor.clamp(0.0, 1.0);
        let mix = |c: u8| ((1.0 - f) * (c as f64) + f * 255.0) as u8;
        Rgb {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
        }
    }
}

impl fmt::Display for Rgb {
    /// Format as a CSS hex colour: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Lightens the winner colour when the margin is narrow.
pub fn margin_color(base: Rgb, margin: f64, bands: &[MarginBand]) -> Rgb {
    match bands.iter().find(|band| margin < band.below) {
        Some(band) => base.lighten(band.lighten),
        None => base,
    }
}
