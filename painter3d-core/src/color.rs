/// Face color palette and RGB values
use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::error::RenderError;

/// An RGB color with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Quantize to 8 bits per channel, clamping out-of-range values
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

/// The closed set of colors a face or line can carry.
///
/// Names are resolved at the boundary (config files, STL import). Anything
/// outside this set is a [`RenderError::StyleLookup`] for callers that want
/// to know, or white for callers that go through [`Palette::resolve_or_default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Palette {
    Gray,
    CornflowerBlue,
    LightGreen,
    DeepSkyBlue,
    Red,
    Tomato,
    Black,
    #[default]
    White,
}

impl Palette {
    pub const ALL: [Palette; 8] = [
        Palette::Gray,
        Palette::CornflowerBlue,
        Palette::LightGreen,
        Palette::DeepSkyBlue,
        Palette::Red,
        Palette::Tomato,
        Palette::Black,
        Palette::White,
    ];

    pub fn rgb(self) -> Rgb {
        match self {
            Palette::Gray => Rgb::new(0.5, 0.5, 0.5),
            Palette::CornflowerBlue => Rgb::from_bytes(100, 149, 237),
            Palette::LightGreen => Rgb::from_bytes(144, 238, 144),
            Palette::DeepSkyBlue => Rgb::from_bytes(0, 191, 255),
            Palette::Red => Rgb::new(1.0, 0.0, 0.0),
            Palette::Tomato => Rgb::from_bytes(255, 99, 71),
            Palette::Black => Rgb::BLACK,
            Palette::White => Rgb::WHITE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Gray => "gray",
            Palette::CornflowerBlue => "cornflowerblue",
            Palette::LightGreen => "lightgreen",
            Palette::DeepSkyBlue => "deepskyblue",
            Palette::Red => "red",
            Palette::Tomato => "tomato",
            Palette::Black => "black",
            Palette::White => "white",
        }
    }

    /// Look up a color by name, falling back to white when the name is unknown.
    pub fn resolve_or_default(name: &str) -> Palette {
        name.parse().unwrap_or_else(|err: RenderError| {
            warn!("{}, using {}", err, Palette::default());
            Palette::default()
        })
    }
}

impl FromStr for Palette {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "");
        let palette = match normalized.as_str() {
            "gray" | "grey" => Palette::Gray,
            "cornflowerblue" => Palette::CornflowerBlue,
            "lightgreen" => Palette::LightGreen,
            "deepskyblue" => Palette::DeepSkyBlue,
            "red" => Palette::Red,
            "tomato" => Palette::Tomato,
            "black" => Palette::Black,
            "white" => Palette::White,
            _ => return Err(RenderError::StyleLookup(s.to_string())),
        };
        Ok(palette)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
