//! Node colors and default color assignment.
//!
//! Nodes without an explicit color get one from a [`ColorScheme`]. The
//! default scheme cycles a fixed palette by node index so that layouts are
//! reproducible; [`RandomColors`] plugs in any `rand` generator instead.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A 24-bit RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                // #abc expands to #aabbcc
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => None,
        }
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a #rgb or #rrggbb color", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RgbVisitor;

        impl Visitor<'_> for RgbVisitor {
            type Value = Rgb;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a hex color string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Rgb, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(RgbVisitor)
    }
}

/// Strategy for coloring nodes that have no explicit color.
pub trait ColorScheme {
    /// Pick the color for the node at `index`.
    fn color_for(&mut self, index: usize) -> Rgb;
}

/// The ten-color categorical palette used by default.
pub const CATEGORY10: [Rgb; 10] = [
    Rgb::new(0x1f, 0x77, 0xb4),
    Rgb::new(0xff, 0x7f, 0x0e),
    Rgb::new(0x2c, 0xa0, 0x2c),
    Rgb::new(0xd6, 0x27, 0x28),
    Rgb::new(0x94, 0x67, 0xbd),
    Rgb::new(0x8c, 0x56, 0x4b),
    Rgb::new(0xe3, 0x77, 0xc2),
    Rgb::new(0x7f, 0x7f, 0x7f),
    Rgb::new(0xbc, 0xbd, 0x22),
    Rgb::new(0x17, 0xbe, 0xcf),
];

/// Deterministic palette cycling by node index.
#[derive(Debug, Clone)]
pub struct PaletteColors {
    palette: Vec<Rgb>,
}

impl PaletteColors {
    /// Cycle through `palette`. An empty palette falls back to [`CATEGORY10`].
    pub fn new(palette: Vec<Rgb>) -> Self {
        if palette.is_empty() {
            Self::default()
        } else {
            Self { palette }
        }
    }
}

impl Default for PaletteColors {
    fn default() -> Self {
        Self {
            palette: CATEGORY10.to_vec(),
        }
    }
}

impl ColorScheme for PaletteColors {
    fn color_for(&mut self, index: usize) -> Rgb {
        self.palette[index % self.palette.len()]
    }
}

/// Random colors drawn from a caller-supplied generator.
pub struct RandomColors<R> {
    rng: R,
}

impl<R: Rng> RandomColors<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomColors<StdRng> {
    /// Reproducible random colors from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ColorScheme for RandomColors<R> {
    fn color_for(&mut self, _index: usize) -> Rgb {
        let [r, g, b]: [u8; 3] = self.rng.random();
        Rgb::new(r, g, b)
    }
}
