// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::threshold::{Threshold, ThresholdSet};

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parses `#rgb` and `#rrggbb`, with or without the leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                    *slot = channel(&digit.to_string())? * 0x11;
                }
                Ok(Self::new(rgb[0], rgb[1], rgb[2]))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Colors used for the parts of a gauge that carry no threshold color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Color,
    pub backdrop: Color,
    pub border: Color,
    pub value: Color,
    pub loading: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::new(0xff, 0xff, 0xff),
            backdrop: Color::new(0xe6, 0xe6, 0xe6),
            border: Color::new(0xff, 0xff, 0xff),
            value: Color::new(0x1f, 0x1f, 0x1f),
            loading: Color::new(0xa7, 0xa7, 0xa7),
        }
    }
}

// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================

/// Everything needed to lay out and animate one gauge.
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = vec![Threshold::new(0.0, 100.0)])]
    pub thresholds: Vec<Threshold>,
    #[builder(default = 3.0)]
    pub stroke_width: f64,
    #[builder(default = 2.0)]
    pub stroke_border: f64,
    #[builder(default = true)]
    pub align_thresholds: bool,

    // Animation
    #[builder(default = Duration::from_millis(10))]
    pub tick_interval: Duration,

    // Window configuration
    #[builder(default = 300)]
    pub window_width: usize,
    #[builder(default = 300)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    #[builder(default)]
    pub palette: Palette,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    pub fn threshold_set(&self) -> ThresholdSet {
        ThresholdSet::new(self.thresholds.clone())
    }
}
