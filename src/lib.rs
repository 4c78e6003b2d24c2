//! Segmented speedometer gauges.
//!
//! A value in the gauge's domain is drawn on a 270 degree track made of
//! threshold segments. Each segment is stretched or compressed so that their
//! visual lengths always fill the track, however unevenly the value ranges
//! are spread. The displayed value eases toward its target one tick at a
//! time.
//!
//! - [`polar`]: track percentages to points and large-arc flags
//! - [`threshold`]: threshold ranges and the aligned three-zone layout
//! - [`normalize`]: per-segment modifiers, offsets and the global transform
//! - [`render_map`]: input values to track percentages
//! - [`animator`]: the decaying-step value animation
//! - [`arcs`]: backdrop, value and loading arc descriptors
//! - [`gauge`]: the [`Speedometer`] tying it all together
//! - [`svg`] and the windowed viewer: two ways of putting a frame on screen

// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animator;
pub mod arcs;
pub mod config;
pub mod error;
pub mod gauge;
pub mod normalize;
pub mod polar;
pub mod render_map;
pub mod svg;
pub mod threshold;
mod viewer;

use std::str::FromStr;

pub use animator::{AnimationPhase, ValueAnimator};
pub use arcs::{ArcDescriptor, ArcKind, ArcLayer, Frame};
pub use config::{Color, GaugeConfig, Palette};
pub use error::{Error, Result};
pub use gauge::Speedometer;
pub use normalize::{normalize, ArcTransform, Layout, NormalizedThresholds, Segment};
pub use polar::{point_on_arc, sweep_flag, ChartGeometry, Coordinate, SweepFlag};
pub use render_map::to_render_percentage;
pub use threshold::{SegmentId, Threshold, ThresholdSet};

// ============================================================================
// PUBLIC API - COMMANDS
// ============================================================================

/// Command enum for type-safe gauge updates
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeCommand {
    /// `None` means there is no value yet.
    SetTarget(Option<f64>),
    SetLoading(bool),
    SetError(bool),
    Configure {
        thresholds: ThresholdSet,
        stroke_width: f64,
        stroke_border: f64,
        align_thresholds: bool,
    },
}

/// Error returned when a line of input is not a gauge command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised command '{0}'")]
pub struct ParseCommandError(pub String);

impl FromStr for GaugeCommand {
    type Err = ParseCommandError;

    /// Parses the line protocol used on stdin: a number sets the target,
    /// `none` clears it, `loading`/`ready` and `error`/`ok` flip the flags.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let line = s.trim();
        match line.to_ascii_lowercase().as_str() {
            "none" | "-" => Ok(Self::SetTarget(None)),
            "loading" => Ok(Self::SetLoading(true)),
            "ready" => Ok(Self::SetLoading(false)),
            "error" => Ok(Self::SetError(true)),
            "ok" => Ok(Self::SetError(false)),
            _ => line
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(|value| Self::SetTarget(Some(value)))
                .ok_or_else(|| ParseCommandError(line.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_protocol() {
        assert_eq!("42.5".parse(), Ok(GaugeCommand::SetTarget(Some(42.5))));
        assert_eq!(" none ".parse(), Ok(GaugeCommand::SetTarget(None)));
        assert_eq!("LOADING".parse(), Ok(GaugeCommand::SetLoading(true)));
        assert_eq!("ready".parse(), Ok(GaugeCommand::SetLoading(false)));
        assert_eq!("error".parse(), Ok(GaugeCommand::SetError(true)));
        assert_eq!("ok".parse(), Ok(GaugeCommand::SetError(false)));
    }

    #[test]
    fn rejects_unknown_lines() {
        assert!("fast".parse::<GaugeCommand>().is_err());
        assert!("NaN".parse::<GaugeCommand>().is_err());
    }
}
