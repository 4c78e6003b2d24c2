//! Threshold segments and the sets they form.
//!
//! A [`Threshold`] is a value sub-range of the gauge's 0-100 input domain with
//! an optional visual weight and color. A [`ThresholdSet`] is the sanitised,
//! never-empty collection a gauge is configured with.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Color;
use crate::error::Result;

/// Fixed visual lengths of the aligned three-zone layout.
const ALIGNED_SCALE: f64 = 100.0 / 0.75;

/// One value range of the gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Threshold {
    pub const fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            length: None,
            color: None,
        }
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Width of the range in value space.
    #[inline]
    pub fn value_range(&self) -> f64 {
        self.end - self.start
    }

    /// Requested visual weight, falling back to the value range.
    #[inline]
    pub fn visual_length(&self) -> f64 {
        self.length.unwrap_or_else(|| self.value_range())
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// Identifies a threshold inside one normalised configuration.
///
/// The id is the threshold's rank in ascending `start` order, so it stays
/// valid for as long as the configuration it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub usize);

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "segment-{}", self.0)
    }
}

/// A non-empty set of thresholds, sorted ascending by `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Threshold>", into = "Vec<Threshold>")]
pub struct ThresholdSet {
    thresholds: Vec<Threshold>,
}

impl ThresholdSet {
    /// Sanitises caller input.
    ///
    /// An empty list becomes the single `[0, 100]` threshold and reversed
    /// ranges are flipped. Nothing is rejected.
    pub fn new(thresholds: Vec<Threshold>) -> Self {
        if thresholds.is_empty() {
            warn!("no thresholds configured, using a single 0-100 range");
            return Self::default();
        }

        let mut thresholds: Vec<Threshold> = thresholds
            .into_iter()
            .map(|mut threshold| {
                if threshold.start > threshold.end {
                    warn!(
                        start = threshold.start,
                        end = threshold.end,
                        "threshold range is reversed, swapping ends"
                    );
                    std::mem::swap(&mut threshold.start, &mut threshold.end);
                }
                threshold
            })
            .collect();

        thresholds.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { thresholds }
    }

    /// Loads a JSON array of thresholds.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let thresholds: Vec<Threshold> = serde_json::from_str(data)?;
        Ok(Self::new(thresholds))
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Thresholds in ascending `start` order.
    pub fn ascending(&self) -> &[Threshold] {
        &self.thresholds
    }

    /// Thresholds in descending `start` order, the order arcs are drawn in.
    pub fn descending(&self) -> impl Iterator<Item = &Threshold> {
        self.thresholds.iter().rev()
    }

    /// Lowest `start`, the floor no value animates below.
    pub fn floor(&self) -> f64 {
        self.thresholds[0].start
    }

    /// Highest `end`.
    pub fn ceiling(&self) -> f64 {
        self.thresholds
            .iter()
            .map(|t| t.end)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Whether the aligned three-zone layout applies.
    pub fn is_alignable(&self, align_thresholds: bool) -> bool {
        align_thresholds && self.thresholds.len() == 3
    }

    /// Rewrites a three-threshold set into the balanced aligned layout.
    ///
    /// Visual lengths are replaced by fixed proportions (the middle zone takes
    /// half of the track) and the outer boundaries are pinned to 0 and 100.
    /// Sets of any other size are returned unchanged.
    pub fn aligned(&self, stroke_width: f64) -> Self {
        let [low, mid, high] = self.thresholds.as_slice() else {
            return self.clone();
        };

        let thresholds = vec![
            Threshold {
                start: 0.0,
                end: low.end,
                length: Some(ALIGNED_SCALE / 8.0),
                color: low.color,
            },
            Threshold {
                start: mid.start,
                end: mid.end,
                length: Some(ALIGNED_SCALE / 2.0),
                color: mid.color,
            },
            Threshold {
                start: high.start,
                end: 100.0,
                length: Some(((100.0 + stroke_width * 3.0) / 0.75) / 8.0),
                color: high.color,
            },
        ];

        Self { thresholds }
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            thresholds: vec![Threshold::default()],
        }
    }
}

impl From<Vec<Threshold>> for ThresholdSet {
    fn from(thresholds: Vec<Threshold>) -> Self {
        Self::new(thresholds)
    }
}

impl From<ThresholdSet> for Vec<Threshold> {
    fn from(set: ThresholdSet) -> Self {
        set.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_zones() -> Vec<Threshold> {
        vec![
            Threshold::new(50.0, 75.0),
            Threshold::new(75.0, 100.0),
            Threshold::new(0.0, 50.0),
        ]
    }

    #[test]
    fn empty_input_defaults_to_full_range() {
        let set = ThresholdSet::new(Vec::new());
        assert_eq!(set.ascending(), &[Threshold::new(0.0, 100.0)]);
    }

    #[test]
    fn sorts_ascending_by_start() {
        let set = ThresholdSet::new(three_zones());
        let starts: Vec<f64> = set.ascending().iter().map(|t| t.start).collect();
        assert_eq!(starts, vec![0.0, 50.0, 75.0]);
        let desc: Vec<f64> = set.descending().map(|t| t.start).collect();
        assert_eq!(desc, vec![75.0, 50.0, 0.0]);
    }

    #[test]
    fn swaps_reversed_ranges() {
        let set = ThresholdSet::new(vec![Threshold::new(80.0, 20.0)]);
        assert_eq!(set.ascending()[0].start, 20.0);
        assert_eq!(set.ascending()[0].end, 80.0);
    }

    #[test]
    fn visual_length_defaults_to_range() {
        assert_eq!(Threshold::new(10.0, 35.0).visual_length(), 25.0);
        assert_eq!(Threshold::new(10.0, 35.0).with_length(5.0).visual_length(), 5.0);
    }

    #[test]
    fn floor_and_ceiling() {
        let set = ThresholdSet::new(vec![Threshold::new(20.0, 60.0), Threshold::new(60.0, 90.0)]);
        assert_eq!(set.floor(), 20.0);
        assert_eq!(set.ceiling(), 90.0);
    }

    #[test]
    fn aligned_rewrite_pins_outer_bounds_and_lengths() {
        let set = ThresholdSet::new(vec![
            Threshold::new(5.0, 40.0).with_length(99.0),
            Threshold::new(40.0, 80.0),
            Threshold::new(80.0, 95.0),
        ]);
        let aligned = set.aligned(3.0);
        let t = aligned.ascending();
        assert_eq!(t[0].start, 0.0);
        assert_eq!(t[2].end, 100.0);
        assert_eq!(t[1].start, 40.0);
        assert!((t[0].length.unwrap() - 100.0 / 0.75 / 8.0).abs() < 1e-12);
        assert!((t[1].length.unwrap() - 100.0 / 0.75 / 2.0).abs() < 1e-12);
        assert!((t[2].length.unwrap() - 109.0 / 0.75 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn aligned_rewrite_keeps_colors() {
        let red = Color::new(0xff, 0, 0);
        let set = ThresholdSet::new(vec![
            Threshold::new(0.0, 30.0).with_color(red),
            Threshold::new(30.0, 70.0),
            Threshold::new(70.0, 100.0),
        ]);
        assert_eq!(set.aligned(3.0).ascending()[0].color, Some(red));
    }

    #[test]
    fn aligned_rewrite_ignores_other_sizes() {
        let set = ThresholdSet::new(vec![Threshold::new(0.0, 50.0), Threshold::new(50.0, 100.0)]);
        assert_eq!(set.aligned(3.0), set);
        assert!(!set.is_alignable(true));
    }

    #[test]
    fn parses_json_thresholds() {
        let set = ThresholdSet::from_json(
            r##"[{"start": 50, "end": 100, "color": "#00ff00"}, {"start": 0, "end": 50, "length": 20}]"##,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.ascending()[0].length, Some(20.0));
        assert_eq!(set.ascending()[1].color, Some(Color::new(0, 0xff, 0)));
    }
}
