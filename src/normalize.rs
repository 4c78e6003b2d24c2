//! Threshold normalisation.
//!
//! Each threshold is stretched or compressed so that the visual lengths of
//! all of them add up to the full track, independent of how their value
//! ranges are distributed. The result is a table keyed by [`SegmentId`]:
//! every lookup of a modifier or offset goes through the id rather than a
//! position in some differently sorted array.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::polar::ChartGeometry;
use crate::threshold::{SegmentId, Threshold, ThresholdSet};

/// Render-space length the normalised segments are scaled to.
pub const TRACK_LENGTH: f64 = 100.0;

/// One threshold after normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub threshold: Threshold,
    /// `end - start` in value space.
    pub value_range: f64,
    /// Footprint on the render track.
    pub render_length: f64,
    /// Converts a value-space delta inside this segment to render space.
    pub modifier: f64,
    /// Render position of the segment's `start`.
    pub offset: f64,
}

impl Segment {
    /// Render position of the segment's `end`.
    #[inline]
    pub fn render_end(&self) -> f64 {
        self.offset + self.render_length
    }
}

/// Normalised thresholds of one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedThresholds {
    /// Ascending by `start`; `segments[i].id == SegmentId(i)`.
    segments: Vec<Segment>,
    gap_reserve: f64,
}

/// Normalises `thresholds` onto the render track.
///
/// With `align_thresholds` and exactly three thresholds, the set is first
/// rewritten into the aligned layout and the track is extended by a reserve
/// of `stroke_width / 2`.
pub fn normalize(
    thresholds: &ThresholdSet,
    stroke_width: f64,
    align_thresholds: bool,
) -> NormalizedThresholds {
    let aligned = thresholds.is_alignable(align_thresholds);
    let set = if aligned {
        thresholds.aligned(stroke_width)
    } else {
        thresholds.clone()
    };

    let sum: f64 = set.ascending().iter().map(Threshold::visual_length).sum();
    let gap_reserve = if aligned { stroke_width / 2.0 } else { 0.0 };

    let modifier = if sum == 0.0 {
        warn!("threshold lengths sum to zero, leaving them unscaled");
        1.0
    } else {
        (TRACK_LENGTH + gap_reserve) / sum
    };

    let mut offset = 0.0;
    let segments: Vec<Segment> = set
        .ascending()
        .iter()
        .enumerate()
        .map(|(index, threshold)| {
            let value_range = threshold.value_range();
            let length_modifier = if value_range > 0.0 {
                threshold.visual_length() * modifier / value_range
            } else {
                warn!(
                    start = threshold.start,
                    end = threshold.end,
                    "threshold has an empty value range, it will not be drawn"
                );
                0.0
            };
            let render_length = value_range * length_modifier;

            let segment = Segment {
                id: SegmentId(index),
                threshold: threshold.clone(),
                value_range,
                render_length,
                modifier: length_modifier,
                offset,
            };
            offset += render_length;
            segment
        })
        .collect();

    debug!(
        segments = segments.len(),
        aligned,
        gap_reserve,
        track_length = offset,
        "normalized thresholds"
    );

    NormalizedThresholds {
        segments,
        gap_reserve,
    }
}

impl NormalizedThresholds {
    /// Segments in ascending `start` order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments in descending `start` order, the order arcs are assembled in.
    pub fn segments_descending(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().rev()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Per-segment modifiers, highest threshold first.
    pub fn modifiers(&self) -> Vec<f64> {
        self.segments_descending().map(|s| s.modifier).collect()
    }

    /// Per-segment render offsets, highest threshold first.
    ///
    /// The last entry (the lowest threshold) is always 0.
    pub fn offsets(&self) -> Vec<f64> {
        self.segments_descending().map(|s| s.offset).collect()
    }

    /// Sum of every segment's render length.
    pub fn track_length(&self) -> f64 {
        self.segments.iter().map(|s| s.render_length).sum()
    }

    /// Extra track length reserved by the aligned layout.
    pub fn gap_reserve(&self) -> f64 {
        self.gap_reserve
    }

    /// Lowest segment.
    pub fn bottom(&self) -> &Segment {
        &self.segments[0]
    }

    /// Highest segment.
    pub fn top(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    /// Lowest value the gauge can show.
    pub fn floor(&self) -> f64 {
        self.bottom().threshold.start
    }

    /// Highest value the gauge can show.
    pub fn ceiling(&self) -> f64 {
        self.top().threshold.end
    }
}

// ============================================================================
// GLOBAL ARC TRANSFORM
// ============================================================================

/// Rotation applied uniformly to every path of a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcTransform {
    /// Signed radians; negative turns counter-clockwise.
    pub rotation: f64,
}

impl ArcTransform {
    pub const IDENTITY: Self = Self { rotation: 0.0 };

    /// Centres the aligned layout's reserved gap at the bottom of the dial.
    pub fn for_layout(
        thresholds: &ThresholdSet,
        stroke_width: f64,
        align_thresholds: bool,
        geometry: &ChartGeometry,
    ) -> Self {
        if !thresholds.is_alignable(align_thresholds) || geometry.radius <= 0.0 {
            return Self::IDENTITY;
        }
        Self {
            rotation: -(stroke_width / 2.0 / geometry.radius),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Everything derived from one configuration pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub geometry: ChartGeometry,
    pub normalized: NormalizedThresholds,
    pub transform: ArcTransform,
    pub stroke_width: f64,
    pub stroke_border: f64,
}

impl Layout {
    pub fn compute(
        thresholds: &ThresholdSet,
        stroke_width: f64,
        stroke_border: f64,
        align_thresholds: bool,
    ) -> Self {
        let geometry = ChartGeometry::from_strokes(stroke_width, stroke_border);
        let normalized = normalize(thresholds, stroke_width, align_thresholds);
        let transform =
            ArcTransform::for_layout(thresholds, stroke_width, align_thresholds, &geometry);

        Self {
            geometry,
            normalized,
            transform,
            stroke_width,
            stroke_border,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn three_zones() -> ThresholdSet {
        ThresholdSet::new(vec![
            Threshold::new(0.0, 50.0),
            Threshold::new(50.0, 75.0),
            Threshold::new(75.0, 100.0),
        ])
    }

    #[test]
    fn single_full_range_is_identity() {
        let normalized = normalize(&ThresholdSet::default(), 3.0, true);
        assert_eq!(normalized.modifiers(), vec![1.0]);
        assert_eq!(normalized.offsets(), vec![0.0]);
        assert!((normalized.track_length() - 100.0).abs() < EPS);
    }

    #[test]
    fn proportional_thresholds_keep_unit_modifiers() {
        let normalized = normalize(&three_zones(), 3.0, false);
        for modifier in normalized.modifiers() {
            assert!((modifier - 1.0).abs() < EPS);
        }
        assert_eq!(normalized.offsets(), vec![75.0, 50.0, 0.0]);
        assert_eq!(normalized.gap_reserve(), 0.0);
    }

    #[test]
    fn lowest_offset_is_zero_and_top_reaches_track_end() {
        let set = ThresholdSet::new(vec![
            Threshold::new(0.0, 10.0).with_length(40.0),
            Threshold::new(10.0, 90.0).with_length(20.0),
            Threshold::new(90.0, 100.0).with_length(40.0),
            Threshold::new(100.0, 120.0),
        ]);
        let normalized = normalize(&set, 3.0, true);
        let offsets = normalized.offsets();
        assert_eq!(offsets[offsets.len() - 1], 0.0);
        assert!((offsets[0] + normalized.top().render_length - 100.0).abs() < EPS);
    }

    #[test]
    fn explicit_lengths_reshape_the_track() {
        let set = ThresholdSet::new(vec![
            Threshold::new(0.0, 10.0).with_length(50.0),
            Threshold::new(10.0, 100.0).with_length(50.0),
        ]);
        let normalized = normalize(&set, 3.0, false);
        let low = &normalized.segments()[0];
        let high = &normalized.segments()[1];
        assert!((low.render_length - 50.0).abs() < EPS);
        assert!((low.modifier - 5.0).abs() < EPS);
        assert!((high.offset - 50.0).abs() < EPS);
        assert!((high.modifier - 50.0 / 90.0).abs() < EPS);
    }

    #[test]
    fn lengths_are_scaled_to_fill_the_track() {
        let set = ThresholdSet::new(vec![
            Threshold::new(0.0, 50.0).with_length(10.0),
            Threshold::new(50.0, 100.0).with_length(30.0),
        ]);
        let normalized = normalize(&set, 3.0, false);
        assert!((normalized.segments()[0].render_length - 25.0).abs() < EPS);
        assert!((normalized.segments()[1].render_length - 75.0).abs() < EPS);
    }

    #[test]
    fn aligned_layout_visible_track_is_full_for_any_stroke() {
        for stroke_width in [0.0, 1.0, 3.0, 8.0, 20.0] {
            let normalized = normalize(&three_zones(), stroke_width, true);
            let visible = normalized.track_length() - normalized.gap_reserve();
            assert!(
                (visible - 100.0).abs() < EPS,
                "stroke {stroke_width}: visible track {visible}"
            );
            assert!((normalized.gap_reserve() - stroke_width / 2.0).abs() < EPS);
        }
    }

    #[test]
    fn aligned_layout_middle_zone_dominates() {
        let skewed = ThresholdSet::new(vec![
            Threshold::new(0.0, 90.0),
            Threshold::new(90.0, 95.0),
            Threshold::new(95.0, 100.0),
        ]);
        let normalized = normalize(&skewed, 3.0, true);
        let lengths: Vec<f64> = normalized.segments().iter().map(|s| s.render_length).collect();
        assert!((lengths[1] - 100.0 / 0.75 / 2.0).abs() < EPS);
        assert!(lengths[1] > lengths[0] && lengths[1] > lengths[2]);
    }

    #[test]
    fn zero_width_range_is_not_drawn() {
        let set = ThresholdSet::new(vec![Threshold::new(40.0, 40.0)]);
        let normalized = normalize(&set, 3.0, false);
        let segment = &normalized.segments()[0];
        assert!(segment.modifier.is_finite());
        assert_eq!(segment.render_length, 0.0);
        assert_eq!(segment.offset, 0.0);
    }

    #[test]
    fn zero_length_sum_falls_back_to_unit_modifier() {
        let set = ThresholdSet::new(vec![
            Threshold::new(0.0, 50.0).with_length(10.0),
            Threshold::new(50.0, 100.0).with_length(-10.0),
        ]);
        let normalized = normalize(&set, 3.0, false);
        let modifiers = normalized.modifiers();
        assert!(modifiers.iter().all(|m| m.is_finite()));
        assert!((modifiers[0] + 0.2).abs() < EPS);
        assert!((modifiers[1] - 0.2).abs() < EPS);
        assert!((normalized.segments()[1].offset - 10.0).abs() < EPS);
    }

    #[test]
    fn segments_are_tagged_by_ascending_rank() {
        let set = ThresholdSet::new(vec![
            Threshold::new(75.0, 100.0),
            Threshold::new(0.0, 50.0),
            Threshold::new(50.0, 75.0),
        ]);
        let normalized = normalize(&set, 3.0, false);
        let middle = normalized.segment(SegmentId(1)).unwrap();
        assert_eq!(middle.threshold.start, 50.0);
        assert_eq!(middle.offset, 50.0);
        assert!(normalized.segment(SegmentId(3)).is_none());
    }

    #[test]
    fn transform_only_for_aligned_layout() {
        let layout = Layout::compute(&three_zones(), 3.0, 2.0, true);
        assert!((layout.transform.rotation + 1.5 / 47.5).abs() < EPS);

        let layout = Layout::compute(&three_zones(), 3.0, 2.0, false);
        assert!(layout.transform.is_identity());

        let layout = Layout::compute(&ThresholdSet::default(), 3.0, 2.0, true);
        assert!(layout.transform.is_identity());
    }
}
