//! Mapping input values onto the render track.

use crate::normalize::{NormalizedThresholds, Segment};
use crate::threshold::SegmentId;

/// Render percentage of `input_value` measured inside `segment`.
///
/// Values outside the segment's range extrapolate linearly along the same
/// slope; arcs that stop mid-segment rely on this.
#[inline]
pub fn to_render_percentage(input_value: f64, segment: &Segment) -> f64 {
    (input_value - segment.threshold.start) * segment.modifier + segment.offset
}

/// A value resolved to the segment that owns it.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub segment: &'a Segment,
    /// The input, clamped into the gauge's domain.
    pub value: f64,
}

impl Located<'_> {
    pub fn render_percentage(&self) -> f64 {
        to_render_percentage(self.value, self.segment)
    }
}

impl NormalizedThresholds {
    /// Render percentage of `input_value` inside the segment tagged `id`.
    pub fn to_render_percentage(&self, input_value: f64, id: SegmentId) -> Option<f64> {
        self.segment(id)
            .map(|segment| to_render_percentage(input_value, segment))
    }

    /// Finds the segment owning `value`.
    ///
    /// Segments are searched from the highest `start` down and the first one
    /// starting at or below `value` wins, so a shared boundary belongs to the
    /// upper segment. Values above that segment's `end` clamp to it and
    /// values below the floor (or NaN) clamp to the floor.
    pub fn locate(&self, value: f64) -> Located<'_> {
        self.segments_descending()
            .find(|segment| segment.threshold.start <= value)
            .map(|segment| Located {
                segment,
                value: value.min(segment.threshold.end),
            })
            .unwrap_or_else(|| Located {
                segment: self.bottom(),
                value: self.floor(),
            })
    }

    /// Render percentage of any value, clamped into the gauge's domain.
    pub fn render_position(&self, value: f64) -> f64 {
        self.locate(value).render_percentage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::threshold::{Threshold, ThresholdSet};

    const EPS: f64 = 1e-9;

    fn three_zones() -> NormalizedThresholds {
        let set = ThresholdSet::new(vec![
            Threshold::new(0.0, 50.0),
            Threshold::new(50.0, 75.0),
            Threshold::new(75.0, 100.0),
        ]);
        normalize(&set, 3.0, false)
    }

    #[test]
    fn value_inside_middle_segment() {
        let normalized = three_zones();
        let middle = normalized.segment(SegmentId(1)).unwrap();
        let render = to_render_percentage(60.0, middle);
        assert!((render - (10.0 + middle.offset)).abs() < EPS);
        assert!((render - 60.0).abs() < EPS);
    }

    #[test]
    fn extrapolates_past_segment_end() {
        let normalized = three_zones();
        let low = normalized.segment(SegmentId(0)).unwrap();
        assert!((to_render_percentage(80.0, low) - 80.0).abs() < EPS);
        assert!((to_render_percentage(-10.0, low) + 10.0).abs() < EPS);
    }

    #[test]
    fn unknown_segment_id_has_no_position() {
        assert!(three_zones().to_render_percentage(10.0, SegmentId(9)).is_none());
    }

    #[test]
    fn boundary_belongs_to_upper_segment() {
        let normalized = three_zones();
        assert_eq!(normalized.locate(50.0).segment.id, SegmentId(1));
        assert_eq!(normalized.locate(49.9).segment.id, SegmentId(0));
        assert_eq!(normalized.locate(100.0).segment.id, SegmentId(2));
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let set = ThresholdSet::new(vec![Threshold::new(20.0, 60.0), Threshold::new(60.0, 80.0)]);
        let normalized = normalize(&set, 3.0, false);
        let below = normalized.locate(5.0);
        assert_eq!(below.value, 20.0);
        assert_eq!(below.segment.id, SegmentId(0));
        let above = normalized.locate(95.0);
        assert_eq!(above.value, 80.0);
        assert!((normalized.render_position(95.0) - 100.0).abs() < EPS);
        assert_eq!(normalized.render_position(f64::NAN), 0.0);
    }

    #[test]
    fn compressed_segments_shift_positions() {
        let set = ThresholdSet::new(vec![
            Threshold::new(0.0, 90.0).with_length(50.0),
            Threshold::new(90.0, 100.0).with_length(50.0),
        ]);
        let normalized = normalize(&set, 3.0, false);
        assert!((normalized.render_position(45.0) - 25.0).abs() < EPS);
        assert!((normalized.render_position(90.0) - 50.0).abs() < EPS);
        assert!((normalized.render_position(95.0) - 75.0).abs() < EPS);
    }

    #[test]
    fn render_position_is_monotonic_across_segments() {
        let normalized = three_zones();
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=200 {
            let position = normalized.render_position(step as f64 * 0.5);
            assert!(position >= previous - EPS);
            previous = position;
        }
    }
}
