// ============================================================================
// ARC ASSEMBLY
// ============================================================================
//
// Segments are walked from the highest `start` down, so the assembled arc is
// contiguous from its visual start point. Every backdrop and value arc comes
// as a border/fill pair, border first.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{Color, Palette};
use crate::normalize::{ArcTransform, Layout, Segment};
use crate::polar::{sweep_flag, Coordinate, SweepFlag};
use crate::render_map::to_render_percentage;
use crate::threshold::SegmentId;

/// Stagger between value arcs of neighbouring segments.
pub const TRANSITION_STAGGER: Duration = Duration::from_millis(75);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcKind {
    /// Unfilled track of a segment.
    Backdrop,
    /// Filled part of a segment up to the current value.
    Value,
    /// Single "track so far" indicator shown while loading.
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcLayer {
    Border,
    Fill,
}

/// One drawable arc, recomputed from scratch on every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcDescriptor {
    pub kind: ArcKind,
    pub layer: ArcLayer,
    pub segment: Option<SegmentId>,
    pub start_point: Coordinate,
    pub end_point: Coordinate,
    /// Render percentage of `start_point` (the higher end).
    pub from_percent: f64,
    /// Render percentage of `end_point`.
    pub to_percent: f64,
    pub radius: f64,
    pub sweep_flag: SweepFlag,
    pub stroke_width: f64,
    pub color: Option<Color>,
    pub transition_delay: Duration,
    pub visible: bool,
}

impl ArcDescriptor {
    /// Render-space length between the two endpoints.
    pub fn render_length(&self) -> f64 {
        self.from_percent - self.to_percent
    }

    /// Elliptical arc path from `start_point` back to `end_point`.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} A {r} {r} 0 {} 0 {} {}",
            self.start_point.x,
            self.start_point.y,
            self.sweep_flag,
            self.end_point.x,
            self.end_point.y,
            r = self.radius,
        )
    }

    /// Color to stroke with, falling back to the palette.
    pub fn resolve_color(&self, palette: &Palette) -> Color {
        match (self.kind, self.layer) {
            (_, ArcLayer::Border) => palette.border,
            (ArcKind::Backdrop, ArcLayer::Fill) => palette.backdrop,
            (ArcKind::Value, ArcLayer::Fill) => self.color.unwrap_or(palette.value),
            (ArcKind::Loading, ArcLayer::Fill) => palette.loading,
        }
    }

    fn pair(self, layout: &Layout) -> [ArcDescriptor; 2] {
        let border = ArcDescriptor {
            layer: ArcLayer::Border,
            stroke_width: layout.stroke_width + layout.stroke_border,
            color: None,
            ..self.clone()
        };
        [border, self]
    }
}

/// Builds a fill-layer arc from render position `from` down to `to`.
fn arc_between(
    layout: &Layout,
    kind: ArcKind,
    segment: Option<&Segment>,
    from: f64,
    to: f64,
    sweep_length: f64,
) -> ArcDescriptor {
    ArcDescriptor {
        kind,
        layer: ArcLayer::Fill,
        segment: segment.map(|s| s.id),
        start_point: layout.geometry.point(from),
        end_point: layout.geometry.point(to),
        from_percent: from,
        to_percent: to,
        radius: layout.geometry.radius,
        sweep_flag: sweep_flag(sweep_length),
        stroke_width: layout.stroke_width,
        color: segment.and_then(|s| s.threshold.color),
        transition_delay: Duration::ZERO,
        visible: true,
    }
}

/// Full-length track of every segment.
///
/// Border layers are hidden while loading.
pub fn backdrop_arcs(layout: &Layout, loading: bool) -> Vec<ArcDescriptor> {
    layout
        .normalized
        .segments_descending()
        .flat_map(|segment| {
            let from = to_render_percentage(segment.threshold.end, segment);
            let to = to_render_percentage(segment.threshold.start, segment);
            let fill = arc_between(
                layout,
                ArcKind::Backdrop,
                Some(segment),
                from,
                to,
                segment.value_range * segment.modifier,
            );
            let [mut border, fill] = fill.pair(layout);
            border.visible = !loading;
            [border, fill]
        })
        .collect()
}

/// Filled arcs of every segment the current value has reached.
///
/// `no_value` flips the stagger so arcs retract from the top down.
pub fn value_arcs(layout: &Layout, current_value: f64, no_value: bool) -> Vec<ArcDescriptor> {
    let max_index = layout.normalized.len().saturating_sub(1);

    layout
        .normalized
        .segments_descending()
        .enumerate()
        .filter(|(_, segment)| current_value >= segment.threshold.start)
        .flat_map(|(index, segment)| {
            let value = current_value.min(segment.threshold.end);
            let from = to_render_percentage(value, segment);
            let to = to_render_percentage(segment.threshold.start, segment);

            let stagger = if no_value { index } else { max_index - index };
            let mut fill = arc_between(
                layout,
                ArcKind::Value,
                Some(segment),
                from,
                to,
                (value - segment.threshold.start) * segment.modifier,
            );
            fill.transition_delay = TRANSITION_STAGGER * stagger as u32;
            fill.pair(layout)
        })
        .collect()
}

/// One continuous arc from the current value down to the gauge's floor.
pub fn loading_arc(layout: &Layout, current_value: f64, visible: bool) -> ArcDescriptor {
    let normalized = &layout.normalized;
    let located = normalized.locate(current_value.min(normalized.ceiling()));
    let from = located.render_percentage();
    let to = to_render_percentage(normalized.floor(), normalized.bottom());

    let mut arc = arc_between(layout, ArcKind::Loading, None, from, to, from - to);
    arc.visible = visible;
    arc
}

// ============================================================================
// FRAME
// ============================================================================

/// Inputs to one assembly pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcState {
    pub current_value: f64,
    pub target: Option<f64>,
    pub loading: bool,
    pub error: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Bottom layer first.
    pub arcs: Vec<ArcDescriptor>,
    pub transform: ArcTransform,
    /// Point the transform rotates around.
    pub center: Coordinate,
    pub current_value: f64,
    pub target: Option<f64>,
    pub loading: bool,
    pub error: bool,
}

impl Frame {
    pub fn arcs_of(&self, kind: ArcKind) -> impl Iterator<Item = &ArcDescriptor> {
        self.arcs.iter().filter(move |arc| arc.kind == kind)
    }

    pub fn visible_arcs(&self) -> impl Iterator<Item = &ArcDescriptor> {
        self.arcs.iter().filter(|arc| arc.visible)
    }
}

/// Assembles backdrops, value arcs and the loading arc, in paint order.
pub fn assemble(layout: &Layout, state: ArcState) -> Frame {
    let no_value = state.loading || state.target.is_none();

    let mut arcs = backdrop_arcs(layout, state.loading);
    arcs.extend(value_arcs(layout, state.current_value, no_value));
    arcs.push(loading_arc(
        layout,
        state.current_value,
        state.loading && state.target.is_some(),
    ));

    Frame {
        arcs,
        transform: layout.transform,
        center: layout.geometry.center(),
        current_value: state.current_value,
        target: state.target,
        loading: state.loading,
        error: state.error,
    }
}
