use std::time::{Duration, Instant};

use speedometer::{
    normalize, svg, to_render_percentage, AnimationPhase, ArcKind, GaugeCommand, GaugeConfig,
    Palette, SegmentId, Speedometer, Threshold, ThresholdSet,
};

const EPS: f64 = 1e-9;

fn three_zones() -> ThresholdSet {
    ThresholdSet::new(vec![
        Threshold::new(0.0, 50.0),
        Threshold::new(50.0, 75.0),
        Threshold::new(75.0, 100.0),
    ])
}

#[test]
fn unaligned_three_zones_map_one_to_one() {
    let normalized = normalize(&three_zones(), 3.0, false);

    for modifier in normalized.modifiers() {
        assert!((modifier - 1.0).abs() < EPS);
    }

    let middle = normalized.segment(SegmentId(1)).expect("middle segment");
    assert!((middle.offset - 50.0).abs() < EPS);
    assert!((to_render_percentage(60.0, middle) - (10.0 + middle.offset)).abs() < EPS);
    assert!((normalized.render_position(60.0) - 60.0).abs() < EPS);
}

#[test]
fn aligned_three_zones_fill_the_track_for_any_stroke() {
    for stroke_width in [0.0, 1.5, 3.0, 10.0] {
        let normalized = normalize(&three_zones(), stroke_width, true);
        let visible: f64 = normalized.segments().iter().map(|s| s.render_length).sum();
        let expected = 100.0 + stroke_width / 2.0;
        assert!(
            (visible - expected).abs() < 1e-9,
            "stroke {stroke_width}: {visible} != {expected}"
        );
        assert!((visible - normalized.gap_reserve() - 100.0).abs() < 1e-9);
    }
}

#[test]
fn retargeting_keeps_a_single_pending_tick() {
    let mut gauge = Speedometer::default();
    let t0 = Instant::now();

    gauge.set_target(Some(90.0), t0);
    gauge.set_target(Some(20.0), t0 + Duration::from_millis(1));
    assert_eq!(gauge.animator().timer().armed_count(), 1);

    for k in 1..=200u32 {
        gauge.poll(t0 + Duration::from_millis(10) * k);
        assert!(gauge.animator().timer().armed_count() <= 1);
        assert!(gauge.current_value() <= 20.0);
    }
    assert_eq!(gauge.current_value(), 20.0);
    assert_eq!(gauge.phase(), AnimationPhase::Settling);
}

#[test]
fn threshold_file_drives_a_settled_svg() {
    let set = ThresholdSet::from_json(
        r##"[
            {"start": 75, "end": 100, "color": "#e53935"},
            {"start": 0, "end": 50},
            {"start": 50, "end": 75, "color": "#fdd835"}
        ]"##,
    )
    .expect("valid thresholds");
    assert_eq!(set.floor(), 0.0);
    assert_eq!(set.ceiling(), 100.0);

    let config = GaugeConfig::builder()
        .thresholds(set.ascending().to_vec())
        .build();
    let mut gauge = Speedometer::new(config);
    gauge.set_target(Some(60.0), Instant::now());
    gauge.settle();

    let frame = gauge.frame();
    assert!(!frame.transform.is_identity());
    // two value pairs: the bottom zone is full, the middle one partial
    assert_eq!(frame.arcs_of(ArcKind::Value).count(), 4);

    let doc = svg::render_frame(&frame, &Palette::default());
    // value fills carry their zone's colour; backdrops never do
    assert!(doc.contains("#fdd835"));
    assert!(!doc.contains("#e53935"));
    assert_eq!(doc.matches("<path ").count(), 6 + 4);
}

#[test]
fn line_commands_reach_the_gauge() {
    let mut gauge = Speedometer::default();
    let t0 = Instant::now();
    for line in ["35", "loading", "error"] {
        let command: GaugeCommand = line.parse().expect("known command");
        gauge.apply(command, t0);
    }
    assert_eq!(gauge.target(), Some(35.0));
    assert!(gauge.is_loading());
    assert!(gauge.has_error());

    gauge.apply("none".parse().expect("known command"), t0);
    let frame = gauge.frame();
    assert!(frame.arcs_of(ArcKind::Loading).all(|arc| !arc.visible));
}
