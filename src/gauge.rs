// ============================================================================
// GAUGE INSTANCE
// ============================================================================

use std::time::Instant;

use tracing::debug;

use crate::animator::{AnimationPhase, ValueAnimator};
use crate::arcs::{assemble, ArcState, Frame};
use crate::config::GaugeConfig;
use crate::normalize::Layout;
use crate::threshold::ThresholdSet;
use crate::GaugeCommand;

/// One speedometer: its layout, its animated value, and its display flags.
#[derive(Debug)]
pub struct Speedometer {
    config: GaugeConfig,
    thresholds: ThresholdSet,
    layout: Layout,
    animator: ValueAnimator,
    target: Option<f64>,
    loading: bool,
    error: bool,
}

impl Speedometer {
    pub fn new(config: GaugeConfig) -> Self {
        let thresholds = config.threshold_set();
        let layout = Layout::compute(
            &thresholds,
            config.stroke_width,
            config.stroke_border,
            config.align_thresholds,
        );
        let animator = ValueAnimator::new(config.tick_interval);

        Self {
            config,
            thresholds,
            layout,
            animator,
            target: None,
            loading: false,
            error: false,
        }
    }

    /// Replaces the threshold configuration and re-normalises right away.
    ///
    /// The animation in flight keeps running against the new layout.
    pub fn configure(
        &mut self,
        thresholds: ThresholdSet,
        stroke_width: f64,
        stroke_border: f64,
        align_thresholds: bool,
    ) {
        self.layout = Layout::compute(&thresholds, stroke_width, stroke_border, align_thresholds);
        debug!(
            thresholds = thresholds.len(),
            stroke_width, stroke_border, align_thresholds, "gauge reconfigured"
        );

        self.config.thresholds = thresholds.ascending().to_vec();
        self.config.stroke_width = stroke_width;
        self.config.stroke_border = stroke_border;
        self.config.align_thresholds = align_thresholds;
        self.thresholds = thresholds;
    }

    /// Sets the value to animate to; `None` means no value yet.
    pub fn set_target(&mut self, value: Option<f64>, now: Instant) -> AnimationPhase {
        self.target = value;
        match value {
            Some(value) => self
                .animator
                .set_target(value, self.layout.normalized.floor(), now),
            None => {
                self.animator.clear_target();
                AnimationPhase::Settling
            }
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: bool) {
        self.error = error;
    }

    /// Applies a command received from another part of the program.
    pub fn apply(&mut self, command: GaugeCommand, now: Instant) {
        match command {
            GaugeCommand::SetTarget(value) => {
                self.set_target(value, now);
            }
            GaugeCommand::SetLoading(loading) => self.set_loading(loading),
            GaugeCommand::SetError(error) => self.set_error(error),
            GaugeCommand::Configure {
                thresholds,
                stroke_width,
                stroke_border,
                align_thresholds,
            } => self.configure(thresholds, stroke_width, stroke_border, align_thresholds),
        }
    }

    /// Advances the animation. Returns whether the value moved.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.animator.poll(now)
    }

    /// Skips the rest of the animation.
    pub fn settle(&mut self) {
        self.animator.settle();
    }

    pub fn teardown(&mut self) {
        self.animator.teardown();
    }

    pub fn current_value(&self) -> f64 {
        self.animator.current_value()
    }

    pub fn target(&self) -> Option<f64> {
        self.target
    }

    pub fn phase(&self) -> AnimationPhase {
        self.animator.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn animator(&self) -> &ValueAnimator {
        &self.animator
    }

    /// Arcs for the current state, bottom layer first.
    pub fn frame(&self) -> Frame {
        assemble(
            &self.layout,
            ArcState {
                current_value: self.current_value(),
                target: self.target,
                loading: self.loading,
                error: self.error,
            },
        )
    }
}

impl Default for Speedometer {
    fn default() -> Self {
        Self::new(GaugeConfig::default())
    }
}
