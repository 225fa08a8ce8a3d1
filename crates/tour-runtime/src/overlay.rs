#![forbid(unsafe_code)]

//! Borrowed view model for drawing the tour overlay.

use tour_core::{Placement, PlacementResult, Rect, Size};

use crate::sequencer::StepSequencer;

/// One entry in the step indicator strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourOverlayStep<'a> {
    pub index: usize,
    pub title: &'a str,
    pub is_current: bool,
}

/// Everything the presentation layer needs to draw the active step.
#[derive(Debug, Clone, PartialEq)]
pub struct TourOverlayState<'a> {
    pub step_index: usize,
    pub step_count: usize,
    pub progress_percent: f64,
    pub title: &'a str,
    pub content: &'a str,
    pub tip: Option<&'a str>,
    /// Host-defined demo counter, passed through unchanged.
    pub demo_trigger_count: Option<u32>,
    /// Tooltip should be drawn hidden until the refine pass lands.
    pub is_settling: bool,
    /// Preferred side from the step definition.
    pub preferred: Placement,
    /// `None` until the first measurement pass has run.
    pub placement: Option<PlacementResult>,
    /// Tooltip bounds for `placement` at the last known size.
    pub tooltip: Option<Rect>,
    pub can_go_prev: bool,
    pub is_last_step: bool,
    /// Indicator window: up to `max_steps` entries starting one before the
    /// active step.
    pub steps: Vec<TourOverlayStep<'a>>,
}

impl<'a> TourOverlayState<'a> {
    /// Build the view model, or `None` when the tour is closed.
    #[must_use]
    pub fn build(
        sequencer: &'a StepSequencer,
        placement: Option<PlacementResult>,
        tooltip_size: Size,
        max_steps: usize,
    ) -> Option<Self> {
        let step = sequencer.current_step()?;
        let step_index = sequencer.step_index();
        let step_count = sequencer.step_count();

        let window = max_steps.max(1);
        let start = step_index.saturating_sub(1);
        let end = (start + window).min(step_count);
        let steps = sequencer.steps()[start..end]
            .iter()
            .enumerate()
            .map(|(offset, s)| {
                let index = start + offset;
                TourOverlayStep {
                    index,
                    title: &s.title,
                    is_current: index == step_index,
                }
            })
            .collect();

        Some(Self {
            step_index,
            step_count,
            progress_percent: sequencer.progress_percent(),
            title: &step.title,
            content: &step.content,
            tip: step.tip.as_deref(),
            demo_trigger_count: step.demo_trigger_count,
            is_settling: sequencer.is_settling(),
            preferred: step.placement,
            placement,
            tooltip: placement.map(|p| p.tooltip_rect(tooltip_size)),
            can_go_prev: step_index > 0,
            is_last_step: step_index + 1 == step_count,
            steps,
        })
    }
}
