#![forbid(unsafe_code)]

//! Tour engine: glues the sequencer, the measurement scheduler, anchor lookup,
//! and viewport reactivity together.
//!
//! The engine is single-threaded and cooperative. The host drives it with
//! [`TourEngine::tick`] from its frame or timer loop and passes itself in as a
//! [`TourHost`] on every call that may need to locate anchors, measure the
//! tooltip, or deliver callbacks.
//!
//! # Measurement
//!
//! Every activation (open, step change, catalog swap) runs two passes:
//!
//! | Pass     | When                        | Tooltip size        | Effect                        |
//! |----------|-----------------------------|---------------------|-------------------------------|
//! | Estimate | during the activating call  | configured estimate | first placement, settling on  |
//! | Refine   | after `measure.refine_delay`| `measure_tooltip()` | final placement, settling off |
//!
//! Only the refine pass is scheduled. Its handle is cancelled on the next
//! activation, on close, and when the engine is dropped, so it never writes a
//! position for a step that is no longer active.
//!
//! # Viewport
//!
//! The engine subscribes to its [`ViewportSignal`] when the tour opens and
//! unsubscribes when it closes. Viewport changes drained during `tick`
//! re-resolve the current placement with the last known tooltip size; they
//! never schedule new passes.

use tour_core::{
    AnchorLocator, AnchorResolution, PlacementResult, Rect, Size, TourStep, locate_or_fallback,
    resolve,
};
use web_time::Duration;

use crate::config::TourConfig;
use crate::overlay::TourOverlayState;
use crate::schedule::{TaskHandle, TimerQueue};
use crate::sequencer::{StepSequencer, TourCommand, TourEvent, TourState};
use crate::viewport::{ViewportHub, ViewportSignal, ViewportSubscription};

/// Callbacks delivered synchronously from engine calls.
///
/// Every method has an empty default so hosts implement only what they use.
pub trait TourListener {
    /// The active step changed. Fires exactly once per index change.
    fn on_step_change(&mut self, _index: usize, _step: &TourStep) {}

    /// `next()` was invoked on the last step. Always followed by
    /// [`on_close`](Self::on_close).
    fn on_complete(&mut self) {}

    /// The tour closed, for any reason.
    fn on_close(&mut self) {}

    /// The active anchor is outside the viewport; the host should scroll it
    /// into view. Fires at most once per activation.
    fn on_scroll_request(&mut self, _target_id: &str, _anchor: Rect) {}
}

/// Reports the tooltip's rendered size.
pub trait TooltipMeasure {
    /// `None` when the tooltip has not been laid out yet.
    fn measure_tooltip(&self) -> Option<Size>;
}

/// Everything the engine needs from its host.
pub trait TourHost: AnchorLocator + TooltipMeasure + TourListener {}

impl<T: AnchorLocator + TooltipMeasure + TourListener + ?Sized> TourHost for T {}

/// Payload of a scheduled refine pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurePass {
    /// Activation generation the pass was scheduled for.
    pub activation: u64,
}

/// Guided tour engine.
#[derive(Debug)]
pub struct TourEngine<S: ViewportSignal = ViewportHub> {
    sequencer: StepSequencer,
    config: TourConfig,
    signal: S,
    subscription: Option<ViewportSubscription>,
    timers: TimerQueue<MeasurePass>,
    pending_refine: Option<TaskHandle>,
    activation: u64,
    viewport: Size,
    tooltip_size: Size,
    placement: Option<PlacementResult>,
}

impl<S: ViewportSignal> TourEngine<S> {
    /// Create a closed engine with the default configuration.
    #[must_use]
    pub fn new(steps: Vec<TourStep>, signal: S) -> Self {
        Self::with_config(steps, signal, TourConfig::default())
    }

    /// Create a closed engine. Invalid configuration values are repaired
    /// rather than rejected.
    #[must_use]
    pub fn with_config(steps: Vec<TourStep>, signal: S, config: TourConfig) -> Self {
        let errors = config.validate();
        if !errors.is_empty() {
            tracing::warn!(target: "tour.schedule", ?errors, "invalid tour config normalized");
        }
        let config = config.normalized();
        let viewport = signal.current();
        let tooltip_size = config.measure.estimated_size();
        Self {
            sequencer: StepSequencer::new(steps),
            config,
            signal,
            subscription: None,
            timers: TimerQueue::new(),
            pending_refine: None,
            activation: 0,
            viewport,
            tooltip_size,
            placement: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    pub fn signal(&self) -> &S {
        &self.signal
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn state(&self) -> TourState {
        self.sequencer.state()
    }

    pub fn is_open(&self) -> bool {
        self.sequencer.is_open()
    }

    pub fn step_index(&self) -> usize {
        self.sequencer.step_index()
    }

    pub fn step_count(&self) -> usize {
        self.sequencer.step_count()
    }

    pub fn current_step(&self) -> Option<&TourStep> {
        self.sequencer.current_step()
    }

    pub fn progress_percent(&self) -> f64 {
        self.sequencer.progress_percent()
    }

    /// Latest placement for the active step. Set by the estimate pass as soon
    /// as a step becomes active; `None` only while closed.
    pub fn placement(&self) -> Option<PlacementResult> {
        self.placement
    }

    /// Tooltip size used by the latest placement.
    pub fn tooltip_size(&self) -> Size {
        self.tooltip_size
    }

    /// Viewport size used by the latest placement.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Overlay view model, or `None` while closed.
    pub fn overlay_state(&self, max_steps: usize) -> Option<TourOverlayState<'_>> {
        TourOverlayState::build(&self.sequencer, self.placement, self.tooltip_size, max_steps)
    }

    /// Number of refine passes waiting to fire (zero or one).
    pub fn pending_passes(&self) -> usize {
        self.timers.pending()
    }

    /// Time until the pending refine pass is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Whether the engine currently holds a viewport subscription.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    // ── Navigation ───────────────────────────────────────────────────────

    /// Open at step 0. No-op when already open or the catalog is empty.
    pub fn open<H: TourHost + ?Sized>(&mut self, host: &mut H) {
        let events = self.sequencer.open();
        self.handle_events(events, host);
    }

    pub fn next<H: TourHost + ?Sized>(&mut self, host: &mut H) {
        let events = self.sequencer.next();
        self.handle_events(events, host);
    }

    pub fn prev<H: TourHost + ?Sized>(&mut self, host: &mut H) {
        let events = self.sequencer.prev();
        self.handle_events(events, host);
    }

    pub fn jump_to<H: TourHost + ?Sized>(&mut self, index: usize, host: &mut H) {
        let events = self.sequencer.jump_to(index);
        self.handle_events(events, host);
    }

    pub fn skip<H: TourHost + ?Sized>(&mut self, host: &mut H) {
        let events = self.sequencer.skip();
        self.handle_events(events, host);
    }

    pub fn close<H: TourHost + ?Sized>(&mut self, host: &mut H) {
        let events = self.sequencer.close();
        self.handle_events(events, host);
    }

    /// Route a navigation command.
    pub fn dispatch<H: TourHost + ?Sized>(&mut self, command: TourCommand, host: &mut H) {
        let events = self.sequencer.apply(command);
        self.handle_events(events, host);
    }

    /// Follow a host-owned open flag. Only edges have an effect.
    pub fn set_open<H: TourHost + ?Sized>(&mut self, open: bool, host: &mut H) {
        match (open, self.is_open()) {
            (true, false) => self.open(host),
            (false, true) => self.close(host),
            _ => {}
        }
    }

    /// Replace the step catalog.
    ///
    /// While open the active step is re-measured even when its index is
    /// unchanged, since its content may differ.
    pub fn set_steps<H: TourHost + ?Sized>(&mut self, steps: Vec<TourStep>, host: &mut H) {
        let events = self.sequencer.replace_steps(steps);
        if events.is_empty() && self.is_open() {
            self.activate(host);
        }
        self.handle_events(events, host);
    }

    // ── Pump ─────────────────────────────────────────────────────────────

    /// Advance the clock by `delta`.
    ///
    /// Pending viewport changes are applied first, then a refine pass that
    /// became due runs.
    pub fn tick<H: TourHost + ?Sized>(&mut self, delta: Duration, host: &mut H) {
        self.pump_viewport(host);
        for (handle, pass) in self.timers.advance(delta) {
            self.run_pass(handle, pass, host);
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn handle_events<H: TourHost + ?Sized>(&mut self, events: Vec<TourEvent>, host: &mut H) {
        for event in events {
            match event {
                TourEvent::StepChanged { to, .. } => {
                    self.ensure_subscribed();
                    if let Some(step) = self.sequencer.current_step() {
                        host.on_step_change(to, step);
                    }
                    self.activate(host);
                }
                TourEvent::Completed => host.on_complete(),
                TourEvent::Closed { .. } => {
                    self.teardown("closed");
                    host.on_close();
                }
            }
        }
    }

    fn ensure_subscribed(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.signal.subscribe());
        }
    }

    /// Start measuring the active step: resolve the estimate now, then
    /// schedule the refine pass.
    fn activate<H: TourHost + ?Sized>(&mut self, host: &mut H) {
        self.cancel_pending("superseded");
        self.activation = self.activation.wrapping_add(1);
        self.viewport = self.signal.current();
        self.tooltip_size = self.config.measure.estimated_size();

        let Some((result, anchor)) = self.resolve_current(host) else {
            self.placement = None;
            return;
        };
        self.placement = Some(result);
        self.sequencer.set_settling(true);

        let activation = self.activation;
        let refine = self
            .timers
            .schedule(self.config.measure.refine_delay(), MeasurePass { activation });
        self.pending_refine = Some(refine);
        tracing::debug!(
            target: "tour.schedule",
            activation,
            step = self.sequencer.step_index(),
            refine = refine.id(),
            "estimate placed, refine pass scheduled"
        );

        if result.scroll_into_view {
            if let AnchorResolution::Found(rect) = anchor {
                if let Some(step) = self.sequencer.current_step() {
                    host.on_scroll_request(&step.target_id, rect);
                }
            }
        }
    }

    fn cancel_pending(&mut self, reason: &'static str) {
        if let Some(handle) = self.pending_refine.take() {
            if self.timers.cancel(handle) {
                tracing::debug!(
                    target: "tour.schedule",
                    task = handle.id(),
                    reason,
                    "refine pass cancelled"
                );
            }
        }
    }

    fn teardown(&mut self, reason: &'static str) {
        self.cancel_pending(reason);
        self.placement = None;
        self.tooltip_size = self.config.measure.estimated_size();
        if let Some(sub) = self.subscription.take() {
            self.signal.unsubscribe(sub.id());
        }
    }

    fn pump_viewport<H: TourHost + ?Sized>(&mut self, host: &H) {
        let Some(sub) = &self.subscription else {
            return;
        };
        let sizes = sub.drain();
        if sizes.is_empty() || !self.sequencer.is_open() {
            return;
        }
        if self.config.viewport.coalesce {
            let batch = sizes.len();
            if let Some(&latest) = sizes.last() {
                self.apply_viewport(latest, batch, host);
            }
        } else {
            for size in sizes {
                self.apply_viewport(size, 1, host);
            }
        }
    }

    fn apply_viewport<H: TourHost + ?Sized>(&mut self, size: Size, batch: usize, host: &H) {
        self.viewport = size;
        tracing::debug!(
            target: "tour.viewport",
            width = size.width,
            height = size.height,
            batch,
            "viewport changed"
        );
        self.placement = self.resolve_current(host).map(|(result, _)| result);
    }

    fn run_pass<H: TourHost + ?Sized>(&mut self, handle: TaskHandle, pass: MeasurePass, host: &mut H) {
        if pass.activation != self.activation || !self.sequencer.is_open() {
            tracing::debug!(
                target: "tour.schedule",
                task = handle.id(),
                activation = pass.activation,
                "stale measurement pass dropped"
            );
            return;
        }

        self.pending_refine = None;
        match host.measure_tooltip() {
            Some(size) if size.is_valid() => self.tooltip_size = size,
            _ => {
                tracing::debug!(
                    target: "tour.schedule",
                    task = handle.id(),
                    "tooltip not measurable, keeping estimate"
                );
            }
        }
        self.placement = self.resolve_current(host).map(|(result, _)| result);
        self.sequencer.set_settling(false);
        tracing::debug!(
            target: "tour.schedule",
            task = handle.id(),
            width = self.tooltip_size.width,
            height = self.tooltip_size.height,
            "refine pass fired"
        );
    }

    /// Locate the active anchor and resolve against current inputs.
    fn resolve_current<H: TourHost + ?Sized>(
        &self,
        host: &H,
    ) -> Option<(PlacementResult, AnchorResolution)> {
        let step = self.sequencer.current_step()?;
        let anchor = locate_or_fallback(host, &step.target_id, self.viewport);
        if anchor.is_fallback() {
            tracing::debug!(
                target: "tour.placement",
                target_id = %step.target_id,
                "anchor not found, using viewport fallback"
            );
        }
        let result = resolve(
            anchor.rect(),
            self.viewport,
            self.tooltip_size,
            step.placement,
            self.config.placement,
        );
        tracing::debug!(
            target: "tour.placement",
            target_id = %step.target_id,
            side = result.placement.as_str(),
            left = result.tooltip.left,
            top = result.tooltip.top,
            "placement resolved"
        );
        Some((result, anchor))
    }
}

impl<S: ViewportSignal> Drop for TourEngine<S> {
    fn drop(&mut self) {
        self.teardown("dropped");
    }
}
