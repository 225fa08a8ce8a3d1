#![forbid(unsafe_code)]

//! Step sequencing state machine.
//!
//! The sequencer owns the open/closed flag and the active step index. It
//! performs no I/O and knows nothing about geometry: each transition returns
//! the [`TourEvent`]s it produced and the engine turns those into host
//! callbacks.
//!
//! # Invariants
//!
//! 1. `step_index < step_count` whenever the tour is open.
//! 2. `step_index == 0` whenever the tour is closed.
//! 3. Every transition that changes the active index yields exactly one
//!    [`TourEvent::StepChanged`].
//! 4. A run ends with exactly one terminal sequence: `[Completed, Closed]`
//!    when `next()` leaves the last step, `[Closed]` for every other path.
//! 5. An empty catalog can never be opened.

use tour_core::TourStep;

/// Why the active step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourAdvanceReason {
    Open,
    ManualNext,
    ManualPrev,
    Jump,
    /// The host replaced the step catalog and the index had to move.
    CatalogChanged,
}

/// Why the tour closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// `next()` was invoked on the last step.
    Completed,
    Skipped,
    Dismissed,
    /// The host replaced the catalog with an empty one.
    CatalogEmptied,
}

/// Observable outcome of a sequencer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEvent {
    StepChanged {
        /// Previous index, `None` when the tour just opened.
        from: Option<usize>,
        to: usize,
        reason: TourAdvanceReason,
    },
    Completed,
    Closed {
        reason: CloseReason,
    },
}

/// Navigation request from the host UI (buttons, step indicators, keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourCommand {
    Next,
    Prev,
    JumpTo(usize),
    Skip,
    Close,
}

/// Snapshot of the sequencer for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TourState {
    pub step_index: usize,
    pub is_open: bool,
    /// True between the estimate and refine measurement passes.
    pub is_settling: bool,
}

/// Tour state machine: `Closed` or `Active(step_index)`.
#[derive(Debug, Clone, Default)]
pub struct StepSequencer {
    steps: Vec<TourStep>,
    open: bool,
    step_index: usize,
    settling: bool,
}

impl StepSequencer {
    /// Create a closed sequencer over `steps`.
    #[must_use]
    pub fn new(steps: Vec<TourStep>) -> Self {
        Self {
            steps,
            open: false,
            step_index: 0,
            settling: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    /// The active step, if open.
    pub fn current_step(&self) -> Option<&TourStep> {
        if !self.open {
            return None;
        }
        self.steps.get(self.step_index)
    }

    pub fn is_settling(&self) -> bool {
        self.settling
    }

    /// Set the settling flag. Ignored while closed.
    pub fn set_settling(&mut self, settling: bool) {
        self.settling = self.open && settling;
    }

    pub fn state(&self) -> TourState {
        TourState {
            step_index: self.step_index,
            is_open: self.open,
            is_settling: self.settling,
        }
    }

    /// `(step_index + 1) / step_count * 100`, or `0.0` when closed.
    pub fn progress_percent(&self) -> f64 {
        if !self.open || self.steps.is_empty() {
            return 0.0;
        }
        (self.step_index + 1) as f64 / self.steps.len() as f64 * 100.0
    }

    /// `Closed → Active(0)`. No-op when already open or the catalog is empty.
    pub fn open(&mut self) -> Vec<TourEvent> {
        if self.open || self.steps.is_empty() {
            return Vec::new();
        }
        self.open = true;
        self.step_index = 0;
        self.settling = false;
        tracing::debug!(target: "tour.sequencer", step_count = self.steps.len(), "tour opened");
        vec![TourEvent::StepChanged {
            from: None,
            to: 0,
            reason: TourAdvanceReason::Open,
        }]
    }

    /// Advance one step, or complete the tour from the last step.
    pub fn next(&mut self) -> Vec<TourEvent> {
        if !self.open {
            return Vec::new();
        }
        if self.step_index + 1 >= self.steps.len() {
            let at = self.step_index;
            self.reset();
            tracing::debug!(target: "tour.sequencer", at, "tour completed");
            return vec![
                TourEvent::Completed,
                TourEvent::Closed {
                    reason: CloseReason::Completed,
                },
            ];
        }
        self.move_to(self.step_index + 1, TourAdvanceReason::ManualNext)
    }

    /// Go back one step. No-op on the first step.
    pub fn prev(&mut self) -> Vec<TourEvent> {
        if !self.open || self.step_index == 0 {
            return Vec::new();
        }
        self.move_to(self.step_index - 1, TourAdvanceReason::ManualPrev)
    }

    /// Jump to any step. Targets past the end clamp to the last step;
    /// jumping to the active step is a no-op.
    pub fn jump_to(&mut self, index: usize) -> Vec<TourEvent> {
        if !self.open || self.steps.is_empty() {
            return Vec::new();
        }
        let last = self.steps.len() - 1;
        if index > last {
            tracing::debug!(
                target: "tour.sequencer",
                requested = index,
                clamped = last,
                "jump target out of range"
            );
        }
        let idx = index.min(last);
        if idx == self.step_index {
            return Vec::new();
        }
        self.move_to(idx, TourAdvanceReason::Jump)
    }

    /// Dismiss the tour without completing it.
    pub fn skip(&mut self) -> Vec<TourEvent> {
        self.dismiss(CloseReason::Skipped)
    }

    /// Close the tour without completing it.
    pub fn close(&mut self) -> Vec<TourEvent> {
        self.dismiss(CloseReason::Dismissed)
    }

    /// Route a navigation command.
    pub fn apply(&mut self, command: TourCommand) -> Vec<TourEvent> {
        match command {
            TourCommand::Next => self.next(),
            TourCommand::Prev => self.prev(),
            TourCommand::JumpTo(index) => self.jump_to(index),
            TourCommand::Skip => self.skip(),
            TourCommand::Close => self.close(),
        }
    }

    /// Swap the step catalog.
    ///
    /// While open, an empty catalog closes the tour and an index past the new
    /// end clamps to the last step.
    pub fn replace_steps(&mut self, steps: Vec<TourStep>) -> Vec<TourEvent> {
        self.steps = steps;
        if !self.open {
            return Vec::new();
        }
        if self.steps.is_empty() {
            return self.dismiss(CloseReason::CatalogEmptied);
        }
        let last = self.steps.len() - 1;
        if self.step_index > last {
            return self.move_to(last, TourAdvanceReason::CatalogChanged);
        }
        Vec::new()
    }

    fn move_to(&mut self, to: usize, reason: TourAdvanceReason) -> Vec<TourEvent> {
        let from = self.step_index;
        self.step_index = to;
        self.settling = false;
        tracing::debug!(target: "tour.sequencer", from, to, ?reason, "step changed");
        vec![TourEvent::StepChanged {
            from: Some(from),
            to,
            reason,
        }]
    }

    fn dismiss(&mut self, reason: CloseReason) -> Vec<TourEvent> {
        if !self.open {
            return Vec::new();
        }
        let at = self.step_index;
        self.reset();
        tracing::debug!(target: "tour.sequencer", at, ?reason, "tour closed");
        vec![TourEvent::Closed { reason }]
    }

    fn reset(&mut self) {
        self.open = false;
        self.step_index = 0;
        self.settling = false;
    }
}
