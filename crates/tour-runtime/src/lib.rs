#![forbid(unsafe_code)]

//! Runtime: step sequencing, two-phase measurement, and viewport reactivity.
//!
//! # Role in FrankenTour
//! `tour-runtime` owns everything with state or time. The [`TourEngine`]
//! drives a [`StepSequencer`], places an estimate on activation, schedules
//! the refine pass on a cooperative [`TimerQueue`], listens to a [`ViewportSignal`]
//! while the tour is open, and calls into `tour-core` to resolve placement.
//!
//! # How it fits in the system
//! The host implements [`TourHost`] (anchor lookup, tooltip measurement, and
//! callbacks), owns a [`ViewportHub`], and calls [`TourEngine::tick`] from its
//! frame loop. The engine exposes [`TourState`], the latest
//! [`PlacementResult`](tour_core::PlacementResult), and a borrowed
//! [`TourOverlayState`] for drawing.
//!
//! # Example
//!
//! ```
//! use tour_core::{AnchorLocator, Rect, Size, StaticAnchors, TourStep};
//! use tour_runtime::{TooltipMeasure, TourEngine, TourListener, ViewportHub};
//! use web_time::Duration;
//!
//! struct Host {
//!     anchors: StaticAnchors,
//! }
//!
//! impl AnchorLocator for Host {
//!     fn locate(&self, target_id: &str) -> Option<Rect> {
//!         self.anchors.locate(target_id)
//!     }
//! }
//! impl TooltipMeasure for Host {
//!     fn measure_tooltip(&self) -> Option<Size> {
//!         Some(Size::new(300.0, 150.0))
//!     }
//! }
//! impl TourListener for Host {}
//!
//! let hub = ViewportHub::new(Size::new(1280.0, 800.0));
//! let steps = vec![TourStep::new("nav", "Navigation", "Start here.")];
//! let mut engine = TourEngine::new(steps, hub.clone());
//! let mut host = Host {
//!     anchors: StaticAnchors::new().with("nav", Rect::new(40.0, 40.0, 200.0, 32.0)),
//! };
//!
//! engine.open(&mut host);
//! assert!(engine.placement().is_some());
//! assert!(engine.state().is_settling);
//!
//! engine.tick(Duration::from_millis(200), &mut host);
//! assert!(engine.placement().is_some());
//! assert!(!engine.state().is_settling);
//! ```

pub mod config;
pub mod engine;
pub mod overlay;
pub mod schedule;
pub mod sequencer;
pub mod viewport;

#[cfg(feature = "config")]
pub use config::{load_steps_json, load_steps_toml};
pub use config::{MeasureConfig, TourConfig, TourConfigError, ViewportConfig};
pub use engine::{MeasurePass, TooltipMeasure, TourEngine, TourHost, TourListener};
pub use overlay::{TourOverlayState, TourOverlayStep};
pub use schedule::{TaskHandle, TimerQueue};
pub use sequencer::{
    CloseReason, StepSequencer, TourAdvanceReason, TourCommand, TourEvent, TourState,
};
pub use viewport::{SubId, ViewportHub, ViewportSignal, ViewportSubscription};
