#![forbid(unsafe_code)]

//! Core: geometry, anchor lookup, and adaptive tooltip placement.
//!
//! # Role in FrankenTour
//! `tour-core` is the pure layer. It has no clock, no callbacks and no
//! hidden state: every function maps explicit inputs to explicit outputs so
//! placement can be tested against synthetic rectangles without any rendering
//! engine.
//!
//! # Primary responsibilities
//! - **Geometry**: [`Rect`], [`Size`], [`Point`], [`Sides`] in viewport pixels.
//! - **Anchors**: the [`AnchorLocator`] capability and the viewport-centered
//!   fallback used when a target is missing.
//! - **Placement**: [`resolve`], which picks a side, positions the tooltip,
//!   and clamps it into the viewport.
//! - **Steps**: the [`TourStep`] catalog entry.
//!
//! # How it fits in the system
//! `tour-runtime` owns the step sequencer and the measurement scheduler and
//! calls into this crate every time a step activates, a measurement pass
//! fires, or the viewport changes.

pub mod anchor;
pub mod geometry;
pub mod placement;
pub mod step;

pub use anchor::{
    AnchorLocator, AnchorResolution, StaticAnchors, fallback_anchor, locate_or_fallback,
};
pub use geometry::{Point, Rect, Sides, Size};
pub use placement::{
    AvailableSpace, DEFAULT_ANCHOR_PADDING, DEFAULT_MARGIN, ParsePlacementError, Placement,
    PlacementParams, PlacementResult, resolve, resolve_side,
};
pub use step::TourStep;
