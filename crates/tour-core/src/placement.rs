#![forbid(unsafe_code)]

//! Adaptive tooltip placement around a tour anchor.
//!
//! [`resolve`] is a pure function: given the anchor bounds, the viewport size,
//! the tooltip size and a preferred [`Placement`], it picks the side with room
//! for the tooltip, positions the tooltip next to the anchor, and clamps the
//! result into the viewport.
//!
//! # Invariants
//!
//! 1. The highlight box is the anchor grown by `anchor_padding` on every side.
//! 2. A preferred side that lacks room flips to its opposite when the opposite
//!    has room (`top ⇄ bottom`, `left ⇄ right`).
//! 3. Vertical preferences with no vertical room try `right`, then `left`.
//!    Horizontal preferences with no horizontal room drop to the vertical
//!    default (`bottom`, or `top` when only the top has room).
//! 4. The tooltip box always lies within `[margin, viewport - margin]` on both
//!    axes whenever the tooltip is no larger than the viewport minus both
//!    margins. Larger tooltips are pinned to the top/left margin.
//! 5. Identical inputs give identical outputs.
//!
//! # Example
//!
//! ```
//! use tour_core::geometry::{Rect, Size};
//! use tour_core::placement::{Placement, PlacementParams, resolve};
//!
//! let anchor = Rect::new(100.0, 700.0, 120.0, 40.0);
//! let result = resolve(
//!     anchor,
//!     Size::new(1280.0, 800.0),
//!     Size::new(300.0, 160.0),
//!     Placement::Bottom,
//!     PlacementParams::default(),
//! );
//! // Not enough room below the anchor, plenty above.
//! assert_eq!(result.placement, Placement::Top);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::geometry::{Point, Rect, Sides, Size};

/// Gap between the anchor and the tooltip, also the minimum distance kept
/// from every viewport edge.
pub const DEFAULT_MARGIN: f64 = 20.0;

/// Breathing room drawn around the anchor by the spotlight.
pub const DEFAULT_ANCHOR_PADDING: f64 = 12.0;

/// Where to place the tooltip relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Placement {
    /// Above the anchor, horizontally centered.
    Top,
    /// Below the anchor, horizontally centered.
    #[default]
    Bottom,
    /// Left of the anchor, vertically centered.
    Left,
    /// Right of the anchor, vertically centered.
    Right,
    /// Below the anchor, aligned to its left edge.
    BottomLeft,
    /// Below the anchor, aligned to its right edge.
    BottomRight,
}

impl Placement {
    /// All placements, in declaration order.
    pub const ALL: [Placement; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Whether this is a vertical (above/below) placement.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        !matches!(self, Self::Left | Self::Right)
    }

    /// Stable kebab-case name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown placement name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlacementError(String);

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown placement {:?}", self.0)
    }
}

impl std::error::Error for ParsePlacementError {}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePlacementError(s.to_string()))
    }
}

/// Spacing parameters for [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementParams {
    /// Gap between anchor and tooltip, and minimum distance from viewport edges.
    pub margin: f64,
    /// Padding added around the anchor to form the highlight box.
    pub anchor_padding: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            anchor_padding: DEFAULT_ANCHOR_PADDING,
        }
    }
}

impl PlacementParams {
    /// Set the margin.
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the anchor padding.
    #[must_use]
    pub fn anchor_padding(mut self, padding: f64) -> Self {
        self.anchor_padding = padding;
        self
    }
}

/// Output of [`resolve`] for the active step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementResult {
    /// Spotlight cutout: the anchor plus padding.
    pub highlight: Rect,
    /// Top-left corner of the tooltip after clamping.
    pub tooltip: Point,
    /// Side the tooltip ended up on.
    pub placement: Placement,
    /// The anchor is outside the visible band and the host should scroll it
    /// into view.
    pub scroll_into_view: bool,
}

impl PlacementResult {
    /// Full tooltip bounds for the given tooltip size.
    #[must_use]
    pub fn tooltip_rect(&self, size: Size) -> Rect {
        Rect::new(self.tooltip.left, self.tooltip.top, size.width, size.height)
    }
}

/// Room available on each side of the anchor, after reserving the margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailableSpace {
    pub above: f64,
    pub below: f64,
    pub left: f64,
    pub right: f64,
}

impl AvailableSpace {
    /// Measure the space around `anchor` inside a viewport of `viewport` size.
    #[must_use]
    pub fn around(anchor: Rect, viewport: Size, margin: f64) -> Self {
        Self {
            above: anchor.top() - margin,
            below: viewport.height - anchor.bottom() - margin,
            left: anchor.left() - margin,
            right: viewport.width - anchor.right() - margin,
        }
    }

    /// Whether a tooltip of `size` fits on the given side.
    #[must_use]
    pub fn fits(&self, placement: Placement, size: Size) -> bool {
        match placement {
            Placement::Top => self.above >= size.height,
            Placement::Bottom | Placement::BottomLeft | Placement::BottomRight => {
                self.below >= size.height
            }
            Placement::Left => self.left >= size.width,
            Placement::Right => self.right >= size.width,
        }
    }
}

/// Pick the side to use given the room around the anchor.
#[must_use]
pub fn resolve_side(preferred: Placement, space: &AvailableSpace, size: Size) -> Placement {
    let fits = |p| space.fits(p, size);
    let first_fit = |order: &[Placement]| order.iter().copied().find(|&p| fits(p));

    use Placement::{Bottom, Left, Right, Top};

    match preferred {
        Top => first_fit(&[Top, Bottom, Right, Left]).unwrap_or(Top),
        Bottom | Placement::BottomLeft | Placement::BottomRight => {
            first_fit(&[preferred, Top, Right, Left]).unwrap_or(preferred)
        }
        Left => first_fit(&[Left, Right, Bottom, Top]).unwrap_or(Bottom),
        Right => first_fit(&[Right, Left, Bottom, Top]).unwrap_or(Bottom),
    }
}

/// Tooltip origin for a side, before clamping.
fn raw_position(placement: Placement, anchor: Rect, size: Size, margin: f64) -> Point {
    let centered_x = anchor.center_x() - size.width / 2.0;
    let centered_y = anchor.center_y() - size.height / 2.0;
    let below = anchor.bottom() + margin;

    match placement {
        Placement::Top => Point::new(centered_x, anchor.top() - margin - size.height),
        Placement::Bottom => Point::new(centered_x, below),
        Placement::BottomLeft => Point::new(anchor.left(), below),
        Placement::BottomRight => Point::new(anchor.right() - size.width, below),
        Placement::Left => Point::new(anchor.left() - margin - size.width, centered_y),
        Placement::Right => Point::new(anchor.right() + margin, centered_y),
    }
}

/// Clamp one axis into `[margin, extent - len - margin]`.
///
/// The upper bound never drops below `margin`, so oversized content pins to
/// the leading edge. NaN inputs collapse to `margin`.
#[inline]
fn clamp_axis(value: f64, len: f64, extent: f64, margin: f64) -> f64 {
    let hi = (extent - len - margin).max(margin);
    value.max(margin).min(hi)
}

/// Whether the anchor sits outside the vertical band the user can see.
///
/// Anchors taller than the viewport only count as out of view once they no
/// longer overlap it at all.
fn needs_scroll(anchor: Rect, viewport: Size) -> bool {
    if anchor.height > viewport.height {
        anchor.bottom() <= 0.0 || anchor.top() >= viewport.height
    } else {
        anchor.top() < 0.0 || anchor.bottom() > viewport.height
    }
}

fn sanitize(size: Size) -> Size {
    let dim = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    Size::new(dim(size.width), dim(size.height))
}

/// Resolve the tooltip placement for one anchor.
///
/// Never fails: when no side has room the preference is kept (or, for
/// horizontal preferences, the vertical default) and clamping keeps the
/// tooltip on screen.
#[must_use]
pub fn resolve(
    anchor: Rect,
    viewport: Size,
    tooltip: Size,
    preferred: Placement,
    params: PlacementParams,
) -> PlacementResult {
    let margin = if params.margin.is_finite() { params.margin.max(0.0) } else { 0.0 };
    let padding = if params.anchor_padding.is_finite() { params.anchor_padding } else { 0.0 };
    let viewport = sanitize(viewport);
    let tooltip = sanitize(tooltip);

    let highlight = anchor.outer(Sides::all(padding));
    let space = AvailableSpace::around(anchor, viewport, margin);
    let placement = resolve_side(preferred, &space, tooltip);

    #[cfg(feature = "tracing")]
    if placement != preferred {
        tracing::trace!(
            target: "tour.placement",
            preferred = preferred.as_str(),
            resolved = placement.as_str(),
            above = space.above,
            below = space.below,
            left = space.left,
            right = space.right,
            "placement fell back"
        );
    }

    let raw = raw_position(placement, anchor, tooltip, margin);
    let tooltip_origin = Point::new(
        clamp_axis(raw.left, tooltip.width, viewport.width, margin),
        clamp_axis(raw.top, tooltip.height, viewport.height, margin),
    );

    PlacementResult {
        highlight,
        tooltip: tooltip_origin,
        placement,
        scroll_into_view: needs_scroll(anchor, viewport),
    }
}
