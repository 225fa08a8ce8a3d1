#![forbid(unsafe_code)]

//! Anchor lookup for tour steps.
//!
//! The engine never touches the host's view tree directly. It asks an
//! [`AnchorLocator`] for the current bounds of a step's target every time a
//! placement is computed; results are never cached across steps because the
//! host may scroll or re-render between activations.
//!
//! A target that cannot be found degrades to a zero-sized box at the viewport
//! center (see [`fallback_anchor`]) so placement still produces a centered
//! tooltip instead of aborting the tour.

use ahash::AHashMap;

use crate::geometry::{Rect, Size};

/// Resolves a target identifier to its current on-screen bounds.
pub trait AnchorLocator {
    /// Current bounds of `target_id`, or `None` if no visible element matches.
    fn locate(&self, target_id: &str) -> Option<Rect>;
}

impl<F> AnchorLocator for F
where
    F: Fn(&str) -> Option<Rect>,
{
    fn locate(&self, target_id: &str) -> Option<Rect> {
        self(target_id)
    }
}

/// Result of resolving a step's anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorResolution {
    /// The target was located.
    Found(Rect),
    /// The target is missing; geometry is the viewport-centered fallback.
    Fallback(Rect),
}

impl AnchorResolution {
    /// Bounds to feed into placement.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        match self {
            Self::Found(r) | Self::Fallback(r) => *r,
        }
    }

    /// Whether the fallback geometry was used.
    #[inline]
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Zero-sized anchor at the center of the viewport.
#[must_use]
pub fn fallback_anchor(viewport: Size) -> Rect {
    Rect::new(viewport.width / 2.0, viewport.height / 2.0, 0.0, 0.0)
}

/// Locate `target_id`, substituting [`fallback_anchor`] when it is missing or
/// reports non-finite bounds.
pub fn locate_or_fallback<L>(locator: &L, target_id: &str, viewport: Size) -> AnchorResolution
where
    L: AnchorLocator + ?Sized,
{
    match locator.locate(target_id) {
        Some(rect)
            if rect.x.is_finite()
                && rect.y.is_finite()
                && rect.width.is_finite()
                && rect.height.is_finite() =>
        {
            AnchorResolution::Found(rect)
        }
        _ => AnchorResolution::Fallback(fallback_anchor(viewport)),
    }
}

/// Anchor table keyed by target id.
///
/// Useful for hosts that compute layout themselves (canvas, terminal, tests)
/// and push bounds in as they change.
#[derive(Debug, Clone, Default)]
pub struct StaticAnchors {
    anchors: AHashMap<String, Rect>,
}

impl StaticAnchors {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor (builder form).
    #[must_use]
    pub fn with(mut self, target_id: impl Into<String>, bounds: Rect) -> Self {
        self.set(target_id, bounds);
        self
    }

    /// Insert or move an anchor.
    pub fn set(&mut self, target_id: impl Into<String>, bounds: Rect) {
        self.anchors.insert(target_id.into(), bounds);
    }

    /// Remove an anchor, returning its last bounds.
    pub fn remove(&mut self, target_id: &str) -> Option<Rect> {
        self.anchors.remove(target_id)
    }

    /// Number of registered anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether no anchors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Remove all anchors.
    pub fn clear(&mut self) {
        self.anchors.clear();
    }
}

impl AnchorLocator for StaticAnchors {
    fn locate(&self, target_id: &str) -> Option<Rect> {
        self.anchors.get(target_id).copied()
    }
}
