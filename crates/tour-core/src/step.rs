#![forbid(unsafe_code)]

//! Tour step definitions supplied by the host.

use crate::placement::Placement;

/// One stop on a guided tour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TourStep {
    /// Identifier the host's [`AnchorLocator`](crate::anchor::AnchorLocator)
    /// resolves to on-screen bounds.
    pub target_id: String,
    pub title: String,
    pub content: String,
    /// Preferred tooltip side.
    #[cfg_attr(feature = "serde", serde(default))]
    pub placement: Placement,
    /// Optional secondary hint shown under the content.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub tip: Option<String>,
    /// Opaque counter the host uses to drive demo data for this step. The
    /// engine passes it through untouched.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub demo_trigger_count: Option<u32>,
}

impl TourStep {
    /// Create a step with the default (`bottom`) placement.
    #[must_use]
    pub fn new(
        target_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            title: title.into(),
            content: content.into(),
            placement: Placement::default(),
            tip: None,
            demo_trigger_count: None,
        }
    }

    /// Set the preferred placement.
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the tip text.
    #[must_use]
    pub fn tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    /// Set the demo trigger count.
    #[must_use]
    pub fn demo_trigger_count(mut self, count: u32) -> Self {
        self.demo_trigger_count = Some(count);
        self
    }
}
