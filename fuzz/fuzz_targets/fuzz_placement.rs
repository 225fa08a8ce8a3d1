#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tour_core::{Placement, PlacementParams, Rect, Size, resolve};

#[derive(Arbitrary, Debug)]
struct Input {
    anchor: (f64, f64, f64, f64),
    viewport: (f64, f64),
    tooltip: (f64, f64),
    preferred: u8,
    margin: f64,
    padding: f64,
}

fuzz_target!(|input: Input| {
    let anchor = Rect::new(input.anchor.0, input.anchor.1, input.anchor.2, input.anchor.3);
    let viewport = Size::new(input.viewport.0, input.viewport.1);
    let tooltip = Size::new(input.tooltip.0, input.tooltip.1);
    let preferred = Placement::ALL[usize::from(input.preferred) % Placement::ALL.len()];
    let params = PlacementParams::default()
        .margin(input.margin)
        .anchor_padding(input.padding);

    let result = resolve(anchor, viewport, tooltip, preferred, params);

    // Deterministic for identical inputs.
    assert_eq!(result, resolve(anchor, viewport, tooltip, preferred, params));

    // Containment whenever the inputs are sane and the tooltip fits.
    let sane = [
        viewport.width,
        viewport.height,
        tooltip.width,
        tooltip.height,
        input.margin,
        anchor.x,
        anchor.y,
        anchor.width,
        anchor.height,
    ]
    .iter()
    .all(|v| v.is_finite() && v.abs() < 1e9);
    if sane && input.margin >= 0.0 && tooltip.is_valid() && viewport.is_valid() {
        let m = input.margin;
        if tooltip.width <= viewport.width - 2.0 * m && tooltip.height <= viewport.height - 2.0 * m
        {
            let rect = result.tooltip_rect(tooltip);
            let eps = 1e-6 * (1.0 + viewport.width.max(viewport.height));
            assert!(rect.left() >= m - eps && rect.right() <= viewport.width - m + eps);
            assert!(rect.top() >= m - eps && rect.bottom() <= viewport.height - m + eps);
        }
    }
});
