#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tour_core::{AnchorLocator, Rect, Size, TourStep};
use tour_runtime::{TooltipMeasure, TourCommand, TourEngine, TourListener, ViewportHub};
use web_time::Duration;

#[derive(Arbitrary, Debug)]
enum Op {
    Open,
    Next,
    Prev,
    Jump(u8),
    Skip,
    Close,
    SetOpen(bool),
    Tick(u16),
    Resize(u16, u16),
    Measure(Option<(u16, u16)>),
}

struct Host {
    measured: Option<Size>,
    step_changes: usize,
    completes: usize,
    closes: usize,
}

impl AnchorLocator for Host {
    fn locate(&self, target_id: &str) -> Option<Rect> {
        // Every third target is missing.
        let n: usize = target_id.parse().ok()?;
        (n % 3 != 0).then(|| Rect::new(n as f64 * 37.0, n as f64 * 53.0, 80.0, 24.0))
    }
}

impl TooltipMeasure for Host {
    fn measure_tooltip(&self) -> Option<Size> {
        self.measured
    }
}

impl TourListener for Host {
    fn on_step_change(&mut self, _index: usize, _step: &TourStep) {
        self.step_changes += 1;
    }
    fn on_complete(&mut self) {
        self.completes += 1;
    }
    fn on_close(&mut self) {
        self.closes += 1;
    }
}

fuzz_target!(|input: (u8, Vec<Op>)| {
    let (count, ops) = input;
    let steps: Vec<TourStep> = (0..usize::from(count % 12))
        .map(|i| TourStep::new(i.to_string(), "title", "content"))
        .collect();
    let step_count = steps.len();
    let hub = ViewportHub::new(Size::new(1280.0, 800.0));
    let mut engine = TourEngine::new(steps, hub.clone());
    let mut host = Host {
        measured: Some(Size::new(300.0, 150.0)),
        step_changes: 0,
        completes: 0,
        closes: 0,
    };

    for op in ops.into_iter().take(512) {
        match op {
            Op::Open => engine.open(&mut host),
            Op::Next => engine.dispatch(TourCommand::Next, &mut host),
            Op::Prev => engine.dispatch(TourCommand::Prev, &mut host),
            Op::Jump(i) => engine.dispatch(TourCommand::JumpTo(usize::from(i)), &mut host),
            Op::Skip => engine.dispatch(TourCommand::Skip, &mut host),
            Op::Close => engine.dispatch(TourCommand::Close, &mut host),
            Op::SetOpen(open) => engine.set_open(open, &mut host),
            Op::Tick(ms) => engine.tick(Duration::from_millis(u64::from(ms)), &mut host),
            Op::Resize(w, h) => {
                hub.emit(Size::new(f64::from(w), f64::from(h)));
            }
            Op::Measure(size) => {
                host.measured = size.map(|(w, h)| Size::new(f64::from(w), f64::from(h)));
            }
        }

        if engine.is_open() {
            assert!(engine.step_index() < step_count);
            assert_eq!(hub.subscriber_count(), 1);
            assert!(engine.pending_passes() <= 1);
            assert!(engine.placement().is_some());
        } else {
            assert_eq!(engine.step_index(), 0);
            assert_eq!(hub.subscriber_count(), 0);
            assert_eq!(engine.pending_passes(), 0);
        }
        assert!(host.completes <= host.closes);
    }

    drop(engine);
    assert_eq!(hub.subscriber_count(), 0);
});
