#![forbid(unsafe_code)]

//! Log policy compliance for the tour runtime.
//!
//! Verify that runtime log events follow the project's logging policy:
//! - Every event uses one of the `tour.*` targets
//! - Every event carries structured fields beyond the message
//! - Normal operation logs at DEBUG or below; WARN is reserved for repaired
//!   configuration
//! - Scheduling, cancellation, and viewport changes are observable
//!
//! Run:
//!   cargo test -p tour-runtime --test log_level_policy

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tour_core::{AnchorLocator, Rect, Size, StaticAnchors, TourStep};
use tour_runtime::{TooltipMeasure, TourConfig, TourEngine, TourListener, ViewportHub};
use tracing_subscriber::layer::SubscriberExt;
use web_time::Duration;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }

    fn has_structured_fields(&self) -> bool {
        self.fields.keys().any(|k| k != "message")
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(EventCapture {
            events: events.clone(),
        });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

struct Host {
    anchors: StaticAnchors,
}

impl AnchorLocator for Host {
    fn locate(&self, target_id: &str) -> Option<Rect> {
        self.anchors.locate(target_id)
    }
}

impl TooltipMeasure for Host {
    fn measure_tooltip(&self) -> Option<Size> {
        Some(Size::new(260.0, 140.0))
    }
}

impl TourListener for Host {}

fn run_full_tour() -> Vec<CapturedEvent> {
    with_captured_events(|| {
        let hub = ViewportHub::new(Size::new(1280.0, 800.0));
        let steps = vec![
            TourStep::new("present", "Present", "found"),
            TourStep::new("missing", "Missing", "not found"),
        ];
        let mut engine = TourEngine::new(steps, hub.clone());
        let mut host = Host {
            anchors: StaticAnchors::new().with("present", Rect::new(100.0, 100.0, 80.0, 30.0)),
        };
        engine.open(&mut host);
        engine.tick(Duration::from_millis(60), &mut host);
        engine.next(&mut host);
        engine.tick(Duration::from_millis(200), &mut host);
        for width in [1000.0, 1100.0, 1200.0] {
            hub.emit(Size::new(width, 700.0));
        }
        engine.tick(Duration::ZERO, &mut host);
        engine.next(&mut host);
    })
}

// ============================================================================
// Policy Tests
// ============================================================================

#[test]
fn all_events_use_tour_targets() {
    for event in run_full_tour() {
        assert!(
            event.target.starts_with("tour."),
            "event '{}' has target {}",
            event.message(),
            event.target
        );
    }
}

#[test]
fn all_events_have_structured_fields() {
    for event in run_full_tour() {
        assert!(
            event.has_structured_fields(),
            "event '{}' on {} should carry fields, got {:?}",
            event.message(),
            event.target,
            event.fields.keys().collect::<Vec<_>>()
        );
    }
}

#[test]
fn normal_operation_stays_at_debug_or_below() {
    for event in run_full_tour() {
        assert!(
            event.level >= tracing::Level::DEBUG,
            "event '{}' logged at {}",
            event.message(),
            event.level
        );
    }
}

#[test]
fn lifecycle_is_observable() {
    let events = run_full_tour();
    let messages: Vec<&str> = events.iter().map(CapturedEvent::message).collect();
    for expected in [
        "tour opened",
        "viewport subscription acquired",
        "estimate placed, refine pass scheduled",
        "refine pass cancelled",
        "step changed",
        "refine pass fired",
        "anchor not found, using viewport fallback",
        "viewport changed",
        "tour completed",
        "viewport subscription released",
    ] {
        assert!(
            messages.contains(&expected),
            "missing '{expected}' in {messages:?}"
        );
    }
}

#[test]
fn burst_of_resizes_is_logged_once_with_batch_size() {
    let events = run_full_tour();
    let resizes: Vec<_> = events
        .iter()
        .filter(|e| e.message() == "viewport changed")
        .collect();
    assert_eq!(resizes.len(), 1);
    assert_eq!(resizes[0].fields.get("batch").map(String::as_str), Some("3"));
    assert_eq!(resizes[0].fields.get("width").map(String::as_str), Some("1200"));
}

#[test]
fn repaired_config_logs_a_warning() {
    let events = with_captured_events(|| {
        let config = TourConfig::default().refine_delay(Duration::ZERO);
        let _engine = TourEngine::with_config(Vec::new(), ViewportHub::default(), config);
    });
    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].target, "tour.schedule");
    assert!(warnings[0].fields.contains_key("errors"));
}
