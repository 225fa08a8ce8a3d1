#![forbid(unsafe_code)]

//! Viewport-change signal as an injected observer capability.
//!
//! The viewport signal is process-wide, but a tour only listens to it while
//! it is open. The engine calls [`ViewportSignal::subscribe`] on open and
//! [`ViewportSignal::unsubscribe`] on close, and drains the subscription's
//! channel during its cooperative pump.
//!
//! # How it works
//!
//! 1. The host owns a [`ViewportHub`] and calls [`ViewportHub::emit`] from its
//!    resize/scroll handler.
//! 2. The engine holds a clone of the hub (hubs share state) and subscribes
//!    while the tour is open.
//! 3. Each subscription receives sizes through an `mpsc` channel; the engine
//!    drains it without blocking.
//! 4. Dropped or unsubscribed receivers are pruned so subscriptions never
//!    leak across open/close cycles.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use tour_core::Size;

/// A unique identifier for a viewport subscription.
pub type SubId = u64;

/// Source of viewport-change notifications.
pub trait ViewportSignal {
    /// The viewport size right now.
    fn current(&self) -> Size;

    /// Start receiving viewport changes.
    fn subscribe(&mut self) -> ViewportSubscription;

    /// Stop delivering to `id`. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubId);
}

/// Receiving end of a viewport subscription.
#[derive(Debug)]
pub struct ViewportSubscription {
    id: SubId,
    receiver: mpsc::Receiver<Size>,
}

impl ViewportSubscription {
    /// Build a subscription around an existing channel.
    #[must_use]
    pub fn new(id: SubId, receiver: mpsc::Receiver<Size>) -> Self {
        Self { id, receiver }
    }

    /// Subscription id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SubId {
        self.id
    }

    /// Drain every pending size, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Size> {
        self.receiver.try_iter().collect()
    }
}

#[derive(Debug)]
struct HubInner {
    current: Size,
    next_id: SubId,
    senders: Vec<(SubId, mpsc::Sender<Size>)>,
}

/// Shared, cloneable broadcaster of viewport sizes.
///
/// Clones observe the same subscriber list, so a host can keep one clone for
/// emitting and hand another to the engine.
#[derive(Debug, Clone)]
pub struct ViewportHub {
    inner: Arc<Mutex<HubInner>>,
}

impl ViewportHub {
    /// Create a hub reporting `initial` as the current size.
    #[must_use]
    pub fn new(initial: Size) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                current: initial,
                next_id: 1,
                senders: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Publish a new viewport size to every live subscriber.
    ///
    /// Returns the number of subscribers that received it. Subscribers whose
    /// receiver was dropped are pruned.
    pub fn emit(&self, size: Size) -> usize {
        let mut inner = self.lock();
        inner.current = size;
        inner.senders.retain(|(_, tx)| tx.send(size).is_ok());
        inner.senders.len()
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().senders.len()
    }
}

impl Default for ViewportHub {
    fn default() -> Self {
        Self::new(Size::default())
    }
}

impl ViewportSignal for ViewportHub {
    fn current(&self) -> Size {
        self.lock().current
    }

    fn subscribe(&mut self) -> ViewportSubscription {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.senders.push((id, tx));
        tracing::debug!(target: "tour.viewport", sub_id = id, "viewport subscription acquired");
        ViewportSubscription::new(id, rx)
    }

    fn unsubscribe(&mut self, id: SubId) {
        let mut inner = self.lock();
        let before = inner.senders.len();
        inner.senders.retain(|(sid, _)| *sid != id);
        if inner.senders.len() != before {
            tracing::debug!(target: "tour.viewport", sub_id = id, "viewport subscription released");
        }
    }
}
