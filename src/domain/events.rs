use crate::domain::logging::LogComponent;
use crate::log_warn;
use serde::Serialize;
use std::fmt::Debug;

/// Default bound on undrained events.
pub const DEFAULT_PENDING_CAPACITY: usize = 1024;

/// Events raised by the viewport while the host drives it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewportEvent {
    StoreAttached { count: u64 },
    StoreDetached,
    WindowReloaded { start: u64, loaded: usize },
    ViewChanged,
    HoverChanged { store_index: Option<u64> },
    RedrawRequested,
}

impl ViewportEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ViewportEvent::StoreAttached { .. } => "StoreAttached",
            ViewportEvent::StoreDetached => "StoreDetached",
            ViewportEvent::WindowReloaded { .. } => "WindowReloaded",
            ViewportEvent::ViewChanged => "ViewChanged",
            ViewportEvent::HoverChanged { .. } => "HoverChanged",
            ViewportEvent::RedrawRequested => "RedrawRequested",
        }
    }
}

/// Event dispatcher for publishing events
pub trait EventDispatcher {
    fn publish(&mut self, event: ViewportEvent);
}

/// Simple in-memory event dispatcher.
///
/// Handlers run synchronously on publish. Events are also queued until the
/// host drains them; the queue holds at most `capacity` events and sheds
/// the oldest half when full.
pub struct InMemoryEventDispatcher {
    handlers: Vec<Box<dyn Fn(&ViewportEvent)>>,
    pending: Vec<ViewportEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for InMemoryEventDispatcher {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_PENDING_CAPACITY)
    }
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self { handlers: Vec::new(), pending: Vec::with_capacity(capacity), capacity, dropped: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&ViewportEvent) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn pending(&self) -> &[ViewportEvent] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn publish(&mut self, event: ViewportEvent) {
        for handler in &self.handlers {
            handler(&event);
        }

        if self.pending.len() >= self.capacity {
            let shed = self.capacity / 2;
            self.pending.drain(..shed);
            self.dropped += shed as u64;
            log_warn!(
                LogComponent::Domain("EventDispatcher"),
                "event queue full, dropped {} oldest (total dropped {})",
                shed,
                self.dropped
            );
        }
        self.pending.push(event);
    }
}

impl Debug for InMemoryEventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEventDispatcher")
            .field("handlers", &self.handlers.len())
            .field("pending", &self.pending.len())
            .field("capacity", &self.capacity)
            .field("dropped", &self.dropped)
            .finish()
    }
}
