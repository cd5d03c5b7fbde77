use std::sync::Arc;

use parking_lot::Mutex;

use roomsync_client::{RoomEvent, RoomManager, TradeEvent, TradeManager};

pub trait NamedEvent: Clone + Send + 'static {
    fn event_name(&self) -> &'static str;
}

impl NamedEvent for RoomEvent {
    fn event_name(&self) -> &'static str {
        self.name()
    }
}

impl NamedEvent for TradeEvent {
    fn event_name(&self) -> &'static str {
        self.name()
    }
}

/// Shared list of every event a manager raised, in order
pub struct EventLog<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E> Clone for EventLog<E> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<E: NamedEvent> Default for EventLog<E> {
    fn default() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<E: NamedEvent> EventLog<E> {
    /// Listener closure feeding this log
    pub fn recorder(&self) -> impl FnMut(&mut E) + Send + 'static {
        let events = self.events.clone();
        move |event: &mut E| events.lock().push(event.clone())
    }

    pub fn events(&self) -> Vec<E> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .iter()
            .map(NamedEvent::event_name)
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.event_name() == name)
            .count()
    }

    pub fn last(&self) -> Option<E> {
        self.events.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventLog<RoomEvent> {
    pub fn attach(manager: &mut RoomManager) -> Self {
        let log = Self::default();
        manager.on_event(log.recorder());
        log
    }
}

impl EventLog<TradeEvent> {
    pub fn attach(manager: &mut TradeManager) -> Self {
        let log = Self::default();
        manager.on_event(log.recorder());
        log
    }
}
