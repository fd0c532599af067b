use std::{any::Any, collections::HashMap};

use dioxus::prelude::*;
use futures_util::stream::StreamExt;
use uuid::Uuid;

/// Trait for types that can provide a unique identifier for their event type
///
/// This trait enables types to be used with the event bus system by providing
/// a static method to retrieve their unique event identifier. Types implementing
/// this trait automatically implement the [`Event`] trait through the blanket
/// implementation.
///
/// # Examples
///
/// ```
/// #[derive(Debug, Clone)]
/// struct CartChangedEvent;
///
/// impl EventId for CartChangedEvent {
///     fn event_id() -> &'static str {
///         "cart_changed"
///     }
/// }
/// ```
pub trait EventId {
    /// Returns a unique identifier for this event type
    ///
    /// This identifier is used by the event bus to route events to the correct
    /// subscribers. It must be unique across all event types in the system.
    fn event_id() -> &'static str;
}

/// Trait for events that can be published through the event bus
///
/// Most types should not implement this trait directly. Instead, implement
/// [`EventId`] and the blanket implementation provides [`Event`].
pub trait Event: core::fmt::Debug + CloneEvent {
    fn event_id(&self) -> &'static str;

    /// Converts this boxed event into a boxed `Any` for type downcasting
    fn into_box_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<E: EventId + Clone + 'static + core::fmt::Debug> Event for E {
    fn event_id(&self) -> &'static str {
        E::event_id()
    }
    fn into_box_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Trait for cloning event trait objects, so that every subscriber gets its
/// own copy of a published event.
pub trait CloneEvent {
    fn clone_event(&self) -> Box<dyn Event>;
}

impl<E: Event + Clone + 'static> CloneEvent for E {
    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Event> {
    fn clone(&self) -> Self {
        self.clone_event()
    }
}

/// Identifies one subscription, to be able to remove it later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);
impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}
impl core::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

type Handler = Box<dyn Fn(Box<dyn Event>)>;

/// Subscribers of the event bus, indexed by event id
#[derive(Default)]
struct Subscribers {
    by_event: HashMap<&'static str, Vec<(SubscriptionId, Handler)>>,
}
impl Subscribers {
    fn subscribe(&mut self, event_id: &'static str, id: SubscriptionId, handler: Handler) {
        self.by_event
            .entry(event_id)
            .or_default()
            .push((id, handler));
    }

    /// Returns `false` if the subscription did not exist
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut found = false;
        for handlers in self.by_event.values_mut() {
            let len = handlers.len();
            handlers.retain(|(sub_id, _)| *sub_id != id);
            found |= handlers.len() != len;
        }
        self.by_event.retain(|_, handlers| !handlers.is_empty());
        found
    }

    /// Delivers `event` to every handler subscribed to its id and returns
    /// the number of handlers called
    fn publish(&self, event: Box<dyn Event>) -> usize {
        let Some(handlers) = self.by_event.get(event.event_id()) else {
            return 0;
        };
        for (_, handler) in handlers {
            handler(event.clone());
        }
        handlers.len()
    }
}

/// Commands for the event bus service
enum EventBusCommandInner {
    Subscribe {
        event_id: &'static str,
        id: SubscriptionId,
        handler: Handler,
    },
    Unsubscribe {
        id: SubscriptionId,
    },
    Publish {
        event: Box<dyn Event>,
    },
}

impl std::fmt::Debug for EventBusCommandInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subscribe { event_id, id, .. } => f
                .debug_struct("Subscribe")
                .field("event_id", event_id)
                .field("id", id)
                .finish_non_exhaustive(),
            Self::Unsubscribe { id } => f.debug_struct("Unsubscribe").field("id", id).finish(),
            Self::Publish { event } => f.debug_struct("Publish").field("event", event).finish(),
        }
    }
}
pub struct EventBusCommand(EventBusCommandInner);
pub type EventBus = Coroutine<EventBusCommand>;

/// Event bus service coroutine
pub(super) fn use_event_bus_service() -> EventBus {
    use_coroutine(
        move |mut rx: UnboundedReceiver<EventBusCommand>| async move {
            log::info!("event_bus_service (coroutine) - start");

            let mut subscribers = Subscribers::default();

            while let Some(cmd) = rx.next().await {
                let EventBusCommand(cmd) = cmd;
                log::debug!("event_bus_service (coroutine) - Processing command {cmd:?}...");

                match cmd {
                    EventBusCommandInner::Subscribe {
                        event_id,
                        id,
                        handler,
                    } => {
                        subscribers.subscribe(event_id, id, handler);
                        log::debug!("event_bus_service - {id} subscribed to {event_id} events");
                    }
                    EventBusCommandInner::Unsubscribe { id } => {
                        if !subscribers.unsubscribe(id) {
                            log::warn!("event_bus_service - unknown subscription {id}");
                        }
                    }
                    EventBusCommandInner::Publish { event } => {
                        let event_id = event.event_id();
                        let count = subscribers.publish(event);
                        log::debug!(
                            "event_bus_service - Published {event_id} event to {count} subscribers"
                        );
                    }
                }
                log::debug!("event_bus_service (coroutine) - Command processed");
            }
        },
    )
}

pub fn publish_event<E: Event + 'static>(event_bus_service: EventBus, event: E) {
    event_bus_service.send(EventBusCommand(EventBusCommandInner::Publish {
        event: Box::new(event),
    }));
}

pub fn subscribe_event<E: Event + EventId + 'static, F: Fn(E) + 'static>(
    event_bus_service: EventBus,
    handler: F,
) -> SubscriptionId {
    let event_id = <E as EventId>::event_id();
    let id = SubscriptionId::new();
    let handler = Box::new(move |boxed: Box<dyn Event>| match boxed.into_box_any().downcast() {
        Ok(event) => handler(*event),
        Err(_) => log::error!("event_bus_service - {event_id} event has an unexpected type"),
    });
    event_bus_service.send(EventBusCommand(EventBusCommandInner::Subscribe {
        event_id,
        id,
        handler,
    }));
    id
}

pub fn unsubscribe_event(event_bus_service: EventBus, id: SubscriptionId) {
    event_bus_service.send(EventBusCommand(EventBusCommandInner::Unsubscribe { id }));
}

pub fn use_event_bus() -> EventBus {
    use_coroutine_handle()
}

/// Subscribes the calling component to `E` events for as long as it is
/// mounted. `handler` is only captured on the first render.
pub fn use_event_subscription<E, F>(handler: F)
where
    E: Event + EventId + 'static,
    F: Fn(E) + 'static,
{
    let event_bus = use_event_bus();
    let id = use_hook(|| subscribe_event::<E, _>(event_bus, handler));
    use_drop(move || unsubscribe_event(event_bus, id));
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{cell::RefCell, rc::Rc};

    #[derive(Debug, Clone, PartialEq)]
    struct Ping(u32);
    impl EventId for Ping {
        fn event_id() -> &'static str {
            "ping"
        }
    }

    #[derive(Debug, Clone)]
    struct Pong;
    impl EventId for Pong {
        fn event_id() -> &'static str {
            "pong"
        }
    }

    fn recording_handler(log: Rc<RefCell<Vec<u32>>>, offset: u32) -> Handler {
        Box::new(move |boxed: Box<dyn Event>| {
            let ping = *boxed.into_box_any().downcast::<Ping>().expect("a ping");
            log.borrow_mut().push(ping.0 + offset);
        })
    }

    #[test]
    fn events_reach_their_subscribers_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::default();
        subscribers.subscribe("ping", SubscriptionId::new(), recording_handler(log.clone(), 0));
        subscribers.subscribe("ping", SubscriptionId::new(), recording_handler(log.clone(), 100));

        assert_eq!(subscribers.publish(Box::new(Ping(1))), 2);
        assert_eq!(subscribers.publish(Box::new(Pong)), 0);
        assert_eq!(*log.borrow(), vec![1, 101]);
    }

    #[test]
    fn unsubscribed_handlers_are_not_called() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::default();
        let first = SubscriptionId::new();
        subscribers.subscribe("ping", first, recording_handler(log.clone(), 0));
        subscribers.subscribe("ping", SubscriptionId::new(), recording_handler(log.clone(), 100));

        assert!(subscribers.unsubscribe(first));
        assert!(!subscribers.unsubscribe(first));
        subscribers.publish(Box::new(Ping(2)));
        assert_eq!(*log.borrow(), vec![102]);
    }
}
