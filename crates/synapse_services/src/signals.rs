//! Host signal dispatch with scoped listeners.
//!
//! Listeners are owned through [`Subscription`] guards: dropping the guard
//! unregisters the listener, so a component that owns its subscriptions can
//! never leak or double-register one.

use crate::input::Viewport;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Already-normalised events delivered by the page host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Pointer position in device pixels, origin top-left.
    PointerMove { client_x: f32, client_y: f32 },
    /// Vertical scroll offset in pixels.
    Scroll { offset: f32 },
    /// Canvas resized.
    Resize { viewport: Viewport },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListenerId(u64);

type Listener = Box<dyn FnMut(&Signal)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
    /// Set while listeners are being invoked.
    dispatching: bool,
    /// Removals requested during a dispatch, applied when it finishes.
    removed: Vec<ListenerId>,
}

impl Registry {
    fn remove(&mut self, id: ListenerId) {
        if self.dispatching {
            self.removed.push(id);
        } else {
            self.listeners.retain(|(lid, _)| *lid != id);
        }
    }
}

/// Single-threaded signal fan-out.
#[derive(Clone, Default)]
pub struct SignalBus {
    registry: Rc<RefCell<Registry>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every signal until the returned guard drops.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&Signal) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        tracing::trace!(listener = id.0, "listener registered");

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver `signal` to every registered listener in registration order.
    ///
    /// Listeners may subscribe or drop subscriptions while being called;
    /// those changes apply after this dispatch.
    pub fn dispatch(&self, signal: &Signal) {
        let mut active = {
            let mut registry = self.registry.borrow_mut();
            if registry.dispatching {
                tracing::warn!(?signal, "nested dispatch ignored");
                return;
            }
            registry.dispatching = true;
            std::mem::take(&mut registry.listeners)
        };

        for (_, listener) in active.iter_mut() {
            listener(signal);
        }

        let mut registry = self.registry.borrow_mut();
        let added = std::mem::replace(&mut registry.listeners, active);
        registry.listeners.extend(added);
        let removed = std::mem::take(&mut registry.removed);
        registry.listeners.retain(|(id, _)| !removed.contains(id));
        registry.dispatching = false;
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Keeps a listener registered. Unregisters on drop.
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Whether the bus is still alive.
    pub fn is_attached(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Unregister now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
            tracing::trace!(listener = self.id.0, "listener released");
        }
    }
}
