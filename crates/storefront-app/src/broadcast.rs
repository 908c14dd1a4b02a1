// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Registry<T> {
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_id: Cell<u64>,
    dispatching: Cell<bool>,
    stale: Cell<bool>,
}

impl<T> Registry<T> {
    fn is_registered(&self, id: u64) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(registered, _)| *registered == id)
    }

    fn remove(&self, id: u64) {
        self.listeners
            .borrow_mut()
            .retain(|(registered, _)| *registered != id);
    }
}

pub struct Broadcaster<T> {
    registry: Rc<Registry<T>>,
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self {
            registry: Rc::new(Registry {
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                dispatching: Cell::new(false),
                stale: Cell::new(false),
            }),
        }
    }
}

impl<T: 'static> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T: 'static> Broadcaster<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id.wrapping_add(1));
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        self.registry.listeners.borrow_mut().push((id, listener));

        let registry: Weak<Registry<T>> = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.remove(id);
                }
            })),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners.borrow().len()
    }

    pub fn publish(&self, build: impl Fn() -> T) {
        // Re-entrant publishes are coalesced into one more pass of the outer loop.
        if self.registry.dispatching.replace(true) {
            self.registry.stale.set(true);
            return;
        }

        loop {
            let value = build();
            let listeners = self.registry.listeners.borrow().clone();
            for (id, listener) in listeners {
                if self.registry.is_registered(id) {
                    let mut listener = listener.borrow_mut();
                    (&mut *listener)(&value);
                }
            }
            if !self.registry.stale.replace(false) {
                break;
            }
        }

        self.registry.dispatching.set(false);
    }
}

#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
