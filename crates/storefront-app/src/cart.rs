// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{Broadcaster, CartDispatcher, CartLedger, Item, ItemId, Subscription};

struct CartInner {
    ledger: RefCell<Rc<CartLedger>>,
    updates: Broadcaster<Rc<CartLedger>>,
}

/// Process-wide cart handle. Clones share one ledger; every screen holding a
/// clone is told about every change, whichever screen made it.
#[derive(Clone)]
pub struct CartStore {
    inner: Rc<CartInner>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self {
            inner: Rc::new(CartInner {
                ledger: RefCell::new(Rc::new(CartLedger::new())),
                updates: Broadcaster::new(),
            }),
        }
    }
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> Rc<CartLedger> {
        Rc::clone(&self.inner.ledger.borrow())
    }

    pub fn quantity_of(&self, id: &ItemId) -> u64 {
        self.inner.ledger.borrow().quantity_of(id)
    }

    pub fn total_units(&self) -> u64 {
        self.inner.ledger.borrow().total_units()
    }

    pub fn increment(&self, id: &ItemId) -> u64 {
        let quantity = self.mutate(|ledger| ledger.increment(id));
        tracing::debug!(item = %id, quantity, "cart increment");
        quantity
    }

    pub fn decrement(&self, id: &ItemId) -> u64 {
        if !self.inner.ledger.borrow().contains(id) {
            return 0;
        }
        let quantity = self.mutate(|ledger| ledger.decrement(id));
        tracing::debug!(item = %id, quantity, "cart decrement");
        quantity
    }

    pub fn reset(&self) {
        if self.inner.ledger.borrow().is_empty() {
            return;
        }
        *self.inner.ledger.borrow_mut() = Rc::new(CartLedger::new());
        tracing::debug!("cart reset");
        self.publish();
    }

    pub fn subscribe(&self, listener: impl FnMut(&Rc<CartLedger>) + 'static) -> Subscription {
        self.inner.updates.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.updates.listener_count()
    }

    fn mutate<R>(&self, apply: impl FnOnce(&mut CartLedger) -> R) -> R {
        let result = {
            let mut current = self.inner.ledger.borrow_mut();
            apply(Rc::make_mut(&mut current))
        };
        self.publish();
        result
    }

    fn publish(&self) {
        self.inner.updates.publish(|| self.ledger());
    }
}

impl PartialEq for CartStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for CartStore {}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("ledger", &self.inner.ledger.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl CartDispatcher for CartStore {
    fn dispatch_add(&self, item: &Item) {
        self.increment(&item.id);
    }
}
