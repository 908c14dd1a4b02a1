// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::RefCell;
use std::rc::Rc;

use time::OffsetDateTime;

use crate::{
    Broadcaster, CartLedger, CartStore, Catalog, CatalogLoad, CatalogTab, Category, FetchStatus,
    Fetched, Item, ItemId, Notifier, RenderRow, ScreenCommand, ScreenEvent, ScreenState,
    Subscription, TabSource, add_to_cart_and_notify, bind_rows, narrow_by_search, visible_items,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    Unavailable(CatalogTab),
    Loading,
    Failed(String),
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> String {
        match self {
            Self::Unavailable(tab) => tab.unavailable_message().to_owned(),
            Self::Loading => "Loading catalog...".to_owned(),
            Self::Failed(error) => format!("Catalog unavailable: {error}"),
            Self::NoMatches => "Nothing matches the current filter".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSnapshot {
    pub state: ScreenState,
    pub rows: Vec<RenderRow>,
    pub ledger: Rc<CartLedger>,
    pub feed_status: Option<FetchStatus>,
    pub empty_state: Option<EmptyState>,
    pub categories: Vec<Category>,
    pub categories_status: FetchStatus,
    pub refreshed_at: Option<OffsetDateTime>,
}

impl ScreenSnapshot {
    pub fn cart_units(&self) -> u64 {
        self.ledger.total_units()
    }

    pub fn shows_unavailable_message(&self) -> bool {
        matches!(self.empty_state, Some(EmptyState::Unavailable(_)))
    }
}

#[derive(Debug)]
struct ScreenView {
    state: ScreenState,
    catalog: Catalog,
    refreshed_at: Option<OffsetDateTime>,
}

impl ScreenView {
    fn snapshot(&self, ledger: Rc<CartLedger>, cart: &CartStore) -> ScreenSnapshot {
        let tab = self.state.tab;
        let items = narrow_by_search(
            visible_items(&self.catalog, tab, &self.state.category),
            &self.state.search,
        );
        let rows = bind_rows(&items, &ledger, cart);
        let source = self.catalog.source(tab);
        let empty_state = if rows.is_empty() {
            Some(match source {
                TabSource::Unavailable => EmptyState::Unavailable(tab),
                TabSource::Feed(Fetched::Loading) => EmptyState::Loading,
                TabSource::Feed(Fetched::Failed(error)) => EmptyState::Failed(error.clone()),
                TabSource::Feed(Fetched::Ready(_)) => EmptyState::NoMatches,
            })
        } else {
            None
        };

        ScreenSnapshot {
            state: self.state.clone(),
            rows,
            ledger,
            feed_status: source.status(),
            empty_state,
            categories: self.catalog.category_list().to_vec(),
            categories_status: self.catalog.categories.status(),
            refreshed_at: self.refreshed_at,
        }
    }
}

struct ScreenShared {
    view: RefCell<ScreenView>,
    cart: CartStore,
    updates: Broadcaster<ScreenSnapshot>,
}

impl ScreenShared {
    fn snapshot(&self) -> ScreenSnapshot {
        self.view.borrow().snapshot(self.cart.ledger(), &self.cart)
    }

    fn publish(&self) {
        self.updates.publish(|| self.snapshot());
    }
}

pub struct ScreenController {
    shared: Rc<ScreenShared>,
    _cart_subscription: Subscription,
}

impl ScreenController {
    pub fn new(cart: CartStore, catalog: Catalog, state: ScreenState) -> Self {
        let shared = Rc::new(ScreenShared {
            view: RefCell::new(ScreenView {
                state,
                catalog,
                refreshed_at: None,
            }),
            cart,
            updates: Broadcaster::new(),
        });

        let screen = Rc::downgrade(&shared);
        let cart_subscription = shared.cart.subscribe(move |_| {
            if let Some(screen) = screen.upgrade() {
                screen.publish();
            }
        });

        Self {
            shared,
            _cart_subscription: cart_subscription,
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(&ScreenSnapshot) + 'static) -> Subscription {
        self.shared.updates.subscribe(listener)
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        self.shared.snapshot()
    }

    pub fn state(&self) -> ScreenState {
        self.shared.view.borrow().state.clone()
    }

    pub fn cart(&self) -> &CartStore {
        &self.shared.cart
    }

    pub fn visible_rows(&self, tab: CatalogTab, category: &str) -> Vec<RenderRow> {
        let view = self.shared.view.borrow();
        let items = visible_items(&view.catalog, tab, category);
        bind_rows(&items, &self.shared.cart.ledger(), &self.shared.cart)
    }

    pub fn dispatch(&self, command: ScreenCommand) -> Vec<ScreenEvent> {
        let events = self.shared.view.borrow_mut().state.dispatch(command);
        if !events.is_empty() {
            tracing::debug!(?events, "screen selection changed");
            self.shared.publish();
        }
        events
    }

    pub fn select_tab(&self, tab: CatalogTab) {
        self.dispatch(ScreenCommand::SelectTab(tab));
    }

    pub fn toggle_tab(&self) {
        self.dispatch(ScreenCommand::ToggleTab);
    }

    pub fn select_category(&self, category: impl Into<String>) {
        self.dispatch(ScreenCommand::SelectCategory(category.into()));
    }

    pub fn clear_category(&self) {
        self.dispatch(ScreenCommand::ClearCategory);
    }

    pub fn set_search(&self, query: impl Into<String>) {
        self.dispatch(ScreenCommand::SetSearch(query.into()));
    }

    pub fn add_item(&self, id: &ItemId) -> u64 {
        self.shared.cart.increment(id)
    }

    pub fn remove_item(&self, id: &ItemId) -> u64 {
        self.shared.cart.decrement(id)
    }

    pub fn quantity_of(&self, id: &ItemId) -> u64 {
        self.shared.cart.quantity_of(id)
    }

    pub fn quick_add(&self, item: &Item, notifier: &mut impl Notifier) {
        add_to_cart_and_notify(item, &self.shared.cart, notifier);
    }

    pub fn find_item(&self, id: &ItemId) -> Option<Item> {
        self.shared.view.borrow().catalog.find_item(id).cloned()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.shared.view.borrow().catalog.category_list().to_vec()
    }

    pub fn begin_refresh(&self) {
        {
            let mut view = self.shared.view.borrow_mut();
            for tab in CatalogTab::ALL {
                let source = view.catalog.source_mut(tab);
                if let TabSource::Feed(fetched) = source {
                    *fetched = Fetched::Loading;
                }
            }
            view.catalog.categories = Fetched::Loading;
        }
        self.shared.publish();
    }

    pub fn apply_catalog(&self, load: CatalogLoad) {
        {
            let mut view = self.shared.view.borrow_mut();
            log_fetch("products", &load.products);
            view.catalog.products = TabSource::Feed(load.products);
            view.catalog.services = match load.services {
                Some(services) => {
                    log_fetch("services", &services);
                    TabSource::Feed(services)
                }
                None => TabSource::Unavailable,
            };
            if let Fetched::Failed(error) = &load.categories {
                tracing::warn!(%error, "category fetch failed");
            }
            view.catalog.categories = load.categories;
            view.refreshed_at = Some(OffsetDateTime::now_utc());
        }
        self.shared.publish();
    }
}

fn log_fetch(feed: &str, fetched: &Fetched<Vec<Item>>) {
    match fetched {
        Fetched::Ready(items) => tracing::info!(feed, count = items.len(), "catalog feed ready"),
        Fetched::Failed(error) => tracing::warn!(feed, %error, "catalog feed failed"),
        Fetched::Loading => tracing::debug!(feed, "catalog feed still loading"),
    }
}
