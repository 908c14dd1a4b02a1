// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;

use crate::{CartLedger, CartStore, Item, ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowActionKind {
    Add,
    Remove,
}

#[derive(Clone, PartialEq, Eq)]
pub struct RowAction {
    cart: CartStore,
    item_id: ItemId,
    kind: RowActionKind,
}

impl RowAction {
    pub fn kind(&self) -> RowActionKind {
        self.kind
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn run(&self) -> u64 {
        match self.kind {
            RowActionKind::Add => self.cart.increment(&self.item_id),
            RowActionKind::Remove => self.cart.decrement(&self.item_id),
        }
    }
}

impl fmt::Debug for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("item_id", &self.item_id)
            .field("kind", &self.kind)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    pub item: Item,
    pub quantity: u64,
    pub last: bool,
    pub on_add: RowAction,
    pub on_remove: RowAction,
}

pub fn bind_rows(items: &[&Item], ledger: &CartLedger, cart: &CartStore) -> Vec<RenderRow> {
    let count = items.len();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| RenderRow {
            item: (*item).clone(),
            quantity: ledger.quantity_of(&item.id),
            last: index + 1 == count,
            on_add: RowAction {
                cart: cart.clone(),
                item_id: item.id.clone(),
                kind: RowActionKind::Add,
            },
            on_remove: RowAction {
                cart: cart.clone(),
                item_id: item.id.clone(),
                kind: RowActionKind::Remove,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{RowActionKind, bind_rows};
    use crate::{CartStore, Item, ItemId};

    #[test]
    fn rows_carry_live_quantities_and_last_flag() {
        let cart = CartStore::new();
        cart.increment(&ItemId::new("b"));
        cart.increment(&ItemId::new("b"));
        let items = [
            Item::new("a", "Kale", "veg"),
            Item::new("b", "Leek", "veg"),
        ];
        let refs: Vec<&Item> = items.iter().collect();

        let rows = bind_rows(&refs, &cart.ledger(), &cart);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].quantity, rows[0].last), (0, false));
        assert_eq!((rows[1].quantity, rows[1].last), (2, true));
        assert_eq!(rows[0].on_add.kind(), RowActionKind::Add);
        assert_eq!(rows[0].on_remove.item_id(), &ItemId::new("a"));
    }

    #[test]
    fn row_actions_mutate_the_shared_cart() {
        let cart = CartStore::new();
        let items = [Item::new("a", "Kale", "veg")];
        let refs: Vec<&Item> = items.iter().collect();
        let rows = bind_rows(&refs, &cart.ledger(), &cart);

        assert_eq!(rows[0].on_add.run(), 1);
        assert_eq!(rows[0].on_add.run(), 2);
        assert_eq!(rows[0].on_remove.run(), 1);
        assert_eq!(cart.quantity_of(&ItemId::new("a")), 1);
    }

    #[test]
    fn empty_input_binds_no_rows() {
        let cart = CartStore::new();
        assert!(bind_rows(&[], &cart.ledger(), &cart).is_empty());
    }
}
