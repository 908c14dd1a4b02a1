// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::num::NonZeroU64;

use crate::ItemId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLedger {
    entries: BTreeMap<ItemId, NonZeroU64>,
}

impl CartLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, id: &ItemId) -> u64 {
        let quantity = self
            .entries
            .entry(id.clone())
            .and_modify(|quantity| *quantity = quantity.saturating_add(1))
            .or_insert(NonZeroU64::MIN);
        quantity.get()
    }

    pub fn decrement(&mut self, id: &ItemId) -> u64 {
        let Some(current) = self.entries.get(id).copied() else {
            return 0;
        };
        match NonZeroU64::new(current.get() - 1) {
            Some(next) => {
                self.entries.insert(id.clone(), next);
                next.get()
            }
            None => {
                self.entries.remove(id);
                0
            }
        }
    }

    pub fn quantity_of(&self, id: &ItemId) -> u64 {
        self.entries.get(id).map_or(0, |quantity| quantity.get())
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_units(&self) -> u64 {
        self.entries
            .values()
            .fold(0, |total, quantity| total.saturating_add(quantity.get()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u64)> {
        self.entries.iter().map(|(id, quantity)| (id, quantity.get()))
    }
}
