// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::CatalogTab;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenState {
    pub tab: CatalogTab,
    pub category: String,
    pub search: String,
}

impl ScreenState {
    pub fn opened_with(category: Option<&str>) -> Self {
        Self {
            category: category.unwrap_or_default().to_owned(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenCommand {
    SelectTab(CatalogTab),
    ToggleTab,
    SelectCategory(String),
    ClearCategory,
    SetSearch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    TabChanged(CatalogTab),
    CategoryChanged(String),
    SearchChanged(String),
}

impl ScreenState {
    pub fn dispatch(&mut self, command: ScreenCommand) -> Vec<ScreenEvent> {
        match command {
            ScreenCommand::SelectTab(tab) => self.set_tab(tab),
            ScreenCommand::ToggleTab => self.set_tab(self.tab.toggled()),
            ScreenCommand::SelectCategory(category) => self.set_category(category),
            ScreenCommand::ClearCategory => self.set_category(String::new()),
            ScreenCommand::SetSearch(search) => {
                if self.search == search {
                    return Vec::new();
                }
                self.search = search;
                vec![ScreenEvent::SearchChanged(self.search.clone())]
            }
        }
    }

    fn set_tab(&mut self, tab: CatalogTab) -> Vec<ScreenEvent> {
        if self.tab == tab {
            return Vec::new();
        }
        self.tab = tab;
        vec![ScreenEvent::TabChanged(self.tab)]
    }

    fn set_category(&mut self, category: String) -> Vec<ScreenEvent> {
        if self.category == category {
            return Vec::new();
        }
        self.category = category;
        vec![ScreenEvent::CategoryChanged(self.category.clone())]
    }
}
