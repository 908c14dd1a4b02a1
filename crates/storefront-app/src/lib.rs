// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod binder;
pub mod broadcast;
pub mod cart;
pub mod controller;
pub mod filter;
pub mod ids;
pub mod ledger;
pub mod model;
pub mod ports;
pub mod state;

pub use binder::*;
pub use broadcast::*;
pub use cart::*;
pub use controller::*;
pub use filter::*;
pub use ids::*;
pub use ledger::*;
pub use model::*;
pub use ports::*;
pub use state::*;
