//! Core types for the TPC-C in-memory storage engine
//!
//! This crate defines the foundational types shared by every other crate in
//! the workspace:
//! - The eleven TPC-C record types and their primary/secondary keys (`tables`)
//! - `FixedStr<N>`: fixed-width, NUL-free character fields (`fixed_str`)
//! - `Address`: the street address embedded in three record types
//! - `Record`/`HasSecondary`: static-dispatch traits tying records to keys
//! - `TxResult`: the tri-valued SUCCESS/FAIL/ABORT transaction result
//! - `Config`/`ConcurrencyMode`: runtime configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod config;
pub mod fixed_str;
pub mod record;
pub mod result;
pub mod tables;

pub use address::Address;
pub use config::{ConcurrencyMode, Config};
pub use fixed_str::{FieldError, FixedStr};
pub use record::{HasSecondary, Record, SecondaryEntry};
pub use result::{Outcome, TxResult};
pub use tables::{
    Customer, CustomerKey, CustomerSecondary, CustomerSecondaryKey, District, DistrictKey,
    History, Item, ItemKey, NewOrder, NewOrderKey, Order, OrderKey, OrderLine, OrderLineKey,
    OrderSecondary, OrderSecondaryKey, Stock, StockKey, Warehouse, WarehouseKey,
};
