// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # POS Core
//!
//! This library provides the transaction and filtering core of a
//! point-of-sale front-end: building a cart with exact totals, filtering
//! order and product lists, and the open/close lifecycle of the fiscal day.
//!
//! ## Core Components
//!
//! - [`Cart`]: Order lines of the transaction in progress, with derived subtotal, tax and total
//! - [`filter()`]: Conjunctive search/status/date filter over any [`Filterable`] records
//! - [`FiscalDay`]: Two-state trading day gating checkout
//! - [`Catalog`]: In-memory product collection with create/update/delete
//! - [`Session`]: One till's catalog, cart, fiscal day and order history
//! - [`PosError`]: Error types for rejected operations
//!
//! ## Example
//!
//! ```
//! use pos_core::{Catalog, PosConfig, ProductDraft, Session};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let mut catalog = Catalog::new();
//! let id = catalog
//!     .create(ProductDraft::new("Product 1", dec!(10.99), dec!(0.15)))
//!     .unwrap()
//!     .id()
//!     .clone();
//!
//! let mut session = Session::new(PosConfig::default(), catalog, Vec::new());
//! session.add_to_cart(&id, 2).unwrap();
//! assert_eq!(session.cart().total(), dec!(25.28));
//!
//! session.open_day();
//! let date = NaiveDate::from_ymd_opt(2023, 5, 6).unwrap();
//! let order = session.checkout("Cash", date).unwrap();
//! assert_eq!(order.total, dec!(25.28));
//! assert!(session.cart().is_empty());
//! ```
//!
//! ## Money
//!
//! Amounts are [`rust_decimal::Decimal`]s; line totals and tax are rounded
//! half-up to two places, so `total == subtotal + tax` holds exactly.

mod base;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod fiscal;
pub mod money;
pub mod order;
mod session;

pub use base::{LineId, OrderId, ProductId};
pub use cart::{Cart, CartTotals, OrderLine};
pub use catalog::{Catalog, Product, ProductDraft};
pub use config::PosConfig;
pub use error::{ConfigError, PosError};
pub use filter::{DateRange, FilterCriteria, Filterable, filter};
pub use fiscal::{DayState, FiscalDay};
pub use order::{Order, OrderStatus, SalesSummary};
pub use session::Session;
