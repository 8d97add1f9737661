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

//! Cashier session.
//!
//! The [`Session`] is the central component the screens talk to. It owns the
//! product catalog, the cart being built, the fiscal day and the order
//! history of one till, all injected at construction.
//!
//! # Operations
//!
//! - **Cart**: add catalog products, change quantities, check out.
//! - **Fiscal day**: open and close the trading day; checkout requires an
//!   open day.
//! - **Queries**: filter orders, search products, home screen summary.

use crate::base::{self, LineId, OrderId, ProductId};
use crate::cart::{Cart, OrderLine};
use crate::catalog::{Catalog, Product};
use crate::config::PosConfig;
use crate::error::PosError;
use crate::filter::{self, FilterCriteria};
use crate::fiscal::FiscalDay;
use crate::order::{self, Order, SalesSummary};
use chrono::NaiveDate;
use tracing::{info, warn};

/// State of one cashier session.
///
/// # Invariants
///
/// - Checkout only happens while the fiscal day is open.
/// - Generated order ids never repeat an id already in the history.
#[derive(Debug, Clone)]
pub struct Session {
    config: PosConfig,
    catalog: Catalog,
    cart: Cart,
    fiscal_day: FiscalDay,
    orders: Vec<Order>,
    next_order_id: u64,
}

impl Session {
    /// Creates a session over an existing catalog and order history.
    pub fn new(config: PosConfig, catalog: Catalog, orders: Vec<Order>) -> Self {
        let next_order_id = base::next_numeric_id(orders.iter().map(|o| o.id.0.as_str()));
        Self {
            config,
            cart: Cart::new(&config),
            catalog,
            fiscal_day: FiscalDay::new(),
            orders,
            next_order_id,
        }
    }

    /// Replaces the fiscal day, e.g. with one restored from a back-end.
    pub fn with_fiscal_day(mut self, fiscal_day: FiscalDay) -> Self {
        self.fiscal_day = fiscal_day;
        self
    }

    pub fn config(&self) -> &PosConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn fiscal_day(&self) -> &FiscalDay {
        &self.fiscal_day
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Adds `quantity` units of a catalog product at its current price.
    ///
    /// # Errors
    ///
    /// - [`PosError::NotFound`] - no product has `product_id`.
    /// - [`PosError::InvalidQuantity`] - `quantity` is negative.
    /// - [`PosError::AmountOverflow`] - the cart totals would not fit a `Decimal`.
    pub fn add_to_cart(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<&OrderLine, PosError> {
        let product = self.catalog.get(product_id).ok_or_else(|| {
            warn!(product = %product_id, "add to cart of unknown product");
            PosError::NotFound
        })?;
        self.cart.add_item(product, quantity)
    }

    /// See [`Cart::change_quantity`].
    pub fn change_quantity(&mut self, line_id: &LineId, delta: i64) -> Result<u32, PosError> {
        self.cart.change_quantity(line_id, delta)
    }

    /// Completes the current cart as an order dated `date`.
    ///
    /// # Errors
    ///
    /// - [`PosError::DayClosed`] - the fiscal day is not open.
    /// - [`PosError::EmptyCart`] - nothing billable in the cart.
    ///
    /// The cart is left untouched on error.
    pub fn checkout(
        &mut self,
        payment_method: &str,
        date: NaiveDate,
    ) -> Result<&Order, PosError> {
        self.fiscal_day.ensure_open().inspect_err(|_| {
            warn!(day = self.fiscal_day.day_number(), "checkout while fiscal day is closed");
        })?;
        let id = self.peek_order_id();
        let order = self.cart.checkout(id, date, payment_method)?;
        self.next_order_id = self.next_order_id.saturating_add(1);
        info!(order = %order.id, total = %order.total, day = self.fiscal_day.day_number(), "order completed");
        self.orders.push(order);
        Ok(&self.orders[self.orders.len() - 1])
    }

    /// See [`FiscalDay::open_day`].
    pub fn open_day(&mut self) -> bool {
        self.fiscal_day.open_day()
    }

    /// See [`FiscalDay::close_day`].
    pub fn close_day(&mut self) -> bool {
        self.fiscal_day.close_day()
    }

    pub fn filter_orders<'a>(
        &'a self,
        criteria: &FilterCriteria,
    ) -> impl Iterator<Item = &'a Order> + use<'a> {
        filter::filter(&self.orders, criteria)
    }

    pub fn search_products<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a Product> + use<'a> {
        self.catalog.search(text)
    }

    /// Last `count` orders, newest first.
    pub fn recent_orders(&self, count: usize) -> impl Iterator<Item = &Order> {
        order::recent(&self.orders, count)
    }

    /// Sales figures over the order history.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::AmountOverflow`] if total sales do not fit a
    /// `Decimal`.
    pub fn summary(&self) -> Result<SalesSummary, PosError> {
        SalesSummary::new(&self.orders, self.catalog.len())
    }

    /// Next unused order id, without consuming it.
    fn peek_order_id(&mut self) -> OrderId {
        loop {
            let candidate = OrderId(self.next_order_id.to_string());
            if !self.orders.iter().any(|o| o.id == candidate) {
                return candidate;
            }
            self.next_order_id = self.next_order_id.saturating_add(1);
        }
    }
}
