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

//! Cart engine.
//!
//! A [`Cart`] owns the order lines of the transaction being built at the
//! till. Totals are derived from the lines on every call, never cached.
//!
//! # Totals
//!
//! ```text
//! line total = round2(quantity * unit rate)
//! subtotal   = sum of line totals
//! tax        = round2(subtotal * tax rate)
//! total      = subtotal + tax
//! ```
//!
//! # Example
//!
//! ```
//! use pos_core::{Cart, OrderLine, PosConfig};
//! use rust_decimal_macros::dec;
//!
//! let mut cart = Cart::new(&PosConfig::default());
//! cart.add_line(OrderLine::new("1", "Item 1", 2, dec!(10.99)).unwrap()).unwrap();
//! cart.add_line(OrderLine::new("2", "Item 2", 1, dec!(15.99)).unwrap()).unwrap();
//!
//! let totals = cart.totals();
//! assert_eq!(totals.subtotal, dec!(37.97));
//! assert_eq!(totals.tax, dec!(5.70));
//! assert_eq!(totals.total, dec!(43.67));
//! ```

use crate::base::{LineId, OrderId};
use crate::catalog::Product;
use crate::config::PosConfig;
use crate::error::PosError;
use crate::filter::{self, FilterCriteria, Filterable};
use crate::money;
use crate::order::{Order, OrderStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

/// One product-quantity entry of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    id: LineId,
    name: String,
    quantity: u32,
    unit_rate: Decimal,
}

impl OrderLine {
    /// Creates a line.
    ///
    /// # Errors
    ///
    /// - [`PosError::InvalidQuantity`] - `quantity` is negative.
    /// - [`PosError::InvalidPrice`] - `unit_rate` is negative.
    /// - [`PosError::AmountOverflow`] - the line total does not fit a `Decimal`.
    pub fn new(
        id: impl Into<LineId>,
        name: impl Into<String>,
        quantity: i64,
        unit_rate: Decimal,
    ) -> Result<Self, PosError> {
        if unit_rate < Decimal::ZERO {
            return Err(PosError::InvalidPrice);
        }
        let quantity = checked_quantity(quantity)?;
        money::line_total(quantity, unit_rate)?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            quantity,
            unit_rate,
        })
    }

    /// Creates a line for `product` priced at its current catalog price.
    pub fn from_product(product: &Product, quantity: i64) -> Result<Self, PosError> {
        Self::new(product.id(), product.name(), quantity, product.price())
    }

    pub fn id(&self) -> &LineId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_rate(&self) -> Decimal {
        self.unit_rate
    }

    /// Returns `round2(quantity * unit_rate)`.
    pub fn total(&self) -> Decimal {
        // Checked in `new` and `with_quantity`.
        money::line_total(self.quantity, self.unit_rate).expect("line total fits a Decimal")
    }

    /// Quantity after applying `delta`, floored at zero.
    fn quantity_after(&self, delta: i64) -> u32 {
        let next = i64::from(self.quantity).saturating_add(delta);
        u32::try_from(next.max(0)).unwrap_or(u32::MAX)
    }

    /// Copy of this line holding `quantity` units.
    fn with_quantity(&self, quantity: u32) -> Result<Self, PosError> {
        money::line_total(quantity, self.unit_rate)?;
        Ok(Self {
            quantity,
            ..self.clone()
        })
    }
}

impl Filterable for OrderLine {
    fn search_key(&self) -> &str {
        &self.name
    }
}

/// Derived amounts of a cart, rounded to currency precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// The in-progress transaction.
///
/// # Invariants
///
/// - Line ids are unique: adding an id that is already present merges the
///   quantities into the existing line.
/// - Quantities never go below zero; deltas clamp instead of failing.
/// - Every line total, the subtotal, the tax and the total fit a `Decimal`.
///   A mutation that would break this fails with
///   [`PosError::AmountOverflow`] and leaves the cart unchanged.
/// - `total() == subtotal() + tax()` exactly.
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<OrderLine>,
    tax_rate: Decimal,
}

impl Cart {
    /// Creates an empty cart taxed at the configured rate.
    pub fn new(config: &PosConfig) -> Self {
        Self {
            lines: Vec::new(),
            tax_rate: config.tax_rate(),
        }
    }

    /// Adds `quantity` units of `product`.
    ///
    /// A product already in the cart is merged into its existing line; the
    /// line keeps the name and rate it was first added with.
    ///
    /// # Errors
    ///
    /// - [`PosError::InvalidQuantity`] - `quantity` is negative.
    /// - [`PosError::AmountOverflow`] - the merged line or the cart totals
    ///   would not fit a `Decimal`.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<&OrderLine, PosError> {
        let line = OrderLine::from_product(product, quantity).inspect_err(|e| {
            warn!(product = %product.id(), quantity, error = %e, "rejected add to cart");
        })?;
        self.add_line(line)
    }

    /// Adds a free-form line, merging by line id.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::AmountOverflow`] if the merged quantity exceeds
    /// `u32::MAX` or the cart totals would not fit a `Decimal`. The cart is
    /// left as is.
    pub fn add_line(&mut self, line: OrderLine) -> Result<&OrderLine, PosError> {
        let position = self.position(&line.id);
        let candidate = match position {
            Some(index) => {
                let existing = &self.lines[index];
                let quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(PosError::AmountOverflow)?;
                existing.with_quantity(quantity)?
            }
            None => line,
        };
        self.check_totals_with(position, &candidate)
            .inspect_err(|e| warn!(line = %candidate.id, error = %e, "rejected cart line"))?;

        let index = match position {
            Some(index) => {
                debug!(line = %candidate.id, quantity = candidate.quantity, "merged into cart line");
                self.lines[index] = candidate;
                index
            }
            None => {
                debug!(line = %candidate.id, quantity = candidate.quantity, "added cart line");
                self.lines.push(candidate);
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[index])
    }

    /// Sets the line's quantity to `max(0, quantity + delta)` and returns it.
    ///
    /// # Errors
    ///
    /// - [`PosError::NotFound`] - no line has `id`.
    /// - [`PosError::AmountOverflow`] - the new quantity would push a total
    ///   past the `Decimal` range; the line keeps its quantity.
    pub fn change_quantity(&mut self, id: &LineId, delta: i64) -> Result<u32, PosError> {
        let Some(index) = self.position(id) else {
            warn!(line = %id, delta, "quantity change for unknown line");
            return Err(PosError::NotFound);
        };
        let line = &self.lines[index];
        let candidate = line
            .with_quantity(line.quantity_after(delta))
            .and_then(|candidate| {
                self.check_totals_with(Some(index), &candidate)?;
                Ok(candidate)
            })
            .inspect_err(|e| warn!(line = %id, delta, error = %e, "rejected quantity change"))?;

        debug!(line = %id, delta, quantity = candidate.quantity, "changed quantity");
        let quantity = candidate.quantity;
        self.lines[index] = candidate;
        Ok(quantity)
    }

    /// Removes a line.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::NotFound`] if no line has `id`; the cart is left as is.
    pub fn remove_line(&mut self, id: &LineId) -> Result<OrderLine, PosError> {
        let index = self.position(id).ok_or(PosError::NotFound)?;
        Ok(self.lines.remove(index))
    }

    /// Drops every zero-quantity line and returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| line.quantity > 0);
        before - self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn get(&self, id: &LineId) -> Option<&OrderLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Lines whose name contains `text`, ignoring case.
    pub fn search<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a OrderLine> + use<'a> {
        filter::filter(&self.lines, &FilterCriteria::search(text))
    }

    pub fn subtotal(&self) -> Decimal {
        self.totals().subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.totals().tax
    }

    pub fn total(&self) -> Decimal {
        self.totals().total
    }

    pub fn totals(&self) -> CartTotals {
        // Every mutation runs `check_totals_with` before it commits.
        compute_totals(&self.lines, self.tax_rate).expect("cart totals fit a Decimal")
    }

    /// Turns the cart into a completed order and empties it.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::EmptyCart`] if no line has a positive quantity.
    pub fn checkout(
        &mut self,
        id: OrderId,
        date: NaiveDate,
        payment_method: impl Into<String>,
    ) -> Result<Order, PosError> {
        if self.item_count() == 0 {
            return Err(PosError::EmptyCart);
        }
        let order = Order::new(
            id,
            date,
            OrderStatus::Completed,
            payment_method,
            self.total(),
        );
        debug!(order = %order.id, total = %order.total, "checked out cart");
        self.clear();
        Ok(order)
    }

    fn position(&self, id: &LineId) -> Option<usize> {
        self.lines.iter().position(|line| &line.id == id)
    }

    /// Totals the cart would have with `candidate` in place of the line at
    /// `replacing`, or appended when `replacing` is `None`.
    fn check_totals_with(
        &self,
        replacing: Option<usize>,
        candidate: &OrderLine,
    ) -> Result<CartTotals, PosError> {
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|&(index, _)| Some(index) != replacing)
            .map(|(_, line)| line);
        compute_totals(others.chain(std::iter::once(candidate)), self.tax_rate)
    }
}

fn compute_totals<'a, I>(lines: I, tax_rate: Decimal) -> Result<CartTotals, PosError>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let subtotal = money::sum(lines.into_iter().map(OrderLine::total))?;
    let tax = money::tax(subtotal, tax_rate)?;
    Ok(CartTotals {
        subtotal,
        tax,
        total: money::add(subtotal, tax)?,
    })
}

fn checked_quantity(quantity: i64) -> Result<u32, PosError> {
    u32::try_from(quantity).map_err(|_| PosError::InvalidQuantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new(&PosConfig::default());
        cart.add_line(OrderLine::new("1", "Item 1", 2, dec!(10.99)).unwrap())
            .unwrap();
        cart.add_line(OrderLine::new("2", "Item 2", 1, dec!(15.99)).unwrap())
            .unwrap();
        cart
    }

    #[test]
    fn line_rejects_negative_quantity() {
        let result = OrderLine::new("1", "Item", -1, dec!(1.00));
        assert_eq!(result, Err(PosError::InvalidQuantity));
    }

    #[test]
    fn line_rejects_negative_rate() {
        let result = OrderLine::new("1", "Item", 1, dec!(-1.00));
        assert_eq!(result, Err(PosError::InvalidPrice));
    }

    #[test]
    fn line_rejects_quantity_beyond_u32() {
        let result = OrderLine::new("1", "Item", i64::from(u32::MAX) + 1, dec!(1.00));
        assert_eq!(result, Err(PosError::InvalidQuantity));
    }

    #[test]
    fn line_rejects_total_beyond_decimal_range() {
        let result = OrderLine::new("1", "Big", 2, Decimal::MAX);
        assert_eq!(result, Err(PosError::AmountOverflow));

        let line = OrderLine::new("1", "Big", 1, Decimal::MAX).unwrap();
        assert_eq!(line.total(), Decimal::MAX);
    }

    #[test]
    fn quantity_after_floors_at_zero() {
        let line = OrderLine::new("1", "Item", 1, dec!(1.00)).unwrap();
        assert_eq!(line.quantity_after(-5), 0);
        assert_eq!(line.quantity_after(2), 3);
    }

    #[test]
    fn quantity_after_saturates_at_ceiling() {
        let line = OrderLine::new("1", "Item", i64::from(u32::MAX), dec!(1.00)).unwrap();
        assert_eq!(line.quantity_after(10), u32::MAX);
        assert_eq!(line.quantity_after(i64::MAX), u32::MAX);
        assert_eq!(line.quantity_after(i64::MIN), 0);
    }

    #[test]
    fn merge_beyond_u32_is_rejected() {
        let mut cart = Cart::new(&PosConfig::default());
        cart.add_line(OrderLine::new("1", "Item", i64::from(u32::MAX), dec!(0.01)).unwrap())
            .unwrap();

        let result = cart.add_line(OrderLine::new("1", "Item", 1, dec!(0.01)).unwrap());
        assert_eq!(result, Err(PosError::AmountOverflow));
        assert_eq!(cart.lines()[0].quantity(), u32::MAX);
    }

    #[test]
    fn sample_totals() {
        let cart = sample_cart();
        assert_eq!(cart.subtotal(), dec!(37.97));
        assert_eq!(cart.tax(), dec!(5.70));
        assert_eq!(cart.total(), dec!(43.67));
    }

    #[test]
    fn totals_agree_with_individual_accessors() {
        let cart = sample_cart();
        let totals = cart.totals();
        assert_eq!(totals.subtotal, cart.subtotal());
        assert_eq!(totals.tax, cart.tax());
        assert_eq!(totals.total, cart.total());
    }

    #[test]
    fn add_line_merges_same_id() {
        let mut cart = sample_cart();
        let merged = cart
            .add_line(OrderLine::new("1", "Renamed", 3, dec!(99.00)).unwrap())
            .unwrap();
        assert_eq!(merged.quantity(), 5);
        assert_eq!(merged.name(), "Item 1");
        assert_eq!(merged.unit_rate(), dec!(10.99));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn change_quantity_unknown_line() {
        let mut cart = sample_cart();
        let result = cart.change_quantity(&LineId::from("missing"), 1);
        assert_eq!(result, Err(PosError::NotFound));
    }

    #[test]
    fn zero_quantity_line_is_kept_until_pruned() {
        let mut cart = sample_cart();
        cart.change_quantity(&LineId::from("2"), -1).unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), dec!(21.98));

        assert_eq!(cart.prune(), 1);
        assert_eq!(cart.len(), 1);
        assert!(cart.get(&LineId::from("2")).is_none());
    }

    #[test]
    fn search_matches_names_case_insensitively() {
        let mut cart = sample_cart();
        cart.add_line(OrderLine::new("3", "Coffee", 1, dec!(2.50)).unwrap())
            .unwrap();

        let ids: Vec<_> = cart.search("item").map(|line| line.id().0.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let ids: Vec<_> = cart.search("COF").map(|line| line.id().0.as_str()).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn checkout_requires_billable_line() {
        let mut cart = Cart::new(&PosConfig::default());
        cart.add_line(OrderLine::new("1", "Item", 0, dec!(5.00)).unwrap())
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();

        let result = cart.checkout(OrderId::from("1"), date, "Cash");
        assert_eq!(result, Err(PosError::EmptyCart));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn checkout_produces_completed_order_and_clears() {
        let mut cart = sample_cart();
        let date = NaiveDate::from_ymd_opt(2023, 5, 6).unwrap();

        let order = cart.checkout(OrderId::from("1006"), date, "Cash").unwrap();

        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.total, dec!(43.67));
        assert_eq!(order.date, "2023-05-06");
        assert!(cart.is_empty());
    }

    #[test]
    fn totals_serialize_as_strings() {
        let json = serde_json::to_value(sample_cart().totals()).unwrap();
        assert_eq!(json["subtotal"], "37.97");
        assert_eq!(json["tax"], "5.70");
        assert_eq!(json["total"], "43.67");
    }
}
