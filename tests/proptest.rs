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

//! Property-based tests for the cart, filter and fiscal day.
//!
//! These tests verify invariants that should hold for any sequence of
//! operations.

use pos_core::{
    Cart, FilterCriteria, FiscalDay, LineId, Order, OrderLine, OrderStatus, PosConfig, filter,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a unit rate (0 to 1000 with up to 3 decimal places).
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000i64).prop_map(|mills| Decimal::new(mills, 3))
}

/// Generate a tax rate in `[0, 1]` with 4 decimal places.
fn arb_tax_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|bp| Decimal::new(bp, 4))
}

fn arb_lines() -> impl Strategy<Value = Vec<(i64, Decimal)>> {
    prop::collection::vec((0i64..100, arb_rate()), 0..20)
}

fn arb_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

fn arb_orders() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec((0u32..10_000, arb_status(), 1u32..=28), 0..30).prop_map(|rows| {
        rows.into_iter()
            .map(|(id, status, day)| {
                Order::from_parts(
                    &id.to_string(),
                    &format!("2023-05-{day:02}"),
                    status,
                    "Cash",
                    Decimal::ONE,
                )
            })
            .collect()
    })
}

fn cart_from(lines: &[(i64, Decimal)], tax_rate: Decimal) -> Cart {
    let mut cart = Cart::new(&PosConfig::new(tax_rate).unwrap());
    for (i, (quantity, rate)) in lines.iter().enumerate() {
        let line = OrderLine::new(i.to_string().as_str(), "item", *quantity, *rate).unwrap();
        cart.add_line(line).unwrap();
    }
    cart
}

// =============================================================================
// Cart Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Total equals subtotal plus tax exactly.
    #[test]
    fn total_is_subtotal_plus_tax(lines in arb_lines(), tax_rate in arb_tax_rate()) {
        let cart = cart_from(&lines, tax_rate);
        prop_assert_eq!(cart.total(), cart.subtotal() + cart.tax());
    }

    /// Subtotal does not depend on line order.
    #[test]
    fn subtotal_is_order_independent(lines in arb_lines(), tax_rate in arb_tax_rate()) {
        let forward = cart_from(&lines, tax_rate);
        let reversed: Vec<_> = lines.iter().rev().cloned().collect();
        let backward = cart_from(&reversed, tax_rate);
        prop_assert_eq!(forward.subtotal(), backward.subtotal());
        prop_assert_eq!(forward.total(), backward.total());
    }

    /// Displayed amounts never carry more than two decimal places.
    #[test]
    fn totals_have_currency_precision(lines in arb_lines(), tax_rate in arb_tax_rate()) {
        let totals = cart_from(&lines, tax_rate).totals();
        prop_assert!(totals.subtotal.scale() <= 2);
        prop_assert!(totals.tax.scale() <= 2);
        prop_assert!(totals.total.scale() <= 2);
    }

    /// Each delta clamps at zero before the next one applies.
    #[test]
    fn quantity_changes_clamp_per_step(
        start in 0i64..100,
        deltas in prop::collection::vec(-50i64..50, 0..20),
    ) {
        let mut cart = Cart::new(&PosConfig::default());
        cart.add_line(OrderLine::new("1", "item", start, Decimal::ONE).unwrap()).unwrap();
        let id = LineId::from("1");

        let mut expected = start;
        for delta in &deltas {
            expected = (expected + delta).max(0);
            let quantity = cart.change_quantity(&id, *delta).unwrap();
            prop_assert_eq!(i64::from(quantity), expected);
        }
    }

    /// Without negative deltas, repeated changes equal one summed change.
    #[test]
    fn non_negative_deltas_are_additive(
        start in 0i64..100,
        deltas in prop::collection::vec(0i64..50, 0..20),
    ) {
        let mut stepwise = Cart::new(&PosConfig::default());
        let mut summed = Cart::new(&PosConfig::default());
        stepwise.add_line(OrderLine::new("1", "item", start, Decimal::ONE).unwrap()).unwrap();
        summed.add_line(OrderLine::new("1", "item", start, Decimal::ONE).unwrap()).unwrap();
        let id = LineId::from("1");

        for delta in &deltas {
            stepwise.change_quantity(&id, *delta).unwrap();
        }
        summed.change_quantity(&id, deltas.iter().sum()).unwrap();

        prop_assert_eq!(stepwise.lines(), summed.lines());
    }
}

// =============================================================================
// Filter Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Empty criteria return every record in order.
    #[test]
    fn empty_criteria_is_identity(orders in arb_orders()) {
        let matched: Vec<Order> = filter(&orders, &FilterCriteria::new()).cloned().collect();
        prop_assert_eq!(matched, orders);
    }

    /// Matches are a subsequence of the input satisfying every predicate.
    #[test]
    fn filter_is_stable_and_sound(
        orders in arb_orders(),
        status in arb_status(),
        needle in "[0-9]{0,2}",
    ) {
        let criteria = FilterCriteria::search(needle.clone()).with_status(status);
        let matched: Vec<&Order> = filter(&orders, &criteria).collect();

        let expected: Vec<&Order> = orders
            .iter()
            .filter(|o| o.status == status && o.id.0.contains(needle.as_str()))
            .collect();
        prop_assert_eq!(matched, expected);
    }
}

// =============================================================================
// Fiscal Day Properties
// =============================================================================

proptest! {
    /// The day number counts completed open/close pairs.
    #[test]
    fn day_number_counts_closes(actions in prop::collection::vec(any::<bool>(), 0..50)) {
        let mut day = FiscalDay::new();
        let mut closes = 0u32;
        for open in actions {
            if open {
                day.open_day();
            } else if day.close_day() {
                closes += 1;
            }
        }
        prop_assert_eq!(day.day_number(), 1 + closes);
    }
}
