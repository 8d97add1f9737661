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

//! Completed order records and the sales summary built from them.
//!
//! Orders are read-only once created. The date is kept as the raw string
//! the order arrived with and parsed on demand, so a bad value only affects
//! date filtering of that one record.

use crate::base::OrderId;
use crate::error::PosError;
use crate::filter::{self, DATE_FORMAT, Filterable};
use crate::money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Completed,
    Processing,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [Self; 4] = [
        Self::Completed,
        Self::Processing,
        Self::Shipped,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// A completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
    pub status: OrderStatus,
    pub payment_method: String,
    pub total: Decimal,
}

impl Order {
    pub fn new(
        id: OrderId,
        date: NaiveDate,
        status: OrderStatus,
        payment_method: impl Into<String>,
        total: Decimal,
    ) -> Self {
        Self {
            id,
            date: date.format(DATE_FORMAT).to_string(),
            status,
            payment_method: payment_method.into(),
            total,
        }
    }

    /// Builds an order from raw values as supplied by a data source.
    pub fn from_parts(
        id: &str,
        date: &str,
        status: OrderStatus,
        payment_method: &str,
        total: Decimal,
    ) -> Self {
        Self {
            id: OrderId::from(id),
            date: date.to_string(),
            status,
            payment_method: payment_method.to_string(),
            total,
        }
    }

    /// Parses the order date.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::MalformedDate`] if the stored date is not `YYYY-MM-DD`.
    pub fn date(&self) -> Result<NaiveDate, PosError> {
        filter::parse_date(&self.date)
    }
}

impl Filterable for Order {
    fn search_key(&self) -> &str {
        &self.id.0
    }

    fn status(&self) -> Option<OrderStatus> {
        Some(self.status)
    }

    fn date(&self) -> Option<Result<NaiveDate, PosError>> {
        Some(Order::date(self))
    }
}

/// Headline figures for the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    /// Sum of totals over orders that were not cancelled.
    pub sales: Decimal,
    pub orders: usize,
    pub products: usize,
}

impl SalesSummary {
    /// # Errors
    ///
    /// Returns [`PosError::AmountOverflow`] if the sales figure does not fit
    /// a `Decimal`.
    pub fn new(orders: &[Order], products: usize) -> Result<Self, PosError> {
        let sales = money::sum(
            orders
                .iter()
                .filter(|order| order.status != OrderStatus::Cancelled)
                .map(|order| order.total),
        )?;
        Ok(Self {
            sales: money::round2(sales),
            orders: orders.len(),
            products,
        })
    }
}

/// The last `count` orders, newest first.
pub fn recent(orders: &[Order], count: usize) -> impl Iterator<Item = &Order> {
    orders.iter().rev().take(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_orders() -> Vec<Order> {
        vec![
            Order::from_parts("1001", "2023-05-01", OrderStatus::Completed, "Credit Card", dec!(199.99)),
            Order::from_parts("1002", "2023-05-02", OrderStatus::Processing, "PayPal", dec!(149.50)),
            Order::from_parts("1003", "2023-05-03", OrderStatus::Shipped, "Cash", dec!(299.99)),
            Order::from_parts("1004", "2023-05-04", OrderStatus::Cancelled, "Credit Card", dec!(89.99)),
            Order::from_parts("1005", "2023-05-05", OrderStatus::Completed, "EcoCash", dec!(249.99)),
        ]
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert_eq!(" SHIPPED ".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert_eq!(
            "Pending".parse::<OrderStatus>(),
            Err("invalid order status: Pending".to_string())
        );
    }

    #[test]
    fn status_display_matches_serde_name() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn new_formats_date() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 6).unwrap();
        let order = Order::new(OrderId::from("1"), date, OrderStatus::Completed, "Cash", dec!(1));
        assert_eq!(order.date, "2023-05-06");
        assert_eq!(order.date(), Ok(date));
    }

    #[test]
    fn malformed_date_is_reported() {
        let order = Order::from_parts("1", "May 1st", OrderStatus::Completed, "Cash", dec!(1));
        assert_eq!(order.date(), Err(PosError::MalformedDate("May 1st".to_string())));
    }

    #[test]
    fn summary_skips_cancelled_sales() {
        let summary = SalesSummary::new(&sample_orders(), 3).unwrap();
        assert_eq!(summary.sales, dec!(899.47));
        assert_eq!(summary.orders, 5);
        assert_eq!(summary.products, 3);
    }

    #[test]
    fn summary_reports_sales_beyond_decimal_range() {
        let orders = [
            Order::from_parts("1", "2023-05-01", OrderStatus::Completed, "Cash", Decimal::MAX),
            Order::from_parts("2", "2023-05-02", OrderStatus::Completed, "Cash", dec!(1)),
        ];
        assert_eq!(SalesSummary::new(&orders, 0), Err(PosError::AmountOverflow));
        assert_eq!(SalesSummary::new(&orders[..1], 0).unwrap().sales, Decimal::MAX);
    }

    #[test]
    fn summary_of_no_orders_is_zero() {
        let summary = SalesSummary::new(&[], 0).unwrap();
        assert_eq!(summary.sales, Decimal::ZERO);
        assert_eq!(summary.orders, 0);
    }

    #[test]
    fn recent_is_newest_first() {
        let orders = sample_orders();
        let ids: Vec<_> = recent(&orders, 3).map(|o| o.id.0.as_str()).collect();
        assert_eq!(ids, vec!["1005", "1004", "1003"]);
        assert_eq!(recent(&orders, 10).count(), 5);
    }

    #[test]
    fn order_serializes_total_as_string() {
        let order = Order::from_parts("1001", "2023-05-01", OrderStatus::Completed, "Cash", dec!(199.99));
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], "1001");
        assert_eq!(json["status"], "Completed");
        assert_eq!(json["total"], "199.99");
    }
}
