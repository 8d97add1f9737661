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

//! Record filter engine.
//!
//! [`filter`] keeps the records that satisfy every active predicate of a
//! [`FilterCriteria`]:
//!
//! | Predicate | Passes when |
//! |-----------|-------------|
//! | search text | empty, or a case-insensitive substring of the record's search key |
//! | statuses | empty, or the record's status is in the set |
//! | date range | unbounded, or the record's date lies within the inclusive bounds |
//!
//! Filtering is lazy and stable: matches come out in input order. Records
//! whose date cannot be parsed are excluded from bounded ranges instead of
//! failing the whole filter.
//!
//! # Example
//!
//! ```
//! use pos_core::{filter, FilterCriteria, Order, OrderStatus};
//! use rust_decimal_macros::dec;
//!
//! let orders = vec![
//!     Order::from_parts("1001", "2023-05-01", OrderStatus::Completed, "Credit Card", dec!(199.99)),
//!     Order::from_parts("1002", "2023-05-02", OrderStatus::Processing, "PayPal", dec!(149.50)),
//! ];
//!
//! let criteria = FilterCriteria::new().with_status(OrderStatus::Completed);
//! let ids: Vec<_> = filter(&orders, &criteria).map(|o| o.id.to_string()).collect();
//! assert_eq!(ids, vec!["1001"]);
//! ```

use crate::error::PosError;
use crate::order::OrderStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// Date format accepted by [`parse_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns [`PosError::MalformedDate`] carrying the raw input.
pub fn parse_date(raw: &str) -> Result<NaiveDate, PosError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| PosError::MalformedDate(raw.to_string()))
}

/// A record the filter engine can match.
///
/// Only the search key is required; records without a status or a date
/// simply fail those predicates when they are active.
pub trait Filterable {
    /// Field matched by the search text (order id, product name, ...).
    fn search_key(&self) -> &str;

    fn status(&self) -> Option<OrderStatus> {
        None
    }

    /// `None` when the record carries no date at all.
    fn date(&self) -> Option<Result<NaiveDate, PosError>> {
        None
    }
}

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Builds a range from optional `YYYY-MM-DD` strings.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, PosError> {
        Ok(Self {
            start: start.map(parse_date).transpose()?,
            end: end.map(parse_date).transpose()?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Conjunction of search, status and date constraints.
///
/// The default value matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub statuses: HashSet<OrderStatus>,
    pub date_range: DateRange,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria with only a search text.
    pub fn search(text: impl Into<String>) -> Self {
        Self::new().with_search(text)
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Selects `status` if it was not selected, deselects it otherwise.
    ///
    /// Returns whether the status is selected afterwards.
    pub fn toggle_status(&mut self, status: OrderStatus) -> bool {
        if self.statuses.remove(&status) {
            false
        } else {
            self.statuses.insert(status);
            true
        }
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.statuses.is_empty() && self.date_range.is_unbounded()
    }

    /// Whether `record` satisfies every active predicate.
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        Matcher::new(self).matches(record)
    }
}

/// Criteria with the search text lowered once up front.
#[derive(Debug, Clone)]
struct Matcher {
    needle: String,
    statuses: HashSet<OrderStatus>,
    date_range: DateRange,
}

impl Matcher {
    fn new(criteria: &FilterCriteria) -> Self {
        Self {
            needle: criteria.search_text.to_lowercase(),
            statuses: criteria.statuses.clone(),
            date_range: criteria.date_range,
        }
    }

    fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.matches_search(record) && self.matches_status(record) && self.matches_date(record)
    }

    fn matches_search<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.needle.is_empty() || record.search_key().to_lowercase().contains(&self.needle)
    }

    fn matches_status<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        if self.statuses.is_empty() {
            return true;
        }
        record
            .status()
            .is_some_and(|status| self.statuses.contains(&status))
    }

    fn matches_date<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        if self.date_range.is_unbounded() {
            return true;
        }
        match record.date() {
            Some(Ok(date)) => self.date_range.contains(date),
            Some(Err(error)) => {
                trace!(record = record.search_key(), %error, "excluded by unreadable date");
                false
            }
            None => false,
        }
    }
}

/// Lazily yields the records matching `criteria`, in input order.
///
/// The returned iterator does not borrow `criteria`.
pub fn filter<'a, R: Filterable>(
    records: &'a [R],
    criteria: &FilterCriteria,
) -> impl Iterator<Item = &'a R> + use<'a, R> {
    let matcher = Matcher::new(criteria);
    records.iter().filter(move |record| matcher.matches(*record))
}
