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

//! Core identifier types for cart lines, products and orders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a line in the current cart.
///
/// Lines added from the catalog reuse the product identifier, which is what
/// makes re-adding the same product merge into one line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LineId(pub String);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LineId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<&ProductId> for LineId {
    fn from(id: &ProductId) -> Self {
        Self(id.0.clone())
    }
}

/// Unique identifier for a product in the catalog.
///
/// Never reused while the product exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// First counter value past every purely numeric id in `ids`.
///
/// Seeds the id generators of collections that start from an injected
/// snapshot, so fresh ids continue after the existing ones.
pub(crate) fn next_numeric_id<'a, I>(ids: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_numeric_id_starts_at_one() {
        assert_eq!(next_numeric_id(Vec::<&str>::new()), 1);
        assert_eq!(next_numeric_id(["abc", "x1"]), 1);
    }

    #[test]
    fn next_numeric_id_follows_largest() {
        assert_eq!(next_numeric_id(["3", "1001", "7"]), 1002);
    }

    #[test]
    fn line_id_from_product_id() {
        let product = ProductId::from("42");
        assert_eq!(LineId::from(&product), LineId::from("42"));
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&OrderId::from("1001")).unwrap(), "\"1001\"");
    }
}
