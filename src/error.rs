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

//! Error types for cart, catalog and filter operations.
//!
//! Every error is recoverable at the call site: a failed mutation leaves
//! the state it targeted untouched.

use thiserror::Error;

/// Errors raised by the transaction and filtering core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PosError {
    /// Quantity is negative
    #[error("invalid quantity (must not be negative)")]
    InvalidQuantity,

    /// Price or unit rate is negative
    #[error("invalid price (must not be negative)")]
    InvalidPrice,

    /// Tax rate lies outside `[0, 1]`
    #[error("invalid tax rate (must be between 0 and 1)")]
    InvalidTaxRate,

    /// Product name is blank
    #[error("product name must not be empty")]
    InvalidName,

    /// Referenced cart line or catalog record does not exist
    #[error("record not found")]
    NotFound,

    /// Identifier already present in the collection
    #[error("duplicate identifier")]
    DuplicateId,

    /// Date value could not be parsed as `YYYY-MM-DD`
    #[error("malformed date: {0:?}")]
    MalformedDate(String),

    /// Amount does not fit the decimal range
    #[error("amount exceeds the representable range")]
    AmountOverflow,

    /// Checkout attempted without any billable line
    #[error("cart has no billable lines")]
    EmptyCart,

    /// Fiscal action attempted while the trading day is closed
    #[error("fiscal day is closed")]
    DayClosed,
}

/// Configuration loading errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable is set but holds an unusable value
    #[error("invalid value for {0}: {1}")]
    InvalidEnvVar(String, String),
}
