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

//! Exact money arithmetic.
//!
//! All amounts are [`Decimal`]s, so sums over many lines never drift the way
//! binary floating point does. Rounding happens at two points only: each
//! line total and the tax amount are rounded half-up to
//! [`CURRENCY_PRECISION`] places. Sums of already-rounded amounts are exact.
//!
//! Every operation that can leave `Decimal`'s range is checked and reports
//! [`PosError::AmountOverflow`] instead of panicking.
//!
//! # Example
//!
//! ```
//! use pos_core::money;
//! use rust_decimal_macros::dec;
//!
//! assert_eq!(money::line_total(2, dec!(10.99)), Ok(dec!(21.98)));
//! assert_eq!(money::round2(dec!(5.6955)), dec!(5.70));
//! ```

use crate::error::PosError;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for currency amounts.
pub const CURRENCY_PRECISION: u32 = 2;

/// Rounds to two decimal places, midpoints away from zero.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// `round2(quantity * unit_rate)`.
pub fn line_total(quantity: u32, unit_rate: Decimal) -> Result<Decimal, PosError> {
    Decimal::from(quantity)
        .checked_mul(unit_rate)
        .map(round2)
        .ok_or(PosError::AmountOverflow)
}

/// `a + b`.
pub fn add(a: Decimal, b: Decimal) -> Result<Decimal, PosError> {
    a.checked_add(b).ok_or(PosError::AmountOverflow)
}

/// Sums amounts exactly.
pub fn sum<I>(amounts: I) -> Result<Decimal, PosError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, add)
}

/// Tax owed on `subtotal` at `rate`, rounded to currency precision.
pub fn tax(subtotal: Decimal, rate: Decimal) -> Result<Decimal, PosError> {
    subtotal
        .checked_mul(rate)
        .map(round2)
        .ok_or(PosError::AmountOverflow)
}

/// Formats an amount with exactly two decimal places, e.g. `43.67`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round2(amount))
}
