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

//! Engine configuration.
//!
//! The tax rate is supplied from outside instead of being embedded in the
//! cart code. [`PosConfig::from_env`] reads it from `POS_TAX_RATE`.

use crate::error::{ConfigError, PosError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Environment variable holding the sales tax rate as a decimal fraction.
pub const TAX_RATE_VAR: &str = "POS_TAX_RATE";

/// Settings injected into the cart and session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PosConfig {
    tax_rate: Decimal,
}

impl PosConfig {
    /// Sales tax applied when nothing else is configured.
    pub const DEFAULT_TAX_RATE: Decimal = dec!(0.15);

    /// Creates a configuration with the given tax rate.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidTaxRate`] unless `0 <= tax_rate <= 1`.
    pub fn new(tax_rate: Decimal) -> Result<Self, PosError> {
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
            return Err(PosError::InvalidTaxRate);
        }
        Ok(Self { tax_rate })
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Loads the configuration from the process environment.
    ///
    /// An unset `POS_TAX_RATE` falls back to [`Self::DEFAULT_TAX_RATE`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the variable is not a decimal
    /// in `[0, 1]`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(TAX_RATE_VAR) else {
            return Ok(Self::default());
        };

        let invalid = |reason: String| ConfigError::InvalidEnvVar(TAX_RATE_VAR.to_string(), reason);
        let tax_rate = raw
            .trim()
            .parse::<Decimal>()
            .map_err(|e| invalid(e.to_string()))?;
        Self::new(tax_rate).map_err(|e| invalid(e.to_string()))
    }
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            tax_rate: Self::DEFAULT_TAX_RATE,
        }
    }
}
