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

//! Fiscal day lifecycle.
//!
//! Implemented State Machine
//!
//! ```text
//!  Closed (day N) ──open_day──► Open (day N) ──close_day──► Closed (day N + 1)
//! ```
//!
//! Calling a transition from the wrong state is a no-op: it logs a warning,
//! returns `false` and leaves both the state and the day number untouched.
//! The same holds for closing day `u32::MAX`, which has no successor.
//!
//! # Example
//!
//! ```
//! use pos_core::{DayState, FiscalDay};
//!
//! let mut day = FiscalDay::new();
//! assert!(day.open_day());
//! assert!(!day.open_day());
//! assert!(day.close_day());
//! assert_eq!(day.day_number(), 2);
//! assert_eq!(day.state(), DayState::Closed);
//! ```

use crate::error::PosError;
use serde::Serialize;
use tracing::{info, warn};

/// Whether trading is currently allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DayState {
    #[default]
    Closed,
    Open,
}

/// The current trading day.
///
/// # Invariants
///
/// - `day_number >= 1`.
/// - `day_number` grows by exactly one per `Open -> Closed` transition, so
///   the day numbered `u32::MAX` can never be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FiscalDay {
    day_number: u32,
    state: DayState,
}

impl FiscalDay {
    /// Day 1, closed.
    pub fn new() -> Self {
        Self {
            day_number: 1,
            state: DayState::Closed,
        }
    }

    /// Restores a previously recorded day. A `day_number` of zero becomes 1.
    pub fn resume(day_number: u32, state: DayState) -> Self {
        Self {
            day_number: day_number.max(1),
            state,
        }
    }

    pub fn day_number(&self) -> u32 {
        self.day_number
    }

    pub fn state(&self) -> DayState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DayState::Open
    }

    /// Whether the "open day" action is enabled.
    pub fn can_open(&self) -> bool {
        self.state == DayState::Closed
    }

    /// Whether the "close day" action is enabled.
    pub fn can_close(&self) -> bool {
        self.state == DayState::Open && self.day_number < u32::MAX
    }

    /// Opens the day. Returns `false` if it was already open.
    pub fn open_day(&mut self) -> bool {
        if !self.can_open() {
            warn!(day = self.day_number, "fiscal day already open");
            return false;
        }
        self.state = DayState::Open;
        info!(day = self.day_number, "fiscal day opened");
        true
    }

    /// Closes the day and advances the day counter. Returns `false` if it
    /// was already closed or the counter has no next day.
    pub fn close_day(&mut self) -> bool {
        if self.state != DayState::Open {
            warn!(day = self.day_number, "fiscal day already closed");
            return false;
        }
        let Some(next) = self.day_number.checked_add(1) else {
            warn!(day = self.day_number, "fiscal day counter exhausted");
            return false;
        };
        info!(day = self.day_number, "fiscal day closed");
        self.state = DayState::Closed;
        self.day_number = next;
        true
    }

    /// Fails with [`PosError::DayClosed`] unless the day is open.
    pub fn ensure_open(&self) -> Result<(), PosError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(PosError::DayClosed)
        }
    }
}

impl Default for FiscalDay {
    fn default() -> Self {
        Self::new()
    }
}
