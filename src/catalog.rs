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

//! Product catalog.
//!
//! The [`Catalog`] is the single source of truth for products. Readers see
//! the current snapshot through [`Catalog::products`]; every mutation either
//! applies in full or leaves the catalog unchanged.
//!
//! # Example
//!
//! ```
//! use pos_core::{Catalog, ProductDraft};
//! use rust_decimal_macros::dec;
//!
//! let mut catalog = Catalog::new();
//! let id = catalog
//!     .create(ProductDraft::new("Espresso", dec!(2.50), dec!(0.15)))
//!     .unwrap()
//!     .id()
//!     .clone();
//! assert_eq!(catalog.get(&id).unwrap().name(), "Espresso");
//!
//! catalog.delete(&id).unwrap();
//! assert!(catalog.delete(&id).is_err());
//! assert!(catalog.is_empty());
//! ```

use crate::base::{self, ProductId};
use crate::error::PosError;
use crate::filter::{self, FilterCriteria, Filterable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Product fields without an identifier, as entered on the product form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    /// Fraction in `[0, 1]`, e.g. `0.15` for 15%.
    pub tax_rate: Decimal,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: Decimal, tax_rate: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            tax_rate,
        }
    }

    fn validate(&self) -> Result<(), PosError> {
        if self.name.trim().is_empty() {
            return Err(PosError::InvalidName);
        }
        if self.price < Decimal::ZERO {
            return Err(PosError::InvalidPrice);
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(PosError::InvalidTaxRate);
        }
        Ok(())
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Decimal,
    tax_rate: Decimal,
}

impl Product {
    /// Creates a product with a caller-chosen id, e.g. when loading a snapshot.
    ///
    /// # Errors
    ///
    /// - [`PosError::InvalidName`] - blank name.
    /// - [`PosError::InvalidPrice`] - negative price.
    /// - [`PosError::InvalidTaxRate`] - tax rate outside `[0, 1]`.
    pub fn new(id: impl Into<ProductId>, draft: ProductDraft) -> Result<Self, PosError> {
        draft.validate()?;
        Ok(Self {
            id: id.into(),
            name: draft.name,
            price: draft.price,
            tax_rate: draft.tax_rate,
        })
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// The editable fields, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft::new(self.name.clone(), self.price, self.tax_rate)
    }
}

impl Filterable for Product {
    fn search_key(&self) -> &str {
        &self.name
    }
}

/// In-memory product collection in insertion order.
///
/// # Invariants
///
/// - Product ids are unique.
/// - A generated id is never one that is live in the catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    next_id: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            next_id: 1,
        }
    }

    /// Creates a catalog from an existing snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::DuplicateId`] if two products share an id.
    pub fn with_products(products: Vec<Product>) -> Result<Self, PosError> {
        let mut seen = HashSet::with_capacity(products.len());
        if !products.iter().all(|product| seen.insert(&product.id)) {
            return Err(PosError::DuplicateId);
        }
        let next_id = base::next_numeric_id(products.iter().map(|p| p.id.0.as_str()));
        Ok(Self { products, next_id })
    }

    /// Adds a product under a freshly generated id.
    pub fn create(&mut self, draft: ProductDraft) -> Result<&Product, PosError> {
        draft.validate().inspect_err(|e| {
            warn!(name = %draft.name, error = %e, "rejected new product");
        })?;
        let id = self.generate_id();
        let product = Product::new(id, draft)?;
        debug!(product = %product.id, "created product");
        self.products.push(product);
        Ok(&self.products[self.products.len() - 1])
    }

    /// Replaces every field of the product except its id.
    ///
    /// # Errors
    ///
    /// [`PosError::NotFound`] if absent, or a validation error from
    /// [`Product::new`]; the product is left as it was either way.
    pub fn update(&mut self, id: &ProductId, draft: ProductDraft) -> Result<&Product, PosError> {
        let Some(index) = self.position(id) else {
            warn!(product = %id, "update of unknown product");
            return Err(PosError::NotFound);
        };
        let updated = Product::new(id.clone(), draft).inspect_err(|e| {
            warn!(product = %id, error = %e, "rejected product update");
        })?;
        self.products[index] = updated;
        debug!(product = %id, "updated product");
        Ok(&self.products[index])
    }

    /// Removes the product and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::NotFound`] if absent; deleting twice is harmless.
    pub fn delete(&mut self, id: &ProductId) -> Result<Product, PosError> {
        let Some(index) = self.position(id) else {
            warn!(product = %id, "delete of unknown product");
            return Err(PosError::NotFound);
        };
        debug!(product = %id, "deleted product");
        Ok(self.products.remove(index))
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Current snapshot in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products whose name contains `text`, ignoring case.
    pub fn search<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a Product> + use<'a> {
        filter::filter(&self.products, &FilterCriteria::search(text))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn generate_id(&mut self) -> ProductId {
        loop {
            let candidate = ProductId(self.next_id.to_string());
            self.next_id = self.next_id.saturating_add(1);
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.products.iter().position(|product| &product.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
