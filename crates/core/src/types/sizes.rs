//! Per-size inventory for a product.
//!
//! A product's stock lives entirely in its [`SizeSet`]: an ordered list of
//! (size label, stock count) pairs. Aggregate stock and the in-stock flag
//! are always derived from the set, never stored independently, so the two
//! can never drift apart. All debits and credits go through this type.

use serde::{Deserialize, Serialize};

/// Errors from stock arithmetic on a [`SizeSet`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    /// The requested size label does not exist on this product.
    #[error("size {size} is not available")]
    UnknownSize {
        /// The label that was requested.
        size: String,
    },
    /// Not enough stock in the variant to cover the requested quantity.
    #[error("only {available} available for size {size}")]
    Insufficient {
        /// The label that was requested.
        size: String,
        /// Stock remaining in that variant.
        available: u32,
    },
}

/// A single size variant: label plus remaining stock.
///
/// The label is free-form ("9", "9.5", "M", "default") and compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariant {
    /// Size label, not necessarily numeric.
    pub size: String,
    /// Units remaining for this size.
    pub stock: u32,
}

impl SizeVariant {
    /// Create a variant.
    #[must_use]
    pub fn new(size: impl Into<String>, stock: u32) -> Self {
        Self {
            size: size.into(),
            stock,
        }
    }
}

/// Ordered, never-empty list of size variants.
///
/// Construction normalizes: an empty input collapses to a single synthetic
/// [`Self::DEFAULT_SIZE`] variant with zero stock, so downstream code never
/// branches on "sized vs. unsized" products. Serialized as a plain JSON
/// array; deserialization goes through the same normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SizeVariant>", into = "Vec<SizeVariant>")]
pub struct SizeSet(Vec<SizeVariant>);

impl SizeSet {
    /// Label of the synthetic variant a size-less product collapses to.
    pub const DEFAULT_SIZE: &'static str = "default";

    /// Build a set from a variant list, normalizing an empty list to one
    /// zero-stock [`Self::DEFAULT_SIZE`] variant.
    #[must_use]
    pub fn new(variants: Vec<SizeVariant>) -> Self {
        if variants.is_empty() {
            Self(vec![SizeVariant::new(Self::DEFAULT_SIZE, 0)])
        } else {
            Self(variants)
        }
    }

    /// The variants, in insertion order. Never empty.
    #[must_use]
    pub fn variants(&self) -> &[SizeVariant] {
        &self.0
    }

    /// Aggregate stock: the sum of all variant stocks.
    #[must_use]
    pub fn total_stock(&self) -> u32 {
        self.0.iter().map(|v| v.stock).sum()
    }

    /// Whether any variant has stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.total_stock() > 0
    }

    /// Stock remaining for a size label, or `None` if the label is unknown.
    ///
    /// Duplicate labels are tolerated; the first match wins, same as the
    /// mutation paths.
    #[must_use]
    pub fn stock_of(&self, size: &str) -> Option<u32> {
        self.0.iter().find(|v| v.size == size).map(|v| v.stock)
    }

    /// Subtract `quantity` from the named variant.
    ///
    /// # Errors
    ///
    /// [`StockError::UnknownSize`] if no variant carries the label;
    /// [`StockError::Insufficient`] if the variant holds less than
    /// `quantity`. On error the set is unchanged.
    pub fn debit(&mut self, size: &str, quantity: u32) -> Result<(), StockError> {
        let variant = self
            .0
            .iter_mut()
            .find(|v| v.size == size)
            .ok_or_else(|| StockError::UnknownSize {
                size: size.to_owned(),
            })?;

        if variant.stock < quantity {
            return Err(StockError::Insufficient {
                size: size.to_owned(),
                available: variant.stock,
            });
        }

        variant.stock -= quantity;
        Ok(())
    }

    /// Add `quantity` back to the named variant.
    ///
    /// An unknown label is a silent no-op: the product may have been edited
    /// between order placement and cancellation, and crediting must not fail
    /// the cancellation.
    pub fn credit(&mut self, size: &str, quantity: u32) {
        if let Some(variant) = self.0.iter_mut().find(|v| v.size == size) {
            variant.stock = variant.stock.saturating_add(quantity);
        }
    }
}

impl Default for SizeSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<SizeVariant>> for SizeSet {
    fn from(variants: Vec<SizeVariant>) -> Self {
        Self::new(variants)
    }
}

impl From<SizeSet> for Vec<SizeVariant> {
    fn from(set: SizeSet) -> Self {
        set.0
    }
}
