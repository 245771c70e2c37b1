//! Cart line items and cart reconciliation.
//!
//! A [`Cart`] is an ordered sequence of [`CartLine`]s keyed by product id. The
//! operations here are pure; persistence lives in the storefront crate's cart
//! store, which saves after every mutation.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId, Quantity};

/// One product/quantity pair in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line key.
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub name: String,
    /// Unit price at the time the product was added.
    pub price: Price,
    pub quantity: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartLine {
    /// Build a line for `quantity` units of a catalog product.
    #[must_use]
    pub fn from_product(product: &Product, quantity: Quantity) -> Self {
        Self {
            product_id: product.key(),
            sku: Some(product.sku.clone()),
            name: product.name.clone(),
            price: product.current_unit_price,
            quantity,
            image: product.image.clone(),
        }
    }

    /// Line subtotal (`price * quantity`).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * self.quantity
    }
}

/// Aggregate cart figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of all line quantities.
    pub total_quantity: u64,
    /// Sum of all line subtotals.
    pub total_amount: Price,
}

/// An ordered sequence of cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Merge `line` into the cart.
    ///
    /// If a line with the same product id exists its quantity grows by
    /// `line.quantity`; otherwise `line` is appended.
    pub fn add_or_merge(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|existing| existing.product_id == line.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
    }

    /// Adjust the matching line's quantity by `delta`, never below one.
    ///
    /// Returns `false` if no line matches. Lines are never removed here.
    pub fn change_quantity(&mut self, product_id: &ProductId, delta: i64) -> bool {
        match self
            .lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            Some(line) => {
                line.quantity = line.quantity.adjusted_by(delta);
                true
            }
            None => false,
        }
    }

    /// Drop the matching line. Returns `false` if no line matched.
    pub fn remove_line(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total quantity and amount across all lines.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            total_quantity: self
                .lines
                .iter()
                .map(|line| u64::from(line.quantity.get()))
                .sum(),
            total_amount: self.lines.iter().map(CartLine::subtotal).sum(),
        }
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_or_merge(line);
        }
        cart
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
