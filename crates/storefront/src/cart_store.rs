//! The persisted cart.
//!
//! [`CartStore`] owns a storage handle and an in-memory [`Cart`]. Every
//! mutator writes the cart back before returning. An empty cart is stored as
//! an absent key, never as `[]`.

use lavender_core::cart::{Cart, CartLine, CartTotals};
use lavender_core::{ProductId, Quantity};
use lavender_core::product::Product;
use tracing::{debug, warn};

use crate::storage::{SharedStorage, StorageError, keys};

/// Read the stored cart.
///
/// An absent key yields an empty cart. A value that does not parse as a line
/// item list is removed from storage and also yields an empty cart. Duplicate
/// lines are merged and the merged cart is written back.
///
/// # Errors
///
/// Returns `StorageError` only if the backend itself fails.
pub fn load(storage: &SharedStorage) -> Result<Cart, StorageError> {
    let Some(raw) = storage.get(keys::CART)? else {
        return Ok(Cart::new());
    };

    match serde_json::from_str::<Vec<CartLine>>(&raw) {
        Ok(lines) => {
            let stored = lines.len();
            let cart = Cart::from(lines);
            if cart.len() != stored {
                debug!(stored, merged = cart.len(), "Merged duplicate cart lines");
                save(storage, &cart)?;
            }
            Ok(cart)
        }
        Err(e) => {
            warn!(error = %e, "Stored cart is unreadable, discarding it");
            storage.remove(keys::CART)?;
            Ok(Cart::new())
        }
    }
}

/// Write `cart` to storage, removing the key when the cart is empty.
///
/// # Errors
///
/// Returns `StorageError` if the backend cannot be written.
pub fn save(storage: &SharedStorage, cart: &Cart) -> Result<(), StorageError> {
    if cart.is_empty() {
        storage.remove(keys::CART)
    } else {
        storage.set(keys::CART, &serde_json::to_string(cart)?)
    }
}

/// A cart bound to its storage.
#[derive(Debug, Clone)]
pub struct CartStore {
    storage: SharedStorage,
    cart: Cart,
}

impl CartStore {
    /// Load the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub fn open(storage: SharedStorage) -> Result<Self, StorageError> {
        let cart = load(&storage)?;
        debug!(lines = cart.len(), "Cart loaded");
        Ok(Self { storage, cart })
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Re-read the cart from storage, dropping unsaved state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.cart = load(&self.storage)?;
        Ok(())
    }

    /// Merge `quantity` units of `product` into the cart and save.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    pub fn add(&mut self, product: &Product, quantity: Quantity) -> Result<(), StorageError> {
        self.cart
            .add_or_merge(CartLine::from_product(product, quantity));
        self.save()
    }

    /// Adjust a line's quantity by `delta` (floored at 1) and save.
    ///
    /// Returns `false` if no line matched; nothing is written in that case.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    pub fn change_quantity(
        &mut self,
        product_id: &ProductId,
        delta: i64,
    ) -> Result<bool, StorageError> {
        if !self.cart.change_quantity(product_id, delta) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Remove a line and save.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<bool, StorageError> {
        if !self.cart.remove_line(product_id) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Empty the cart, which removes the stored key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be removed.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.save()
    }

    fn save(&self) -> Result<(), StorageError> {
        save(&self.storage, &self.cart)
    }
}
