//! Cart lines and the cart store.
//!
//! The store owns the merge and quantity rules: additions that are the same
//! product with the same canonical customization signature collapse into one
//! line, any difference creates a new line, and a line whose quantity would
//! reach zero is removed instead of stored. Every mutation is followed by a
//! full-state write through the injected [`CartStorage`] port; on startup a
//! corrupt or stale snapshot silently resets to an empty cart.

pub mod customization;
pub mod storage;

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use pepper_menu_core::{ExtraId, IngredientId, ProductId};

use crate::catalog::ProductSnapshot;
use crate::pricing;

pub use customization::{Customization, CustomizationSignature, LineKey};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

/// One row in the cart: a product at a given quantity and customization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub line_id: Uuid,
    pub product: ProductSnapshot,
    pub quantity: u32,
    #[serde(default)]
    pub customization: Option<Customization>,
}

impl CartLine {
    /// The identity key deciding which additions merge into this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::of(self.product.id, self.customization.as_ref())
    }
}

/// Errors raised when mutating the cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Additions must carry a quantity of at least 1.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The customization selects an ingredient the product does not have.
    #[error("ingredient {ingredient} is not a default ingredient of product {product}")]
    UnknownIngredient {
        ingredient: IngredientId,
        product: ProductId,
    },

    /// The customization selects an extra the product does not offer.
    #[error("extra {extra} is not offered for product {product}")]
    UnknownExtra { extra: ExtraId, product: ProductId },
}

/// Client-local cart: an ordered sequence of lines plus a storage port.
///
/// Insertion order is preserved for display only. Mutations are expected to
/// be serialized by the caller's event dispatch; concurrent instances
/// sharing one storage backend race read-modify-write and the last write
/// wins (accepted at this application's scale).
#[derive(Debug)]
pub struct CartStore<S> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart, hydrating from storage.
    ///
    /// Any read, parse, or shape failure resets to an empty cart; a stale
    /// snapshot must never take the menu down.
    pub fn open(storage: S) -> Self {
        let lines = Self::hydrate(&storage);
        Self { lines, storage }
    }

    fn hydrate(storage: &S) -> Vec<CartLine> {
        let raw = match storage.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("failed to read persisted cart, starting empty: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<CartLine>>(&raw) {
            Ok(lines) if Self::is_valid_snapshot(&lines) => lines,
            Ok(_) => {
                warn!("persisted cart violates invariants, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!("failed to parse persisted cart, starting empty: {e}");
                Vec::new()
            }
        }
    }

    /// Shape validation for hydrated snapshots: positive quantities,
    /// customizations canonical and consistent with their product, and no
    /// two lines sharing an identity key.
    fn is_valid_snapshot(lines: &[CartLine]) -> bool {
        let mut keys = HashSet::new();
        lines.iter().all(|line| {
            line.quantity >= 1
                && line.customization.as_ref().is_none_or(|c| {
                    c.is_normalized()
                        && c.selected_ingredients
                            .iter()
                            .all(|id| line.product.has_ingredient(*id))
                        && c.selected_extras.iter().all(|id| line.product.has_extra(*id))
                })
                && keys.insert(line.key())
        })
    }

    /// Add a product to the cart, merging into an existing line when the
    /// identity key matches.
    ///
    /// Returns the id of the line that absorbed the addition.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the quantity is zero or the customization
    /// references ingredients/extras the product does not have.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
        customization: Option<Customization>,
    ) -> Result<Uuid, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if let Some(c) = &customization {
            for id in &c.selected_ingredients {
                if !product.has_ingredient(*id) {
                    return Err(CartError::UnknownIngredient {
                        ingredient: *id,
                        product: product.id,
                    });
                }
            }
            for id in &c.selected_extras {
                if !product.has_extra(*id) {
                    return Err(CartError::UnknownExtra {
                        extra: *id,
                        product: product.id,
                    });
                }
            }
        }

        let customization = customization.map(|c| c.normalized());
        let key = LineKey::of(product.id, customization.as_ref());

        let line_id = if let Some(line) = self.lines.iter_mut().find(|l| l.key() == key) {
            line.quantity = line.quantity.saturating_add(quantity);
            line.line_id
        } else {
            let line_id = Uuid::new_v4();
            self.lines.push(CartLine {
                line_id,
                product,
                quantity,
                customization,
            });
            line_id
        };

        debug!(%line_id, "cart line added");
        self.persist();
        Ok(line_id)
    }

    /// Remove a line entirely. Unknown ids are a no-op.
    pub fn remove_item(&mut self, line_id: Uuid) {
        self.lines.retain(|l| l.line_id != line_id);
        self.persist();
    }

    /// Set a line's quantity. Zero behaves as [`Self::remove_item`].
    pub fn set_quantity(&mut self, line_id: Uuid, quantity: u32) {
        if quantity == 0 {
            self.remove_item(line_id);
            return;
        }
        if let Some(line) = self.line_mut(line_id) {
            line.quantity = quantity;
        }
        self.persist();
    }

    /// Increase a line's quantity by one.
    pub fn increment(&mut self, line_id: Uuid) {
        if let Some(line) = self.line_mut(line_id) {
            line.quantity = line.quantity.saturating_add(1);
        }
        self.persist();
    }

    /// Decrease a line's quantity by one, removing the line at quantity 1.
    pub fn decrement(&mut self, line_id: Uuid) {
        let quantity = self
            .lines
            .iter()
            .find(|l| l.line_id == line_id)
            .map(|l| l.quantity);
        match quantity {
            Some(q) if q <= 1 => self.remove_item(line_id),
            Some(_) => {
                if let Some(line) = self.line_mut(line_id) {
                    line.quantity -= 1;
                }
                self.persist();
            }
            None => self.persist(),
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// All lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Full-precision cart total; see [`crate::pricing`].
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        pricing::cart_total(&self.lines)
    }

    /// Whether any line holds the given product, under any customization.
    #[must_use]
    pub fn contains_product(&self, product: ProductId) -> bool {
        self.lines.iter().any(|l| l.product.id == product)
    }

    /// Total quantity of the given product across all of its lines.
    #[must_use]
    pub fn product_quantity(&self, product: ProductId) -> u32 {
        self.lines
            .iter()
            .filter(|l| l.product.id == product)
            .map(|l| l.quantity)
            .sum()
    }

    fn line_mut(&mut self, line_id: Uuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.line_id == line_id)
    }

    /// Write the full state through the storage port. Write failures are
    /// logged and swallowed; the in-memory cart stays authoritative for the
    /// session.
    fn persist(&self) {
        let snapshot = match serde_json::to_string(&self.lines) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("failed to serialize cart snapshot: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.save(&snapshot) {
            warn!("failed to persist cart snapshot: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pepper_menu_core::Translations;

    use super::*;
    use crate::catalog::{Extra, Ingredient};

    fn margherita() -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(1),
            price: "12.50".to_string(),
            translations: Translations::named("Pizza Margherita", "Margherita Pizza"),
            ingredients: vec![
                Ingredient {
                    id: IngredientId::new(1),
                    translations: Translations::named("Tomate", "Tomato"),
                    icon: Some("🍅".to_string()),
                },
                Ingredient {
                    id: IngredientId::new(2),
                    translations: Translations::named("Queso", "Cheese"),
                    icon: None,
                },
                Ingredient {
                    id: IngredientId::new(3),
                    translations: Translations::named("Albahaca", "Basil"),
                    icon: None,
                },
            ],
            extras: vec![Extra {
                id: ExtraId::new(10),
                translations: Translations::named("Queso extra", "Extra cheese"),
                price: "1.50".to_string(),
            }],
        }
    }

    fn no_basil() -> Customization {
        Customization {
            selected_ingredients: vec![IngredientId::new(1), IngredientId::new(2)],
            ..Customization::default()
        }
    }

    fn empty_store() -> CartStore<MemoryStorage> {
        CartStore::open(MemoryStorage::new())
    }

    #[test]
    fn test_same_signature_merges() {
        let mut cart = empty_store();
        let first = cart.add_item(margherita(), 1, Some(no_basil())).unwrap();
        let second = cart
            .add_item(
                margherita(),
                2,
                // same meaning, different id order
                Some(Customization {
                    selected_ingredients: vec![IngredientId::new(2), IngredientId::new(1)],
                    ..Customization::default()
                }),
            )
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_different_customization_splits() {
        let mut cart = empty_store();
        cart.add_item(margherita(), 1, None).unwrap();
        cart.add_item(margherita(), 1, Some(no_basil())).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut cart = empty_store();
        assert_eq!(
            cart.add_item(margherita(), 0, None),
            Err(CartError::ZeroQuantity)
        );
    }

    #[test]
    fn test_unknown_ingredient_rejected() {
        let mut cart = empty_store();
        let result = cart.add_item(
            margherita(),
            1,
            Some(Customization {
                selected_ingredients: vec![IngredientId::new(99)],
                ..Customization::default()
            }),
        );
        assert!(matches!(result, Err(CartError::UnknownIngredient { .. })));
    }

    #[test]
    fn test_unknown_extra_rejected() {
        let mut cart = empty_store();
        let result = cart.add_item(
            margherita(),
            1,
            Some(Customization {
                selected_extras: vec![ExtraId::new(99)],
                ..Customization::default()
            }),
        );
        assert!(matches!(result, Err(CartError::UnknownExtra { .. })));
    }

    #[test]
    fn test_decrement_removes_last_item() {
        let mut cart = empty_store();
        let line_id = cart.add_item(margherita(), 1, None).unwrap();

        cart.decrement(line_id);

        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = empty_store();
        let line_id = cart.add_item(margherita(), 3, None).unwrap();

        cart.set_quantity(line_id, 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = empty_store();
        let line_id = cart.add_item(margherita(), 1, None).unwrap();

        cart.increment(line_id);
        cart.increment(line_id);
        cart.decrement(line_id);

        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_product_queries() {
        let mut cart = empty_store();
        cart.add_item(margherita(), 2, None).unwrap();
        cart.add_item(margherita(), 1, Some(no_basil())).unwrap();

        assert!(cart.contains_product(ProductId::new(1)));
        assert!(!cart.contains_product(ProductId::new(2)));
        assert_eq!(cart.product_quantity(ProductId::new(1)), 3);
    }

    #[test]
    fn test_persist_and_reload_roundtrip() {
        let mut cart = empty_store();
        cart.add_item(margherita(), 2, Some(no_basil())).unwrap();
        cart.add_item(margherita(), 1, None).unwrap();
        let saved_lines = cart.lines().to_vec();
        let snapshot = cart.storage.snapshot().unwrap();

        let reloaded = CartStore::open(MemoryStorage::seeded(&snapshot));
        assert_eq!(reloaded.lines(), saved_lines.as_slice());
    }

    #[test]
    fn test_corrupt_snapshot_resets_to_empty() {
        // truncated JSON
        let cart = CartStore::open(MemoryStorage::seeded("[{\"line_id\":\"not-a"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_invalid_shape_resets_to_empty() {
        let mut cart = empty_store();
        cart.add_item(margherita(), 1, None).unwrap();
        let mut lines = cart.lines().to_vec();
        if let Some(line) = lines.first_mut() {
            line.quantity = 0;
        }
        let snapshot = serde_json::to_string(&lines).unwrap();

        let reloaded = CartStore::open(MemoryStorage::seeded(&snapshot));
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_duplicate_keys_reset_to_empty() {
        let mut cart = empty_store();
        cart.add_item(margherita(), 1, None).unwrap();
        let mut lines = cart.lines().to_vec();
        let mut dup = lines[0].clone();
        dup.line_id = Uuid::new_v4();
        lines.push(dup);
        let snapshot = serde_json::to_string(&lines).unwrap();

        let reloaded = CartStore::open(MemoryStorage::seeded(&snapshot));
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage);
        let line_id = cart.add_item(margherita(), 1, None).unwrap();
        cart.increment(line_id);
        cart.clear();

        let reloaded: Vec<CartLine> =
            serde_json::from_str(&cart.storage.snapshot().unwrap()).unwrap();
        assert!(reloaded.is_empty());
    }
}
