//! Product catalog snapshots.
//!
//! A cart line embeds the full product snapshot it was added with, so the
//! cart keeps rendering (and pricing) consistently even if the live catalog
//! changes or the menu is offline. Prices stay in their raw backend string
//! form here; see [`crate::pricing`] for the defensive numeric reduction.

use pepper_menu_core::{ExtraId, IngredientId, ProductId, Translations};
use serde::{Deserialize, Serialize};

/// One of a product's default ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub translations: Translations,
    /// Emoji or icon identifier shown next to the name.
    #[serde(default)]
    pub icon: Option<String>,
}

/// A purchasable extra (surcharge add-on) offered for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    pub id: ExtraId,
    pub translations: Translations,
    /// Raw backend price string, possibly formatted (e.g. `"1.50 €"`).
    pub price: String,
}

/// Immutable product snapshot embedded in a cart line.
///
/// The ingredient list is ordered; that order drives how customization
/// deltas are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    /// Raw backend price string, possibly formatted (e.g. `"12.50 €"`).
    pub price: String,
    pub translations: Translations,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub extras: Vec<Extra>,
}

impl ProductSnapshot {
    /// Ids of the product's default ingredients, in catalog order.
    pub fn default_ingredient_ids(&self) -> impl Iterator<Item = IngredientId> + '_ {
        self.ingredients.iter().map(|i| i.id)
    }

    /// Whether `id` is one of the product's default ingredients.
    #[must_use]
    pub fn has_ingredient(&self, id: IngredientId) -> bool {
        self.ingredients.iter().any(|i| i.id == id)
    }

    /// Look up an offered extra by id.
    #[must_use]
    pub fn extra(&self, id: ExtraId) -> Option<&Extra> {
        self.extras.iter().find(|e| e.id == id)
    }

    /// Whether `id` is an extra offered for this product.
    #[must_use]
    pub fn has_extra(&self, id: ExtraId) -> bool {
        self.extra(id).is_some()
    }
}
