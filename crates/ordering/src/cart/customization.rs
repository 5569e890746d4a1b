//! Per-line customization and its canonical signature.
//!
//! Whether two cart additions are "the same" is decided by value, not by
//! object shape: the signature sorts and dedups the selected id sets and
//! trims the free-text notes, so any two customizations that mean the same
//! thing compare equal.

use pepper_menu_core::{ExtraId, IngredientId, ProductId};
use serde::{Deserialize, Serialize};

/// A customer's customization of one cart line.
///
/// `selected_ingredients` must be a subset of the product's default
/// ingredient ids; [`crate::cart::CartStore::add_item`] enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Customization {
    #[serde(default)]
    pub selected_ingredients: Vec<IngredientId>,
    #[serde(default)]
    pub selected_extras: Vec<ExtraId>,
    /// Free-text instructions ("extra crispy", allergies, ...).
    #[serde(default)]
    pub notes: String,
}

impl Customization {
    /// Canonical signature: sorted ingredient ids, sorted extra ids,
    /// trimmed notes.
    #[must_use]
    pub fn signature(&self) -> CustomizationSignature {
        let mut ingredients = self.selected_ingredients.clone();
        ingredients.sort_unstable();
        ingredients.dedup();

        let mut extras = self.selected_extras.clone();
        extras.sort_unstable();
        extras.dedup();

        CustomizationSignature {
            ingredients,
            extras,
            notes: self.notes.trim().to_string(),
        }
    }

    /// The canonical form of this customization: id sets sorted and
    /// deduped, notes trimmed. The store normalizes on insert so each
    /// line's signature is computed once and stored state stays canonical.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let signature = self.signature();
        Self {
            selected_ingredients: signature.ingredients,
            selected_extras: signature.extras,
            notes: signature.notes,
        }
    }

    /// Whether this customization already is its own canonical form.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        *self == self.normalized()
    }
}

/// Canonical value deciding merge equality for customizations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomizationSignature {
    ingredients: Vec<IngredientId>,
    extras: Vec<ExtraId>,
    notes: String,
}

/// Identity key of a cart line: the product plus the canonical signature of
/// its customization. An uncustomized line is its own signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product: ProductId,
    pub customization: Option<CustomizationSignature>,
}

impl LineKey {
    /// Compute the identity key for a (product, customization) pair.
    #[must_use]
    pub fn of(product: ProductId, customization: Option<&Customization>) -> Self {
        Self {
            product,
            customization: customization.map(Customization::signature),
        }
    }
}
