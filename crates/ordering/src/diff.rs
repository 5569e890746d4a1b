//! Customization diffing: the "interesting" deltas of a cart line.
//!
//! The order document must stay quiet for the common case of an
//! uncustomized product, so a selection equal to the product's full default
//! ingredient set reports nothing. Only when the customer actually deviated
//! does the diff carry content. Pure computation, deterministic, no I/O.

use std::collections::HashSet;

use pepper_menu_core::{IngredientId, TextField, Translations};

use crate::cart::Customization;
use crate::catalog::{Extra, ProductSnapshot};

/// The reportable deltas of one line's customization.
///
/// Both name lists follow the product's default ingredient ordering.
/// `removed_ingredient_names` is what the customer deselected; the kitchen
/// reads `remaining_ingredient_names` ("make it with these") on the printed
/// order, and it is only worth printing when something was removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomizationDiff<'a> {
    pub removed_ingredient_names: Vec<String>,
    pub remaining_ingredient_names: Vec<String>,
    pub selected_extras: Vec<&'a Extra>,
    /// Trimmed free-text notes, empty if none.
    pub notes: &'a str,
}

impl CustomizationDiff<'_> {
    /// Whether there is anything at all to report for this line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed_ingredient_names.is_empty()
            && self.selected_extras.is_empty()
            && self.notes.is_empty()
    }
}

/// Compare a line's customization against the product's defaults.
///
/// An absent customization reports nothing. A selection equal to the full
/// default set reports no ingredient delta; that rule only ever fires when
/// the default set is non-empty, since a product without default
/// ingredients has nothing to deselect.
pub fn diff_customization<'a, F>(
    product: &'a ProductSnapshot,
    customization: Option<&'a Customization>,
    translate: &F,
) -> CustomizationDiff<'a>
where
    F: Fn(&Translations, TextField) -> String,
{
    let Some(customization) = customization else {
        return CustomizationDiff::default();
    };

    let selected: HashSet<IngredientId> =
        customization.selected_ingredients.iter().copied().collect();

    let mut removed = Vec::new();
    let mut remaining = Vec::new();
    for ingredient in &product.ingredients {
        let name = translate(&ingredient.translations, TextField::Name);
        if selected.contains(&ingredient.id) {
            remaining.push(name);
        } else {
            removed.push(name);
        }
    }

    let selected_extras = customization
        .selected_extras
        .iter()
        .filter_map(|id| product.extra(*id))
        .collect();

    CustomizationDiff {
        removed_ingredient_names: removed,
        remaining_ingredient_names: remaining,
        selected_extras,
        notes: customization.notes.trim(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pepper_menu_core::{ExtraId, Language, ProductId};

    use super::*;
    use crate::catalog::Ingredient;

    fn translate(translations: &Translations, field: TextField) -> String {
        translations.resolve(Language::Es, field).to_string()
    }

    fn margherita() -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(1),
            price: "12.50".to_string(),
            translations: Translations::named("Pizza Margherita", "Margherita Pizza"),
            ingredients: vec![
                Ingredient {
                    id: IngredientId::new(1),
                    translations: Translations::named("Tomate", "Tomato"),
                    icon: None,
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

    fn selection(ids: &[i32]) -> Customization {
        Customization {
            selected_ingredients: ids.iter().copied().map(IngredientId::new).collect(),
            ..Customization::default()
        }
    }

    #[test]
    fn test_absent_customization_is_empty() {
        let product = margherita();
        let diff = diff_customization(&product, None, &translate);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_full_selection_reports_nothing() {
        let product = margherita();
        let full = selection(&[1, 2, 3]);
        let diff = diff_customization(&product, Some(&full), &translate);
        assert!(diff.is_empty());
        assert!(diff.removed_ingredient_names.is_empty());
    }

    #[test]
    fn test_strict_subset_reports_complement_in_default_order() {
        let product = margherita();
        // selected out of order; output must follow the product's ordering
        let partial = selection(&[3, 1]);
        let diff = diff_customization(&product, Some(&partial), &translate);

        assert_eq!(diff.removed_ingredient_names, vec!["Queso"]);
        assert_eq!(diff.remaining_ingredient_names, vec!["Tomate", "Albahaca"]);
    }

    #[test]
    fn test_empty_default_set_never_reports_ingredients() {
        let mut product = margherita();
        product.ingredients.clear();
        let empty_selection = selection(&[]);
        let diff = diff_customization(&product, Some(&empty_selection), &translate);
        assert!(diff.removed_ingredient_names.is_empty());
        assert!(diff.remaining_ingredient_names.is_empty());
    }

    #[test]
    fn test_extras_and_notes_reported() {
        let product = margherita();
        let customization = Customization {
            selected_ingredients: vec![
                IngredientId::new(1),
                IngredientId::new(2),
                IngredientId::new(3),
            ],
            selected_extras: vec![ExtraId::new(10)],
            notes: "  bien hecha ".to_string(),
        };
        let diff = diff_customization(&product, Some(&customization), &translate);

        assert!(!diff.is_empty());
        assert_eq!(diff.selected_extras.len(), 1);
        assert_eq!(diff.notes, "bien hecha");
    }

    #[test]
    fn test_determinism() {
        let product = margherita();
        let partial = selection(&[1, 2]);
        let first = diff_customization(&product, Some(&partial), &translate);
        let second = diff_customization(&product, Some(&partial), &translate);
        assert_eq!(first, second);
    }
}
