//! Order composition: the backend payload and the outgoing order document.
//!
//! Both halves are pure over their inputs. The payload strips everything the
//! backend does not need to trust (no prices, no customization); the message
//! is a deterministic localized template whose total line reuses the exact
//! cart total [`crate::pricing`] computes, so what the customer saw on
//! screen and what the restaurant receives can never disagree.

use serde::{Deserialize, Serialize};

use pepper_menu_core::{format_eur, parse_amount, Language, OrderId, ProductId, TextField, Translations};

use crate::cart::CartLine;
use crate::delivery::{DeliveryInfo, DeliveryLocation};
use crate::diff::diff_customization;
use crate::pricing;

/// One payload item: product reference and quantity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemPayload {
    pub product: ProductId,
    pub quantity: u32,
}

/// The order submission body for `POST /orders/`.
///
/// Deliberately carries no pricing: the server is the source of truth for
/// billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPayload {
    pub delivery_street: String,
    pub delivery_house_number: String,
    pub delivery_location: DeliveryLocation,
    pub phone: String,
    pub notes: String,
    pub items: Vec<OrderItemPayload>,
}

/// Build the backend submission payload from validated delivery info and
/// the cart lines.
#[must_use]
pub fn order_payload(delivery: &DeliveryInfo, lines: &[CartLine]) -> OrderPayload {
    OrderPayload {
        delivery_street: delivery.street.clone(),
        delivery_house_number: delivery.house_number.clone(),
        delivery_location: delivery.location,
        phone: delivery.phone.clone(),
        notes: delivery.notes.clone(),
        items: lines
            .iter()
            .map(|line| OrderItemPayload {
                product: line.product.id,
                quantity: line.quantity,
            })
            .collect(),
    }
}

/// Everything the message generator needs, gathered by the caller.
#[derive(Debug, Clone)]
pub struct OrderDraft<'a> {
    pub lines: &'a [CartLine],
    pub delivery: &'a DeliveryInfo,
    pub customer_name: &'a str,
    /// Canonical id assigned by the backend, when persistence already
    /// succeeded.
    pub order_id: Option<OrderId>,
}

/// Divider between the header block and the order lines.
const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━";

struct MessageLabels {
    title: &'static str,
    customer: &'static str,
    phone: &'static str,
    delivery: &'static str,
    street: &'static str,
    house_number: &'static str,
    location: &'static str,
    notes: &'static str,
    order: &'static str,
    quantity: &'static str,
    unit_price: &'static str,
    ingredients: &'static str,
    extras: &'static str,
    extra_notes: &'static str,
    subtotal: &'static str,
    total: &'static str,
    unnamed_product: &'static str,
}

const ES: MessageLabels = MessageLabels {
    title: "🛒 *NUEVO PEDIDO*",
    customer: "👤 *Cliente:*",
    phone: "📱 *Teléfono:*",
    delivery: "📍 *Dirección de Entrega:*",
    street: "Calle",
    house_number: "Número",
    location: "Localidad",
    notes: "📝 *Notas:*",
    order: "🍕 *Pedido:*",
    quantity: "Cantidad",
    unit_price: "Precio unitario",
    ingredients: "Ingredientes",
    extras: "Extras",
    extra_notes: "Ingredientes adicionales",
    subtotal: "Subtotal",
    total: "💰 *TOTAL:*",
    unnamed_product: "Sin nombre",
};

const EN: MessageLabels = MessageLabels {
    title: "🛒 *NEW ORDER*",
    customer: "👤 *Customer:*",
    phone: "📱 *Phone:*",
    delivery: "📍 *Delivery Address:*",
    street: "Street",
    house_number: "House number",
    location: "City",
    notes: "📝 *Notes:*",
    order: "🍕 *Order:*",
    quantity: "Quantity",
    unit_price: "Unit price",
    ingredients: "Ingredients",
    extras: "Extras",
    extra_notes: "Additional ingredients",
    subtotal: "Subtotal",
    total: "💰 *TOTAL:*",
    unnamed_product: "Unnamed",
};

const fn labels(language: Language) -> &'static MessageLabels {
    match language {
        Language::Es => &ES,
        Language::En => &EN,
    }
}

/// Render the localized order document.
///
/// Fully deterministic: the same draft, language, and translation lookup
/// always produce the same text. Touches no network, no storage, no global
/// state.
pub fn generate_order_message<F>(draft: &OrderDraft<'_>, language: Language, translate: &F) -> String
where
    F: Fn(&Translations, TextField) -> String,
{
    let t = labels(language);
    let mut message = String::new();

    match draft.order_id {
        Some(id) => {
            // keep the closing asterisk of the bold span after the number
            let title = t.title.trim_end_matches('*');
            message.push_str(&format!("{title} #{id}*\n\n"));
        }
        None => message.push_str(&format!("{}\n\n", t.title)),
    }

    message.push_str(&format!("{} {}\n", t.customer, draft.customer_name));
    message.push_str(&format!("{} {}\n\n", t.phone, draft.delivery.phone));

    message.push_str(&format!("{}\n", t.delivery));
    message.push_str(&format!("{}: {}\n", t.street, draft.delivery.street));
    message.push_str(&format!(
        "{}: {}\n",
        t.house_number, draft.delivery.house_number
    ));
    message.push_str(&format!(
        "{}: {}\n",
        t.location,
        draft.delivery.location.display_name()
    ));

    if !draft.delivery.notes.is_empty() {
        message.push_str(&format!("\n{} {}\n", t.notes, draft.delivery.notes));
    }

    message.push_str(&format!("\n{}\n", t.order));
    message.push_str(DIVIDER);
    message.push('\n');

    for (index, line) in draft.lines.iter().enumerate() {
        let name = {
            let translated = translate(&line.product.translations, TextField::Name);
            if translated.is_empty() {
                t.unnamed_product.to_string()
            } else {
                translated
            }
        };

        message.push_str(&format!("{}. *{name}*\n", index + 1));
        message.push_str(&format!("   {}: {}\n", t.quantity, line.quantity));
        message.push_str(&format!(
            "   {}: {}\n",
            t.unit_price,
            format_eur(parse_amount(&line.product.price))
        ));

        let diff = diff_customization(&line.product, line.customization.as_ref(), translate);
        if !diff.removed_ingredient_names.is_empty() {
            message.push_str(&format!(
                "   {}: {}\n",
                t.ingredients,
                diff.remaining_ingredient_names.join(", ")
            ));
        }
        if !diff.selected_extras.is_empty() {
            let extras = diff
                .selected_extras
                .iter()
                .map(|extra| {
                    format!(
                        "{} (+{})",
                        translate(&extra.translations, TextField::Name),
                        format_eur(parse_amount(&extra.price))
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!("   {}: {extras}\n", t.extras));
        }
        if !diff.notes.is_empty() {
            message.push_str(&format!("   {}: {}\n", t.extra_notes, diff.notes));
        }

        message.push_str(&format!(
            "   {}: {}\n\n",
            t.subtotal,
            format_eur(pricing::line_total(line))
        ));
    }

    message.push_str(DIVIDER);
    message.push('\n');
    message.push_str(&format!(
        "{} {}",
        t.total,
        format_eur(pricing::cart_total(draft.lines))
    ));

    message
}
