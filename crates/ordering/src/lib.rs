//! Pepper Menu Ordering - cart, checkout, and order hand-off engine.
//!
//! This crate is the part of the digital menu with real contracts in it:
//! the durable client-local cart, the pricing and merge rules that keep it
//! consistent, and the deterministic bilingual order document that is
//! handed to the restaurant's messaging channel after the backend has
//! persisted the order.
//!
//! # Modules
//!
//! - [`catalog`] - Product snapshots embedded in cart lines
//! - [`cart`] - Cart store, line identity/merging, persistence port
//! - [`pricing`] - Full-precision line and cart totals
//! - [`diff`] - Customization deltas worth reporting
//! - [`delivery`] - Delivery form validation
//! - [`compose`] - Backend payload and order message generation
//! - [`gateway`] - Backend persistence client
//! - [`dispatch`] - Messaging deep link, fire-and-forget
//! - [`checkout`] - The two-step checkout saga tying it all together
//! - [`config`] - Environment-driven configuration
//!
//! # Checkout flow
//!
//! UI actions mutate the [`cart::CartStore`]; on checkout the
//! [`checkout::CheckoutController`] validates the delivery form, persists
//! the order through the [`gateway`], regenerates the message with the
//! canonical order id, opens the messaging channel, and clears the cart.
//! Dispatch failure never rolls the order back.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, allow(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod compose;
pub mod config;
pub mod delivery;
pub mod diff;
pub mod dispatch;
pub mod gateway;
pub mod pricing;

pub use cart::{CartError, CartLine, CartStore, Customization};
pub use catalog::{Extra, Ingredient, ProductSnapshot};
pub use checkout::{CheckoutController, CheckoutOutcome, CheckoutRequest};
pub use compose::{generate_order_message, order_payload, OrderDraft, OrderPayload};
pub use config::{ConfigError, OrderingConfig};
pub use delivery::{DeliveryForm, DeliveryInfo, DeliveryLocation, ValidationErrors};
pub use diff::{diff_customization, CustomizationDiff};
pub use dispatch::{DispatchOutcome, LinkOpener, NotificationDispatcher, OpenError};
pub use gateway::{
    AuthTokenProvider, CompanySettings, CreatedOrder, GatewayError, OrderBackend, OrderGateway,
    StaticTokenProvider,
};
