//! Checkout: the two-step saga from validated form to cleared cart.
//!
//! `Idle -> Validating -> Submitting -> {Submitted -> Composing ->
//! Dispatching -> Cleared} | Failed -> Idle`. Validation failures never
//! reach `Submitting`. Once `Submitted` is reached the cart is always
//! cleared, whatever the dispatch step does - the order is persisted, and
//! nothing after that point may roll it back or duplicate it.
//!
//! Re-entrant submission (a double click while the network call is pending)
//! is refused structurally via a busy flag, released when the attempt
//! resolves. The pending submission has no timeout: if the backend never
//! answers, the controller stays busy, a deliberate gap matching the
//! absence of a retry/cancel requirement.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, instrument};

use pepper_menu_core::{Language, TextField, Translations};

use crate::cart::{CartStorage, CartStore};
use crate::compose::{generate_order_message, order_payload, OrderDraft};
use crate::delivery::{DeliveryForm, ValidationErrors};
use crate::dispatch::{DispatchOutcome, LinkOpener, NotificationDispatcher};
use crate::gateway::{CreatedOrder, GatewayError, OrderBackend};

/// Phases of the checkout state machine, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    Validating,
    Submitting,
    Submitted,
    Composing,
    Dispatching,
    Cleared,
    Failed,
}

/// Caller-supplied context for one checkout attempt.
#[derive(Debug, Clone)]
pub struct CheckoutRequest<'a> {
    pub form: &'a DeliveryForm,
    pub customer_name: &'a str,
    pub language: Language,
    /// Messaging recipient, sourced from company settings.
    pub recipient: &'a str,
}

/// Terminal result of one checkout attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The order is persisted; the cart is cleared. Dispatch may still have
    /// failed, which is recorded but not fatal.
    Placed {
        order: CreatedOrder,
        message: String,
        dispatch: DispatchOutcome,
    },
    /// Nothing to submit.
    EmptyCart,
    /// Required delivery fields missing; no network call was made.
    Invalid(ValidationErrors),
    /// Backend persistence failed; the cart is untouched.
    PersistFailed(GatewayError),
    /// A submission is already in flight; this attempt was refused.
    AlreadyInFlight,
}

/// Drives the checkout saga over an order backend and a notification
/// dispatcher.
pub struct CheckoutController<B, O> {
    backend: B,
    dispatcher: NotificationDispatcher<O>,
    busy: AtomicBool,
}

/// Releases the busy flag when the checkout attempt resolves.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<S>(cart: &Mutex<CartStore<S>>) -> MutexGuard<'_, CartStore<S>> {
    cart.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: OrderBackend, O: LinkOpener> CheckoutController<B, O> {
    /// Create a controller.
    pub const fn new(backend: B, dispatcher: NotificationDispatcher<O>) -> Self {
        Self {
            backend,
            dispatcher,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run one checkout attempt over the shared cart.
    #[instrument(skip_all, fields(language = request.language.code()))]
    pub async fn checkout<S, F>(
        &self,
        cart: &Mutex<CartStore<S>>,
        request: &CheckoutRequest<'_>,
        translate: &F,
    ) -> CheckoutOutcome
    where
        S: CartStorage,
        F: Fn(&Translations, TextField) -> String,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("submission already in flight, refusing re-entry");
            return CheckoutOutcome::AlreadyInFlight;
        }
        let _guard = BusyGuard(&self.busy);

        debug!(phase = ?CheckoutPhase::Validating, "checkout started");
        let delivery = match request.form.validate() {
            Ok(delivery) => delivery,
            Err(errors) => {
                debug!(phase = ?CheckoutPhase::Failed, "delivery form invalid");
                return CheckoutOutcome::Invalid(errors);
            }
        };

        // Snapshot the lines so no lock is held across the network call.
        let lines = {
            let cart = lock(cart);
            if cart.is_empty() {
                return CheckoutOutcome::EmptyCart;
            }
            cart.lines().to_vec()
        };

        debug!(phase = ?CheckoutPhase::Submitting, items = lines.len());
        let payload = order_payload(&delivery, &lines);
        let order = match self.backend.submit(&payload).await {
            Ok(order) => order,
            Err(e) => {
                error!(phase = ?CheckoutPhase::Failed, "order persistence failed: {e}");
                return CheckoutOutcome::PersistFailed(e);
            }
        };

        debug!(phase = ?CheckoutPhase::Composing, order_id = %order.id);
        let draft = OrderDraft {
            lines: &lines,
            delivery: &delivery,
            customer_name: request.customer_name,
            order_id: Some(order.id),
        };
        let message = generate_order_message(&draft, request.language, translate);

        debug!(phase = ?CheckoutPhase::Dispatching);
        let dispatch = self.dispatcher.dispatch(&message, request.recipient);

        // The order is persisted; the cart clears no matter how dispatch went.
        lock(cart).clear();
        debug!(phase = ?CheckoutPhase::Cleared);

        CheckoutOutcome::Placed {
            order,
            message,
            dispatch,
        }
    }
}
