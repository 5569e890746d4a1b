//! Notification dispatch: hand the order document to the messaging channel.
//!
//! Builds a `https://wa.me/<recipient>?text=...` deep link and opens it
//! through the injected [`LinkOpener`] port (the "new browsing context" is
//! the UI shell's concern). Dispatch is best-effort and fire-and-forget: by
//! the time it runs, persistence has already succeeded, so a blocked pop-up
//! must never read as an order failure.

use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Default messaging deep-link host.
pub const DEFAULT_MESSAGING_HOST: &str = "wa.me";

/// Reason a link could not be opened, as reported by the UI shell.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("could not open link: {0}")]
pub struct OpenError(pub String);

/// Port for opening a URL in a new browsing context.
pub trait LinkOpener {
    /// Open the URL; failure means the context did not open (e.g. a blocked
    /// pop-up).
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] with the shell's reason.
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Typed result of the notification step of checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The messaging channel was opened with the pre-filled document.
    Dispatched,
    /// The channel did not open; the order itself still stands.
    DispatchFailed(OpenError),
}

impl DispatchOutcome {
    /// Whether the channel actually opened.
    #[must_use]
    pub const fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched)
    }
}

/// Builds deep links and pushes them through the opener port.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher<O> {
    opener: O,
    host: String,
}

impl<O: LinkOpener> NotificationDispatcher<O> {
    /// Dispatcher using the default messaging host.
    pub fn new(opener: O) -> Self {
        Self::with_host(opener, DEFAULT_MESSAGING_HOST)
    }

    /// Dispatcher using a custom messaging host.
    pub fn with_host(opener: O, host: impl Into<String>) -> Self {
        Self {
            opener,
            host: host.into(),
        }
    }

    /// Build the deep link for a message to a recipient number.
    ///
    /// The recipient is reduced to its digits (`"+34 623 736 566"` becomes
    /// `34623736566`) and the message is percent-encoded into the `text`
    /// query parameter.
    #[must_use]
    pub fn order_link(&self, message: &str, recipient: &str) -> String {
        let digits: String = recipient.chars().filter(char::is_ascii_digit).collect();
        format!(
            "https://{}/{digits}?text={}",
            self.host,
            urlencoding::encode(message)
        )
    }

    /// Open the messaging channel with the pre-filled message.
    ///
    /// Failure is logged and reported as a [`DispatchOutcome`], never as an
    /// error: the caller has already persisted the order.
    #[instrument(skip(self, message))]
    pub fn dispatch(&self, message: &str, recipient: &str) -> DispatchOutcome {
        let url = self.order_link(message, recipient);
        match self.opener.open(&url) {
            Ok(()) => {
                debug!("order message handed to messaging channel");
                DispatchOutcome::Dispatched
            }
            Err(e) => {
                warn!("messaging channel did not open: {e}");
                DispatchOutcome::DispatchFailed(e)
            }
        }
    }
}
