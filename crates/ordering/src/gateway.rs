//! Order gateway: backend persistence and company settings.
//!
//! One typed client over the REST backend. Submission failures are
//! structured so the checkout flow can tell a field-level rejection (show
//! the specific message) from a connectivity failure (offer a retry). The
//! gateway never retries on its own.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, instrument};
use url::Url;

use pepper_menu_core::OrderId;

use crate::compose::{OrderItemPayload, OrderPayload};
use crate::delivery::DeliveryLocation;

/// Field-keyed rejection body: the backend keys errors by the offending
/// field name or item index, with free-form values.
pub type FieldErrors = BTreeMap<String, serde_json::Value>;

/// Errors raised by the order gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed (connectivity, DNS, TLS, ...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected specific fields of the submission.
    #[error("order rejected by the backend")]
    Rejected {
        /// Errors keyed by field name or item index.
        fields: FieldErrors,
    },

    /// The backend answered with an unexpected status.
    #[error("unexpected status {status}")]
    Status { status: u16, body: String },

    /// A response arrived but could not be interpreted.
    #[error("invalid response: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Whether this failure names specific fields (as opposed to a generic
    /// connectivity problem the user may simply retry).
    #[must_use]
    pub const fn is_field_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// An order as echoed back by the backend after persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    /// Canonical id assigned by the backend.
    pub id: OrderId,
    #[serde(default)]
    pub delivery_street: String,
    #[serde(default)]
    pub delivery_house_number: String,
    #[serde(default)]
    pub delivery_location: Option<DeliveryLocation>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Company settings exposed by the backend, including the messaging
/// recipient number.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompanySettings {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub whatsapp_phone: Option<String>,
}

/// Supplies the bearer token attached to backend requests, when a session
/// exists. Session handling itself lives outside this crate.
pub trait AuthTokenProvider {
    fn bearer_token(&self) -> Option<SecretString>;
}

/// Token provider holding a fixed (or no) token.
#[derive(Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<SecretString>,
}

impl StaticTokenProvider {
    /// Provider that attaches the given bearer token.
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self { token: Some(token) }
    }

    /// Provider for unauthenticated requests.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AuthTokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> Option<SecretString> {
        self.token.clone()
    }
}

/// The seam checkout depends on, so tests can substitute the backend.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Persist an order, returning the created order with its canonical id.
    async fn submit(&self, payload: &OrderPayload) -> Result<CreatedOrder, GatewayError>;
}

/// HTTP client for the order backend.
#[derive(Debug, Clone)]
pub struct OrderGateway<A> {
    client: Client,
    base_url: Url,
    auth: A,
}

impl<A: AuthTokenProvider> OrderGateway<A> {
    /// Create a gateway rooted at the given API base URL.
    #[must_use]
    pub fn new(base_url: Url, auth: A) -> Self {
        Self {
            client: Client::new(),
            base_url,
            auth,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.bearer_token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(path)?;
        let response = self.authorize(self.client.get(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }

    /// All orders visible to the authenticated customer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport or backend failure.
    pub async fn fetch_orders(&self) -> Result<Vec<CreatedOrder>, GatewayError> {
        self.get_json("orders/").await
    }

    /// A single order by canonical id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport or backend failure.
    pub async fn fetch_order(&self, id: OrderId) -> Result<CreatedOrder, GatewayError> {
        self.get_json(&format!("orders/{id}/")).await
    }

    /// The company settings, sourcing the messaging recipient number.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport or backend failure.
    pub async fn fetch_company_settings(&self) -> Result<CompanySettings, GatewayError> {
        self.get_json("company/").await
    }
}

#[async_trait]
impl<A: AuthTokenProvider + Send + Sync> OrderBackend for OrderGateway<A> {
    #[instrument(skip_all, fields(items = payload.items.len()))]
    async fn submit(&self, payload: &OrderPayload) -> Result<CreatedOrder, GatewayError> {
        let url = self.endpoint("orders/")?;
        let response = self
            .authorize(self.client.post(url))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            let order: CreatedOrder = response
                .json()
                .await
                .map_err(|e| GatewayError::Parse(e.to_string()))?;
            debug!(order_id = %order.id, "order persisted");
            return Ok(order);
        }

        let body = response.text().await.unwrap_or_default();
        let failure = classify_failure(status, body);
        error!(status = status.as_u16(), "order submission failed: {failure}");
        Err(failure)
    }
}

/// Map a non-201 response to a structured failure. A 400 with a JSON object
/// body is a field-level rejection; anything else is generic.
fn classify_failure(status: StatusCode, body: String) -> GatewayError {
    if status == StatusCode::BAD_REQUEST {
        if let Ok(fields) = serde_json::from_str::<FieldErrors>(&body) {
            return GatewayError::Rejected { fields };
        }
    }
    GatewayError::Status {
        status: status.as_u16(),
        body,
    }
}
