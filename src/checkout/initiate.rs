use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::Error;
use crate::models::{BillingModel, BillingPeriod};
use crate::store::{DocumentStore, collections};

use super::transport::CheckoutTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Private,
    Business,
}

/// Customer identity forwarded to the checkout worker so the resulting
/// license document can be tied back to a customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCustomer {
    pub customer_type: CustomerType,
    pub customer_name: String,
    pub customer_email: String,
}

/// Parameters for one checkout session. Immutable once sent; the worker
/// owns pricing, so nothing about amounts travels in this request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub product: String,
    pub billing_period: BillingPeriod,
    pub auto_renew: bool,
    #[serde(flatten)]
    pub customer: Option<CheckoutCustomer>,
}

impl CheckoutRequest {
    pub fn new(product: impl Into<String>, billing_period: BillingPeriod, auto_renew: bool) -> Self {
        Self {
            product: product.into(),
            billing_period,
            auto_renew,
            customer: None,
        }
    }

    pub fn with_customer(mut self, customer: CheckoutCustomer) -> Self {
        self.customer = Some(customer);
        self
    }
}

/// Where the checkout flow stands.
///
/// `Redirected` is terminal for this page view: the browsing context leaves
/// for the hosted checkout and nothing after it runs. `Failed` is not
/// terminal; the caller may let the user try again.
#[derive(Debug)]
pub enum CheckoutState {
    Idle,
    Sending,
    Redirected { url: String },
    Failed { error: Error },
}

/// Client-side machine that creates a hosted checkout session.
pub struct CheckoutInitiator {
    config: Config,
    transport: Arc<dyn CheckoutTransport>,
    state: CheckoutState,
}

impl CheckoutInitiator {
    pub fn new(config: Config, transport: Arc<dyn CheckoutTransport>) -> Self {
        Self {
            config,
            transport,
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Run idle → sending → {redirected | failed}.
    ///
    /// Exactly one request is issued, and never when the worker endpoint is
    /// unconfigured: that fails before touching the network, with an error
    /// the UI can distinguish from a transport problem. Failed attempts are
    /// not retried here; the caller decides whether the user may try again.
    pub async fn start(&mut self, request: &CheckoutRequest) -> &CheckoutState {
        if let CheckoutState::Redirected { .. } = self.state {
            return &self.state;
        }

        let Some(endpoint) = self.config.checkout_endpoint.clone() else {
            self.state = CheckoutState::Failed {
                error: Error::Configuration("checkout worker URL is not configured".into()),
            };
            return &self.state;
        };

        self.state = CheckoutState::Sending;
        tracing::debug!(product = %request.product, "creating checkout session");

        let body = session_body(request, &self.config);
        let response = match self.transport.post_json(&endpoint, &body).await {
            Ok(response) => response,
            Err(error) => {
                self.state = CheckoutState::Failed { error };
                return &self.state;
            }
        };

        if !response.is_success() {
            self.state = CheckoutState::Failed {
                error: Error::transport_status(
                    response.status,
                    format!("checkout worker returned {}", response.status),
                ),
            };
            return &self.state;
        }

        let json = match response.json() {
            Ok(json) => json,
            Err(error) => {
                self.state = CheckoutState::Failed { error };
                return &self.state;
            }
        };

        match json.get("url").and_then(Value::as_str) {
            Some(url) if !url.is_empty() => {
                tracing::debug!("checkout session created, redirecting");
                self.state = CheckoutState::Redirected {
                    url: url.to_string(),
                };
            }
            _ => {
                self.state = CheckoutState::Failed {
                    error: Error::Protocol(
                        "checkout worker response is missing the redirect url".into(),
                    ),
                };
            }
        }

        &self.state
    }
}

/// Wire body for the session-creation request: the request parameters plus
/// the configured return URLs.
fn session_body(request: &CheckoutRequest, config: &Config) -> Value {
    let mut body = match serde_json::to_value(request) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    body.insert(
        "successUrl".into(),
        Value::String(config.success_url.clone()),
    );
    body.insert("cancelUrl".into(), Value::String(config.cancel_url.clone()));
    Value::Object(body)
}

/// Customer and consent details captured by the purchase form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseIntent {
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub org_number: Option<String>,
    pub country: Option<String>,
    pub product: String,
    pub product_name: String,
    pub billing_period: BillingPeriod,
    pub billing_model: BillingModel,
    pub auto_renew: bool,
    pub accept_terms: bool,
    pub accept_privacy_and_waiver: bool,
    pub marketing_opt_in: bool,
    pub created_at: DateTime<Utc>,
    pub source: String,
}

/// Store the purchase form's customer record before the checkout session is
/// created. A write failure is surfaced, not swallowed: the form blocks on
/// it rather than sending the user to checkout without a customer record.
pub async fn record_purchase_intent(
    store: &dyn DocumentStore,
    intent: &PurchaseIntent,
) -> crate::error::Result<String> {
    let fields = match serde_json::to_value(intent) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    store.add_document(collections::CUSTOMERS, fields).await
}
