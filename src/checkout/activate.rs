use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::Error;
use crate::normalize::aliases;
use crate::storage::StorageAdapter;

use super::transport::CheckoutTransport;

/// Final path segment of the session-creation endpoint on the worker.
pub const CREATE_SESSION_SEGMENT: &str = "create-checkout-session";
/// Final path segment of the token-issuance endpoint.
pub const ISSUE_TOKEN_SEGMENT: &str = "issue-lic-token";

/// Derive the token-issuance endpoint from the session-creation endpoint,
/// so only one worker URL needs configuring.
///
/// A trailing `create-checkout-session` segment is replaced with
/// `issue-lic-token`; an endpoint that already ends in `issue-lic-token` is
/// returned unchanged; any other shape gets `issue-lic-token` appended as a
/// new segment. Pure and idempotent.
pub fn issue_token_endpoint(create_endpoint: &str) -> String {
    let trimmed = create_endpoint.trim_end_matches('/');
    if let Some(base) = strip_final_segment(trimmed, CREATE_SESSION_SEGMENT) {
        return format!("{}{}", base, ISSUE_TOKEN_SEGMENT);
    }
    if strip_final_segment(trimmed, ISSUE_TOKEN_SEGMENT).is_some() {
        return trimmed.to_string();
    }
    format!("{}/{}", trimmed, ISSUE_TOKEN_SEGMENT)
}

/// Strip `segment` from the end of `url`, only at a path boundary.
fn strip_final_segment<'a>(url: &'a str, segment: &str) -> Option<&'a str> {
    url.strip_suffix(segment)
        .filter(|base| base.ends_with('/'))
}

/// The versioned browser-storage key shared with the consuming application.
pub fn lic_token_key(product: &str) -> String {
    format!("{}_licToken_v1", product)
}

/// Entitlement probe for the consuming application: the token persisted by
/// the last successful activation, if any.
pub fn stored_token(storage: &dyn StorageAdapter, product: &str) -> Option<String> {
    storage.get(&lic_token_key(product))
}

/// Pull `session_id` out of the return URL.
///
/// The provider appends it to the configured success URL. With the site's
/// hash router that query can end up inside the fragment
/// (`https://site/#/success?session_id=...`), so both locations are checked.
pub fn session_id_from_url(return_url: &str) -> Option<String> {
    let url = Url::parse(return_url).ok()?;

    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "session_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());
    if from_query.is_some() {
        return from_query;
    }

    let fragment_query = url.fragment()?.split_once('?')?.1;
    url::form_urlencoded::parse(fragment_query.as_bytes())
        .find(|(key, _)| key == "session_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Where activation stands for this page view.
///
/// Terminal states are sticky: once `Activated` or `Failed`, further calls
/// return the settled state. A reload constructs a fresh resolver and
/// re-runs the whole resolution from the URL.
#[derive(Debug)]
pub enum ActivationState {
    Idle,
    Resolving,
    Activated { session_id: String, token: String },
    Failed { error: Error },
}

/// Client-side machine that exchanges the returned session id for a license
/// token and persists it.
pub struct ActivationResolver {
    config: Config,
    transport: Arc<dyn CheckoutTransport>,
    storage: Arc<dyn StorageAdapter>,
    product: String,
    state: ActivationState,
}

impl ActivationResolver {
    pub fn new(
        config: Config,
        transport: Arc<dyn CheckoutTransport>,
        storage: Arc<dyn StorageAdapter>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            config,
            transport,
            storage,
            product: product.into(),
            state: ActivationState::Idle,
        }
    }

    pub fn state(&self) -> &ActivationState {
        &self.state
    }

    /// Run idle → resolving → {activated | failed} for one return trip.
    ///
    /// Without a session id in the URL there is nothing to exchange and no
    /// retry to offer, since the id cannot be recovered client-side. A token
    /// that was obtained but could not be persisted still fails: the
    /// consuming application would not see it.
    pub async fn resolve(&mut self, return_url: &str) -> &ActivationState {
        if !matches!(self.state, ActivationState::Idle) {
            return &self.state;
        }

        let Some(session_id) = session_id_from_url(return_url) else {
            return self.fail(Error::Protocol(
                "return URL carries no session_id; activation cannot proceed".into(),
            ));
        };

        let Some(create_endpoint) = self.config.checkout_endpoint.clone() else {
            return self.fail(Error::Configuration(
                "checkout worker URL is not configured".into(),
            ));
        };

        self.state = ActivationState::Resolving;
        tracing::debug!(session_id = %session_id, "exchanging session id for license token");

        let endpoint = format!(
            "{}?session_id={}",
            issue_token_endpoint(&create_endpoint),
            urlencoding::encode(&session_id)
        );

        let response = match self.transport.get(&endpoint).await {
            Ok(response) => response,
            Err(error) => return self.fail(error),
        };

        if !response.is_success() {
            return self.fail(Error::transport_status(
                response.status,
                format!("token issuance returned {}", response.status),
            ));
        }

        let json = match response.json() {
            Ok(json) => json,
            Err(error) => return self.fail(error),
        };

        let Some(token) = token_from_response(&json) else {
            return self.fail(Error::Protocol(
                "token issuance response carries no token under any known field name".into(),
            ));
        };

        if let Err(error) = self.storage.set(&lic_token_key(&self.product), &token) {
            return self.fail(error);
        }

        tracing::debug!("license token persisted");
        self.state = ActivationState::Activated { session_id, token };
        &self.state
    }

    fn fail(&mut self, error: Error) -> &ActivationState {
        tracing::warn!(error = %error, "activation failed");
        self.state = ActivationState::Failed { error };
        &self.state
    }
}

/// Resolve the token through its alias list, current field name first.
fn token_from_response(json: &Value) -> Option<String> {
    aliases::LICENSE_TOKEN
        .iter()
        .find_map(|field| json.get(*field).and_then(Value::as_str))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
