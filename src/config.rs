use std::env;

/// Runtime configuration for the checkout and activation flows.
#[derive(Debug, Clone)]
pub struct Config {
    /// Session-creation endpoint on the checkout worker. Left as `None` when
    /// unset so the flows can fail with a configuration error before any
    /// network call is attempted.
    pub checkout_endpoint: Option<String>,
    /// Where the checkout provider sends the user after a completed payment.
    pub success_url: String,
    /// Where the user lands after abandoning checkout.
    pub cancel_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url = env::var("MCL_SITE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        Self::from_parts(env::var("MCL_CHECKOUT_WORKER_URL").ok(), &base_url)
    }

    /// Build a config from an explicit endpoint and site base URL.
    ///
    /// The return URLs use the site's hash router, so they are composed as
    /// `{base}/#/success` and `{base}/#/cancel`.
    pub fn from_parts(checkout_endpoint: Option<String>, site_base_url: &str) -> Self {
        let base = site_base_url.trim_end_matches('/');
        Self {
            checkout_endpoint,
            success_url: format!("{}/#/success", base),
            cancel_url: format!("{}/#/cancel", base),
        }
    }
}
