//! Raw document → canonical record mapping.
//!
//! Several generations of writers have produced the documents in the store:
//! fields were renamed, the license type moved from a boolean flag to an
//! enum, and timestamps were written in three encodings. Each canonical
//! field therefore resolves through an ordered alias list; the tables in
//! [`aliases`] are the whole mapping. Normalization is total: a missing or
//! malformed field lands on its documented unknown value, never an error.

mod customer;
mod inbox;
mod license;

pub use customer::normalize_customer;
pub use inbox::{normalize_idea, normalize_message};
pub use license::normalize_license;

/// Ordered source-field alias tables. Preferred (current) name first.
pub mod aliases {
    /// License customer email: the checkout worker writes `customerEmail`,
    /// older trial documents used `email`.
    pub const LICENSE_EMAIL: &[&str] = &["customerEmail", "email"];
    pub const LICENSE_CUSTOMER_NAME: &[&str] = &["customerName", "name"];
    pub const LICENSE_PRODUCT: &[&str] = &["product", "productId"];

    /// Auto-renew negation: when no explicit flag exists, the provider's
    /// cancel-at-period-end flag is read inverted.
    pub const CANCEL_AT_PERIOD_END: &[&str] = &["cancelAtPeriodEnd", "cancel_at_period_end"];

    pub const CUSTOMER_NAME: &[&str] = &["name", "customerName", "fullName"];
    pub const CUSTOMER_COMPANY: &[&str] = &["company", "companyName", "organization"];
    pub const CUSTOMER_EMAIL: &[&str] = &["email", "customerEmail"];
    pub const STRIPE_CUSTOMER_ID: &[&str] = &["stripeCustomerId", "stripeId", "stripeCustomer"];

    /// Accepted field names for the token in the issuance response, current
    /// name first.
    pub const LICENSE_TOKEN: &[&str] = &["token", "licToken", "licenseToken"];
}
