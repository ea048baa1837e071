use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status label shown for trial licenses without an explicit status field.
pub const TRIAL_STATUS: &str = "Prøveperiode";
/// Status label shown for paid licenses without an explicit status field.
pub const PAID_STATUS: &str = "Betalt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    Trial,
    Paid,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingModel {
    Subscription,
    OneTime,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Month,
    Year,
    #[default]
    Unknown,
}

/// Customer identity carried on a license document. All best-effort; the
/// full customer record lives in its own collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Reference into the customers collection, when the writer recorded one.
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseProduct {
    pub id: String,
    pub display_name: Option<String>,
}

/// Canonical license record, reconciled from whichever document generation
/// the store returned. Only `id` is guaranteed; every other field degrades
/// to its unknown/absent value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub license_type: LicenseType,
    pub billing_model: BillingModel,
    pub billing_period: BillingPeriod,
    pub customer: LicenseCustomer,
    pub product: Option<LicenseProduct>,
    pub status: Option<String>,
    /// Explicit flag when present, otherwise the inverse of the provider's
    /// cancel-at-period-end flag. `None` when neither was recorded.
    pub auto_renew: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Provenance tag, e.g. "trial-self" or "stripe-checkout".
    pub source: Option<String>,
    pub stripe_price_id: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
}

impl License {
    pub fn is_trial(&self) -> bool {
        self.license_type == LicenseType::Trial
    }

    /// Start date shown in lists: `startsAt`, falling back to `createdAt`.
    pub fn display_start(&self) -> Option<DateTime<Utc>> {
        self.starts_at.or(self.created_at)
    }

    /// Plan label for the admin list, e.g. "Abonnement · måned".
    /// "—" when neither model nor period is known.
    pub fn plan_description(&self) -> String {
        match self.billing_model {
            BillingModel::Subscription => match self.billing_period {
                BillingPeriod::Month => "Abonnement · måned".to_string(),
                BillingPeriod::Year => "Abonnement · år".to_string(),
                BillingPeriod::Unknown => "Abonnement".to_string(),
            },
            BillingModel::OneTime => match self.billing_period {
                BillingPeriod::Month => "Engang · måned".to_string(),
                BillingPeriod::Year => "Engang · år".to_string(),
                BillingPeriod::Unknown => "Engangskjøp".to_string(),
            },
            BillingModel::Unknown => match self.billing_period {
                BillingPeriod::Month => "Måned".to_string(),
                BillingPeriod::Year => "År".to_string(),
                BillingPeriod::Unknown => "—".to_string(),
            },
        }
    }

    /// Customer cell for the admin list: "name · email" when both are known
    /// and differ, one of them when only one is known, "Ukjent" otherwise.
    pub fn customer_label(&self) -> String {
        match (&self.customer.name, &self.customer.email) {
            (Some(name), Some(email)) if name != email => format!("{} · {}", name, email),
            (Some(name), _) => name.clone(),
            (None, Some(email)) => email.clone(),
            (None, None) => "Ukjent".to_string(),
        }
    }
}
