use crate::document::RawDocument;
use crate::models::{
    BillingModel, BillingPeriod, License, LicenseCustomer, LicenseProduct, LicenseType,
    PAID_STATUS, TRIAL_STATUS,
};

use super::aliases;

/// Map a raw license document to the canonical record.
pub fn normalize_license(doc: &RawDocument) -> License {
    let license_type = license_type(doc);

    License {
        id: doc.id.clone(),
        license_type,
        billing_model: billing_model(doc),
        billing_period: billing_period(doc),
        customer: LicenseCustomer {
            name: doc.first_str(aliases::LICENSE_CUSTOMER_NAME),
            email: doc.first_str(aliases::LICENSE_EMAIL),
            customer_id: doc.str_field("customerId"),
        },
        product: product(doc),
        status: status(doc, license_type),
        auto_renew: auto_renew(doc),
        created_at: doc.instant("createdAt"),
        starts_at: doc.instant("startsAt"),
        expires_at: doc.instant("expiresAt"),
        updated_at: doc.instant("updatedAt"),
        source: doc.str_field("source"),
        stripe_price_id: doc.str_field("stripePriceId"),
        stripe_customer_id: doc.str_field("stripeCustomerId"),
        stripe_subscription_id: doc.str_field("stripeSubscriptionId"),
    }
}

/// License type resolution, in order:
///
/// 1. explicit `licenseType` enum value
/// 2. legacy `isTrial` boolean (true → trial, false → paid)
/// 3. a `trial`/`paid` token inside the free-text `plan` field
///
/// Anything else is `Unknown`; no guessing beyond these fallbacks.
fn license_type(doc: &RawDocument) -> LicenseType {
    match doc.str_field("licenseType").as_deref() {
        Some("trial") => return LicenseType::Trial,
        Some("paid") => return LicenseType::Paid,
        _ => {}
    }

    match doc.bool_field("isTrial") {
        Some(true) => return LicenseType::Trial,
        Some(false) => return LicenseType::Paid,
        None => {}
    }

    if let Some(plan) = doc.str_field("plan") {
        for token in plan.split(|c: char| !c.is_ascii_alphanumeric()) {
            match token.to_ascii_lowercase().as_str() {
                "trial" => return LicenseType::Trial,
                "paid" => return LicenseType::Paid,
                _ => {}
            }
        }
    }

    LicenseType::Unknown
}

fn billing_model(doc: &RawDocument) -> BillingModel {
    match doc.str_field("billingModel").as_deref() {
        Some("subscription") => BillingModel::Subscription,
        Some("one_time") => BillingModel::OneTime,
        _ => BillingModel::Unknown,
    }
}

/// `billingPeriod` when present; old documents stored the period under
/// `plan`.
fn billing_period(doc: &RawDocument) -> BillingPeriod {
    match doc.str_field("billingPeriod").as_deref() {
        Some("month") => return BillingPeriod::Month,
        Some("year") => return BillingPeriod::Year,
        _ => {}
    }
    match doc.str_field("plan").as_deref() {
        Some("month") => BillingPeriod::Month,
        Some("year") => BillingPeriod::Year,
        _ => BillingPeriod::Unknown,
    }
}

fn auto_renew(doc: &RawDocument) -> Option<bool> {
    doc.bool_field("autoRenew").or_else(|| {
        doc.first_bool(aliases::CANCEL_AT_PERIOD_END)
            .map(|cancel| !cancel)
    })
}

fn product(doc: &RawDocument) -> Option<LicenseProduct> {
    doc.first_str(aliases::LICENSE_PRODUCT)
        .map(|id| LicenseProduct {
            id,
            display_name: doc.str_field("productName"),
        })
}

/// Explicit status label when stored; otherwise defaulted from the license
/// type. Unknown-type records get no default and render as "—".
fn status(doc: &RawDocument, license_type: LicenseType) -> Option<String> {
    doc.str_field("status").or_else(|| match license_type {
        LicenseType::Trial => Some(TRIAL_STATUS.to_string()),
        LicenseType::Paid => Some(PAID_STATUS.to_string()),
        LicenseType::Unknown => None,
    })
}
