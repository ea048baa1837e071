use crate::document::RawDocument;
use crate::models::Customer;

use super::aliases;

/// Map a raw customer document to the canonical record.
pub fn normalize_customer(doc: &RawDocument) -> Customer {
    Customer {
        id: doc.id.clone(),
        name: doc.first_str(aliases::CUSTOMER_NAME),
        company: doc.first_str(aliases::CUSTOMER_COMPANY),
        email: doc.first_str(aliases::CUSTOMER_EMAIL),
        stripe_customer_id: doc.first_str(aliases::STRIPE_CUSTOMER_ID),
        created_at: doc.instant("createdAt"),
    }
}
