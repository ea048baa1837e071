use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical customer record from the customers collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
