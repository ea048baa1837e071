use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An idea submitted through the idea-bank form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub idea: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A contact-form message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}
