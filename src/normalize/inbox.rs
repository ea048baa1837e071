use crate::document::RawDocument;
use crate::models::{Idea, Message};

/// Map a raw idea document to the canonical record. The idea text defaults
/// to empty rather than failing the record.
pub fn normalize_idea(doc: &RawDocument) -> Idea {
    Idea {
        id: doc.id.clone(),
        name: doc.str_field("name"),
        email: doc.str_field("email"),
        idea: doc.str_field("idea").unwrap_or_default(),
        created_at: doc.instant("createdAt"),
    }
}

/// Map a raw contact-form message to the canonical record.
pub fn normalize_message(doc: &RawDocument) -> Message {
    Message {
        id: doc.id.clone(),
        name: doc.str_field("name"),
        email: doc.str_field("email"),
        subject: doc.str_field("subject"),
        message: doc.str_field("message").unwrap_or_default(),
        created_at: doc.instant("createdAt"),
    }
}
