//! Licensing core for the MCL site.
//!
//! Two halves, sharing only the canonical data model:
//!
//! - reporting: raw store documents → canonical records ([`normalize`]) and
//!   the dashboard counts derived from them ([`counts`]);
//! - entitlement: the checkout hand-off and the activation return trip
//!   ([`checkout`]), which persists the issued license token locally
//!   ([`storage`]) for the consumer application to find.
//!
//! The document store and the checkout worker are external; the core talks
//! to them through [`store::DocumentStore`] and
//! [`checkout::CheckoutTransport`] and owns nothing server-side.

pub mod checkout;
pub mod config;
pub mod counts;
pub mod document;
pub mod error;
pub mod models;
pub mod normalize;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
