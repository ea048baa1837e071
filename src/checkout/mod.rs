//! Checkout and activation flows.
//!
//! Two state machines correlated only by the session id the provider
//! carries through the return URL: [`CheckoutInitiator`] hands the browser
//! to the hosted checkout, and [`ActivationResolver`] runs on the way back,
//! in a fresh page view with no shared in-process state.

mod activate;
mod initiate;
mod transport;

pub use activate::*;
pub use initiate::*;
pub use transport::*;
