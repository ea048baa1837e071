mod customer;
mod inbox;
mod license;

pub use customer::*;
pub use inbox::*;
pub use license::*;
