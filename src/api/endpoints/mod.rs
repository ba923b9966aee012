//! API endpoint handlers.

pub mod assessment;
pub mod health;
pub mod page;
pub mod sessions;
