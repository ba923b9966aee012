pub mod enums;
mod conversation;
mod health;

pub use conversation::*;
pub use health::*;
