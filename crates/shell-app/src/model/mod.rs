//! Pure data structures (DTOs) implementing the
//! [`StoreEntity`](shell_framework::StoreEntity) trait.

pub mod user;

pub use user::*;
