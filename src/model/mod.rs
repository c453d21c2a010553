//! Pure data structures. [`Account`] implements [`KeyedEntity`](crate::framework::KeyedEntity).

pub mod account;

pub use account::*;
