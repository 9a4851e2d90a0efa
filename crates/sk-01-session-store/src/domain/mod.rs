//! Domain layer: store keys and errors.

pub mod errors;
pub mod keys;

pub use errors::StoreError;
pub use keys::{KeySlot, StoreKey};
