//! Cross-crate scenarios.

pub mod cross_family;
pub mod ethereum_flow;
