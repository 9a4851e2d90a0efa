//! Domain layer: per-family session keys.

pub mod cosmos;
pub mod errors;
pub mod ethereum;
pub mod near;
pub mod session_key;
pub mod solana;
pub mod substrate;
pub mod verify;

pub use cosmos::CosmosKey;
pub use errors::SignerError;
pub use ethereum::EthereumKey;
pub use near::NearKey;
pub use session_key::{SessionAuthorization, SessionKey};
pub use solana::SolanaKey;
pub use substrate::SubstrateKey;
pub use verify::{same_address, verify_signed_action};
