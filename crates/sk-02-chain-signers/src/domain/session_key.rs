//! # Session Key Contract
//!
//! What each chain family provides to the generic signer service.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared_types::{ActionPayload, ChainBase, SessionPayload};

use crate::domain::errors::SignerError;

/// Wallet-issued proof that a session key may act for `payload.from`.
///
/// Persisted verbatim in the `-auth` slot as `{ "payload", "signature" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAuthorization {
    /// The payload the wallet signed.
    pub payload: SessionPayload,
    /// Wallet signature in the family's wallet encoding.
    pub signature: String,
}

/// An ephemeral key pair of one chain family.
///
/// Implementations derive their address once at construction; `address`
/// is therefore stable for the lifetime of the value.
pub trait SessionKey: Sized + Send + Sync + 'static {
    /// Family this key belongs to.
    const FAMILY: ChainBase;

    /// Persisted form, e.g. `{"privateKey": "0x.."}`.
    type Record: Serialize + DeserializeOwned;

    /// Create a fresh random key for `chain_id`.
    fn generate(chain_id: &str) -> Result<Self, SignerError>;

    /// Rebuild a key from its persisted record, applying family validation.
    fn from_record(chain_id: &str, record: Self::Record) -> Result<Self, SignerError>;

    /// Persisted form of this key.
    fn to_record(&self) -> Self::Record;

    /// Public address of the session key.
    fn address(&self) -> &str;

    /// Sign an action payload, returning the family's signature string.
    fn sign_action(&self, payload: &ActionPayload) -> Result<String, SignerError>;

    /// Check that `signature` over `payload` was made by `address`.
    fn verify_action(
        address: &str,
        payload: &ActionPayload,
        signature: &str,
    ) -> Result<(), SignerError>;

    /// Check the wallet's signature over a session payload.
    ///
    /// Families without a verification primitive accept any signature and
    /// rely on the session address binding alone.
    fn verify_authorization(_payload: &SessionPayload, _signature: &str) -> Result<(), SignerError> {
        Ok(())
    }

    /// Address equality in this family's notation.
    fn same_address(a: &str, b: &str) -> bool {
        a == b
    }
}
