//! # Text Encodings
//!
//! Address and signature encodings used across chain families.

use crate::digest::keccak256;
use crate::CryptoError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bech32::{Bech32, Hrp};

/// EIP-55 mixed-case checksum form of a 20-byte address, `0x`-prefixed.
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> if i % 2 == 0 { 4 } else { 0 }) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `0x` + lowercase hex.
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode hex with or without a `0x` prefix.
pub fn from_hex(s: &str) -> Result<Vec<u8>, CryptoError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| CryptoError::encoding("hex", e))
}

/// Bech32 (BIP-173) encoding with the given human-readable prefix.
pub fn bech32_encode(prefix: &str, data: &[u8]) -> Result<String, CryptoError> {
    let hrp = Hrp::parse(prefix).map_err(|e| CryptoError::encoding("bech32", e))?;
    bech32::encode::<Bech32>(hrp, data).map_err(|e| CryptoError::encoding("bech32", e))
}

/// Decode bech32 into its lowercase prefix and payload.
pub fn bech32_decode(s: &str) -> Result<(String, Vec<u8>), CryptoError> {
    let (hrp, data) = bech32::decode(s).map_err(|e| CryptoError::encoding("bech32", e))?;
    Ok((hrp.to_lowercase(), data))
}

/// Base58 (Bitcoin alphabet).
pub fn to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode base58 (Bitcoin alphabet).
pub fn from_base58(s: &str) -> Result<Vec<u8>, CryptoError> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| CryptoError::encoding("base58", e))
}

/// Standard padded base64.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64.
pub fn from_base64(s: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(s)
        .map_err(|e| CryptoError::encoding("base64", e))
}
