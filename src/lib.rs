//! Kaspa Deadman Lab
//!
//! Toolkit for operating a P2SH "deadman switch" contract on Kaspa
//! Testnet 12: inspect the compiled contract, derive its address, watch
//! its funding state, assemble and sign the beneficiary's claim
//! transaction, and submit it through a local dashboard proxy.
//!
//! The byte-level builders live in [`sdk`], remote endpoints in [`rpc`],
//! the claim pipeline in [`claim`], and the heartbeat monitor in
//! [`guardian`].

pub mod api;
pub mod claim;
pub mod config;
pub mod guardian;
pub mod rpc;
pub mod sdk;

use kaspa_addresses::{Address, Prefix, Version};
use rand::thread_rng;
use secp256k1::Keypair;

use crate::sdk::error::DeadmanError;

/// Generate a new Schnorr keypair. Returns the keypair and its 32-byte
/// x-only public key.
pub fn generate_keypair() -> (Keypair, [u8; 32]) {
    let kp = Keypair::new(secp256k1::SECP256K1, &mut thread_rng());
    let pk = kp.x_only_public_key().0.serialize();
    (kp, pk)
}

/// Load a keypair from a 64-hex-char private key.
pub fn keypair_from_hex(private_key: &str) -> Result<Keypair, DeadmanError> {
    let bytes = hex::decode(private_key)
        .map_err(|e| DeadmanError::InvalidInput(format!("invalid private key hex: {e}")))?;
    if bytes.len() != 32 {
        return Err(DeadmanError::InvalidInput(
            "private key must be 32 bytes (64 hex chars)".into(),
        ));
    }
    let secret = secp256k1::SecretKey::from_slice(&bytes)
        .map_err(|e| DeadmanError::InvalidInput(format!("invalid private key: {e}")))?;
    Ok(Keypair::from_secret_key(secp256k1::SECP256K1, &secret))
}

/// P2PK address for a 32-byte x-only public key.
pub fn pubkey_address(prefix: Prefix, pubkey: &[u8; 32]) -> Address {
    Address::new(prefix, Version::PubKey, pubkey.as_slice())
}

/// Map a network name to its address prefix.
pub fn parse_prefix(network: &str) -> Prefix {
    match network {
        "mainnet" => Prefix::Mainnet,
        _ => Prefix::Testnet,
    }
}

/// Sompi to whole KAS, for display only.
pub fn sompi_to_kas(sompi: u64) -> f64 {
    sompi as f64 / 1e8
}

/// Whole KAS to sompi. Rejects non-finite and non-positive amounts so a
/// bad CLI argument never rounds to a zero-value output.
pub fn kas_to_sompi(kas: f64) -> Result<u64, DeadmanError> {
    if !kas.is_finite() || kas <= 0.0 {
        return Err(DeadmanError::InvalidInput(format!(
            "amount must be a positive number of KAS, got {kas}"
        )));
    }
    Ok((kas * 1e8).round() as u64)
}
