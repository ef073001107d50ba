//! Signing seam.
//!
//! Transaction assembly never touches key material directly: it takes a
//! [`ScriptSigner`], so tests can drive the full claim pipeline with a
//! fake that returns fixed bytes. The production implementation wraps a
//! secp256k1 Schnorr keypair, matching the external SDK's
//! `sign_script_hash` behavior (Schnorr over the SHA-256 of the script).

use kaspa_addresses::{Address, Prefix, Version};
use secp256k1::Keypair;
use sha2::{Digest, Sha256};

use super::error::DeadmanError;

pub trait ScriptSigner {
    /// Sign the hash of `script`, returning the raw 64-byte Schnorr signature.
    fn sign_script_hash(&self, script: &[u8]) -> Result<Vec<u8>, DeadmanError>;

    /// 32-byte x-only public key of the signing identity.
    fn x_only_pubkey(&self) -> [u8; 32];

    /// P2PK address of the signing identity.
    fn address(&self, prefix: Prefix) -> Address {
        Address::new(prefix, Version::PubKey, &self.x_only_pubkey())
    }
}

pub struct SchnorrSigner {
    keypair: Keypair,
}

impl SchnorrSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn from_hex(private_key: &str) -> Result<Self, DeadmanError> {
        Ok(Self {
            keypair: crate::keypair_from_hex(private_key)?,
        })
    }
}

impl ScriptSigner for SchnorrSigner {
    fn sign_script_hash(&self, script: &[u8]) -> Result<Vec<u8>, DeadmanError> {
        let digest = Sha256::digest(script);
        let msg = secp256k1::Message::from_digest_slice(&digest)
            .map_err(|e| DeadmanError::InvalidInput(format!("{e}")))?;
        let sig = self.keypair.sign_schnorr(msg);
        Ok(sig.as_ref().to_vec())
    }

    fn x_only_pubkey(&self) -> [u8; 32] {
        self.keypair.x_only_public_key().0.serialize()
    }
}
