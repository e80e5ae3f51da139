/// Fluxa Gasless Approval (permit)
///
/// A share owner signs a structured, domain-separated approval off-band; any
/// party can then submit it to set the allowance without a separate approval
/// transaction. The domain binds the token name, version, chain and the
/// verifying pool, and the message binds the owner's current nonce and a
/// deadline, so a permit is valid for exactly one pool, once, until it expires.
use crate::constants::{LP_TOKEN_VERSION, PERMIT_DIGEST_PREFIX, PERMIT_DOMAIN_TYPE, PERMIT_TYPE};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::{hash, hashv};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Detached 64-byte signature over a permit digest
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PermitSignature(pub [u8; 64]);

/// The signed approval message
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct Permit {
    pub owner: Pubkey,
    pub spender: Pubkey,
    pub value: u128,
    /// Owner's nonce at signing time; consumed by a successful permit
    pub nonce: u64,
    /// Last unix timestamp at which the permit is accepted
    pub deadline: i64,
}

impl Permit {
    /// Hash of the message fields under [`PERMIT_TYPE`].
    pub fn struct_hash(&self) -> [u8; 32] {
        let type_hash = hash(PERMIT_TYPE.as_bytes());
        hashv(&[
            type_hash.as_ref(),
            self.owner.as_ref(),
            self.spender.as_ref(),
            &self.value.to_le_bytes(),
            &self.nonce.to_le_bytes(),
            &self.deadline.to_le_bytes(),
        ])
        .to_bytes()
    }

    /// Digest the owner signs: prefix ‖ domain separator ‖ struct hash.
    pub fn digest(&self, domain_separator: &[u8; 32]) -> [u8; 32] {
        hashv(&[PERMIT_DIGEST_PREFIX, domain_separator, &self.struct_hash()]).to_bytes()
    }
}

/// Domain separator of a pool's share token.
pub fn domain_separator(token_name: &str, chain_id: u64, verifying_pool: &Pubkey) -> [u8; 32] {
    let type_hash = hash(PERMIT_DOMAIN_TYPE.as_bytes());
    let name_hash = hash(token_name.as_bytes());
    let version_hash = hash(LP_TOKEN_VERSION.as_bytes());
    hashv(&[
        type_hash.as_ref(),
        name_hash.as_ref(),
        version_hash.as_ref(),
        &chain_id.to_le_bytes(),
        verifying_pool.as_ref(),
    ])
    .to_bytes()
}

/// Signature verification capability
pub trait SignatureVerifier {
    /// True if `signature` is `signer`'s signature over `message`.
    fn verify(&self, signer: &Pubkey, message: &[u8], signature: &PermitSignature) -> bool;
}

/// Verifies ed25519 signatures, treating the signer's address as its public key
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, signer: &Pubkey, message: &[u8], signature: &PermitSignature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&signer.to_bytes()) else {
            return false;
        };
        key.verify(message, &Signature::from_bytes(&signature.0)).is_ok()
    }
}
