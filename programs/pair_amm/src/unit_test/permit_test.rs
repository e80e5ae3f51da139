// Tests for signed share approvals.

use crate::errors::ErrorCode;
use crate::permit::*;
use crate::unit_test::test_utils::*;
use anchor_lang::prelude::*;
use ed25519_dalek::{Signer, SigningKey};

#[cfg(test)]
mod tests {
    use super::*;

    struct Signer25519 {
        key: SigningKey,
    }

    impl Signer25519 {
        fn new(seed: u8) -> Self {
            Self {
                key: SigningKey::from_bytes(&[seed; 32]),
            }
        }

        fn address(&self) -> Pubkey {
            Pubkey::new_from_array(self.key.verifying_key().to_bytes())
        }

        fn sign(&self, domain_separator: &[u8; 32], permit: &Permit) -> PermitSignature {
            PermitSignature(self.key.sign(&permit.digest(domain_separator)).to_bytes())
        }
    }

    fn permit_for(owner: Pubkey, nonce: u64, deadline: i64) -> Permit {
        Permit {
            owner,
            spender: other(),
            value: 1_000,
            nonce,
            deadline,
        }
    }

    #[test]
    fn test_permit_sets_allowance_and_consumes_nonce() {
        let mut env = TestEnv::new();
        let signer = Signer25519::new(7);
        let owner = signer.address();
        let deadline = START_TIME + 100;
        let signature = signer.sign(
            &env.exchange.domain_separator(&env.pool),
            &permit_for(owner, 0, deadline),
        );

        let pool = env.pool;
        env.exchange
            .permit(pool, owner, other(), 1_000, deadline, &signature, &Ed25519Verifier)
            .unwrap();
        assert_eq!(
            env.exchange.share_allowance(&pool, &owner, &other()).unwrap(),
            1_000
        );
        assert_eq!(env.exchange.share_nonce(&pool, &owner).unwrap(), 1);

        // replaying the same signature now binds the wrong nonce
        let result = env
            .exchange
            .permit(pool, owner, other(), 1_000, deadline, &signature, &Ed25519Verifier);
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidSignature.into());
    }

    #[test]
    fn test_permit_rejects_expired_deadline() {
        let mut env = TestEnv::new();
        let signer = Signer25519::new(7);
        let owner = signer.address();
        let deadline = START_TIME - 1;
        let signature = signer.sign(
            &env.exchange.domain_separator(&env.pool),
            &permit_for(owner, 0, deadline),
        );
        let pool = env.pool;
        let result = env
            .exchange
            .permit(pool, owner, other(), 1_000, deadline, &signature, &Ed25519Verifier);
        assert_eq!(result.err().unwrap(), ErrorCode::Expired.into());
    }

    #[test]
    fn test_permit_rejects_wrong_signer_value_or_nonce() {
        let mut env = TestEnv::new();
        let signer = Signer25519::new(7);
        let impostor = Signer25519::new(8);
        let owner = signer.address();
        let deadline = START_TIME + 100;
        let domain = env.exchange.domain_separator(&env.pool);
        let pool = env.pool;

        let forged = impostor.sign(&domain, &permit_for(owner, 0, deadline));
        let result = env
            .exchange
            .permit(pool, owner, other(), 1_000, deadline, &forged, &Ed25519Verifier);
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidSignature.into());

        let signature = signer.sign(&domain, &permit_for(owner, 0, deadline));
        let result = env
            .exchange
            .permit(pool, owner, other(), 1_001, deadline, &signature, &Ed25519Verifier);
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidSignature.into());

        let future_nonce = signer.sign(&domain, &permit_for(owner, 1, deadline));
        let result = env
            .exchange
            .permit(pool, owner, other(), 1_000, deadline, &future_nonce, &Ed25519Verifier);
        assert_eq!(result.err().unwrap(), ErrorCode::InvalidSignature.into());
        assert_eq!(env.exchange.share_nonce(&pool, &owner).unwrap(), 0);
    }

    #[test]
    fn test_domain_separator_binds_pool_and_chain() {
        let pool_a = mock_pubkey(30);
        let pool_b = mock_pubkey(31);
        let domain = domain_separator("Fluxa V2", 1, &pool_a);
        assert_eq!(domain, domain_separator("Fluxa V2", 1, &pool_a));
        assert_ne!(domain, domain_separator("Fluxa V2", 1, &pool_b));
        assert_ne!(domain, domain_separator("Fluxa V2", 2, &pool_a));
        assert_ne!(domain, domain_separator("Other", 1, &pool_a));
    }

    #[test]
    fn test_verifier_checks_signer_key() {
        let signer = Signer25519::new(7);
        let permit = permit_for(signer.address(), 0, 0);
        let domain = [0u8; 32];
        let signature = signer.sign(&domain, &permit);
        let digest = permit.digest(&domain);
        assert!(Ed25519Verifier.verify(&signer.address(), &digest, &signature));
        assert!(!Ed25519Verifier.verify(&mock_pubkey(3), &digest, &signature));
    }
}
