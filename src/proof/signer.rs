use crate::proof::error::ProofError;
use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey, KEYPAIR_LENGTH, SIGNATURE_LENGTH};
use std::fmt;

/// Holds the server's Ed25519 signing key.
///
/// Built once from configuration and never mutated afterwards; share it behind
/// an `Arc` rather than reloading it per request.
#[derive(Clone)]
pub struct Signer {
    signing_key: SigningKey,
}

impl Signer {
    /// Accepts the 64-byte key pair layout (32-byte seed followed by the
    /// 32-byte public key) that the key provisioner emits.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        let keypair: &[u8; KEYPAIR_LENGTH] = bytes.try_into().map_err(|_| {
            ProofError::InvalidKeyMaterial(format!(
                "need {} bytes, got {}",
                KEYPAIR_LENGTH,
                bytes.len()
            ))
        })?;
        let signing_key = SigningKey::from_keypair_bytes(keypair).map_err(|_| {
            ProofError::InvalidKeyMaterial("public half does not match the seed".to_string())
        })?;
        Ok(Self { signing_key })
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Produces a detached signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("verifying_key", &hex::encode(self.verifying_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

/// Signs `message` with raw 64-byte key pair material.
pub fn sign(message: &[u8], private_key: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], ProofError> {
    Ok(Signer::from_keypair_bytes(private_key)?.sign(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::fixtures::{keypair_bytes, signer};
    use ed25519_dalek::{Signature, Verifier};

    #[test]
    fn test_sign_and_verify() {
        let message = b"hello world";
        let signature = sign(message, &keypair_bytes()).unwrap();

        let verifying_key = signer().verifying_key();
        assert!(verifying_key
            .verify(message, &Signature::from_bytes(&signature))
            .is_ok());
    }

    #[test]
    fn test_wrong_key_length_is_rejected() {
        let mut short = keypair_bytes().to_vec();
        short.pop();
        assert!(matches!(
            sign(b"msg", &short),
            Err(ProofError::InvalidKeyMaterial(_))
        ));

        let mut long = keypair_bytes().to_vec();
        long.push(0);
        assert!(matches!(
            sign(b"msg", &long),
            Err(ProofError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn test_mismatched_public_half_is_rejected() {
        let mut bytes = keypair_bytes();
        bytes[63] ^= 0x01;
        assert!(matches!(
            Signer::from_keypair_bytes(&bytes),
            Err(ProofError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn test_ed25519_signatures_are_deterministic() {
        assert_eq!(signer().sign(b"same"), signer().sign(b"same"));
    }

    #[test]
    fn test_debug_does_not_leak_private_key() {
        let debug_str = format!("{:?}", signer());
        assert!(debug_str.contains("verifying_key"));
        // seed bytes are 0x07 in the fixture
        assert!(!debug_str.contains("070707"));
    }
}
