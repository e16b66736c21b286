use crate::proof::error::ProofError;
use crate::proof::token::{decode_token, Token};
use crate::utils::{decode_base64, encode_base64};
use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH};

/// Checks tokens against one distributed public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verifier {
    verifying_key: VerifyingKey,
}

impl Verifier {
    pub fn new(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }

    /// Decodes a standard base64 public key for long-lived use. Beyond the
    /// 32-byte length, the key must also be a valid curve point.
    pub fn from_base64(public_key: &str) -> Result<Self, ProofError> {
        let bytes = decode_public_key(public_key)?;
        let verifying_key = VerifyingKey::from_bytes(&bytes)
            .map_err(|_| ProofError::InvalidPublicKey("not a valid Ed25519 point".to_string()))?;
        Ok(Self { verifying_key })
    }

    pub fn public_key_base64(&self) -> String {
        encode_base64(self.verifying_key.as_bytes())
    }

    /// Decodes `token`, checks its signature and returns the signed payload text.
    ///
    /// Expiry is not evaluated here; see [`crate::proof::freshness`].
    pub fn verify(&self, token: &str) -> Result<String, ProofError> {
        check_signature(&self.verifying_key, &decode_token(token)?)
    }
}

fn decode_public_key(public_key: &str) -> Result<[u8; PUBLIC_KEY_LENGTH], ProofError> {
    let bytes = decode_base64(public_key)
        .map_err(|e| ProofError::InvalidPublicKey(format!("not base64: {e}")))?;
    bytes.as_slice().try_into().map_err(|_| {
        ProofError::InvalidPublicKey(format!(
            "need {} bytes, got {}",
            PUBLIC_KEY_LENGTH,
            bytes.len()
        ))
    })
}

fn check_signature(verifying_key: &VerifyingKey, token: &Token) -> Result<String, ProofError> {
    let signature =
        Signature::from_slice(&token.signature).map_err(|_| ProofError::SignatureInvalid)?;
    verifying_key
        .verify_strict(&token.message, &signature)
        .map_err(|_| ProofError::SignatureInvalid)?;

    Ok(String::from_utf8_lossy(&token.message).into_owned())
}

/// One-shot verification against a base64 public key.
///
/// Only the key's length is checked up front. Any 32 bytes are accepted, and
/// a key that is not a curve point simply fails to verify the signature.
pub fn verify(token: &str, public_key: &str) -> Result<String, ProofError> {
    let key_bytes = decode_public_key(public_key)?;
    let token = decode_token(token)?;
    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| ProofError::SignatureInvalid)?;
    check_signature(&verifying_key, &token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::claim::encode;
    use crate::proof::error::TokenDecodeError;
    use crate::proof::fixtures::{alice, public_key_base64, signer};
    use crate::proof::token::encode_token;

    const ALICE_TEXT: &str = r#"{"challenge":"banana","expiresAt":"2024-01-01T01:00:00Z","handle":"@alice","issuedAt":"2024-01-01","nonce":"deadbeef","v":1}"#;

    fn alice_token() -> String {
        let message = encode(&alice()).unwrap();
        let signature = signer().sign(&message);
        encode_token(&message, &signature)
    }

    #[test]
    fn test_valid_token_returns_canonical_text() {
        assert_eq!(verify(&alice_token(), &public_key_base64()).unwrap(), ALICE_TEXT);
    }

    #[test]
    fn test_public_key_length_is_checked() {
        let short = encode_base64(&[1u8; 31]);
        let long = encode_base64(&[1u8; 33]);
        assert!(matches!(
            verify(&alice_token(), &short),
            Err(ProofError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            verify(&alice_token(), &long),
            Err(ProofError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            verify(&alice_token(), "%%%"),
            Err(ProofError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_public_key_is_checked_before_token() {
        assert!(matches!(
            verify("abc", &encode_base64(&[0u8; 5])),
            Err(ProofError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_malformed_token_keeps_decode_error() {
        assert_eq!(
            verify("a.b.c", &public_key_base64()),
            Err(ProofError::MalformedToken(TokenDecodeError::SegmentCount(3)))
        );
    }

    #[test]
    fn test_other_key_rejects_signature() {
        let other = crate::proof::keygen::generate_key_pair();
        assert_eq!(
            verify(&alice_token(), &other.public_key_base64),
            Err(ProofError::SignatureInvalid)
        );
    }

    #[test]
    fn test_tampered_message_rejects_signature() {
        let message = encode(&alice()).unwrap();
        let signature = signer().sign(&message);
        let forged = String::from_utf8(message)
            .unwrap()
            .replace("@alice", "@mallory");
        let token = encode_token(forged.as_bytes(), &signature);
        assert_eq!(
            verify(&token, &public_key_base64()),
            Err(ProofError::SignatureInvalid)
        );
    }

    #[test]
    fn test_truncated_signature_rejects_signature() {
        let message = encode(&alice()).unwrap();
        let signature = signer().sign(&message);
        let token = encode_token(&message, &signature[..63]);
        assert_eq!(
            verify(&token, &public_key_base64()),
            Err(ProofError::SignatureInvalid)
        );
    }

    // decompression fails for this encoding: y = 2 has no matching x
    const OFF_CURVE_KEY: [u8; 32] = {
        let mut key = [0u8; 32];
        key[0] = 2;
        key
    };

    #[test]
    fn test_off_curve_key_fails_signature_check() {
        let key = encode_base64(&OFF_CURVE_KEY);
        assert_eq!(
            verify(&alice_token(), &key),
            Err(ProofError::SignatureInvalid)
        );
        // the token is still decoded first
        assert_eq!(
            verify("abc", &key),
            Err(ProofError::MalformedToken(TokenDecodeError::SegmentCount(1)))
        );
    }

    #[test]
    fn test_configured_key_must_be_a_curve_point() {
        assert!(matches!(
            Verifier::from_base64(&encode_base64(&OFF_CURVE_KEY)),
            Err(ProofError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_public_key_round_trips_through_base64() {
        let verifier = Verifier::from_base64(&public_key_base64()).unwrap();
        assert_eq!(verifier.public_key_base64(), public_key_base64());
    }
}
