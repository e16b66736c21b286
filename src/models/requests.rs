use crate::proof::Claim;
use serde::Deserialize;
use validator::Validate;

/// Longest accepted claim field, mirrored by the `max` validators below. Keeps
/// the resulting token well inside what a quartile-level QR symbol can carry.
pub const MAX_FIELD_CHARS: u64 = 128;

/// Request structure for issuing a token
///
/// Absent fields deserialize as empty strings; the resulting claim is then
/// rejected with `InvalidClaim` before anything is signed.
///
/// # Examples
///
/// ```rust
/// use trade_proof::models::requests::SignRequest;
///
/// let request: SignRequest = serde_json::from_str(
///     r#"{"handle":"@alice","challenge":"banana","issuedAt":"2024-01-01",
///         "expiresAt":"2024-01-01T01:00:00Z","nonce":"deadbeef"}"#,
/// ).unwrap();
/// assert_eq!(request.into_claim().nonce, "deadbeef");
/// ```
#[derive(Debug, Default, Validate, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignRequest {
    #[validate(length(max = "MAX_FIELD_CHARS"))]
    pub handle: String,
    #[validate(length(max = "MAX_FIELD_CHARS"))]
    pub challenge: String,
    #[validate(length(max = "MAX_FIELD_CHARS"))]
    pub issued_at: String,
    #[validate(length(max = "MAX_FIELD_CHARS"))]
    pub expires_at: String,
    #[validate(length(max = "MAX_FIELD_CHARS"))]
    pub nonce: String,
}

impl SignRequest {
    pub fn into_claim(self) -> Claim {
        Claim {
            handle: self.handle,
            challenge: self.challenge,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            nonce: self.nonce,
        }
    }
}

/// Request structure for verifying a token recovered from an image
#[derive(Debug, Validate, Deserialize)]
pub struct VerifyRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::ProofError;

    #[test]
    fn test_missing_fields_become_empty_claim_fields() {
        let request: SignRequest = serde_json::from_str(r#"{"handle":"@alice"}"#).unwrap();
        assert_eq!(request.challenge, "");
        assert!(request.validate().is_ok());
        assert_eq!(
            request.into_claim().validate(),
            Err(ProofError::InvalidClaim("challenge"))
        );
    }

    #[test]
    fn test_overlong_field_fails_validation() {
        let request = SignRequest {
            handle: "@alice".to_string(),
            challenge: "x".repeat(MAX_FIELD_CHARS as usize + 1),
            issued_at: "2024-01-01".to_string(),
            expires_at: "2024-01-01T01:00:00Z".to_string(),
            nonce: "deadbeef".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("challenge"));

        let at_limit = SignRequest {
            challenge: "x".repeat(MAX_FIELD_CHARS as usize),
            ..request
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_into_claim_maps_camel_case_fields() {
        let request: SignRequest = serde_json::from_str(
            r#"{"nonce":"n","expiresAt":"e","issuedAt":"i","challenge":"c","handle":"h"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        let claim = request.into_claim();
        assert_eq!(
            (claim.issued_at.as_str(), claim.expires_at.as_str()),
            ("i", "e")
        );
    }
}
