use crate::proof::error::ProofError;
use crate::utils::random_hex;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Schema version carried in every canonical payload as `v`.
pub const PAYLOAD_VERSION: u64 = 1;

/// Number of random bytes behind a freshly issued nonce.
const NONCE_BYTES: usize = 8;

/// The fact set that gets signed and embedded in a proof image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub handle: String,
    pub challenge: String,
    pub issued_at: String,
    pub expires_at: String,
    pub nonce: String,
}

impl Claim {
    /// Builds a claim the way the upload page does: today's date as `issuedAt`,
    /// a millisecond ISO-8601 `expiresAt`, and a random hex nonce.
    pub fn issue(
        handle: impl Into<String>,
        challenge: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, ProofError> {
        let claim = Claim {
            handle: handle.into(),
            challenge: challenge.into(),
            issued_at: now.format("%Y-%m-%d").to_string(),
            expires_at: (now + ttl).to_rfc3339_opts(SecondsFormat::Millis, true),
            nonce: random_hex(NONCE_BYTES),
        };
        claim.validate()?;
        Ok(claim)
    }

    /// Checks that every field is present, reporting the first empty one.
    pub fn validate(&self) -> Result<(), ProofError> {
        let fields = [
            ("handle", &self.handle),
            ("challenge", &self.challenge),
            ("issuedAt", &self.issued_at),
            ("expiresAt", &self.expires_at),
            ("nonce", &self.nonce),
        ];
        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(ProofError::InvalidClaim(*name)),
            None => Ok(()),
        }
    }

    /// Parses verified payload text back into a claim.
    pub fn from_payload(payload: &str) -> Result<Self, ProofError> {
        #[derive(Deserialize)]
        struct Versioned {
            #[serde(flatten)]
            claim: Claim,
            v: u64,
        }

        let parsed: Versioned =
            serde_json::from_str(payload).map_err(|_| ProofError::InvalidClaim("payload"))?;
        if parsed.v != PAYLOAD_VERSION {
            return Err(ProofError::InvalidClaim("v"));
        }
        parsed.claim.validate()?;
        Ok(parsed.claim)
    }
}

/// Produces the canonical byte encoding of a claim.
///
/// The six keys are held in a `BTreeMap` so serialization always emits them in
/// lexicographic order, as compact JSON.
pub fn encode(claim: &Claim) -> Result<Vec<u8>, ProofError> {
    claim.validate()?;

    let mut fields: BTreeMap<&'static str, Value> = BTreeMap::new();
    fields.insert("handle", Value::from(claim.handle.as_str()));
    fields.insert("challenge", Value::from(claim.challenge.as_str()));
    fields.insert("issuedAt", Value::from(claim.issued_at.as_str()));
    fields.insert("expiresAt", Value::from(claim.expires_at.as_str()));
    fields.insert("nonce", Value::from(claim.nonce.as_str()));
    fields.insert("v", Value::from(PAYLOAD_VERSION));

    serde_json::to_vec(&fields).map_err(|_| ProofError::InvalidClaim("payload"))
}
