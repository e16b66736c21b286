use crate::proof::{Claim, Freshness};
use serde::Serialize;

/// Response containing a freshly issued token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Outcome of a successful verification
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub ok: bool,
    /// Signed payload text exactly as recovered
    pub payload_json: String,
    /// `None` when the signed text is not a claim this service understands
    pub claim: Option<Claim>,
    pub freshness: Freshness,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub public_key: String,
}
