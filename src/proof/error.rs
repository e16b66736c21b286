use std::fmt;
use thiserror::Error;

/// Which half of a token a decode failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Message,
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Message => f.write_str("message"),
            Segment::Signature => f.write_str("signature"),
        }
    }
}

/// Reasons a token string could not be split into message and signature bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDecodeError {
    #[error("expected 2 dot-separated segments, found {0}")]
    SegmentCount(usize),
    #[error("{0} segment is empty")]
    EmptySegment(Segment),
    #[error("{segment} segment is not valid base64url: {source}")]
    Base64 {
        segment: Segment,
        #[source]
        source: base64::DecodeError,
    },
}

/// Failures of the signed-claim protocol.
///
/// Every core operation reports one of these instead of panicking; mapping them
/// to user-facing responses is left to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    #[error("invalid claim: {0} is required")]
    InvalidClaim(&'static str),
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
    #[error("malformed token: {0}")]
    MalformedToken(#[from] TokenDecodeError),
    #[error("signature invalid")]
    SignatureInvalid,
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

impl ProofError {
    /// Stable name of the failure kind, used in HTTP error bodies and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            ProofError::InvalidClaim(_) => "InvalidClaim",
            ProofError::InvalidKeyMaterial(_) => "InvalidKeyMaterial",
            ProofError::MalformedToken(_) => "MalformedToken",
            ProofError::SignatureInvalid => "SignatureInvalid",
            ProofError::InvalidPublicKey(_) => "InvalidPublicKey",
        }
    }
}
