//! The signed-claim protocol.
//!
//! ```text
//! Claim ──encode──► canonical bytes ──sign──► signature
//!                          └──────────┬──────────┘
//!                                encode_token ──► "<msg>.<sig>" ──► QR
//!
//! QR data ──Verifier::verify──► payload text ──Claim::from_payload──► Claim
//! ```
//!
//! All operations here are synchronous and free of I/O, apart from key
//! generation reading the OS random source.

pub mod claim;
pub mod error;
pub mod freshness;
pub mod keygen;
pub mod signer;
pub mod token;
pub mod verifier;

pub use claim::{encode, Claim, PAYLOAD_VERSION};
pub use error::{ProofError, Segment, TokenDecodeError};
pub use freshness::Freshness;
pub use keygen::{generate_key_pair, KeyPair};
pub use signer::{sign, Signer};
pub use token::{decode_token, encode_token, Token};
pub use verifier::{verify, Verifier};

/// Encodes, signs and packs a claim into a token in one step.
pub fn issue_token(claim: &Claim, signer: &Signer) -> Result<String, ProofError> {
    let message = encode(claim)?;
    let signature = signer.sign(&message);
    Ok(encode_token(&message, &signature))
}
