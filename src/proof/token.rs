use crate::proof::error::{Segment, TokenDecodeError};
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use std::fmt;
use std::str::FromStr;

/// Separator between the message and signature segments.
pub const SEPARATOR: char = '.';

/// A canonical payload together with its detached signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub message: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Token {
    pub fn new(message: Vec<u8>, signature: Vec<u8>) -> Self {
        Self { message, signature }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_token(&self.message, &self.signature))
    }
}

impl FromStr for Token {
    type Err = TokenDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_token(s)
    }
}

/// Joins the unpadded base64url encodings of `message` and `signature` with a `.`.
pub fn encode_token(message: &[u8], signature: &[u8]) -> String {
    format!(
        "{}{}{}",
        URL_SAFE_NO_PAD.encode(message),
        SEPARATOR,
        URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Splits a token back into message and signature bytes.
pub fn decode_token(token: &str) -> Result<Token, TokenDecodeError> {
    let parts: Vec<&str> = token.split(SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(TokenDecodeError::SegmentCount(parts.len()));
    }

    Ok(Token {
        message: decode_segment(parts[0], Segment::Message)?,
        signature: decode_segment(parts[1], Segment::Signature)?,
    })
}

fn decode_segment(part: &str, segment: Segment) -> Result<Vec<u8>, TokenDecodeError> {
    if part.is_empty() {
        return Err(TokenDecodeError::EmptySegment(segment));
    }

    // Restore the stripped padding so the padded engine sees whole quanta.
    let mut padded = String::with_capacity(part.len() + 3);
    padded.push_str(part);
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    URL_SAFE
        .decode(padded)
        .map_err(|source| TokenDecodeError::Base64 { segment, source })
}
