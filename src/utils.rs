use base64::engine::general_purpose::STANDARD as Base64Engine;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Decodes standard (padded) base64 key material, ignoring surrounding whitespace
/// left behind by `.env` files and copy-paste.
pub fn decode_base64(value: &str) -> Result<Vec<u8>, base64::DecodeError> {
    Base64Engine.decode(value.trim())
}

/// Encodes key material as standard base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    Base64Engine.encode(bytes)
}

/// Returns `len` bytes from the OS random source as lowercase hex.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
