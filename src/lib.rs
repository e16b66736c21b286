//! Tamper-evident proof-of-trade images.
//!
//! A claim (handle, challenge phrase, timestamps, nonce) is encoded
//! canonically, signed with Ed25519 and packed into a `message.signature`
//! token that is stamped into a photo as a QR code. Verifiers scan the code
//! back out and check the signature against the distributed public key.

pub mod config;
pub mod errors;
pub mod imaging;
pub mod middleware;
pub mod models;
pub mod proof;
pub mod routes;
pub mod services;
pub mod utils;
