use crate::errors::{ConfigError, ServiceError};
use crate::proof::{Signer, Verifier};
use crate::utils::decode_base64;
use std::env;
use std::num::NonZeroU32;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8081";
const DEFAULT_SIGN_REQUESTS_PER_MINUTE: u32 = 30;
const DEFAULT_SIGN_BURST_SIZE: u32 = 5;

pub const SIGNING_KEY_VAR: &str = "SIGNING_KEY_BASE64";
pub const PUBLIC_KEY_VAR: &str = "PUBLIC_KEY_BASE64";

/// Configuration settings
#[derive(Clone)]
pub struct Config {
    pub bind_address: String,
    // Base64-encoded 64-byte key pair
    signing_key: Option<String>,
    // Base64-encoded 32-byte public key
    public_key: Option<String>,
    pub sign_requests_per_minute: NonZeroU32,
    pub sign_burst_size: NonZeroU32,
}

impl Config {
    /// Loads configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Config {
            bind_address: non_empty("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            signing_key: non_empty(SIGNING_KEY_VAR),
            public_key: non_empty(PUBLIC_KEY_VAR),
            sign_requests_per_minute: parse_non_zero(
                "SIGN_REQUESTS_PER_MINUTE",
                non_empty("SIGN_REQUESTS_PER_MINUTE"),
                DEFAULT_SIGN_REQUESTS_PER_MINUTE,
            )?,
            sign_burst_size: parse_non_zero(
                "SIGN_BURST_SIZE",
                non_empty("SIGN_BURST_SIZE"),
                DEFAULT_SIGN_BURST_SIZE,
            )?,
        })
    }

    /// Decodes the signing key pair. Missing or malformed material is reported,
    /// never panicked on.
    pub fn signer(&self) -> Result<Signer, ServiceError> {
        let encoded = self
            .signing_key
            .as_deref()
            .ok_or_else(|| ServiceError::KeyUnavailable(format!("{} is not set", SIGNING_KEY_VAR)))?;
        let bytes = decode_base64(encoded).map_err(|e| {
            ServiceError::KeyUnavailable(format!("{} is not valid base64: {}", SIGNING_KEY_VAR, e))
        })?;
        Ok(Signer::from_keypair_bytes(&bytes)?)
    }

    /// The distributed public key, if one is configured explicitly.
    pub fn verifier(&self) -> Option<Result<Verifier, ServiceError>> {
        self.public_key
            .as_deref()
            .map(|encoded| Verifier::from_base64(encoded).map_err(ServiceError::from))
    }
}

fn parse_non_zero(
    name: &'static str,
    value: Option<String>,
    default: u32,
) -> Result<NonZeroU32, ConfigError> {
    match value {
        None => Ok(NonZeroU32::new(default).unwrap_or(NonZeroU32::MIN)),
        Some(value) => value
            .trim()
            .parse::<NonZeroU32>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
