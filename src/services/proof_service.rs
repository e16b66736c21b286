use crate::{
    config::Config,
    errors::ServiceError,
    imaging::{recover_token, stamp_token, QrLayout, QrRenderer, QrScanner, Raster},
    models::responses::VerifyResponse,
    proof::{freshness, issue_token, Claim, Signer, Verifier},
};
use chrono::{DateTime, Utc};

/// Issues and checks proof tokens with the key material loaded at startup.
pub struct ProofService {
    signer: Result<Signer, String>,
    verifier: Result<Verifier, String>,
}

impl ProofService {
    pub fn new(signer: Option<Signer>, verifier: Option<Verifier>) -> Self {
        let verifier = verifier.or_else(|| signer.as_ref().map(|s| Verifier::new(s.verifying_key())));
        Self {
            signer: signer.ok_or_else(|| "signing key is not configured".to_string()),
            verifier: verifier.ok_or_else(|| "public key is not configured".to_string()),
        }
    }

    /// Loads keys once. Problems are logged and surface as errors on the
    /// requests that need the key, so a verifier-only deployment still starts.
    pub fn from_config(config: &Config) -> Self {
        let signer = config.signer().map_err(|e| {
            log::error!("Signing disabled: {}", e);
            e.to_string()
        });

        let verifier = match config.verifier() {
            Some(Ok(verifier)) => {
                if let Ok(signer) = &signer {
                    if Verifier::new(signer.verifying_key()) != verifier {
                        log::warn!("Configured public key does not match the signing key");
                    }
                }
                Ok(verifier)
            }
            Some(Err(e)) => {
                log::error!("Verification disabled: {}", e);
                Err(e.to_string())
            }
            None => match &signer {
                Ok(signer) => Ok(Verifier::new(signer.verifying_key())),
                Err(_) => {
                    log::error!("Verification disabled: no public key available");
                    Err("public key is not configured".to_string())
                }
            },
        };

        Self { signer, verifier }
    }

    fn signer(&self) -> Result<&Signer, ServiceError> {
        self.signer
            .as_ref()
            .map_err(|e| ServiceError::KeyUnavailable(e.clone()))
    }

    fn verifier(&self) -> Result<&Verifier, ServiceError> {
        self.verifier
            .as_ref()
            .map_err(|e| ServiceError::KeyUnavailable(e.clone()))
    }

    pub fn public_key_base64(&self) -> Result<String, ServiceError> {
        Ok(self.verifier()?.public_key_base64())
    }

    /// Signs a validated claim into a token.
    pub fn issue(&self, claim: &Claim) -> Result<String, ServiceError> {
        let token = issue_token(claim, self.signer()?)?;
        log::info!(
            "Issued token for {} (nonce {}, expires {})",
            claim.handle,
            claim.nonce,
            claim.expires_at
        );
        Ok(token)
    }

    /// Verifies a token and reports the recovered claim with its freshness at `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifyResponse, ServiceError> {
        let payload_json = self.verifier()?.verify(token).map_err(|e| {
            log::warn!("Token rejected: {}", e);
            e
        })?;

        let claim = match Claim::from_payload(&payload_json) {
            Ok(claim) => Some(claim),
            Err(e) => {
                log::warn!("Verified payload is not a current claim: {}", e);
                None
            }
        };
        let freshness = claim
            .as_ref()
            .map(|claim| freshness::evaluate(claim, now))
            .unwrap_or(freshness::Freshness::Unparseable);

        Ok(VerifyResponse {
            ok: true,
            payload_json,
            claim,
            freshness,
        })
    }

    /// Issues a token for `claim` and stamps it into `raster` as a QR code.
    pub fn stamp<R: QrRenderer + ?Sized>(
        &self,
        renderer: &R,
        raster: &mut Raster,
        claim: &Claim,
    ) -> Result<QrLayout, ServiceError> {
        let token = self.issue(claim)?;
        Ok(stamp_token(renderer, raster, &token)?)
    }

    /// Scans `raster` for a proof QR code and verifies what it carries.
    pub fn verify_image<S: QrScanner + ?Sized>(
        &self,
        scanner: &S,
        raster: &Raster,
        now: DateTime<Utc>,
    ) -> Result<VerifyResponse, ServiceError> {
        let token = recover_token(scanner, raster)?;
        self.verify(&token, now)
    }
}
