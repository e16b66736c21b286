use crate::utils::encode_base64;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use std::io;
use std::path::Path;

pub const SIGNING_KEY_FILE: &str = "signing.key";
pub const PUBLIC_KEY_FILE: &str = "public.key";

/// A freshly generated Ed25519 key pair, base64-encoded for operator storage.
pub struct KeyPair {
    /// 64 bytes: seed followed by public key
    pub signing_key_base64: String,
    /// 32 bytes
    pub public_key_base64: String,
}

impl KeyPair {
    /// Lines ready to paste into a `.env` file.
    pub fn env_lines(&self) -> String {
        format!(
            "SIGNING_KEY_BASE64={}\nPUBLIC_KEY_BASE64={}\n",
            self.signing_key_base64, self.public_key_base64
        )
    }

    /// Writes both keys into `output_dir`, creating it if needed.
    pub fn write_to(&self, output_dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(output_dir)?;
        write_private(&output_dir.join(SIGNING_KEY_FILE), &self.signing_key_base64)?;
        std::fs::write(output_dir.join(PUBLIC_KEY_FILE), &self.public_key_base64)?;
        Ok(())
    }
}

/// Writes `contents` readable by the owner only. An existing file is truncated
/// and also restricted.
#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    use std::fs::{OpenOptions, Permissions};
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    std::fs::write(path, contents)
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key_base64", &self.public_key_base64)
            .finish_non_exhaustive()
    }
}

/// Generates a signing key pair from the OS CSPRNG.
pub fn generate_key_pair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    KeyPair {
        signing_key_base64: encode_base64(&signing_key.to_keypair_bytes()),
        public_key_base64: encode_base64(signing_key.verifying_key().as_bytes()),
    }
}
