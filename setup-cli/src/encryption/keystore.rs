use super::{Identity, Passphrase};
use crate::error::SetupResult;
use std::path::Path;

/// Key algorithm for newly generated keys
pub const KEY_ALGORITHM: &str = "rsa4096";
/// Capabilities of newly generated keys
pub const KEY_USAGE: &str = "sign,encrypt";

/// The four keystore capabilities the setup workflow relies on.
pub trait Keystore {
    /// Whether a secret key for `identity` exists. Any failure of the probe
    /// itself reads as "no".
    fn has_secret_key(&self, identity: &Identity) -> bool;

    /// Create a signing + encryption keypair bound to `identity`.
    fn generate_key(
        &self,
        identity: &Identity,
        passphrase: &Passphrase,
        expire: &str,
    ) -> SetupResult<()>;

    /// Encrypt `source` for `recipient`, replacing `output` if it exists.
    fn encrypt_file(&self, recipient: &Identity, source: &Path, output: &Path) -> SetupResult<()>;

    /// ASCII-armored secret key of `identity`.
    fn export_secret_key(&self, identity: &Identity, passphrase: &Passphrase)
        -> SetupResult<Vec<u8>>;
}
