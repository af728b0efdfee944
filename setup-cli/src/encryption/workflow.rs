use super::export::{write_exported_key, ExportedKey};
use super::{Identity, Keystore, Passphrase};
use crate::error::{SetupError, SetupResult};
use std::path::PathBuf;
use tracing::info;
use zeroize::Zeroizing;

/// Inputs of one setup run, minus the passphrase.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub identity: Identity,
    /// Expiry for a newly generated key; ignored when the key exists
    pub expire: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub generated_key: bool,
    pub ciphertext: PathBuf,
    pub exported: ExportedKey,
}

/// Ensure a key exists, encrypt the strategy, and export the secret key.
///
/// Nothing is generated, encrypted or written when the plaintext source is
/// missing. An existing key is always reused.
pub fn run_setup<K: Keystore + ?Sized>(
    keystore: &K,
    options: &SetupOptions,
    passphrase: &Passphrase,
) -> SetupResult<SetupReport> {
    let identity = &options.identity;

    if !options.source.exists() {
        return Err(SetupError::MissingSource(options.source.clone()));
    }

    let generated_key = if keystore.has_secret_key(identity) {
        info!("[setup] Reusing existing GPG key '{}'", identity);
        false
    } else {
        info!("[setup] Generating GPG key for '{}'", identity);
        keystore.generate_key(identity, passphrase, &options.expire)?;
        true
    };

    info!(
        "[setup] Encrypting {} -> {}",
        options.source.display(),
        options.output.display()
    );
    keystore.encrypt_file(identity, &options.source, &options.output)?;

    info!("[setup] Exporting private key artefacts");
    let armored = Zeroizing::new(keystore.export_secret_key(identity, passphrase)?);
    if armored.is_empty() {
        return Err(SetupError::EmptyExport(identity.to_string()));
    }
    let exported = write_exported_key(&options.export_dir, &armored)?;
    info!(
        "[setup] Wrote {} and {}",
        exported.armored_path.display(),
        exported.encoded_path.display()
    );

    Ok(SetupReport {
        generated_key,
        ciphertext: options.output.clone(),
        exported,
    })
}
