//! Encrypted strategy setup.
//!
//! Resolves the player's key identity, makes sure a GPG keypair exists for
//! it, encrypts the plaintext strategy for that identity, and exports the
//! private key so it can be stored as a CI secret.
//!
//! The keystore is reached only through [`Keystore`]; [`GpgKeystore`] is the
//! real implementation and tests substitute an in-memory one.

pub mod export;
pub mod gpg;
pub mod identity;
pub mod keystore;
pub mod passphrase;
pub mod workflow;

pub use export::{next_steps, ExportedKey};
pub use gpg::GpgKeystore;
pub use identity::Identity;
pub use keystore::Keystore;
pub use passphrase::Passphrase;
pub use workflow::{run_setup, SetupOptions, SetupReport};
