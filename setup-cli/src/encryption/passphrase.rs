//! Key passphrase held only in memory.
//!
//! The value is read from the terminal without echo, handed to gpg over
//! stdin, and zeroized when dropped. It never appears in argv, logs or
//! `Debug` output.

use crate::error::{SetupError, SetupResult};
use zeroize::Zeroize;

const PROMPT: &str = "GPG passphrase (for new key or future reference): ";

pub struct Passphrase {
    value: String,
}

impl Passphrase {
    pub fn new(mut value: String) -> SetupResult<Self> {
        if value.is_empty() {
            value.zeroize();
            return Err(SetupError::EmptyPassphrase);
        }
        Ok(Self { value })
    }

    /// Read the passphrase from the controlling terminal.
    pub fn prompt() -> SetupResult<Self> {
        let value = rpassword::read_password_from_tty(Some(PROMPT)).map_err(SetupError::Prompt)?;
        Self::new(value)
    }

    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl Drop for Passphrase {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}
