//! gpg-backed keystore.
//!
//! Unit tests here use `true`/`false` as stand-in programs. The round trip
//! against a real gpg (fresh key in a temporary homedir, two encryptions that
//! differ byte-wise but both decrypt, armored export) is ignored by default;
//! run it with `cargo test -p shootout-setup -- --ignored`.

use super::keystore::{Keystore, KEY_ALGORITHM, KEY_USAGE};
use super::{Identity, Passphrase};
use crate::error::{SetupError, SetupResult};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// [`Keystore`] backed by the `gpg` command line tool.
#[derive(Debug, Clone)]
pub struct GpgKeystore {
    program: PathBuf,
    homedir: Option<PathBuf>,
}

impl GpgKeystore {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            homedir: None,
        }
    }

    /// Use a keyring other than the default (`--homedir`).
    pub fn with_homedir(mut self, homedir: impl Into<PathBuf>) -> Self {
        self.homedir = Some(homedir.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(homedir) = &self.homedir {
            command.arg("--homedir").arg(homedir);
        }
        command
    }

    /// Run gpg and return its stdout. A passphrase, if any, is written to
    /// stdin for `--passphrase-fd 0`.
    fn run(
        &self,
        operation: &'static str,
        args: Vec<OsString>,
        passphrase: Option<&Passphrase>,
    ) -> SetupResult<Vec<u8>> {
        let process_error = |source: io::Error| SetupError::Process {
            program: self.program.display().to_string(),
            source,
        };

        let stdin = if passphrase.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = self
            .command()
            .args(args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(process_error)?;

        if let (Some(passphrase), Some(mut stdin)) = (passphrase, child.stdin.take()) {
            let written = stdin
                .write_all(passphrase.expose().as_bytes())
                .and_then(|_| stdin.write_all(b"\n"));
            // A child that exits before reading stdin reports its own failure below
            match written {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(process_error(e)),
                _ => {}
            }
        }

        let output = child.wait_with_output().map_err(process_error)?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(SetupError::ExternalTool {
                operation,
                // Killed by a signal: no code to forward
                code: output.status.code().unwrap_or(1),
                stderr: stderr.into_owned(),
            });
        }

        if !stderr.trim().is_empty() {
            debug!("gpg {}: {}", operation, stderr.trim());
        }
        Ok(output.stdout)
    }
}

fn list_secret_keys_args(identity: &Identity) -> Vec<OsString> {
    ["--batch", "--list-secret-keys", identity.as_str()]
        .map(OsString::from)
        .to_vec()
}

fn generate_args(identity: &Identity, expire: &str) -> Vec<OsString> {
    [
        "--batch",
        "--pinentry-mode",
        "loopback",
        "--passphrase-fd",
        "0",
        "--quick-gen-key",
        identity.as_str(),
        KEY_ALGORITHM,
        KEY_USAGE,
        expire,
    ]
    .map(OsString::from)
    .to_vec()
}

fn encrypt_args(recipient: &Identity, source: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["--batch", "--yes", "--output"]
        .map(OsString::from)
        .to_vec();
    args.push(output.as_os_str().to_owned());
    args.extend(["--encrypt", "--recipient", recipient.as_str()].map(OsString::from));
    args.push(source.as_os_str().to_owned());
    args
}

fn export_args(identity: &Identity) -> Vec<OsString> {
    [
        "--batch",
        "--pinentry-mode",
        "loopback",
        "--passphrase-fd",
        "0",
        "--armor",
        "--export-secret-keys",
        identity.as_str(),
    ]
    .map(OsString::from)
    .to_vec()
}

impl Keystore for GpgKeystore {
    fn has_secret_key(&self, identity: &Identity) -> bool {
        self.command()
            .args(list_secret_keys_args(identity))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn generate_key(
        &self,
        identity: &Identity,
        passphrase: &Passphrase,
        expire: &str,
    ) -> SetupResult<()> {
        self.run("key generation", generate_args(identity, expire), Some(passphrase))?;
        Ok(())
    }

    fn encrypt_file(&self, recipient: &Identity, source: &Path, output: &Path) -> SetupResult<()> {
        self.run("encryption", encrypt_args(recipient, source, output), None)?;
        Ok(())
    }

    fn export_secret_key(
        &self,
        identity: &Identity,
        passphrase: &Passphrase,
    ) -> SetupResult<Vec<u8>> {
        self.run("secret key export", export_args(identity), Some(passphrase))
    }
}
