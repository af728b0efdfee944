use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing the encrypted strategy
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "GPG recipient name required. Either:\n  \
         - set the PLAYER_NAME environment variable, or\n  \
         - pass the player name as an argument: shootout-setup 'Your Player Name'"
    )]
    MissingIdentity,

    #[error("Passphrase cannot be empty.")]
    EmptyPassphrase,

    #[error("Failed to read passphrase: {0}")]
    Prompt(#[source] io::Error),

    #[error("{} not found. Create or decrypt your strategy first.", .0.display())]
    MissingSource(PathBuf),

    /// The tool could not be started or talked to
    #[error("Failed to run {program}: {source}")]
    Process { program: String, source: io::Error },

    /// The tool ran and exited non-zero; `stderr` is passed through untouched
    #[error("{operation} failed with exit code {code}\n{stderr}")]
    ExternalTool {
        operation: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("Secret key export for '{0}' produced no data")]
    EmptyExport(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl SetupError {
    /// Process exit code: the external tool's own code when it failed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalTool { code, .. } => *code,
            _ => 1,
        }
    }
}

pub type SetupResult<T> = Result<T, SetupError>;
