mod encryption;
mod error;

use clap::Parser;
use encryption::{next_steps, run_setup, GpgKeystore, Identity, Passphrase, SetupOptions, SetupReport};
use error::SetupResult;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "shootout-setup")]
#[command(about = "Generate/refresh the encrypted strategy payload and export the private key")]
struct Cli {
    /// Player name used as the GPG key identity
    #[arg(env = "PLAYER_NAME")]
    player_name: Option<String>,

    /// GPG identity to use (overrides the player name)
    #[arg(long)]
    recipient: Option<String>,

    /// Key expiry for a newly generated key. Ignored if the key already exists
    #[arg(long = "expire", default_value = "1y")]
    expire: String,

    /// Plaintext strategy file
    #[arg(long, default_value = "strategy.py")]
    source: PathBuf,

    /// Encrypted output file
    #[arg(long, default_value = "strategy.py.gpg")]
    output: PathBuf,

    /// Directory for private-key.asc and private-key.asc.b64
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// gpg executable
    #[arg(long, env = "GPG_PROGRAM", default_value = "gpg")]
    gpg_program: PathBuf,

    /// Alternative GnuPG home directory
    #[arg(long)]
    gpg_homedir: Option<PathBuf>,
}

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shootout_setup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(report) => {
            if report.generated_key {
                info!("[setup] New key generated; back it up before deleting the exports");
            }
            info!("[setup] Encrypted payload ready at {}", report.ciphertext.display());
            println!("{}", next_steps(&report.exported));
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(err.exit_code());
        }
    }
}

/// The passphrase lives only inside this call, so it is zeroized before
/// `main` can exit the process.
fn run(cli: Cli) -> SetupResult<SetupReport> {
    let identity = Identity::resolve(cli.recipient.as_deref(), cli.player_name.as_deref())?;
    let passphrase = Passphrase::prompt()?;

    let mut keystore = GpgKeystore::new(cli.gpg_program);
    if let Some(homedir) = cli.gpg_homedir {
        keystore = keystore.with_homedir(homedir);
    }

    let options = SetupOptions {
        identity,
        expire: cli.expire,
        source: cli.source,
        output: cli.output,
        export_dir: cli.export_dir,
    };

    run_setup(&keystore, &options, &passphrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["shootout-setup", "bot1"]).unwrap();
        assert_eq!(cli.player_name.as_deref(), Some("bot1"));
        assert_eq!(cli.recipient, None);
        assert_eq!(cli.expire, "1y");
        assert_eq!(cli.source, PathBuf::from("strategy.py"));
        assert_eq!(cli.output, PathBuf::from("strategy.py.gpg"));
        assert_eq!(cli.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "shootout-setup",
            "--recipient",
            "ops@example.com",
            "--expire",
            "2y",
            "--source",
            "bots/strategy.py",
            "--output",
            "bots/strategy.py.gpg",
        ])
        .unwrap();
        assert_eq!(cli.recipient.as_deref(), Some("ops@example.com"));
        assert_eq!(cli.expire, "2y");
        assert_eq!(cli.source, PathBuf::from("bots/strategy.py"));
        assert_eq!(cli.output, PathBuf::from("bots/strategy.py.gpg"));
    }
}
