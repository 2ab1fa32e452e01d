//! credstore CLI - operator tooling for the credential store
//!
//! Computes and checks password hash records and measures how long the
//! configured work factor takes on this machine. Output goes to stdout, logs
//! go to stderr.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use credstore_core::{SecretString, Settings};

/// credstore - Argon2id credential hashing and verification
#[derive(Parser, Debug)]
#[command(name = "credstore")]
#[command(version)]
#[command(about = "Hash, verify and calibrate credstore password records")]
struct Args {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "CREDSTORE_CONFIG")]
    config: Option<PathBuf>,

    /// Password to hash or check; prompted for when absent
    #[arg(long, global = true, env = "CREDSTORE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash a password with the configured policy and print the record
    Hash,

    /// Check a password against a stored record
    Verify {
        /// PHC-formatted password hash record
        record: String,
    },

    /// Time registration and verification under the configured policy
    Calibrate {
        /// Number of verifications to average over
        #[arg(long, default_value = "5")]
        samples: u32,
    },

    /// Print the effective settings
    Config {
        /// Also write them to the settings file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = match args.config {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let settings = Settings::load(&config_path)
        .with_context(|| format!("Failed to load settings from {}", config_path.display()))?;
    debug!("Using settings from {:?}", config_path);

    match args.command {
        Command::Hash => {
            let password = read_password(args.password)?;
            let record = commands::hash(&password, &settings)?;
            println!("{}", record);
        }
        Command::Verify { record } => {
            let password = read_password(args.password)?;
            commands::verify(&password, &record)?;
            println!("Password matches");
        }
        Command::Calibrate { samples } => {
            let report = commands::calibrate(&settings, samples).await?;
            println!("{}", report);
        }
        Command::Config { write } => {
            let target = write.then_some(config_path.as_path());
            println!("{}", commands::config(&settings, target)?);
        }
    }

    Ok(())
}

/// Take the password from the command line or environment, else prompt for it
fn read_password(password: Option<String>) -> anyhow::Result<SecretString> {
    let password = SecretString::new(match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    });

    anyhow::ensure!(!password.is_empty(), "Password must not be empty");
    Ok(password)
}
