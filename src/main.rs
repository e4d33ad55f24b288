// upvpn - Command-line front end for upvpn-core
// Main entry point

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use upvpn_core::api::{UserCredentials, UserCredentialsWithCode};
use upvpn_core::config::{load_config, load_config_from, Config};
use upvpn_core::logging;
use upvpn_core::store::Location;
use upvpn_core::VpnRepository;

#[derive(Parser)]
#[command(name = "upvpn")]
#[command(author, version, about = "UpVPN device and location management")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create this device's identity if it does not exist yet
    Init,

    /// Show device and session state
    Status,

    /// Email a sign-up code
    RequestCode { email: String },

    /// Create an account with a code from request-code
    SignUp {
        email: String,
        /// Code received by email
        #[arg(long)]
        code: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Add this device to an account
    SignIn {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Remove this device from the account and forget it locally
    SignOut,

    /// List locations, refreshing from the server first
    Locations {
        /// Only show the cached catalog
        #[arg(long)]
        offline: bool,
    },

    /// Show recently used locations
    Recent {
        /// Maximum number of entries (defaults to config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Mark a location as just used
    Use { code: String },

    /// Show the cached catalog grouped by country
    Countries,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let repo = VpnRepository::from_config(&config).context("Failed to open repository")?;

    run(cli.command, &repo, &config).await
}

async fn run(command: Commands, repo: &VpnRepository, config: &Config) -> Result<()> {
    match command {
        Commands::Init => {
            let device = repo.ensure_device_exists().await?;
            println!("Device {} ({})", device.unique_id, device.name);
            println!("Public key: {}", device.public_key()?);
        }

        Commands::Status => {
            let device = repo.ensure_device_exists().await?;
            println!(
                "Device:   {} ({}, {} {})",
                device.unique_id, device.name, device.version, device.arch
            );
            println!(
                "Address:  {}",
                device.ipv4_address.as_deref().unwrap_or("not assigned")
            );
            match repo.is_signed_in().await? {
                Some(email) => println!("Signed in as {}", email),
                None => println!("Not signed in"),
            }
        }

        Commands::RequestCode { email } => {
            repo.request_code(&email).await?;
            println!("Code sent to {}", email);
        }

        Commands::SignUp {
            email,
            code,
            password,
        } => {
            let password = password_or_prompt(password)?;
            repo.sign_up(&UserCredentialsWithCode {
                email: email.clone(),
                password,
                code,
            })
            .await?;
            println!("Account created for {}. Run `upvpn sign-in {}` next.", email, email);
        }

        Commands::SignIn { email, password } => {
            if let Some(current) = repo.is_signed_in().await? {
                bail!("Already signed in as {}; sign out first", current);
            }
            let password = password_or_prompt(password)?;
            repo.register(&UserCredentials {
                email: email.clone(),
                password,
            })
            .await?;
            println!("Signed in as {}", email);
        }

        Commands::SignOut => {
            repo.sign_out().await?;
            println!("Signed out");
        }

        Commands::Locations { offline } => {
            let locations = if offline {
                repo.cached_locations().await?
            } else {
                let state = repo.load_locations().await?;
                if state.should_show_error() {
                    bail!(
                        "Could not load locations: {}",
                        state.fetch_error.unwrap_or_default()
                    );
                }
                if let Some(e) = &state.fetch_error {
                    eprintln!("Warning: showing cached locations ({})", e);
                }
                state.locations
            };
            print_locations(&locations);
        }

        Commands::Recent { limit } => {
            let limit = limit.unwrap_or(config.recent_locations_limit);
            print_locations(&repo.recent_locations(limit).await?);
        }

        Commands::Use { code } => {
            if repo.mark_recently_used(&code).await? {
                println!("Using {}", code);
            } else {
                bail!("Unknown location {}; run `upvpn locations` to refresh", code);
            }
        }

        Commands::Countries => {
            for country in repo.countries().await? {
                println!("{} ({})", country.name, country.code);
                for l in &country.locations {
                    println!("  {:<12} {}", l.code, l.display_name());
                }
            }
        }
    }

    Ok(())
}

fn print_locations(locations: &[Location]) {
    if locations.is_empty() {
        println!("No locations");
        return;
    }
    for l in locations {
        println!("{:<12} {:<24} {}", l.code, l.display_name(), l.country);
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    resolve_password(password, || rpassword::prompt_password("Password: "))
}

/// Use the password given on the command line, otherwise ask without echo.
fn resolve_password<F>(password: Option<String>, prompt: F) -> Result<String>
where
    F: FnOnce() -> std::io::Result<String>,
{
    let password = match password {
        Some(p) => p,
        None => prompt().context("Failed to read password")?,
    };
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_password_skips_prompt() {
        let password = resolve_password(Some("hunter2".to_string()), || {
            panic!("prompt must not run when --password is given")
        })
        .unwrap();
        assert_eq!(password, "hunter2");
    }

    #[test]
    fn test_prompted_password_is_used() {
        let password = resolve_password(None, || Ok("from-tty".to_string())).unwrap();
        assert_eq!(password, "from-tty");
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(resolve_password(None, || Ok(String::new())).is_err());
        assert!(resolve_password(Some(String::new()), || Ok("x".to_string())).is_err());
    }

    #[test]
    fn test_prompt_failure_is_reported() {
        let err = resolve_password(None, || {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no tty"))
        })
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read password"));
    }

    #[test]
    fn test_cli_parses_sign_in() {
        let cli = Cli::try_parse_from(["upvpn", "-v", "sign-in", "a@x.io", "--password", "pw"])
            .unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(
            cli.command,
            Commands::SignIn { ref email, password: Some(ref p) } if email == "a@x.io" && p == "pw"
        ));
    }
}
