//! Functionality relating to the `splitpage admin` subcommands.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use clap::Subcommand;
use tracing::info;

use crate::admin::credentials;
use crate::admin::password;
use crate::admin::password::AdminError;
use crate::admin::password::PasswordChange;
use crate::errors::exit;
use crate::errors::ExitCode;
use crate::store::memory::MemoryStore;
use crate::store::snapshot::Snapshot;

/// Subcommands under `splitpage admin`.
#[derive(Subcommand)]
pub enum AdminCommand {
    /// Change a user's password.
    ChangePassword(ChangePasswordArgs),

    /// Replace the credentials of every stored API client with one
    /// integration pair.
    ReplaceCredentials(ReplaceCredentialsArgs),
}

/// Command line arguments for `splitpage admin change-password`.
#[derive(Args)]
pub struct ChangePasswordArgs {
    /// Path to the store file.
    #[arg(short, long, value_name = "FILE")]
    store: PathBuf,

    /// The new password.
    #[arg(long, value_name = "PASSWORD")]
    password: String,

    /// Target user id. Takes precedence over the login; the login is used
    /// as a fallback when no user has this id.
    #[arg(long, value_name = "ID")]
    user_id: Option<u64>,

    /// Target login name.
    #[arg(long, value_name = "LOGIN")]
    user_login: Option<String>,
}

/// Command line arguments for `splitpage admin replace-credentials`.
#[derive(Args)]
pub struct ReplaceCredentialsArgs {
    /// Path to the store file.
    #[arg(short, long, value_name = "FILE")]
    store: PathBuf,

    /// The integration client id to install on every client.
    #[arg(long, value_name = "CLIENT_ID")]
    client_id: String,

    /// The integration client secret to install on every client.
    #[arg(long, value_name = "SECRET")]
    client_secret: String,
}

/// Main function for the `splitpage admin` subcommands.
pub fn admin(command: AdminCommand) -> anyhow::Result<()> {
    match command {
        AdminCommand::ChangePassword(args) => change_password(args),
        AdminCommand::ReplaceCredentials(args) => replace_credentials(args),
    }
}

fn change_password(args: ChangePasswordArgs) -> anyhow::Result<()> {
    let snapshot = Snapshot::read(&args.store)
        .with_context(|| format!("reading store file: {}", args.store.display()))?;
    let mut store = MemoryStore::from_snapshot(snapshot);

    let change = PasswordChange {
        password: args.password,
        user_id: args.user_id,
        user_login: args.user_login,
    };

    match password::change(&mut store, &change) {
        Ok(changed) => {
            store
                .to_snapshot()
                .write(&args.store)
                .with_context(|| format!("writing store file: {}", args.store.display()))?;
            info!(
                "Password updated for user {} ('{}').",
                changed.id, changed.login
            );
            Ok(())
        }
        Err(e @ AdminError::UserNotFound { .. }) => {
            let message = e.to_string();
            exit(message.as_str(), ExitCode::UserNotFound)
        }
        Err(e) => Err(e.into()),
    }
}

fn replace_credentials(args: ReplaceCredentialsArgs) -> anyhow::Result<()> {
    let snapshot = Snapshot::read(&args.store)
        .with_context(|| format!("reading store file: {}", args.store.display()))?;
    let mut store = MemoryStore::from_snapshot(snapshot);

    info!(
        "Replacing all API credentials with client id '{}'.",
        args.client_id
    );

    let result = credentials::replace_all(&mut store, &args.client_id, &args.client_secret);

    store
        .to_snapshot()
        .write(&args.store)
        .with_context(|| format!("writing store file: {}", args.store.display()))?;
    info!("{} client(s) updated.", result.updated);

    Ok(())
}
