//! Functionality relating to the `splitpage redirect` subcommand itself.

use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::redirect::compute;
use crate::redirect::compute::RedirectRequest;
use crate::store::memory::MemoryStore;
use crate::store::snapshot::Snapshot;

/// Command line arguments for `splitpage redirect`.
#[derive(Args)]
pub struct RedirectArgs {
    /// Path to the store file. The recorded click is written back to it.
    #[arg(short, long, value_name = "FILE")]
    store: PathBuf,

    /// The tracking token of the link to resolve.
    token: String,

    /// Query parameters that arrived on the link, as `key=value` pairs.
    /// Pass the clickthrough as `ct=<token>`.
    #[arg(long = "query", value_name = "KEY=VALUE")]
    query: Vec<String>,

    /// Profile fields of the attributed contact, as `alias=value` pairs,
    /// used for `{contactfield=...}` substitution.
    #[arg(long = "contact-field", value_name = "ALIAS=VALUE")]
    contact_fields: Vec<String>,

    /// Treat the click as untrackable: resolve the URL but record nothing.
    #[arg(long, default_value = "false")]
    untrackable: bool,
}

/// Main function for the `splitpage redirect` subcommand.
pub fn redirect(args: RedirectArgs) -> anyhow::Result<()> {
    let snapshot = Snapshot::read(&args.store)
        .with_context(|| format!("reading store file: {}", args.store.display()))?;
    let mut store = MemoryStore::from_snapshot(snapshot);

    let request = RedirectRequest {
        token: args.token,
        query: parse_pairs(&args.query)?,
        trackable: !args.untrackable,
        contact_fields: parse_pairs(&args.contact_fields)?.into_iter().collect(),
    };

    let resolved = compute::resolve(&mut store, &request)?;

    store
        .to_snapshot()
        .write(&args.store)
        .with_context(|| format!("writing store file: {}", args.store.display()))?;
    info!("Click recorded; store file updated.");

    let output = serde_json::to_string_pretty(&resolved)?;
    println!("{}", output);

    Ok(())
}

fn parse_pairs(raw: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    let mut pairs = Vec::with_capacity(raw.len());

    for entry in raw {
        match entry.split_once('=') {
            Some((key, value)) => pairs.push((key.to_string(), value.to_string())),
            None => bail!("'{}' is not a key=value pair", entry),
        }
    }

    Ok(pairs)
}
