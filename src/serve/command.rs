//! Functionality relating to the `splitpage serve` subcommand itself.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::serve::compute::PageRequest;
use crate::serve::compute::PageServer;
use crate::store::memory::MemoryStore;
use crate::store::snapshot::Snapshot;

/// Command line arguments for `splitpage serve`.
#[derive(Args)]
pub struct ServeArgs {
    /// Path to the store file. Recorded hits and assignments are written
    /// back to it.
    #[arg(short, long, value_name = "FILE")]
    store: PathBuf,

    /// The page slug being requested.
    slug: String,

    /// The visitor key making the request.
    #[arg(long, value_name = "KEY")]
    visitor: String,

    /// The request path, for canonical-URL enforcement.
    #[arg(long, value_name = "PATH")]
    path: Option<String>,

    /// The visitor's preferred locale (e.g. `fr_FR`).
    #[arg(short, long, value_name = "LOCALE")]
    locale: Option<String>,

    /// A clickthrough token for contact attribution.
    #[arg(long, value_name = "TOKEN")]
    ct: Option<String>,

    /// An analytics snippet to splice into the rendered content.
    #[arg(long, value_name = "HTML")]
    analytics: Option<String>,

    /// Do not redirect to a matching translation.
    #[arg(long, default_value = "false")]
    no_translation_redirect: bool,

    /// Do not enforce the canonical path.
    #[arg(long, default_value = "false")]
    ignore_path_mismatch: bool,
}

/// Main function for the `splitpage serve` subcommand.
pub fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let snapshot = Snapshot::read(&args.store)
        .with_context(|| format!("reading store file: {}", args.store.display()))?;

    let request = PageRequest {
        slug: args.slug,
        visitor: args.visitor,
        path: args.path,
        locale: args.locale,
        clickthrough: args.ct,
        no_translation_redirect: args.no_translation_redirect,
        ignore_path_mismatch: args.ignore_path_mismatch,
        analytics: args.analytics,
    };

    let mut server = PageServer::new(MemoryStore::from_snapshot(snapshot));
    let outcome = server.handle(&request);

    server
        .into_store()
        .to_snapshot()
        .write(&args.store)
        .with_context(|| format!("writing store file: {}", args.store.display()))?;
    info!("Hit recorded; store file updated.");

    let output = serde_json::to_string_pretty(&outcome)?;
    println!("{}", output);

    Ok(())
}
