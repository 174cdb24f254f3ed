//! Functionality relating to the `splitpage select` subcommand itself.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::page::variant::VariantGroup;
use crate::page::PageId;
use crate::select::compute;
use crate::store::assignment_cookie_name;
use crate::store::assignment_ttl;
use crate::store::memory::MemoryStore;
use crate::store::snapshot::Snapshot;
use crate::store::AssignmentStore;
use crate::store::PageStore;

/// Command line arguments for `splitpage select`.
#[derive(Args)]
pub struct SelectArgs {
    /// Path to the store file.
    #[arg(short, long, value_name = "FILE")]
    store: PathBuf,

    /// The parent page to select a variant for.
    #[arg(short, long, value_name = "PAGE_ID")]
    page: u64,

    /// The visitor key to select for.
    #[arg(long, value_name = "KEY")]
    visitor: String,

    /// Persist the computed assignment back to the store file, making the
    /// selection sticky for future invocations.
    #[arg(long, default_value = "false")]
    remember: bool,
}

/// Main function for the `splitpage select` subcommand.
pub fn select(args: SelectArgs) -> anyhow::Result<()> {
    let snapshot = Snapshot::read(&args.store)
        .with_context(|| format!("reading store file: {}", args.store.display()))?;
    let mut store = MemoryStore::from_snapshot(snapshot);

    let parent_id = PageId(args.page);
    let parent = store
        .page(parent_id)
        .with_context(|| format!("no page with id {} in the store", parent_id))?;

    let children = store.variant_children(parent_id);
    let mut translations = store.translations(parent_id);
    for child in &children {
        translations.extend(store.translations(child.id));
    }

    let group = VariantGroup::assemble(&parent, &children, &translations);
    let prior = store.assignment(&args.visitor, parent_id);

    let selection = compute::select(&group, prior);

    if args.remember && !selection.sticky {
        store.assign(&args.visitor, parent_id, selection.chosen, assignment_ttl());
        store
            .to_snapshot()
            .write(&args.store)
            .with_context(|| format!("writing store file: {}", args.store.display()))?;
        info!(
            "Assignment for visitor '{}' recorded under '{}'.",
            args.visitor,
            assignment_cookie_name(parent_id)
        );
    }

    let output = serde_json::to_string_pretty(&selection)?;
    println!("{}", output);

    Ok(())
}
