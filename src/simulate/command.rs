//! Functionality relating to the `splitpage simulate` subcommand itself.
//!
//! The simulator builds a synthetic variant group from the weights given on
//! the command line and runs repeated cold-start selections, feeding each
//! choice back into the hit counts. The resulting share table shows how
//! quickly observed exposure converges on the configured weights.

use anyhow::bail;
use clap::Args;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use prettytable::row;
use prettytable::Table;
use tracing::info;

use crate::page::variant::VariantGroup;
use crate::page::Page;
use crate::page::PageId;
use crate::select::compute;
use crate::utils::display::formatted_count;
use crate::utils::display::PercentageFormat;

/// Command line arguments for `splitpage simulate`.
#[derive(Args)]
pub struct SimulateArgs {
    /// Child variant weights in percent, comma separated (e.g. `30,30`).
    /// The parent receives the remainder.
    #[arg(short, long, value_name = "PERCENTS", value_delimiter = ',', required = true)]
    weights: Vec<u8>,

    /// Number of page views to simulate.
    #[arg(short = 'n', long, value_name = "USIZE", default_value = "10000")]
    trials: u64,

    /// Hits to seed every candidate with before the run, to observe warm
    /// starts.
    #[arg(long, value_name = "U64", default_value = "0")]
    seed_hits: u64,
}

/// Main function for the `splitpage simulate` subcommand.
pub fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let child_total: u32 = args.weights.iter().map(|w| u32::from(*w)).sum();
    if child_total > 100 {
        bail!("child weights sum to {}%, which exceeds 100%", child_total);
    }

    let mut parent = Page::new(1, "Parent", "parent");
    parent.variant_hits = args.seed_hits;

    let mut pages = vec![parent];
    for (index, weight) in args.weights.iter().enumerate() {
        let id = index as u64 + 2;
        let mut child = Page::new(id, "Variant", "variant");
        child.variant_parent = Some(PageId(1));
        child.variant_weight = *weight;
        child.variant_hits = args.seed_hits;
        pages.push(child);
    }

    info!(
        "Simulating {} page views across {} candidate(s)...",
        formatted_count(args.trials),
        pages.len()
    );

    let pb = ProgressBar::new(args.trials);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.cyan.bold} {spinner:.green} [{elapsed_precise}] [{bar}] {pos}/{len} ({per_sec}, {eta})")
            .progress_chars("=> "),
    );
    pb.set_prefix("Simulating");

    let mut i: u64 = 0;
    while i < args.trials {
        let group = VariantGroup::assemble(&pages[0], &pages[1..], &[]);
        let selection = compute::select(&group, None);

        let shown = pages
            .iter_mut()
            .find(|p| p.id == selection.chosen)
            .expect("the selector only ever returns a group member");
        shown.variant_hits += 1;

        if i > 0 && i % 5_000 == 0 {
            pb.inc(5000);
        }

        i += 1;
    }

    pb.finish_and_clear();

    let seeded: u64 = args.seed_hits * pages.len() as u64;
    let observed_total = args.trials + seeded;

    let mut table = Table::new();
    table.add_row(row!["Page", "Role", "Weight", "Hits", "Observed share"]);
    for (index, page) in pages.iter().enumerate() {
        let configured = if index == 0 {
            100 - child_total as u8
        } else {
            page.variant_weight
        };

        table.add_row(row![
            page.id,
            if index == 0 { "parent" } else { "variant" },
            format!("{}%", configured),
            formatted_count(page.variant_hits),
            PercentageFormat(page.variant_hits, observed_total).to_string(),
        ]);
    }

    table.printstd();

    Ok(())
}
