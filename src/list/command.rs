//! Functionality related to the `splitpage list` command itself.

use std::path::PathBuf;

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::Args;
use itertools::Itertools;
use prettytable::row;
use prettytable::Table;

use crate::store::snapshot::Snapshot;
use crate::utils::display::formatted_count;

//========================//
// Command-line arguments //
//========================//

/// Command line arguments for `splitpage list`.
#[derive(Args)]
pub struct ListArgs {
    /// Path to the store file.
    #[arg(short, long, value_name = "FILE")]
    store: PathBuf,

    /// The subject which you want to list values for.
    #[arg(value_parser = PossibleValuesParser::new(["pages", "redirects", "assignments"]))]
    subject: String,
}

//==============//
// Main command //
//==============//

/// Main method for the `splitpage list` subcommand.
pub fn list(args: ListArgs) -> anyhow::Result<()> {
    let snapshot = Snapshot::read(&args.store)
        .with_context(|| format!("reading store file: {}", args.store.display()))?;

    match args.subject.as_str() {
        "pages" => {
            let mut table = Table::new();

            table.add_row(row![
                "Id", "Title", "Alias", "Published", "Weight", "Hits", "Variant of", "Language"
            ]);
            for page in &snapshot.pages {
                table.add_row(row![
                    page.id,
                    page.title,
                    page.alias,
                    page.is_published,
                    format!("{}%", page.variant_weight),
                    formatted_count(page.variant_hits),
                    page.variant_parent
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    page.language.as_deref().unwrap_or("-"),
                ]);
            }

            table.printstd();

            Ok(())
        }
        "redirects" => {
            let mut table = Table::new();

            table.add_row(row!["Id", "Token", "URL", "Published", "Hits"]);
            for redirect in &snapshot.redirects {
                table.add_row(row![
                    redirect.id,
                    redirect.token,
                    redirect.url,
                    redirect.is_published,
                    formatted_count(redirect.hits),
                ]);
            }

            table.printstd();

            Ok(())
        }
        "assignments" => {
            let mut table = Table::new();

            table.add_row(row!["Visitor", "Group", "Variant", "Expires"]);
            for record in snapshot
                .assignments
                .iter()
                .sorted_by(|a, b| a.visitor.cmp(&b.visitor).then(a.group.cmp(&b.group)))
            {
                table.add_row(row![
                    record.visitor,
                    record.group,
                    record.variant,
                    record.expires_at.to_rfc3339(),
                ]);
            }

            table.printstd();

            Ok(())
        }
        s => unreachable!("clap should have caught this unknown subject: {}", s),
    }
}
