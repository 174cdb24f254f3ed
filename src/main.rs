use clap::Parser;
use clap::Subcommand;
use git_testament::git_testament;
use git_testament::render_testament;

use splitpage::admin::command::AdminCommand;
use splitpage::list::command::ListArgs;
use splitpage::redirect::command::RedirectArgs;
use splitpage::select::command::SelectArgs;
use splitpage::serve::command::ServeArgs;
use splitpage::simulate::command::SimulateArgs;

git_testament!(TESTAMENT);

/// Command line tool for serving landing pages and allocating A/B traffic
/// across page variants.
#[derive(Parser)]
#[command(name = "splitpage")]
#[command(version = render_testament!(TESTAMENT))]
#[command(propagate_version = true)]
#[command(subcommand_required = true)]
struct Cli {
    /// Only errors are printed to the stderr stream.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// All available information, including debug information, is printed
    /// to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative maintenance commands.
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Lists the contents of a store file.
    List(ListArgs),

    /// Resolves a tracked redirect link and records the click.
    Redirect(RedirectArgs),

    /// Computes the variant a visitor should see.
    Select(SelectArgs),

    /// Handles one page request against a store file.
    Serve(ServeArgs),

    /// Simulates cold-start traffic to observe weight convergence.
    Simulate(SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut level = tracing::Level::INFO;
    if cli.quiet {
        level = tracing::Level::ERROR;
    } else if cli.verbose {
        level = tracing::Level::DEBUG;
    }

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match cli.command {
        Commands::Admin(command) => splitpage::admin::command::admin(command),
        Commands::List(args) => splitpage::list::command::list(args),
        Commands::Redirect(args) => splitpage::redirect::command::redirect(args),
        Commands::Select(args) => splitpage::select::command::select(args),
        Commands::Serve(args) => splitpage::serve::command::serve(args),
        Commands::Simulate(args) => splitpage::simulate::command::simulate(args),
    }
}
