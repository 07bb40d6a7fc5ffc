use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("mocctl error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    match &cli.command {
        cli::Commands::Risk { action } => return commands::risk::handle(action, &flags),
        cli::Commands::Schema(args) => return commands::schema::handle(args, &flags),
        cli::Commands::Init(args) => return commands::init::handle(args, &flags).await,
        _ => {}
    }

    let project_root = context::resolve_project_root(flags.project.as_deref())?;
    bootstrap::load_project_dotenv(&project_root)?;
    let config = moc_config::MocConfig::load_for_project(&project_root)
        .context("failed to load configuration")?;
    context::warn_unconfigured(&config);

    let ctx = context::AppContext::init(project_root, config, &flags)
        .await
        .context("failed to initialize mocctl application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MOC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
