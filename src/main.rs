use anyhow::Result;
use clap::Parser;
use l10nkit::cli::{AppContext, Cli, Commands};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(ctx: &AppContext) {
    let default_level = if ctx.quiet { "warn" } else { "info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!ctx.no_color)
                .with_target(false),
        )
        .init();

    if ctx.no_color {
        miette::set_hook(Box::new(|_| {
            Box::new(miette::MietteHandlerOpts::new().color(false).build())
        }))
        .ok();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };
    init_tracing(&ctx);

    let config = || l10nkit::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Update(args) => l10nkit::update_run(args, &config()?.update, &ctx),
        Commands::Cleanup(args) => l10nkit::cleanup_run(args, &config()?.cleanup, &ctx),
        Commands::Export(args) => l10nkit::export_run(args, &config()?.export, &ctx),
        Commands::Init(args) => l10nkit::infra::config::init(args, &ctx),
        Commands::Completions(args) => l10nkit::completion::run(args, &ctx),
    }
}
