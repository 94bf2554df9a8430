use apalysis::cli::{Cli, Command};
use apalysis::{cmd_init, cmd_node, cmd_serve, cmd_summary, cmd_view};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apalysis=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::View(args) => cmd_view(args),
        Command::Node(args) => cmd_node(args),
        Command::Summary(args) => cmd_summary(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
