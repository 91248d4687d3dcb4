use clap::Parser;
use guardia::app_state::AppState;
use guardia::http::setup_http_server;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "guardia")]
#[command(about = "Security module API: identity, access control and audit trail")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the guardia server (default)
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let app_state = AppState::new()?;

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Config => {
            println!("{:#?}", &app_state.settings);
            return Ok(());
        }
        Commands::Run => {
            // Continue with the normal server startup
        }
    }

    let bind_address = app_state.settings.api.bind_address.clone();
    let handle = setup_http_server(app_state, &bind_address).await?;
    handle.await??;

    Ok(())
}
