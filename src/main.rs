//! roombook - Meeting-Room Booking Service
//!
//! Main entry point for the HTTP server.

use clap::Parser;
use roombook::Config;

/// roombook - meeting-room booking automation service
#[derive(Parser, Debug)]
#[command(name = "roombook")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Attach underlying error detail to failure responses
    #[arg(long, short = 'd')]
    debug_errors: bool,

    /// Override the booking page URL
    #[arg(long)]
    booking_url: Option<String>,

    /// Override the login page URL
    #[arg(long)]
    login_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roombook=debug".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if args.headed {
        config.portal.headless = false;
    }

    if args.debug_errors {
        config.server.debug_errors = true;
    }

    if let Some(booking_url) = args.booking_url {
        config.portal.booking_url = booking_url;
    }

    if let Some(login_url) = args.login_url {
        config.portal.login_url = login_url;
    }

    roombook::server::serve(config).await?;

    Ok(())
}
