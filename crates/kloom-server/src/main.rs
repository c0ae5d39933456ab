mod driver;
mod http;
mod input;
mod pages;
mod session;
mod socket;
mod telnet;
mod theme;
mod transport;
mod widgets;

use anyhow::Context;
use clap::Parser;
use kloom_proto::catalog::Catalog;
use kloom_proto::config::Config;
use kloom_proto::state::StateManager;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "kloom-server")]
#[command(about = "KLOOM teletext radio terminal server", long_about = None)]
struct Args {
    /// Port for visitor terminal sessions
    #[arg(long)]
    port: Option<u16>,
    /// Path to the shows.json catalog
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Config file to load instead of the default
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // File log for the operator, stderr for foreground runs.
    let data_dir = kloom_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("server.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,kloom_server=debug")),
        )
        .init();

    info!("Log file: {:?}", log_path);

    let config_path = args.config.unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    info!("Config loaded from: {:?}", config_path);

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = args.catalog {
        config.catalog.path = path;
    }

    let catalog = Catalog::load(&config.catalog.path)
        .with_context(|| format!("loading catalog {}", config.catalog.path.display()))?;
    info!(
        "Catalog: {} shows, {} listed, from {:?}",
        catalog.shows().len(),
        catalog.navigable_count(),
        config.catalog.path
    );
    let catalog = Arc::new(catalog);

    let state_manager = Arc::new(StateManager::new());

    let driver_config = Arc::new(driver::DriverConfig {
        session: config.session.clone(),
        site_url: config.catalog.site_url.clone(),
    });

    let socket_handle = socket::start_server(
        &config.server.bind_address,
        config.server.port,
        Arc::clone(&catalog),
        Arc::clone(&state_manager),
        driver_config,
        socket::SHUTDOWN_GRACE,
    )
    .await?;

    info!("KLOOM v{} on air", env!("CARGO_PKG_VERSION"));
    info!(
        "Connect with: {}",
        connect_hint(&config.server.bind_address, socket_handle.local_addr.port())
    );

    let http_handle = config.http.enabled.then(|| {
        http::start_server(
            config.http.bind_address.clone(),
            config.http.port,
            Arc::clone(&state_manager),
            Arc::clone(&catalog),
            config.catalog.site_url.clone(),
        )
    });

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!(
        "Shutting down, closing {} session(s)",
        state_manager.snapshot().listeners
    );

    socket_handle.shutdown(socket::SHUTDOWN_GRACE).await;
    if let Some(handle) = http_handle {
        handle.abort();
    }

    info!("Goodbye");
    Ok(())
}

/// The command a visitor types to reach us. Wildcard binds are advertised as
/// localhost.
fn connect_hint(bind_address: &str, port: u16) -> String {
    let host = match bind_address {
        "0.0.0.0" | "::" | "[::]" | "" => "localhost",
        other => other.trim_start_matches('[').trim_end_matches(']'),
    };
    format!("telnet {} {}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_hint_names_host_and_port() {
        assert_eq!(connect_hint("127.0.0.1", 2323), "telnet 127.0.0.1 2323");
        assert_eq!(connect_hint("kloom.example", 23), "telnet kloom.example 23");
        assert_eq!(connect_hint("::1", 2323), "telnet ::1 2323");
    }

    #[test]
    fn wildcard_bind_advertises_localhost() {
        assert_eq!(connect_hint("0.0.0.0", 2323), "telnet localhost 2323");
        assert_eq!(connect_hint("::", 2323), "telnet localhost 2323");
    }
}
