use crate::driver::{self, DriverConfig};
use crate::telnet::TelnetTransport;
use kloom_proto::catalog::Catalog;
use kloom_proto::state::StateManager;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

/// How long open sessions get to restore their terminals on shutdown before
/// they are aborted.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Running terminal server.
pub struct ServerHandle {
    pub local_addr: SocketAddr,
    task: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl ServerHandle {
    /// Stop accepting, let every session run its normal teardown, and abort
    /// whatever is still running after `grace`.
    pub async fn shutdown(self, grace: Duration) {
        self.shutdown.send_replace(true);
        let mut task = self.task;
        if tokio::time::timeout(grace + Duration::from_millis(250), &mut task)
            .await
            .is_err()
        {
            warn!("Terminal server did not stop in time, aborting");
            task.abort();
        }
    }
}

/// Bind the visitor listener and serve it on a background task.
pub async fn start_server(
    bind_address: &str,
    port: u16,
    catalog: Arc<Catalog>,
    state_manager: Arc<StateManager>,
    config: Arc<DriverConfig>,
    grace: Duration,
) -> anyhow::Result<ServerHandle> {
    let addr = format!("{}:{}", bind_address, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind TCP socket {}: {}", addr, e))?;
    let local_addr = listener.local_addr()?;

    info!("Terminal server listening at {}", local_addr);

    let (shutdown, mut stop) = watch::channel(false);
    let sessions_stop = shutdown.subscribe();

    let task = tokio::spawn(async move {
        let mut sessions = JoinSet::new();
        let mut client_id = 0usize;

        loop {
            tokio::select! {
                _ = stop.changed() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        client_id += 1;
                        let id = client_id;
                        info!("Client {} connected from {}", id, peer);

                        let catalog = Arc::clone(&catalog);
                        let sm = Arc::clone(&state_manager);
                        let cfg = Arc::clone(&config);
                        let stopped = sessions_stop.clone();

                        sessions.spawn(async move {
                            let transport = match TelnetTransport::accept(stream).await {
                                Ok(t) => t,
                                Err(e) => {
                                    warn!("Client {} negotiation failed: {}", id, e);
                                    return;
                                }
                            };
                            // Outcome is logged by the driver.
                            let _ = driver::run(transport, id, catalog, sm, cfg, stopped).await;
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                },
                Some(done) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = done {
                        if e.is_panic() {
                            error!("Session task panicked: {}", e);
                        } else {
                            debug!("Session task ended: {}", e);
                        }
                    }
                }
            }
        }

        drop(listener);
        info!("Terminal server stopped accepting, closing {} session(s)", sessions.len());
        let drained = tokio::time::timeout(grace, async {
            while sessions.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!("{} session(s) still open after {:?}, aborting", sessions.len(), grace);
            sessions.abort_all();
            while sessions.join_next().await.is_some() {}
        }
    });

    Ok(ServerHandle {
        local_addr,
        task,
        shutdown,
    })
}
