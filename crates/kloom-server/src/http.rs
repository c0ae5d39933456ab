use axum::{extract::State, response::Json, routing::get, Router};
use chrono::NaiveDate;
use kloom_proto::catalog::Catalog;
use kloom_proto::state::StateManager;
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Clone)]
struct HttpState {
    state_manager: Arc<StateManager>,
    catalog: Arc<Catalog>,
    site_url: Arc<str>,
}

#[derive(Debug, Serialize)]
struct ApiState {
    now_playing: Option<NowPlaying>,
    listeners: usize,
    rev: u64,
    uptime_secs: u64,
}

#[derive(Debug, Serialize)]
struct NowPlaying {
    id: String,
    title: String,
    series: String,
    date: NaiveDate,
    listen_url: String,
}

pub fn start_server(
    bind_address: String,
    port: u16,
    state_manager: Arc<StateManager>,
    catalog: Arc<Catalog>,
    site_url: String,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app_state = HttpState {
            state_manager,
            catalog,
            site_url: site_url.into(),
        };

        let app = Router::new()
            .route("/api/state", get(get_state))
            .with_state(app_state);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP status endpoint listening on http://{}/api/state", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn get_state(State(state): State<HttpState>) -> Json<ApiState> {
    let snapshot = state.state_manager.snapshot();

    let now_playing = snapshot
        .now_playing
        .and_then(|idx| state.catalog.show(idx))
        .map(|show| NowPlaying {
            id: show.id.clone(),
            title: show.title.clone(),
            series: show.series.clone(),
            date: show.date,
            listen_url: show.listen_url(&state.site_url),
        });

    Json(ApiState {
        now_playing,
        listeners: snapshot.listeners,
        rev: snapshot.rev,
        uptime_secs: state.state_manager.uptime().as_secs(),
    })
}
