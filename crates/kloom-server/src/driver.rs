//! Per-connection session loop.
//!
//! Each iteration renders the current page, writes it, then waits for the
//! first of: visitor input, the redraw timer, or a broadcast change that the
//! current page displays.  Input is decoded into keys and fed through the
//! state machine; a tune request is applied to the shared state here and
//! nowhere else.
//!
//! However the loop ends (quit key, EOF, I/O error, server shutdown) the
//! terminal is restored and the visitor counted out exactly once.  A task
//! abort skips the restore but still releases the listener guard.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use kloom_proto::catalog::Catalog;
use kloom_proto::config::SessionConfig;
use kloom_proto::state::{StateEvent, StateManager};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, watch};
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::input::{decode, needs_more};
use crate::pages::{self, RenderContext};
use crate::session::{Effect, Session};
use crate::theme::{CLEAR, SHOW_CURSOR};
use crate::transport::Transport;

const READ_CHUNK: usize = 1024;

/// Shared, read-only settings for every session.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub session: SessionConfig,
    pub site_url: String,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Closed,
    Shutdown,
}

enum Wake {
    Timer,
    Broadcast,
    Input(Vec<u8>),
    Closed,
    Shutdown,
}

pub async fn run<T: Transport>(
    mut transport: T,
    client_id: usize,
    catalog: Arc<Catalog>,
    state: Arc<StateManager>,
    config: Arc<DriverConfig>,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<Exit> {
    let guard = state.join();
    let mut events = state.subscribe();

    let result = drive(
        &mut transport,
        client_id,
        &catalog,
        &state,
        &config,
        &mut events,
        &mut shutdown,
    )
    .await;

    // Best effort: the peer may already be gone.
    let restore = format!("{SHOW_CURSOR}{CLEAR}");
    if let Err(e) = transport.write_all(restore.as_bytes()).await {
        debug!("Client {} terminal restore failed: {}", client_id, e);
    }
    if let Err(e) = transport.close().await {
        debug!("Client {} close failed: {}", client_id, e);
    }

    let listeners = guard.release();
    match &result {
        Ok(exit) => info!("Client {} session ended ({:?}), {} listening", client_id, exit, listeners),
        Err(e) => warn!("Client {} session failed: {}, {} listening", client_id, e, listeners),
    }
    result
}

async fn drive<T: Transport>(
    transport: &mut T,
    client_id: usize,
    catalog: &Catalog,
    state: &StateManager,
    config: &DriverConfig,
    events: &mut broadcast::Receiver<StateEvent>,
    shutdown: &mut watch::Receiver<bool>,
) -> anyhow::Result<Exit> {
    let mut session = Session::new();
    let mut rng = StdRng::from_entropy();
    let mut events_open = true;

    loop {
        let frame = {
            let ctx = RenderContext {
                catalog,
                site_url: &config.site_url,
                snapshot: state.snapshot(),
                now: Local::now(),
                uptime: state.uptime(),
            };
            pages::render(&session, &ctx, &mut rng)
        };
        let Some(frame) = frame else {
            session.finish_intro();
            continue;
        };
        session.scroll_offset = frame.scroll_offset;
        transport.write_all(frame.text.as_bytes()).await?;

        let redraw = if session.page.is_animated() {
            config.session.fast_redraw()
        } else {
            config.session.slow_redraw()
        };

        match wait(transport, events, &mut events_open, shutdown, &session, redraw).await? {
            Wake::Timer | Wake::Broadcast => {}
            Wake::Closed => return Ok(Exit::Closed),
            Wake::Shutdown => return Ok(Exit::Shutdown),
            Wake::Input(mut bytes) => {
                let hung_up =
                    complete_escape(transport, &mut bytes, config.session.escape_timeout()).await?;
                for key in decode(&bytes) {
                    match session.handle_key(key, catalog) {
                        Effect::None => {}
                        Effect::Quit => return Ok(Exit::Quit),
                        Effect::ToggleTune(show) => {
                            let now_playing = state.toggle_now_playing(show);
                            let id = |i: usize| catalog.show(i).map(|s| s.id.as_str()).unwrap_or("?");
                            match now_playing {
                                Some(i) => info!("Client {} tuned in to {}", client_id, id(i)),
                                None => info!("Client {} tuned out of {}", client_id, id(show)),
                            }
                        }
                    }
                }
                if hung_up {
                    return Ok(Exit::Closed);
                }
            }
        }

        session.advance_frame();
    }
}

/// Block until something warrants a new frame.  Broadcast changes only wake
/// pages that display them; other pages keep waiting on the same deadline.
async fn wait<T: Transport>(
    transport: &mut T,
    events: &mut broadcast::Receiver<StateEvent>,
    events_open: &mut bool,
    shutdown: &mut watch::Receiver<bool>,
    session: &Session,
    redraw: Duration,
) -> std::io::Result<Wake> {
    let deadline = Instant::now() + redraw;
    let mut buf = [0u8; READ_CHUNK];

    if *shutdown.borrow() {
        return Ok(Wake::Shutdown);
    }

    loop {
        tokio::select! {
            // A dropped sender means the server is gone too.
            _ = shutdown.changed() => return Ok(Wake::Shutdown),
            read = transport.read(&mut buf) => {
                return match read? {
                    0 => Ok(Wake::Closed),
                    n => Ok(Wake::Input(buf[..n].to_vec())),
                };
            }
            _ = sleep_until(deadline) => return Ok(Wake::Timer),
            event = events.recv(), if *events_open => match event {
                Ok(_) if session.page.shows_broadcast() => return Ok(Wake::Broadcast),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!("session missed {} state events", n);
                    if session.page.shows_broadcast() {
                        return Ok(Wake::Broadcast);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => *events_open = false,
            },
        }
    }
}

/// If `bytes` ends partway through a cursor sequence, keep reading for up to
/// `limit` so the sequence decodes as one key rather than a bare ESC.
/// Returns true if the client hung up meanwhile.
async fn complete_escape<T: Transport>(
    transport: &mut T,
    bytes: &mut Vec<u8>,
    limit: Duration,
) -> std::io::Result<bool> {
    let deadline = Instant::now() + limit;
    let mut buf = [0u8; READ_CHUNK];
    while needs_more(bytes) {
        match timeout_at(deadline, transport.read(&mut buf)).await {
            Err(_elapsed) => break,
            Ok(Ok(0)) => return Ok(true),
            Ok(Ok(n)) => bytes.extend_from_slice(&buf[..n]),
            Ok(Err(e)) => return Err(e),
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::catalog;
    use crate::transport::StreamTransport;
    use crate::widgets::text::strip_controls;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
    use tokio::task::JoinHandle;

    /// Client end of one session: keystrokes in, collected screen text out.
    struct Client {
        keys: WriteHalf<DuplexStream>,
        screen: Arc<Mutex<Vec<u8>>>,
        drain: JoinHandle<()>,
        task: JoinHandle<anyhow::Result<Exit>>,
        stop: watch::Sender<bool>,
    }

    impl Client {
        fn connect(id: usize, catalog: Arc<Catalog>, state: Arc<StateManager>, escape_ms: u64) -> Self {
            let config = Arc::new(DriverConfig {
                session: SessionConfig {
                    fast_redraw_ms: 20,
                    slow_redraw_ms: 40,
                    escape_timeout_ms: escape_ms,
                },
                site_url: "https://kloom.example".into(),
            });
            let (near, far) = tokio::io::duplex(1 << 16);
            let (stop, stopped) = watch::channel(false);
            let task = tokio::spawn(run(StreamTransport::new(far), id, catalog, state, config, stopped));
            let (rx, keys) = tokio::io::split(near);
            let screen = Arc::new(Mutex::new(Vec::new()));
            let drain = tokio::spawn(drain(rx, Arc::clone(&screen)));
            Self { keys, screen, drain, task, stop }
        }

        async fn send(&mut self, bytes: &[u8]) {
            self.keys.write_all(bytes).await.unwrap();
        }

        fn mark(&self) -> usize {
            self.screen.lock().unwrap().len()
        }

        /// Wait until text after `mark` contains `needle`.
        async fn expect_after(&self, mark: usize, needle: &str) {
            let screen = Arc::clone(&self.screen);
            let found = tokio::time::timeout(Duration::from_secs(3), async move {
                loop {
                    {
                        let bytes = screen.lock().unwrap();
                        if strip_controls(&String::from_utf8_lossy(&bytes[mark..])).contains(needle) {
                            return;
                        }
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
            .await;
            assert!(found.is_ok(), "never saw {needle:?}");
        }

        /// Skip the intro and wait for the splash menu.
        async fn to_splash(&mut self) {
            let mark = self.mark();
            self.send(b"x").await;
            self.expect_after(mark, "BROWSE ARCHIVE").await;
        }

        async fn to_archive(&mut self) {
            self.to_splash().await;
            let mark = self.mark();
            self.send(b"1").await;
            self.expect_after(mark, "[↑↓] navigate").await;
        }
    }

    async fn drain(mut rx: ReadHalf<DuplexStream>, screen: Arc<Mutex<Vec<u8>>>) {
        let mut buf = [0u8; 4096];
        while let Ok(n) = rx.read(&mut buf).await {
            if n == 0 {
                break;
            }
            screen.lock().unwrap().extend_from_slice(&buf[..n]);
        }
    }

    async fn wait_for(mut cond: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(3), async {
            while !cond() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition never held");
    }

    fn fixture() -> (Arc<Catalog>, Arc<StateManager>) {
        (Arc::new(catalog(3)), Arc::new(StateManager::new()))
    }

    #[tokio::test]
    async fn tune_in_reaches_other_sessions() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, Arc::clone(&catalog), Arc::clone(&state), 100);
        let mut b = Client::connect(2, Arc::clone(&catalog), Arc::clone(&state), 100);

        b.to_splash().await;
        let b_mark = b.mark();

        a.to_archive().await;
        let mark = a.mark();
        a.send(b"\r").await;
        a.expect_after(mark, "▶ TUNE IN").await;
        a.send(b"t").await;

        let tuned = catalog.find("klk-00");
        wait_for(|| state.snapshot().now_playing == tuned).await;
        b.expect_after(b_mark, "NOW PLAYING").await;
        b.expect_after(b_mark, "Transmission klk-00").await;
        a.expect_after(mark, "TUNED IN").await;

        // Same show again from another session clears it.
        b.send(b"1").await;
        b.send(b"\r").await;
        b.send(b"t").await;
        wait_for(|| state.snapshot().now_playing.is_none()).await;
    }

    #[tokio::test]
    async fn quit_counts_out_exactly_once() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, Arc::clone(&catalog), Arc::clone(&state), 100);
        let mut b = Client::connect(2, Arc::clone(&catalog), Arc::clone(&state), 100);
        a.to_splash().await;
        b.to_splash().await;
        assert_eq!(state.snapshot().listeners, 2);

        a.send(b"q").await;
        assert_eq!(a.task.await.unwrap().unwrap(), Exit::Quit);
        a.drain.await.unwrap();
        assert_eq!(state.snapshot().listeners, 1);

        let screen = a.screen.lock().unwrap().clone();
        let restore = format!("{SHOW_CURSOR}{CLEAR}");
        assert!(screen.ends_with(restore.as_bytes()));
    }

    #[tokio::test]
    async fn keys_after_quit_are_ignored() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, Arc::clone(&catalog), Arc::clone(&state), 100);
        a.to_archive().await;
        a.send(b"\rqt").await;
        assert_eq!(a.task.await.unwrap().unwrap(), Exit::Quit);
        assert_eq!(state.snapshot().now_playing, None);
        assert_eq!(state.snapshot().listeners, 0);
    }

    #[tokio::test]
    async fn hangup_releases_listener() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, Arc::clone(&catalog), Arc::clone(&state), 100);
        a.to_splash().await;
        assert_eq!(state.snapshot().listeners, 1);

        a.keys.shutdown().await.unwrap();
        drop(a.keys);
        assert_eq!(a.task.await.unwrap().unwrap(), Exit::Closed);
        assert_eq!(state.snapshot().listeners, 0);
    }

    #[tokio::test]
    async fn aborted_session_releases_listener() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, Arc::clone(&catalog), Arc::clone(&state), 100);
        a.to_splash().await;
        a.task.abort();
        assert!(a.task.await.unwrap_err().is_cancelled());
        assert_eq!(state.snapshot().listeners, 0);
    }

    #[tokio::test]
    async fn shutdown_restores_terminal() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, Arc::clone(&catalog), Arc::clone(&state), 100);
        let mut b = Client::connect(2, Arc::clone(&catalog), Arc::clone(&state), 100);
        a.to_archive().await;
        b.to_splash().await;
        assert_eq!(state.snapshot().listeners, 2);

        let restore = format!("{SHOW_CURSOR}{CLEAR}");
        for client in [a, b] {
            client.stop.send_replace(true);
            assert_eq!(client.task.await.unwrap().unwrap(), Exit::Shutdown);
            client.drain.await.unwrap();
            let screen = client.screen.lock().unwrap().clone();
            assert!(screen.ends_with(restore.as_bytes()));
        }
        assert_eq!(state.snapshot().listeners, 0);
    }

    #[tokio::test]
    async fn shutdown_before_first_wait_still_restores() {
        let (catalog, state) = fixture();
        let a = Client::connect(1, catalog, Arc::clone(&state), 100);
        a.stop.send_replace(true);
        assert_eq!(a.task.await.unwrap().unwrap(), Exit::Shutdown);
        a.drain.await.unwrap();
        let screen = a.screen.lock().unwrap().clone();
        assert!(screen.ends_with(format!("{SHOW_CURSOR}{CLEAR}").as_bytes()));
        assert_eq!(state.snapshot().listeners, 0);
    }

    #[tokio::test]
    async fn lone_escape_goes_back_once_timeout_passes() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, catalog, state, 30);
        a.to_archive().await;
        let mark = a.mark();
        a.send(b"\x1b").await;
        a.expect_after(mark, "BROWSE ARCHIVE").await;
    }

    #[tokio::test]
    async fn arrow_split_across_reads_moves_once() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, catalog, state, 500);
        a.to_archive().await;
        let mark = a.mark();
        a.send(b"\x1b[").await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        a.send(b"B").await;
        a.expect_after(mark, "▶  Transmission klk-01").await;
        // Still on the archive, not bounced back to the splash.
        let text = strip_controls(&String::from_utf8_lossy(&a.screen.lock().unwrap()[mark..]));
        assert!(!text.contains("BROWSE ARCHIVE"));
    }

    #[tokio::test]
    async fn splash_shows_changes_made_while_away() {
        let (catalog, state) = fixture();
        let mut a = Client::connect(1, Arc::clone(&catalog), Arc::clone(&state), 100);
        a.to_splash().await;
        let mark = a.mark();
        a.send(b"2").await;
        a.expect_after(mark, "All frequencies welcome.").await;

        state.set_now_playing(Some(0));
        let mark = a.mark();
        a.send(b"\x1b").await;
        a.expect_after(mark, "NOW PLAYING").await;
    }
}
