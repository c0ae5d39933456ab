//! Broadcast state: the now-playing show and listener count shared by every
//! connected session.
//!
//! One `StateManager` is created at startup and handed to each session as an
//! `Arc`.  Every mutation happens under a single lock, bumps `rev`, and emits a
//! [`StateEvent`] so idle sessions can redraw without waiting for their timer.
//! Concurrent tunes are last-writer-wins.

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::debug;

/// Consistent copy of the shared state, taken under the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BroadcastSnapshot {
    /// Monotonic revision counter, bumped on every change.
    pub rev: u64,
    /// Index into the catalog's show list.
    pub now_playing: Option<usize>,
    pub listeners: usize,
}

impl BroadcastSnapshot {
    pub fn is_playing(&self, show: usize) -> bool {
        self.now_playing == Some(show)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    NowPlayingChanged(Option<usize>),
    ListenersChanged(usize),
}

pub struct StateManager {
    state: RwLock<BroadcastSnapshot>,
    events: broadcast::Sender<StateEvent>,
    started_at: Instant,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: RwLock::new(BroadcastSnapshot::default()),
            events,
            started_at: Instant::now(),
        }
    }

    pub fn snapshot(&self) -> BroadcastSnapshot {
        *self.read()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Register a listener.  Returns the new count.
    ///
    /// Prefer [`StateManager::join`], which pairs this with exactly one
    /// `disconnect` on every exit path.
    pub fn connect(&self) -> usize {
        let listeners = {
            let mut state = self.write();
            state.listeners += 1;
            state.rev += 1;
            state.listeners
        };
        self.emit(StateEvent::ListenersChanged(listeners));
        listeners
    }

    /// Unregister a listener.  Saturates at zero.  Returns the new count.
    pub fn disconnect(&self) -> usize {
        let listeners = {
            let mut state = self.write();
            state.listeners = state.listeners.saturating_sub(1);
            state.rev += 1;
            state.listeners
        };
        self.emit(StateEvent::ListenersChanged(listeners));
        listeners
    }

    /// Connect and return a guard that disconnects when released or dropped.
    pub fn join(self: &Arc<Self>) -> ListenerGuard {
        self.connect();
        ListenerGuard {
            manager: Arc::clone(self),
            released: false,
        }
    }

    pub fn set_now_playing(&self, show: Option<usize>) {
        {
            let mut state = self.write();
            state.now_playing = show;
            state.rev += 1;
        }
        self.emit(StateEvent::NowPlayingChanged(show));
    }

    /// Tune into `show`, or clear now-playing if `show` is already on air.
    /// Read and write happen under one lock.  Returns the new now-playing.
    pub fn toggle_now_playing(&self, show: usize) -> Option<usize> {
        let now_playing = {
            let mut state = self.write();
            state.now_playing = if state.now_playing == Some(show) {
                None
            } else {
                Some(show)
            };
            state.rev += 1;
            state.now_playing
        };
        self.emit(StateEvent::NowPlayingChanged(now_playing));
        now_playing
    }

    fn emit(&self, event: StateEvent) {
        // No subscribers is fine.
        if self.events.send(event).is_err() {
            debug!("state event dropped: no subscribers");
        }
    }

    // A panic elsewhere never leaves the snapshot half-written (every update
    // is a plain field store), so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, BroadcastSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BroadcastSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One connected session's claim on the listener count.
pub struct ListenerGuard {
    manager: Arc<StateManager>,
    released: bool,
}

impl ListenerGuard {
    /// Disconnect now.  Dropping the guard does the same.
    pub fn release(mut self) -> usize {
        self.released = true;
        self.manager.disconnect()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if !self.released {
            self.manager.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent_and_empty() {
        let sm = StateManager::new();
        let snap = sm.snapshot();
        assert_eq!(snap.now_playing, None);
        assert_eq!(snap.listeners, 0);
        assert_eq!(snap.rev, 0);
    }

    #[test]
    fn guard_releases_exactly_once() {
        let sm = Arc::new(StateManager::new());
        let a = sm.join();
        let b = sm.join();
        assert_eq!(sm.snapshot().listeners, 2);
        assert_eq!(a.release(), 1);
        drop(b);
        assert_eq!(sm.snapshot().listeners, 0);
    }

    #[test]
    fn disconnect_never_goes_negative() {
        let sm = StateManager::new();
        assert_eq!(sm.disconnect(), 0);
        sm.connect();
        assert_eq!(sm.disconnect(), 0);
        assert_eq!(sm.disconnect(), 0);
    }

    #[test]
    fn toggle_pairs_return_to_silence() {
        let sm = StateManager::new();
        assert_eq!(sm.toggle_now_playing(3), Some(3));
        assert_eq!(sm.toggle_now_playing(3), None);
        assert_eq!(sm.snapshot().now_playing, None);
    }

    #[test]
    fn tuning_other_show_replaces_without_counting() {
        let sm = StateManager::new();
        sm.connect();
        sm.toggle_now_playing(1);
        sm.toggle_now_playing(2);
        let snap = sm.snapshot();
        assert_eq!(snap.now_playing, Some(2));
        assert_eq!(snap.listeners, 1);
    }

    #[test]
    fn every_mutation_bumps_rev() {
        let sm = StateManager::new();
        sm.connect();
        sm.set_now_playing(Some(0));
        sm.set_now_playing(None);
        sm.disconnect();
        assert_eq!(sm.snapshot().rev, 4);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let sm = StateManager::new();
        let mut rx = sm.subscribe();
        sm.set_now_playing(Some(5));
        assert_eq!(
            rx.recv().await.unwrap(),
            StateEvent::NowPlayingChanged(Some(5))
        );
    }
}
