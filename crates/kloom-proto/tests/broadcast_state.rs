use std::sync::Arc;

use kloom_proto::state::StateManager;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_connects_and_disconnects_settle_to_difference() {
    const CONNECTS: usize = 64;
    const DISCONNECTS: usize = 40;

    let sm = Arc::new(StateManager::new());
    let mut guards = Vec::new();
    let mut handles = Vec::new();
    for _ in 0..CONNECTS {
        let sm = sm.clone();
        handles.push(tokio::spawn(async move { sm.join() }));
    }
    for h in handles {
        guards.push(h.await.unwrap());
    }
    assert_eq!(sm.snapshot().listeners, CONNECTS);

    let mut handles = Vec::new();
    for guard in guards.drain(..DISCONNECTS) {
        handles.push(tokio::spawn(async move { guard.release() }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(sm.snapshot().listeners, CONNECTS - DISCONNECTS);
    drop(guards);
    assert_eq!(sm.snapshot().listeners, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tunes_leave_a_valid_show() {
    let sm = Arc::new(StateManager::new());
    let mut handles = Vec::new();
    for show in 0..16 {
        let sm = sm.clone();
        handles.push(tokio::spawn(async move {
            sm.set_now_playing(Some(show));
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let snap = sm.snapshot();
    assert!(matches!(snap.now_playing, Some(n) if n < 16));
    assert_eq!(snap.rev, 16);
    assert_eq!(snap.listeners, 0);
}

#[test]
fn guard_releases_when_task_panics() {
    let sm = Arc::new(StateManager::new());
    let sm2 = sm.clone();
    let result = std::thread::spawn(move || {
        let _guard = sm2.join();
        panic!("session blew up");
    })
    .join();
    assert!(result.is_err());
    assert_eq!(sm.snapshot().listeners, 0);
}
